//! Chronicle Writer
//!
//! Append-only JSONL output of chronicle entries.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use chronicle_events::ChronicleEntry;

/// Writes one chronicle entry per line
pub struct ChronicleWriter {
    writer: Option<Box<dyn Write>>,
    entry_count: u64,
}

impl ChronicleWriter {
    /// Create a writer that truncates and writes to `path`
    pub fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Write to any sink, e.g. a locked stdout
    pub fn from_writer(writer: impl Write + 'static) -> Self {
        Self {
            writer: Some(Box::new(writer)),
            entry_count: 0,
        }
    }

    /// Create a writer that discards entries (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            entry_count: 0,
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    pub fn write(&mut self, entry: &ChronicleEntry) -> std::io::Result<()> {
        self.entry_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = entry.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn write_batch<'a>(
        &mut self,
        entries: impl IntoIterator<Item = &'a ChronicleEntry>,
    ) -> std::io::Result<()> {
        for entry in entries {
            self.write(entry)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for ChronicleWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(target: "simulation", "Failed to flush chronicle writer: {}", e);
        }
    }
}

/// Opens `path` for JSONL output, creating parent directories as needed
pub fn open_chronicle(path: &Path) -> std::io::Result<ChronicleWriter> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    ChronicleWriter::create(path)
}
