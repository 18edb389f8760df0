//! Chronicle Events
//!
//! The per-year chronicle buffer and the JSONL writer.

pub mod logger;

pub use logger::ChronicleWriter;

use bevy_ecs::prelude::*;

use chronicle_events::ChronicleEntry;

use crate::error::EngineError;

/// Resource: entries produced during the current year
#[derive(Resource, Debug, Default)]
pub struct YearChronicle {
    pub entries: Vec<ChronicleEntry>,
    /// Set when the rule engine hit an invariant violation this year
    pub fault: Option<EngineError>,
}

impl YearChronicle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ChronicleEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = ChronicleEntry>) {
        self.entries.extend(entries);
    }

    /// Takes the year's entries and fault, leaving the buffer empty
    pub fn drain(&mut self) -> (Vec<ChronicleEntry>, Option<EngineError>) {
        (std::mem::take(&mut self.entries), self.fault.take())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
