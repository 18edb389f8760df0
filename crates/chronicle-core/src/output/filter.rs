//! Chronicle filtering for display and export.

use std::collections::BTreeSet;

use chronicle_events::ChronicleEntry;

/// Which chronicle entries are shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    /// World-event categories to keep; empty keeps every category
    pub categories: BTreeSet<String>,
    pub world_events: bool,
    pub dynasty_events: bool,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            categories: BTreeSet::new(),
            world_events: true,
            dynasty_events: true,
        }
    }
}

impl EventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn allows(&self, entry: &ChronicleEntry) -> bool {
        match entry {
            ChronicleEntry::World(event) => {
                self.world_events
                    && (self.categories.is_empty() || self.categories.contains(&event.category))
            }
            ChronicleEntry::Dynasty(_) => self.dynasty_events,
        }
    }

    pub fn apply<'a>(&'a self, entries: &'a [ChronicleEntry]) -> impl Iterator<Item = &'a ChronicleEntry> {
        entries.iter().filter(move |entry| self.allows(entry))
    }
}
