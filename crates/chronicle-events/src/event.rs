//! Chronicle Event Types
//!
//! Records produced each simulated year: triggered world events from the rule
//! engine and dynasty events from the family bookkeeping.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::definition::{Effect, EventDefinition, EventMetadata};

/// How a world event came to trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerOrigin {
    /// Picked from its category's eligible set
    Scan,
    /// Immediate (delay 0) follow-up of another event
    Followup { parent: String },
    /// A delayed trigger that came due this year
    Delayed { parent: String, scheduled_in: i32 },
}

impl TriggerOrigin {
    pub fn is_scan(&self) -> bool {
        matches!(self, TriggerOrigin::Scan)
    }

    pub fn parent(&self) -> Option<&str> {
        match self {
            TriggerOrigin::Scan => None,
            TriggerOrigin::Followup { parent } | TriggerOrigin::Delayed { parent, .. } => {
                Some(parent)
            }
        }
    }
}

/// A world event that triggered during a processed year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredEvent {
    pub year: i32,
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Category under which the event fired; follow-ups inherit their chain's category
    pub category: String,
    pub effects: Vec<Effect>,
    pub origin: TriggerOrigin,
    #[serde(default, skip_serializing_if = "EventMetadata::is_empty")]
    pub metadata: EventMetadata,
}

impl TriggeredEvent {
    pub fn from_definition(
        definition: &EventDefinition,
        category: impl Into<String>,
        year: i32,
        origin: TriggerOrigin,
    ) -> Self {
        Self {
            year,
            id: definition.id.clone(),
            name: definition.name.clone(),
            description: definition.description.clone(),
            category: category.into(),
            effects: definition.effects.clone(),
            origin,
            metadata: definition.metadata.clone(),
        }
    }
}

impl fmt::Display for TriggeredEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)?;
        if let Some(parent) = self.origin.parent() {
            write!(f, " <- {}", parent)?;
        }
        let details = self.metadata.details();
        if !details.is_empty() {
            let joined: Vec<String> = details
                .iter()
                .map(|(label, value)| format!("{}: {}", label, value))
                .collect();
            write!(f, "\n    Details: {}", joined.join(", "))?;
        }
        Ok(())
    }
}

/// How a new monarch is related to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessionRelation {
    Child,
    Sibling,
}

impl fmt::Display for SuccessionRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessionRelation::Child => f.write_str("child"),
            SuccessionRelation::Sibling => f.write_str("sibling"),
        }
    }
}

/// Family events produced by dynasty bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DynastyEvent {
    Marriage {
        year: i32,
        dynasty: String,
        person: String,
        partner: String,
        age: i32,
    },
    Birth {
        year: i32,
        dynasty: String,
        child: String,
        mother: String,
        father: String,
    },
    Death {
        year: i32,
        dynasty: String,
        person: String,
        age: i32,
    },
    Succession {
        year: i32,
        dynasty: String,
        old_monarch: String,
        new_monarch: String,
        relation: SuccessionRelation,
        is_king: bool,
    },
    NoSuccessor {
        year: i32,
        dynasty: String,
        monarch: String,
        is_king: bool,
    },
}

impl DynastyEvent {
    pub fn year(&self) -> i32 {
        match self {
            DynastyEvent::Marriage { year, .. }
            | DynastyEvent::Birth { year, .. }
            | DynastyEvent::Death { year, .. }
            | DynastyEvent::Succession { year, .. }
            | DynastyEvent::NoSuccessor { year, .. } => *year,
        }
    }

    pub fn dynasty(&self) -> &str {
        match self {
            DynastyEvent::Marriage { dynasty, .. }
            | DynastyEvent::Birth { dynasty, .. }
            | DynastyEvent::Death { dynasty, .. }
            | DynastyEvent::Succession { dynasty, .. }
            | DynastyEvent::NoSuccessor { dynasty, .. } => dynasty,
        }
    }
}

impl fmt::Display for DynastyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynastyEvent::Marriage {
                person,
                partner,
                age,
                ..
            } => write!(f, "{} marries {} at age {}", person, partner, age),
            DynastyEvent::Birth {
                child,
                mother,
                father,
                ..
            } => write!(f, "{} is born to {} and {}", child, mother, father),
            DynastyEvent::Death { person, age, .. } => {
                write!(f, "{} dies at age {}", person, age)
            }
            DynastyEvent::Succession {
                old_monarch,
                new_monarch,
                relation,
                is_king,
                ..
            } => write!(
                f,
                "{} ({}) succeeds {} as {}",
                new_monarch,
                relation,
                old_monarch,
                if *is_king { "King" } else { "Queen" }
            ),
            DynastyEvent::NoSuccessor {
                monarch, is_king, ..
            } => write!(
                f,
                "{} {} has died without a suitable successor",
                if *is_king { "King" } else { "Queen" },
                monarch
            ),
        }
    }
}

/// One line of the yearly chronicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ChronicleEntry {
    World(TriggeredEvent),
    Dynasty(DynastyEvent),
}

impl ChronicleEntry {
    pub fn year(&self) -> i32 {
        match self {
            ChronicleEntry::World(event) => event.year,
            ChronicleEntry::Dynasty(event) => event.year(),
        }
    }

    /// Parse an entry from a JSONL line
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Serialize to a single JSONL line
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for ChronicleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChronicleEntry::World(event) => event.fmt(f),
            ChronicleEntry::Dynasty(event) => event.fmt(f),
        }
    }
}
