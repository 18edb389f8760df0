//! Event Definition Types
//!
//! Typed form of the world-event rule table: conditions, effects, follow-ups.
//! Parsing and validation of catalog documents lives in `chronicle-core`;
//! these types only describe an already-validated definition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator used by stat and year conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
}

impl Operator {
    /// Returns all operator variants.
    pub fn all() -> &'static [Operator] {
        &[
            Operator::Eq,
            Operator::Ne,
            Operator::Gt,
            Operator::Ge,
            Operator::Lt,
            Operator::Le,
        ]
    }

    /// The symbol used for this operator in catalog documents.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
        }
    }

    /// Parses a catalog operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.symbol() == symbol)
    }

    /// Applies the operator to two comparable values.
    pub fn compare<T: PartialOrd + ?Sized>(&self, lhs: &T, rhs: &T) -> bool {
        match self {
            Operator::Eq => lhs == rhs,
            Operator::Ne => lhs != rhs,
            Operator::Gt => lhs > rhs,
            Operator::Ge => lhs >= rhs,
            Operator::Lt => lhs < rhs,
            Operator::Le => lhs <= rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A region or faction stat value.
///
/// Most stats are integers; a few (a faction's `leader`) are strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(i64),
    Text(String),
}

impl StatValue {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            StatValue::Number(n) => Some(*n),
            StatValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StatValue::Number(_) => None,
            StatValue::Text(s) => Some(s),
        }
    }
}

impl From<i64> for StatValue {
    fn from(n: i64) -> Self {
        StatValue::Number(n)
    }
}

impl From<i32> for StatValue {
    fn from(n: i32) -> Self {
        StatValue::Number(n.into())
    }
}

impl From<&str> for StatValue {
    fn from(s: &str) -> Self {
        StatValue::Text(s.to_string())
    }
}

impl From<String> for StatValue {
    fn from(s: String) -> Self {
        StatValue::Text(s)
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(n) => write!(f, "{}", n),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

/// Which kind of entity a stat belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Region,
    Faction,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Region => f.write_str("region"),
            TargetKind::Faction => f.write_str("faction"),
        }
    }
}

/// A named region or faction.
///
/// Serialized as `{"region": name}` or `{"faction": name}` so it can be
/// flattened into effect records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Region(String),
    Faction(String),
}

impl Target {
    pub fn region(name: impl Into<String>) -> Self {
        Target::Region(name.into())
    }

    pub fn faction(name: impl Into<String>) -> Self {
        Target::Faction(name.into())
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Region(_) => TargetKind::Region,
            Target::Faction(_) => TargetKind::Faction,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Target::Region(name) | Target::Faction(name) => name,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.name())
    }
}

/// A single eligibility test against the world state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Compares the current simulation year
    Year { operator: Operator, value: i64 },
    /// Compares a region stat (missing stats read as 0)
    Region {
        region: String,
        stat: String,
        operator: Operator,
        value: StatValue,
    },
    /// Compares a faction stat (missing stats read as 0)
    Faction {
        faction: String,
        stat: String,
        operator: Operator,
        value: StatValue,
    },
    /// Refers to a named condition in the built-in library
    Common { value: String },
    /// A condition type this build does not know; always false
    Unknown { kind: String },
}

impl Condition {
    pub fn region_stat(
        region: impl Into<String>,
        stat: impl Into<String>,
        operator: Operator,
        value: impl Into<StatValue>,
    ) -> Self {
        Condition::Region {
            region: region.into(),
            stat: stat.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn faction_stat(
        faction: impl Into<String>,
        stat: impl Into<String>,
        operator: Operator,
        value: impl Into<StatValue>,
    ) -> Self {
        Condition::Faction {
            faction: faction.into(),
            stat: stat.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn common(name: impl Into<String>) -> Self {
        Condition::Common { value: name.into() }
    }
}

/// A mutation applied to the world state when an event triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Adds `value` to a numeric stat, clamped to the stat bounds
    ModifyStat {
        #[serde(flatten)]
        target: Target,
        stat: String,
        value: i64,
    },
    /// Replaces a faction's `leader`
    ChangeLeader { faction: String, new_leader: String },
    /// An effect type this build does not know; applying it does nothing
    Unknown { kind: String },
}

impl Effect {
    pub fn modify_stat(target: Target, stat: impl Into<String>, value: i64) -> Self {
        Effect::ModifyStat {
            target,
            stat: stat.into(),
            value,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::ModifyStat {
                target,
                stat,
                value,
            } => write!(f, "{}.{} {:+}", target.name(), stat, value),
            Effect::ChangeLeader {
                faction,
                new_leader,
            } => write!(f, "{} led by {}", faction, new_leader),
            Effect::Unknown { kind } => write!(f, "<{}>", kind),
        }
    }
}

/// Declared consequence of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowupSpec {
    /// Id of the event to trigger
    pub id: String,
    /// Years to wait; 0 resolves in the same year
    pub delay: u32,
    /// Chance in `[0, 1]` that the follow-up fires when resolved
    pub probability: f64,
}

/// Optional descriptive fields carried for display only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
}

impl EventMetadata {
    pub fn is_empty(&self) -> bool {
        self.severity.is_none()
            && self.region.is_none()
            && self.impact.is_none()
            && self.faction.is_none()
    }

    /// Label/value pairs for the fields that are present.
    pub fn details(&self) -> Vec<(&'static str, &str)> {
        let mut details = Vec::new();
        if let Some(severity) = &self.severity {
            details.push(("severity", severity.as_str()));
        }
        if let Some(region) = &self.region {
            details.push(("region", region.as_str()));
        }
        if let Some(impact) = &self.impact {
            details.push(("impact", impact.as_str()));
        }
        if let Some(faction) = &self.faction {
            details.push(("faction", faction.as_str()));
        }
        details
    }
}

/// A validated world-event definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default, rename = "followup_events")]
    pub followups: Vec<FollowupSpec>,
    /// Reachable only through another event's follow-up list
    #[serde(default)]
    pub is_followup: bool,
    #[serde(default, skip_serializing_if = "EventMetadata::is_empty")]
    pub metadata: EventMetadata,
}
