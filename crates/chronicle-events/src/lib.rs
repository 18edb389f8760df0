//! Shared event types and serialization for the dynasty chronicle.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod definition;
pub mod event;
pub mod snapshot;

// Re-export definition types
pub use definition::{
    Condition, Effect, EventDefinition, EventMetadata, FollowupSpec, Operator, StatValue, Target,
    TargetKind,
};

// Re-export event types
pub use event::{ChronicleEntry, DynastyEvent, SuccessionRelation, TriggerOrigin, TriggeredEvent};

// Re-export snapshot types
pub use snapshot::{StatMap, WorldStateSnapshot};
