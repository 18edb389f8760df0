//! World-event rules: catalog loading, condition evaluation, effects, and the
//! yearly engine.

pub mod catalog;
pub mod condition;
pub mod effect;
pub mod engine;

pub use catalog::EventCatalog;
pub use condition::{check_conditions, evaluate, ConditionLibrary};
pub use effect::{apply, StatChange, STAT_CEILING, STAT_FLOOR};
pub use engine::RuleEngine;
