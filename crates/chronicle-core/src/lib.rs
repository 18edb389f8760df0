//! Dynasty Chronicle Library
//!
//! A year-by-year world simulation: a data-driven rule engine fires world
//! events against region and faction stats while royal dynasties age, marry,
//! bear children and pass the crown.

pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod output;
pub mod rules;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;

pub use config::Config;
pub use error::{CatalogError, ConfigError, EngineError, SimulationError};
pub use events::{ChronicleWriter, YearChronicle};
pub use output::{render_family_tree, render_year, EventFilter};
pub use rules::{ConditionLibrary, EventCatalog, RuleEngine};
// Explicit to avoid clashing with the component module names
pub use setup::{create_world, found_dynasty};
pub use simulation::{SimClock, SimRng, Simulation, YearReport};
