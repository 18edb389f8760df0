//! Configuration loading for the chronicle.
//!
//! All settings come from an optional TOML file. Every section and field has
//! a default, so a partial file (or none at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "chronicle.toml";

/// Complete chronicle configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub person: PersonConfig,
    #[serde(default)]
    pub marriage: MarriageConfig,
    #[serde(default)]
    pub childbirth: ChildbirthConfig,
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the file if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(
                target: "simulation",
                "No config at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }
}

/// Run length, seeding and inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// First simulated year
    pub start_year: i32,
    /// Number of years to simulate
    pub years: u32,
    /// RNG seed
    pub seed: u64,
    /// Path of the world-event catalog
    pub catalog: PathBuf,
    /// Dynasties founded at the start year
    pub dynasties: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_year: 1000,
            years: 50,
            seed: 42,
            catalog: PathBuf::from("data/event_definitions.json"),
            dynasties: vec!["House Nerdival".to_string()],
        }
    }
}

/// Rule engine tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest chain of immediate follow-ups resolved from one event
    pub max_followup_depth: u32,
    /// Chance that a category with eligible events fires at all
    pub category_trigger_chance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_followup_depth: 10,
            category_trigger_chance: 1.0,
        }
    }
}

/// Aging and health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonConfig {
    pub max_base_age: i32,
    /// Upper bound of the random bonus added to `max_base_age` each year
    pub max_age_bonus: i32,
    pub initial_health: i32,
    pub health_decrease_min: i32,
    pub health_decrease_max: i32,
}

impl Default for PersonConfig {
    fn default() -> Self {
        Self {
            max_base_age: 80,
            max_age_bonus: 40,
            initial_health: 100,
            health_decrease_min: 0,
            health_decrease_max: 5,
        }
    }
}

/// Marriage chance and the marriage market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarriageConfig {
    pub min_age: i32,
    pub marriage_chance_base: f64,
    /// Added to the base chance per year of age past `min_age`
    pub marriage_chance_increase: f64,
    pub max_marriage_chance: f64,
    pub max_age_difference: i32,
    /// Chance that a new candidate joins the market in a given year
    pub new_candidate_chance: f64,
    /// Years a candidate stays on the market
    pub candidate_years: u32,
    pub candidate_min_age: i32,
    pub candidate_max_age: i32,
}

impl Default for MarriageConfig {
    fn default() -> Self {
        Self {
            min_age: 18,
            marriage_chance_base: 0.1,
            marriage_chance_increase: 0.05,
            max_marriage_chance: 0.9,
            max_age_difference: 10,
            new_candidate_chance: 0.1,
            candidate_years: 5,
            candidate_min_age: 16,
            candidate_max_age: 30,
        }
    }
}

/// Childbirth window and chance. Mothers must be strictly older than
/// `min_age` and strictly younger than `max_age`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildbirthConfig {
    pub min_age: i32,
    pub max_age: i32,
    pub chance: f64,
}

impl Default for ChildbirthConfig {
    fn default() -> Self {
        Self {
            min_age: 16,
            max_age: 45,
            chance: 0.3,
        }
    }
}
