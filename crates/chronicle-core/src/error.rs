//! Error Types
//!
//! Catalog errors are fatal at startup; engine errors signal a broken
//! invariant during a processed year.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load or validate an event catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("could not read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid catalog at {path}: {reason}")]
    Schema { path: String, reason: String },

    #[error("event id '{id}' is defined in both '{first}' and '{second}'")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },

    #[error("event '{event}' declares follow-up '{followup}', which is not in the catalog")]
    DanglingFollowup { event: String, followup: String },
}

impl CatalogError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Invariant violation raised while processing a year
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("event '{id}' referenced by '{referenced_by}' is missing from the loaded catalog")]
    UnknownEvent { id: String, referenced_by: String },

    #[error("cannot process year {requested}: world is already at year {current}")]
    YearRegression { current: i32, requested: i32 },
}

/// Failure to read the TOML configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Anything that stops a simulation run
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("could not write chronicle: {0}")]
    Output(#[from] std::io::Error),
}
