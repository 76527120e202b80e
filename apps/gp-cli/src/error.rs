//! Error types for the gp-cli front end.

use crate::units::UnitError;
use gp_eos::EosError;
use std::path::PathBuf;

/// CLI error type wrapping engine, input and I/O failures.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Eos(#[from] EosError),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("Unknown species: {0} (try `gp-cli species`)")]
    UnknownSpecies(String),

    #[error("Invalid component '{0}': expected NAME=FRACTION")]
    InvalidComponent(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for gp-cli operations.
pub type CliResult<T> = Result<T, CliError>;
