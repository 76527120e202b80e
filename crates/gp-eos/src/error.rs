//! Engine error taxonomy.

use thiserror::Error;

/// Result type for engine operations.
pub type EosResult<T> = Result<T, EosError>;

/// Errors raised by the property engine.
///
/// Each kind is raised by the component that first detects it and is surfaced
/// to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EosError {
    /// A supplied constant (Tc, Pc, a, b, molar mass, config value) is
    /// non-positive or otherwise physically invalid.
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    /// Empty composition, non-positive mole fraction, or fractions that do not
    /// sum to one where normalized input is required.
    #[error("Invalid composition: {what}")]
    InvalidComposition { what: &'static str },

    /// Non-positive or non-finite temperature or pressure.
    #[error("Invalid state: {what}")]
    InvalidState { what: &'static str },

    /// Root search exhausted its iteration bound or found no root above the
    /// co-volume.
    #[error("Root search did not converge: {what}")]
    NonConvergence { what: String },
}

impl EosError {
    /// Short, stable label for the error kind (used for display and grouping).
    pub fn kind(&self) -> &'static str {
        match self {
            EosError::InvalidParameter { .. } => "invalid-parameter",
            EosError::InvalidComposition { .. } => "invalid-composition",
            EosError::InvalidState { .. } => "invalid-state",
            EosError::NonConvergence { .. } => "non-convergence",
        }
    }
}
