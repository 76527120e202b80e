//! Engine configuration.
//!
//! A single immutable [`EngineConfig`] carries the gas constant and the root
//! solver settings. Defaults reproduce the reference behavior; callers may load
//! overrides once (e.g. from YAML) and pass the config by reference.

use crate::error::{EosError, EosResult};
use gp_core::is_positive_finite;
use gp_core::units::constants::R_J_PER_MOL_K;
use serde::{Deserialize, Serialize};

/// Root solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Maximum Newton iterations per attempt
    pub max_iterations: usize,
    /// Absolute tolerance on the pressure residual [Pa]
    pub abs_tol: f64,
    /// Relative tolerance on the pressure residual (fraction of P)
    pub rel_tol: f64,
    /// Scale applied to the ideal-gas guess on each retry
    pub retry_factor: f64,
    /// Number of attempts (initial guess plus retries)
    pub max_attempts: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            abs_tol: 1e-6,
            rel_tol: 1e-14,
            retry_factor: 2.0,
            max_attempts: 2,
        }
    }
}

impl SolverConfig {
    /// Residual tolerance [Pa] at pressure `p`.
    ///
    /// The relative floor only matters above ~1e8 Pa, where f64 rounding of the
    /// pressure terms alone exceeds the absolute tolerance.
    pub fn residual_tolerance(&self, p: f64) -> f64 {
        self.abs_tol.max(self.rel_tol * p.abs())
    }
}

/// Engine-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Universal gas constant [J/(mol·K)]
    pub gas_constant: f64,
    /// Allowed deviation of the mole-fraction sum from one in the mixing rules
    pub mixing_tolerance: f64,
    /// Root solver settings
    pub solver: SolverConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gas_constant: R_J_PER_MOL_K,
            mixing_tolerance: 1e-9,
            solver: SolverConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Check that every setting is usable.
    pub fn validate(&self) -> EosResult<()> {
        if !is_positive_finite(self.gas_constant) {
            return Err(EosError::InvalidParameter {
                what: "gas constant must be positive and finite",
            });
        }
        if !is_positive_finite(self.mixing_tolerance) {
            return Err(EosError::InvalidParameter {
                what: "mixing tolerance must be positive and finite",
            });
        }
        let solver = &self.solver;
        if solver.max_iterations == 0 {
            return Err(EosError::InvalidParameter {
                what: "max_iterations must be at least 1",
            });
        }
        if solver.max_attempts == 0 {
            return Err(EosError::InvalidParameter {
                what: "max_attempts must be at least 1",
            });
        }
        if !is_positive_finite(solver.abs_tol) {
            return Err(EosError::InvalidParameter {
                what: "abs_tol must be positive and finite",
            });
        }
        if !solver.rel_tol.is_finite() || solver.rel_tol < 0.0 {
            return Err(EosError::InvalidParameter {
                what: "rel_tol must be non-negative and finite",
            });
        }
        if !solver.retry_factor.is_finite() || solver.retry_factor <= 1.0 {
            return Err(EosError::InvalidParameter {
                what: "retry_factor must be finite and greater than one",
            });
        }
        Ok(())
    }
}
