//! Per-species EOS constants.
//!
//! Peng-Robinson constants come from critical properties:
//! `a = 0.45724·R²·Tc²/Pc`, `b = 0.07780·R·Tc/Pc`, with the temperature
//! correction `α(T) = (1 + m·(1 − √(T/Tc)))²`,
//! `m = 0.37464 + 1.54226·ω − 0.26992·ω²`.

use crate::error::{EosError, EosResult};
use crate::species::Species;
use gp_core::is_positive_finite;

const PR_OMEGA_A: f64 = 0.45724;
const PR_OMEGA_B: f64 = 0.07780;

/// EOS constants of one component as consumed by the mixing rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentParameters {
    /// Attraction constant [Pa·m⁶/mol²] (already multiplied by α(T) where applicable)
    pub a: f64,
    /// Co-volume [m³/mol]
    pub b: f64,
    /// Molar mass
    pub molar_mass: f64,
}

impl ComponentParameters {
    /// Van der Waals parameters: the species' stored constants.
    pub fn van_der_waals(species: &Species) -> Self {
        Self {
            a: species.a(),
            b: species.b(),
            molar_mass: species.molar_mass(),
        }
    }

    /// Peng-Robinson parameters derived from the species' critical properties.
    ///
    /// Returns the parameters with the bare `a` together with α(T).
    pub fn peng_robinson(species: &Species, t: f64, r: f64) -> EosResult<(Self, f64)> {
        let critical = species.critical().ok_or(EosError::InvalidParameter {
            what: "Peng-Robinson requires critical temperature, pressure and acentric factor",
        })?;
        let (a, b) = derive(critical.temperature, critical.pressure, r)?;
        let alpha = alpha(t, critical.temperature, critical.acentric_factor)?;
        Ok((
            Self {
                a,
                b,
                molar_mass: species.molar_mass(),
            },
            alpha,
        ))
    }

    /// Same parameters with the attraction constant scaled by `alpha`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: self.a * alpha,
            ..self
        }
    }
}

fn check_critical(tc: f64, pc: f64) -> EosResult<()> {
    if !is_positive_finite(tc) {
        return Err(EosError::InvalidParameter {
            what: "critical temperature must be positive and finite",
        });
    }
    if !is_positive_finite(pc) {
        return Err(EosError::InvalidParameter {
            what: "critical pressure must be positive and finite",
        });
    }
    Ok(())
}

/// Peng-Robinson `(a, b)` from critical temperature [K] and pressure [Pa].
pub fn derive(tc: f64, pc: f64, r: f64) -> EosResult<(f64, f64)> {
    check_critical(tc, pc)?;
    let a = PR_OMEGA_A * r * r * tc * tc / pc;
    let b = PR_OMEGA_B * r * tc / pc;
    Ok((a, b))
}

/// Van der Waals `(a, b)` from critical temperature [K] and pressure [Pa]:
/// `a = 27·R²·Tc²/(64·Pc)`, `b = R·Tc/(8·Pc)`.
pub fn derive_van_der_waals(tc: f64, pc: f64, r: f64) -> EosResult<(f64, f64)> {
    check_critical(tc, pc)?;
    let a = 27.0 * r * r * tc * tc / (64.0 * pc);
    let b = r * tc / (8.0 * pc);
    Ok((a, b))
}

/// Peng-Robinson slope `m(ω)`.
pub fn kappa(acentric_factor: f64) -> f64 {
    0.37464 + 1.54226 * acentric_factor - 0.26992 * acentric_factor * acentric_factor
}

/// Peng-Robinson temperature correction α(T).
pub fn alpha(t: f64, tc: f64, acentric_factor: f64) -> EosResult<f64> {
    if !is_positive_finite(t) {
        return Err(EosError::InvalidState {
            what: "temperature must be positive and finite",
        });
    }
    if !is_positive_finite(tc) {
        return Err(EosError::InvalidParameter {
            what: "critical temperature must be positive and finite",
        });
    }
    let root = 1.0 + kappa(acentric_factor) * (1.0 - (t / tc).sqrt());
    Ok(root * root)
}
