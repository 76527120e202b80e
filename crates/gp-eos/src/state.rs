//! State conditions for a property query.

use crate::error::{EosError, EosResult};
use gp_core::is_positive_finite;
use gp_core::units::{Pressure, Temperature, k, pa, pressure_pa, temperature_k};

/// Temperature and pressure of a query, both strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateConditions {
    t_k: f64,
    p_pa: f64,
}

impl StateConditions {
    /// Create validated conditions from uom quantities.
    pub fn new(t: Temperature, p: Pressure) -> EosResult<Self> {
        Self::from_si(temperature_k(t), pressure_pa(p))
    }

    /// Create validated conditions from kelvin and pascal.
    pub fn from_si(t_k: f64, p_pa: f64) -> EosResult<Self> {
        validate_temperature(t_k)?;
        validate_pressure(p_pa)?;
        Ok(Self { t_k, p_pa })
    }

    /// Temperature [K].
    pub fn temperature_k(&self) -> f64 {
        self.t_k
    }

    /// Pressure [Pa].
    pub fn pressure_pa(&self) -> f64 {
        self.p_pa
    }

    pub fn temperature(&self) -> Temperature {
        k(self.t_k)
    }

    pub fn pressure(&self) -> Pressure {
        pa(self.p_pa)
    }

    /// Same temperature, different pressure.
    pub fn with_pressure(self, p_pa: f64) -> EosResult<Self> {
        Self::from_si(self.t_k, p_pa)
    }

    /// Same pressure, different temperature.
    pub fn with_temperature(self, t_k: f64) -> EosResult<Self> {
        Self::from_si(t_k, self.p_pa)
    }
}

/// Ensure temperature is positive and finite.
pub(crate) fn validate_temperature(t_k: f64) -> EosResult<()> {
    if !is_positive_finite(t_k) {
        return Err(EosError::InvalidState {
            what: "temperature must be positive and finite",
        });
    }
    Ok(())
}

/// Ensure pressure is positive and finite.
pub(crate) fn validate_pressure(p_pa: f64) -> EosResult<()> {
    if !is_positive_finite(p_pa) {
        return Err(EosError::InvalidState {
            what: "pressure must be positive and finite",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_valid_state() {
        let state = StateConditions::new(k(300.0), pa(101325.0)).unwrap();
        assert_eq!(state.pressure_pa(), 101325.0);
        assert_eq!(state.temperature_k(), 300.0);
        assert_eq!(pressure_pa(state.pressure()), 101325.0);
        assert_eq!(temperature_k(state.temperature()), 300.0);
    }

    #[test]
    fn reject_non_positive_pressure() {
        assert!(matches!(
            StateConditions::from_si(300.0, -100.0),
            Err(EosError::InvalidState { .. })
        ));
        assert!(StateConditions::from_si(300.0, 0.0).is_err());
    }

    #[test]
    fn reject_zero_temperature() {
        assert!(matches!(
            StateConditions::from_si(0.0, 101325.0),
            Err(EosError::InvalidState { .. })
        ));
    }

    #[test]
    fn reject_non_finite() {
        assert!(StateConditions::from_si(300.0, f64::NAN).is_err());
        assert!(StateConditions::from_si(f64::INFINITY, 1e5).is_err());
    }

    #[test]
    fn with_revalidates() {
        let state = StateConditions::from_si(300.0, 1e5).unwrap();
        assert_eq!(state.with_pressure(2e5).unwrap().pressure_pa(), 2e5);
        assert!(state.with_temperature(-1.0).is_err());
    }
}
