//! Chemical species definitions.

use crate::error::{EosError, EosResult};
use crate::params;
use gp_core::is_positive_finite;
use std::fmt;

/// Critical-point data used by the Peng-Robinson variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalProperties {
    /// Critical temperature [K]
    pub temperature: f64,
    /// Critical pressure [Pa]
    pub pressure: f64,
    /// Acentric factor ω (dimensionless, may be negative for quantum gases)
    pub acentric_factor: f64,
}

impl CriticalProperties {
    /// Create validated critical properties.
    pub fn new(temperature: f64, pressure: f64, acentric_factor: f64) -> EosResult<Self> {
        if !is_positive_finite(temperature) {
            return Err(EosError::InvalidParameter {
                what: "critical temperature must be positive and finite",
            });
        }
        if !is_positive_finite(pressure) {
            return Err(EosError::InvalidParameter {
                what: "critical pressure must be positive and finite",
            });
        }
        if !acentric_factor.is_finite() {
            return Err(EosError::InvalidParameter {
                what: "acentric factor must be finite",
            });
        }
        Ok(Self {
            temperature,
            pressure,
            acentric_factor,
        })
    }
}

/// Immutable per-species record.
///
/// `a` [Pa·m⁶/mol²] and `b` [m³/mol] are the constants used directly by the
/// Van der Waals variant. Peng-Robinson variants derive their own constants from
/// [`CriticalProperties`].
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    name: String,
    molar_mass: f64,
    critical: Option<CriticalProperties>,
    a: f64,
    b: f64,
}

impl Species {
    /// Create a species from directly supplied EOS constants.
    ///
    /// `molar_mass` is in the mass unit the caller wants densities in, per mole
    /// (the catalog uses kg/mol).
    pub fn new(name: impl Into<String>, molar_mass: f64, a: f64, b: f64) -> EosResult<Self> {
        if !is_positive_finite(molar_mass) {
            return Err(EosError::InvalidParameter {
                what: "molar mass must be positive and finite",
            });
        }
        if !is_positive_finite(a) {
            return Err(EosError::InvalidParameter {
                what: "attraction constant a must be positive and finite",
            });
        }
        if !is_positive_finite(b) {
            return Err(EosError::InvalidParameter {
                what: "co-volume b must be positive and finite",
            });
        }
        Ok(Self {
            name: name.into(),
            molar_mass,
            critical: None,
            a,
            b,
        })
    }

    /// Create a species from critical properties; `a` and `b` are the
    /// Peng-Robinson constants derived with gas constant `r`.
    pub fn from_critical(
        name: impl Into<String>,
        molar_mass: f64,
        critical: CriticalProperties,
        r: f64,
    ) -> EosResult<Self> {
        let (a, b) = params::derive(critical.temperature, critical.pressure, r)?;
        Ok(Self::new(name, molar_mass, a, b)?.with_critical(critical))
    }

    /// Attach critical properties, keeping the stored `a`/`b`.
    pub fn with_critical(mut self, critical: CriticalProperties) -> Self {
        self.critical = Some(critical);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Molar mass (kg/mol for catalog species).
    pub fn molar_mass(&self) -> f64 {
        self.molar_mass
    }

    pub fn critical(&self) -> Option<&CriticalProperties> {
        self.critical.as_ref()
    }

    /// Attraction constant a [Pa·m⁶/mol²].
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Co-volume b [m³/mol].
    pub fn b(&self) -> f64 {
        self.b
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (M={} kg/mol", self.name, self.molar_mass)?;
        if let Some(c) = &self.critical {
            write!(
                f,
                ", Tc={} K, Pc={} Pa, ω={}",
                c.temperature, c.pressure, c.acentric_factor
            )?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_constants() {
        let methane = Species::new("Methane", 0.01604, 0.2283, 4.278e-5).unwrap();
        assert_eq!(methane.name(), "Methane");
        assert_eq!(methane.a(), 0.2283);
        assert_eq!(methane.b(), 4.278e-5);
        assert!(methane.critical().is_none());
    }

    #[test]
    fn reject_non_positive_constants() {
        assert!(matches!(
            Species::new("x", 0.016, 0.0, 4.0e-5),
            Err(EosError::InvalidParameter { .. })
        ));
        assert!(Species::new("x", 0.016, 0.2, -1.0).is_err());
        assert!(Species::new("x", 0.0, 0.2, 4.0e-5).is_err());
        assert!(Species::new("x", 0.016, f64::NAN, 4.0e-5).is_err());
    }

    #[test]
    fn from_critical_derives_peng_robinson_constants() {
        let critical = CriticalProperties::new(190.6, 4.599e6, 0.011).unwrap();
        let methane = Species::from_critical("Methane", 0.01604, critical, 8.314).unwrap();
        let (a, b) = params::derive(190.6, 4.599e6, 8.314).unwrap();
        assert_eq!(methane.a(), a);
        assert_eq!(methane.b(), b);
        assert_eq!(methane.critical(), Some(&critical));
    }

    #[test]
    fn reject_invalid_critical_properties() {
        assert!(CriticalProperties::new(0.0, 4.599e6, 0.011).is_err());
        assert!(CriticalProperties::new(190.6, -1.0, 0.011).is_err());
        assert!(CriticalProperties::new(190.6, 4.599e6, f64::INFINITY).is_err());
        // Quantum gases carry negative acentric factors
        assert!(CriticalProperties::new(33.19, 1.313e6, -0.216).is_ok());
    }

    #[test]
    fn display_includes_critical_data() {
        let critical = CriticalProperties::new(190.6, 4.599e6, 0.011).unwrap();
        let s = Species::new("Methane", 0.01604, 0.2283, 4.278e-5)
            .unwrap()
            .with_critical(critical)
            .to_string();
        assert!(s.contains("Methane"));
        assert!(s.contains("Tc=190.6"));
    }
}
