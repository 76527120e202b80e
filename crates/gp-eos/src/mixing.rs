//! One-fluid mixing rules.
//!
//! - `a_mix = Σ_i Σ_j y_i·y_j·√(a_i·a_j)` (no binary interaction parameter)
//! - `b_mix = Σ_i y_i·b_i`
//! - `M_mix = Σ_i y_i·M_i`

use crate::error::{EosError, EosResult};
use crate::params::ComponentParameters;

/// Mixture-level EOS parameters for one (composition, temperature) query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixtureParameters {
    pub a_mix: f64,
    pub b_mix: f64,
    pub molar_mass_mix: f64,
}

/// Combine component parameters with their mole fractions.
///
/// The fractions must already be normalized to within `tolerance`.
pub fn mix(
    components: &[(ComponentParameters, f64)],
    tolerance: f64,
) -> EosResult<MixtureParameters> {
    if components.is_empty() {
        return Err(EosError::InvalidComposition {
            what: "empty composition",
        });
    }
    if components.iter().any(|(_, y)| !y.is_finite() || *y <= 0.0) {
        return Err(EosError::InvalidComposition {
            what: "mole fractions must be positive",
        });
    }
    let sum: f64 = components.iter().map(|(_, y)| y).sum();
    if (sum - 1.0).abs() > tolerance {
        return Err(EosError::InvalidComposition {
            what: "mole fractions must be normalized before mixing",
        });
    }

    // Single component reproduces its own constants exactly.
    if let [(p, _)] = components {
        return Ok(MixtureParameters {
            a_mix: p.a,
            b_mix: p.b,
            molar_mass_mix: p.molar_mass,
        });
    }

    let mut a_mix = 0.0;
    for (pi, yi) in components {
        for (pj, yj) in components {
            a_mix += yi * yj * (pi.a * pj.a).sqrt();
        }
    }
    let b_mix = components.iter().map(|(p, y)| y * p.b).sum();
    let molar_mass_mix = components.iter().map(|(p, y)| y * p.molar_mass).sum();

    Ok(MixtureParameters {
        a_mix,
        b_mix,
        molar_mass_mix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(a: f64, b: f64, m: f64) -> ComponentParameters {
        ComponentParameters {
            a,
            b,
            molar_mass: m,
        }
    }

    #[test]
    fn single_component_is_exact() {
        let methane = params(0.2283, 4.278e-5, 0.01604);
        let mixed = mix(&[(methane, 1.0)], 1e-9).unwrap();
        assert_eq!(mixed.a_mix, 0.2283);
        assert_eq!(mixed.b_mix, 4.278e-5);
        assert_eq!(mixed.molar_mass_mix, 0.01604);
    }

    #[test]
    fn binary_mixture_matches_hand_calculation() {
        let methane = params(0.2283, 4.278e-5, 0.016);
        let ethane = params(0.5507, 6.38e-5, 0.030);
        let mixed = mix(&[(methane, 0.5), (ethane, 0.5)], 1e-9).unwrap();

        let cross = (0.2283_f64 * 0.5507).sqrt();
        let a_expected = 0.25 * 0.2283 + 0.25 * 0.5507 + 2.0 * 0.25 * cross;
        assert!((mixed.a_mix - a_expected).abs() < 1e-12);
        assert!((mixed.b_mix - 0.5 * (4.278e-5 + 6.38e-5)).abs() < 1e-18);
        assert!((mixed.molar_mass_mix - 0.023).abs() < 1e-12);
    }

    #[test]
    fn identical_components_collapse_to_pure() {
        let p = params(0.3, 5.0e-5, 0.02);
        let mixed = mix(&[(p, 0.3), (p, 0.7)], 1e-9).unwrap();
        assert!((mixed.a_mix - 0.3).abs() < 1e-12);
        assert!((mixed.b_mix - 5.0e-5).abs() < 1e-18);
    }

    #[test]
    fn reject_unnormalized_fractions() {
        let p = params(0.3, 5.0e-5, 0.02);
        let err = mix(&[(p, 0.5), (p, 0.6)], 1e-9).unwrap_err();
        assert!(matches!(err, EosError::InvalidComposition { .. }));
    }

    #[test]
    fn accept_rounding_within_tolerance() {
        let p = params(0.3, 5.0e-5, 0.02);
        assert!(mix(&[(p, 0.1), (p, 0.2), (p, 0.7 + 1e-12)], 1e-9).is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(matches!(
            mix(&[], 1e-9),
            Err(EosError::InvalidComposition { .. })
        ));
    }
}
