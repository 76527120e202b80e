//! Gas composition (pure species or mixtures).

use crate::error::{EosError, EosResult};
use crate::species::Species;
use gp_core::numeric::{Tolerances, nearly_equal};

/// Composition defined by normalized mole fractions.
///
/// The composition is always normalized (mole fractions sum to 1.0) and
/// preserves the order in which species were supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Species and their mole fractions (always normalized to sum=1).
    items: Vec<(Species, f64)>,
}

impl Composition {
    /// Create a pure-species composition.
    pub fn pure(species: Species) -> Self {
        Self {
            items: vec![(species, 1.0)],
        }
    }

    /// Create a composition from mole fractions.
    ///
    /// Rejects an empty list and any non-positive or non-finite fraction, then
    /// normalizes to sum=1. Sums other than one are accepted.
    pub fn new(fractions: Vec<(Species, f64)>) -> EosResult<Self> {
        if fractions.is_empty() {
            return Err(EosError::InvalidComposition {
                what: "empty composition",
            });
        }

        let mut sum = 0.0;
        for (_, frac) in &fractions {
            if !frac.is_finite() {
                return Err(EosError::InvalidComposition {
                    what: "non-finite mole fraction",
                });
            }
            if *frac <= 0.0 {
                return Err(EosError::InvalidComposition {
                    what: "mole fractions must be positive",
                });
            }
            sum += frac;
        }

        if sum <= 0.0 || !sum.is_finite() {
            return Err(EosError::InvalidComposition {
                what: "mole fractions sum to zero or non-finite",
            });
        }

        let items = fractions.into_iter().map(|(s, f)| (s, f / sum)).collect();
        Ok(Self { items })
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no components. A constructed composition always has one.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get mole fraction of a species by name (0.0 if not present).
    pub fn mole_fraction(&self, name: &str) -> f64 {
        self.items
            .iter()
            .filter(|(s, _)| s.name() == name)
            .map(|(_, f)| *f)
            .sum()
    }

    /// Check if this is a pure-species composition.
    ///
    /// Returns `Some(species)` if exactly one species has fraction ≈1.0.
    pub fn is_pure(&self) -> Option<&Species> {
        if let [(species, frac)] = self.items.as_slice() {
            let tol = Tolerances {
                abs: 1e-10,
                rel: 1e-10,
            };
            if nearly_equal(*frac, 1.0, tol) {
                return Some(species);
            }
        }
        None
    }

    /// Iterate over species and their mole fractions in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&Species, f64)> + '_ {
        self.items.iter().map(|(s, f)| (s, *f))
    }

    /// Mixture molar mass: M_mix = Σ (y_i · M_i).
    pub fn molar_mass(&self) -> f64 {
        self.items
            .iter()
            .map(|(species, mole_frac)| species.molar_mass() * mole_frac)
            .sum()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_sum_is_one(fracs in prop::collection::vec(1e-6_f64..1.0_f64, 1..6)) {
            let input: Vec<(Species, f64)> = fracs
                .iter()
                .enumerate()
                .map(|(i, &f)| (Species::new(format!("s{i}"), 0.016, 0.2, 4.0e-5).unwrap(), f))
                .collect();

            let comp = Composition::new(input).unwrap();
            let sum: f64 = comp.iter().map(|(_, f)| f).sum();
            let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
            prop_assert!(nearly_equal(sum, 1.0, tol));
            prop_assert!(comp.iter().all(|(_, f)| f > 0.0 && f <= 1.0));
        }
    }
}
