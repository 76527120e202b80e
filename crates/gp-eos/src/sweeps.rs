//! Parametric sweeps across temperature or pressure.
//!
//! Points are independent queries and are evaluated in parallel.

use crate::composition::Composition;
use crate::config::EngineConfig;
use crate::error::{EosError, EosResult};
use crate::model::EosModel;
use crate::properties::PropertyResult;
use crate::state::StateConditions;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Quantity varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepQuantity {
    /// Kelvin
    Temperature,
    /// Pascal
    Pressure,
}

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepType {
    /// Uniformly spaced points
    #[default]
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// Definition of a single parameter sweep, bounds in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub quantity: SweepQuantity,
    pub start_si: f64,
    pub end_si: f64,
    pub num_points: usize,
    #[serde(default)]
    pub sweep_type: SweepType,
}

impl SweepDefinition {
    pub fn new(
        quantity: SweepQuantity,
        start_si: f64,
        end_si: f64,
        num_points: usize,
        sweep_type: SweepType,
    ) -> EosResult<Self> {
        let sweep = Self {
            quantity,
            start_si,
            end_si,
            num_points,
            sweep_type,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn validate(&self) -> EosResult<()> {
        if self.num_points < 2 {
            return Err(EosError::InvalidParameter {
                what: "sweep must have at least 2 points",
            });
        }
        if !self.start_si.is_finite() || !self.end_si.is_finite() {
            return Err(EosError::InvalidParameter {
                what: "sweep bounds must be finite",
            });
        }
        if (self.start_si - self.end_si).abs() < 1e-12 {
            return Err(EosError::InvalidParameter {
                what: "sweep start and end must differ",
            });
        }
        if self.sweep_type == SweepType::Logarithmic && (self.start_si <= 0.0 || self.end_si <= 0.0)
        {
            return Err(EosError::InvalidParameter {
                what: "logarithmic sweep bounds must be positive",
            });
        }
        Ok(())
    }

    /// Generate all points in the sweep.
    pub fn generate_points(&self) -> Vec<f64> {
        match self.sweep_type {
            SweepType::Linear => self.generate_linear(),
            SweepType::Logarithmic => self.generate_logarithmic(),
        }
    }

    fn generate_linear(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start_si];
        }

        let delta = (self.end_si - self.start_si) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| self.start_si + i as f64 * delta)
            .collect();

        // Ensure exact endpoint
        points[self.num_points - 1] = self.end_si;
        points
    }

    fn generate_logarithmic(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start_si];
        }

        let log_start = self.start_si.ln();
        let log_delta = (self.end_si.ln() - log_start) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| (log_start + i as f64 * log_delta).exp())
            .collect();

        points[0] = self.start_si;
        points[self.num_points - 1] = self.end_si;
        points
    }
}

impl fmt::Display for SweepQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "Temperature"),
            Self::Pressure => write!(f, "Pressure"),
        }
    }
}

impl fmt::Display for SweepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Logarithmic => write!(f, "Logarithmic"),
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep {} from {} to {} ({} points, {})",
            self.quantity, self.start_si, self.end_si, self.num_points, self.sweep_type
        )
    }
}

/// Result of a property sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    pub model: EosModel,
    pub quantity: SweepQuantity,
    /// Independent variable values (the sweep parameter, SI)
    pub independent_values: Vec<f64>,
    /// Computed properties (`None` for failed points)
    pub results: Vec<Option<PropertyResult>>,
    pub num_successful: usize,
    pub num_failed: usize,
    /// Index and error of the first failed point
    #[serde(skip)]
    pub first_failure: Option<(usize, EosError)>,
}

impl SweepResult {
    /// Independent values corresponding to successful points.
    pub fn successful_independent_values(&self) -> Vec<f64> {
        self.independent_values
            .iter()
            .zip(&self.results)
            .filter_map(|(val, result)| result.as_ref().map(|_| *val))
            .collect()
    }

    /// Compressibility factors of successful points.
    pub fn compressibility_factors(&self) -> Vec<f64> {
        self.results
            .iter()
            .filter_map(|r| r.as_ref().map(|r| r.compressibility_factor))
            .collect()
    }

    /// Densities of successful points.
    pub fn densities(&self) -> Vec<f64> {
        self.results
            .iter()
            .filter_map(|r| r.as_ref().map(|r| r.density))
            .collect()
    }
}

/// Evaluate `model` over `sweep`, holding the other state variable at `fixed_si`
/// (pressure [Pa] for a temperature sweep, temperature [K] for a pressure sweep).
///
/// Per-point failures are recorded, not propagated; invalid sweep or config
/// definitions fail the whole call.
pub fn run_sweep(
    model: EosModel,
    comp: &Composition,
    sweep: &SweepDefinition,
    fixed_si: f64,
    config: &EngineConfig,
) -> EosResult<SweepResult> {
    sweep.validate()?;
    config.validate()?;

    let values = sweep.generate_points();
    debug!(
        model = model.key(),
        quantity = %sweep.quantity,
        points = values.len(),
        "running sweep"
    );

    let outcomes: Vec<EosResult<PropertyResult>> = values
        .par_iter()
        .map(|&value| {
            let conditions = match sweep.quantity {
                SweepQuantity::Temperature => StateConditions::from_si(value, fixed_si)?,
                SweepQuantity::Pressure => StateConditions::from_si(fixed_si, value)?,
            };
            model.evaluate_with(comp, conditions, config)
        })
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut first_failure = None;
    for (i, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(result) => results.push(Some(result)),
            Err(err) => {
                if first_failure.is_none() {
                    first_failure = Some((i, err));
                }
                results.push(None);
            }
        }
    }
    let num_successful = results.iter().filter(|r| r.is_some()).count();

    Ok(SweepResult {
        model,
        quantity: sweep.quantity,
        num_failed: results.len() - num_successful,
        num_successful,
        independent_values: values,
        results,
        first_failure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::lookup;

    fn methane() -> Composition {
        Composition::pure(lookup("Methane").unwrap().species().unwrap())
    }

    #[test]
    fn linear_sweep_points() {
        let sweep =
            SweepDefinition::new(SweepQuantity::Temperature, 250.0, 350.0, 5, SweepType::Linear)
                .unwrap();
        assert_eq!(sweep.generate_points(), vec![250.0, 275.0, 300.0, 325.0, 350.0]);
    }

    #[test]
    fn logarithmic_sweep_points() {
        let sweep = SweepDefinition::new(
            SweepQuantity::Pressure,
            1e5,
            1e7,
            3,
            SweepType::Logarithmic,
        )
        .unwrap();
        let points = sweep.generate_points();
        assert_eq!(points[0], 1e5);
        assert!((points[1] - 1e6).abs() < 1e-6);
        assert_eq!(points[2], 1e7);
    }

    #[test]
    fn reject_invalid_definitions() {
        assert!(
            SweepDefinition::new(SweepQuantity::Pressure, 1e5, 1e6, 1, SweepType::Linear).is_err()
        );
        assert!(
            SweepDefinition::new(SweepQuantity::Pressure, 1e5, 1e5, 4, SweepType::Linear).is_err()
        );
        assert!(
            SweepDefinition::new(SweepQuantity::Pressure, -1.0, 1e5, 4, SweepType::Logarithmic)
                .is_err()
        );
    }

    #[test]
    fn pressure_sweep_preserves_order() {
        let sweep = SweepDefinition::new(
            SweepQuantity::Pressure,
            1e5,
            1e7,
            8,
            SweepType::Logarithmic,
        )
        .unwrap();
        let result = run_sweep(
            EosModel::VanDerWaals,
            &methane(),
            &sweep,
            300.0,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(result.num_successful, 8);
        assert_eq!(result.num_failed, 0);
        assert!(result.first_failure.is_none());

        // Density rises monotonically with pressure for a supercritical gas
        let densities = result.densities();
        assert!(densities.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn failed_points_are_recorded() {
        // Linear sweep crossing zero pressure
        let sweep =
            SweepDefinition::new(SweepQuantity::Pressure, -1e5, 1e5, 3, SweepType::Linear)
                .unwrap();
        let result = run_sweep(
            EosModel::IdealGas,
            &methane(),
            &sweep,
            300.0,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(result.num_successful, 1);
        assert_eq!(result.num_failed, 2);
        assert_eq!(result.successful_independent_values(), vec![1e5]);
        assert_eq!(result.compressibility_factors(), vec![1.0]);
        assert!(matches!(
            result.first_failure,
            Some((0, EosError::InvalidState { .. }))
        ));
    }
}
