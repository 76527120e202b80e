//! Equation-of-state models and query dispatch.
//!
//! Every model implements [`EquationOfState`]: it validates its inputs, builds
//! mixture parameters, resolves the molar volume once, and returns an
//! [`Evaluation`] from which all properties are read without re-solving.
//! [`EosModel`] is the tagged selector used by callers.

use crate::composition::Composition;
use crate::config::EngineConfig;
use crate::error::{EosError, EosResult};
use crate::mixing::{MixtureParameters, mix};
use crate::params::ComponentParameters;
use crate::properties::{PropertyCalculator, PropertyResult};
use crate::root::{CubicEquation, CubicForm, Root, RootFinder};
use crate::state::StateConditions;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Result of one solve, cached for the property accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    conditions: StateConditions,
    result: PropertyResult,
    mixture: Option<MixtureParameters>,
    root: Option<Root>,
}

impl Evaluation {
    /// Molar volume [m³/mol].
    pub fn molar_volume(&self) -> f64 {
        self.result.molar_volume
    }

    /// Compressibility factor Z.
    pub fn compressibility_factor(&self) -> f64 {
        self.result.compressibility_factor
    }

    /// Density (molar mass per molar volume).
    pub fn density(&self) -> f64 {
        self.result.density
    }

    /// The full property record.
    pub fn properties(&self) -> PropertyResult {
        self.result
    }

    pub fn conditions(&self) -> StateConditions {
        self.conditions
    }

    /// Mixture parameters used by the cubic models (`None` for ideal gas).
    pub fn mixture(&self) -> Option<&MixtureParameters> {
        self.mixture.as_ref()
    }

    /// Root-finder diagnostics (`None` for the closed-form ideal gas).
    pub fn root(&self) -> Option<&Root> {
        self.root.as_ref()
    }
}

/// Trait for equation-of-state models.
///
/// Implementations are stateless and thread-safe; a query is a pure function
/// of (model, composition, conditions, config).
pub trait EquationOfState: Send + Sync {
    /// Get the model name (for display/logging).
    fn name(&self) -> &'static str;

    /// Check if this model can evaluate the given composition.
    fn supports_composition(&self, comp: &Composition) -> bool;

    /// Resolve the state and derive its properties.
    fn solve(
        &self,
        comp: &Composition,
        conditions: StateConditions,
        config: &EngineConfig,
    ) -> EosResult<Evaluation>;
}

/// `Vm = R·T/P`, `Z ≡ 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdealGasEos;

/// Van der Waals with tabulated species constants and one-fluid mixing.
#[derive(Debug, Clone, Copy, Default)]
pub struct VanDerWaalsEos;

/// Peng-Robinson for exactly one component.
#[derive(Debug, Clone, Copy, Default)]
pub struct PengRobinsonEos;

/// Peng-Robinson with one-fluid mixing of `a_i·α_i(T)`, plus placeholder
/// enthalpy and entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PengRobinsonMixtureEos;

fn check_inputs(comp: &Composition, config: &EngineConfig) -> EosResult<()> {
    config.validate()?;
    if comp.is_empty() {
        return Err(EosError::InvalidComposition {
            what: "empty composition",
        });
    }
    Ok(())
}

fn solve_cubic(
    form: CubicForm,
    mixture: MixtureParameters,
    alpha: f64,
    conditions: StateConditions,
    config: &EngineConfig,
) -> EosResult<(PropertyResult, Root)> {
    let t = conditions.temperature_k();
    let p = conditions.pressure_pa();
    let eq = CubicEquation::new(form, mixture.a_mix, mixture.b_mix, alpha)?;
    let root = RootFinder::new(config).molar_volume(&eq, t, p)?;
    let calc = PropertyCalculator::new(config.gas_constant);
    let result = calc.from_molar_volume(root.molar_volume, t, p, mixture.molar_mass_mix);
    Ok((result, root))
}

impl EquationOfState for IdealGasEos {
    fn name(&self) -> &'static str {
        "Ideal Gas"
    }

    fn supports_composition(&self, comp: &Composition) -> bool {
        !comp.is_empty()
    }

    fn solve(
        &self,
        comp: &Composition,
        conditions: StateConditions,
        config: &EngineConfig,
    ) -> EosResult<Evaluation> {
        check_inputs(comp, config)?;
        let t = conditions.temperature_k();
        let p = conditions.pressure_pa();
        let molar_volume = RootFinder::new(config).ideal_molar_volume(t, p)?;
        let calc = PropertyCalculator::new(config.gas_constant);
        let result = PropertyResult {
            molar_volume,
            compressibility_factor: 1.0,
            density: calc.density(molar_volume, comp.molar_mass()),
            enthalpy: None,
            entropy: None,
        };
        Ok(Evaluation {
            conditions,
            result,
            mixture: None,
            root: None,
        })
    }
}

impl EquationOfState for VanDerWaalsEos {
    fn name(&self) -> &'static str {
        "Van der Waals"
    }

    fn supports_composition(&self, comp: &Composition) -> bool {
        !comp.is_empty()
    }

    fn solve(
        &self,
        comp: &Composition,
        conditions: StateConditions,
        config: &EngineConfig,
    ) -> EosResult<Evaluation> {
        check_inputs(comp, config)?;
        let components: Vec<(ComponentParameters, f64)> = comp
            .iter()
            .map(|(species, y)| (ComponentParameters::van_der_waals(species), y))
            .collect();
        let mixture = mix(&components, config.mixing_tolerance)?;
        let (result, root) =
            solve_cubic(CubicForm::VanDerWaals, mixture, 1.0, conditions, config)?;
        Ok(Evaluation {
            conditions,
            result,
            mixture: Some(mixture),
            root: Some(root),
        })
    }
}

impl EquationOfState for PengRobinsonEos {
    fn name(&self) -> &'static str {
        "Peng-Robinson"
    }

    fn supports_composition(&self, comp: &Composition) -> bool {
        comp.len() == 1 && comp.iter().all(|(s, _)| s.critical().is_some())
    }

    fn solve(
        &self,
        comp: &Composition,
        conditions: StateConditions,
        config: &EngineConfig,
    ) -> EosResult<Evaluation> {
        check_inputs(comp, config)?;
        let species = match comp.is_pure() {
            Some(species) => species,
            None => {
                return Err(EosError::InvalidComposition {
                    what: "single-component Peng-Robinson requires exactly one component",
                });
            }
        };
        let (params, alpha) = ComponentParameters::peng_robinson(
            species,
            conditions.temperature_k(),
            config.gas_constant,
        )?;
        let mixture = MixtureParameters {
            a_mix: params.a,
            b_mix: params.b,
            molar_mass_mix: params.molar_mass,
        };
        let (result, root) =
            solve_cubic(CubicForm::PengRobinson, mixture, alpha, conditions, config)?;
        Ok(Evaluation {
            conditions,
            result,
            mixture: Some(mixture),
            root: Some(root),
        })
    }
}

impl EquationOfState for PengRobinsonMixtureEos {
    fn name(&self) -> &'static str {
        "Peng-Robinson (mixture)"
    }

    fn supports_composition(&self, comp: &Composition) -> bool {
        !comp.is_empty() && comp.iter().all(|(s, _)| s.critical().is_some())
    }

    fn solve(
        &self,
        comp: &Composition,
        conditions: StateConditions,
        config: &EngineConfig,
    ) -> EosResult<Evaluation> {
        check_inputs(comp, config)?;
        let t = conditions.temperature_k();
        let components = comp
            .iter()
            .map(|(species, y)| {
                let (params, alpha) =
                    ComponentParameters::peng_robinson(species, t, config.gas_constant)?;
                Ok((params.with_alpha(alpha), y))
            })
            .collect::<EosResult<Vec<_>>>()?;
        // α(T) is already folded into each a_i
        let mixture = mix(&components, config.mixing_tolerance)?;
        let (result, root) =
            solve_cubic(CubicForm::PengRobinson, mixture, 1.0, conditions, config)?;
        let calc = PropertyCalculator::new(config.gas_constant);
        let result = result.with_placeholders(&calc, t, conditions.pressure_pa());
        Ok(Evaluation {
            conditions,
            result,
            mixture: Some(mixture),
            root: Some(root),
        })
    }
}

/// Selectable equation of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EosModel {
    IdealGas,
    VanDerWaals,
    #[serde(rename = "peng-robinson")]
    PengRobinsonSingleComponent,
    PengRobinsonMixture,
}

impl EosModel {
    pub const ALL: [EosModel; 4] = [
        EosModel::IdealGas,
        EosModel::VanDerWaals,
        EosModel::PengRobinsonSingleComponent,
        EosModel::PengRobinsonMixture,
    ];

    /// Canonical kebab-case key.
    pub fn key(&self) -> &'static str {
        match self {
            EosModel::IdealGas => "ideal-gas",
            EosModel::VanDerWaals => "van-der-waals",
            EosModel::PengRobinsonSingleComponent => "peng-robinson",
            EosModel::PengRobinsonMixture => "peng-robinson-mixture",
        }
    }

    /// The model implementation behind this selector.
    pub fn equation(&self) -> &'static dyn EquationOfState {
        match self {
            EosModel::IdealGas => &IdealGasEos,
            EosModel::VanDerWaals => &VanDerWaalsEos,
            EosModel::PengRobinsonSingleComponent => &PengRobinsonEos,
            EosModel::PengRobinsonMixture => &PengRobinsonMixtureEos,
        }
    }

    /// Resolve the state once and keep the evaluation for repeated reads.
    pub fn solve(
        &self,
        comp: &Composition,
        conditions: StateConditions,
        config: &EngineConfig,
    ) -> EosResult<Evaluation> {
        debug!(
            model = self.key(),
            components = comp.len(),
            t_k = conditions.temperature_k(),
            p_pa = conditions.pressure_pa(),
            "evaluating"
        );
        self.equation().solve(comp, conditions, config)
    }

    /// Evaluate with the default configuration.
    pub fn evaluate(
        &self,
        comp: &Composition,
        conditions: StateConditions,
    ) -> EosResult<PropertyResult> {
        self.evaluate_with(comp, conditions, &EngineConfig::default())
    }

    /// Evaluate with an explicit configuration.
    pub fn evaluate_with(
        &self,
        comp: &Composition,
        conditions: StateConditions,
        config: &EngineConfig,
    ) -> EosResult<PropertyResult> {
        self.solve(comp, conditions, config)
            .map(|evaluation| evaluation.properties())
    }

    /// Evaluate from raw kelvin/pascal values, validating them first.
    pub fn evaluate_pt(
        &self,
        comp: &Composition,
        t_k: f64,
        p_pa: f64,
    ) -> EosResult<PropertyResult> {
        self.evaluate(comp, StateConditions::from_si(t_k, p_pa)?)
    }
}

impl fmt::Display for EosModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.equation().name())
    }
}

impl std::str::FromStr for EosModel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "ideal" | "ideal-gas" => Ok(EosModel::IdealGas),
            "vdw" | "van-der-waals" | "vanderwaals" => Ok(EosModel::VanDerWaals),
            "pr" | "peng-robinson" => Ok(EosModel::PengRobinsonSingleComponent),
            "pr-mix" | "peng-robinson-mixture" => Ok(EosModel::PengRobinsonMixture),
            _ => Err("unknown equation of state"),
        }
    }
}

/// Evaluate `model` for `composition` at `conditions` with the default configuration.
pub fn evaluate(
    model: EosModel,
    composition: &Composition,
    conditions: StateConditions,
) -> EosResult<PropertyResult> {
    model.evaluate(composition, conditions)
}

/// Evaluate with an explicit configuration.
pub fn evaluate_with(
    model: EosModel,
    composition: &Composition,
    conditions: StateConditions,
    config: &EngineConfig,
) -> EosResult<PropertyResult> {
    model.evaluate_with(composition, conditions, config)
}
