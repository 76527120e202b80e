//! YAML case files: one composition evaluated with several models at several
//! states.

use crate::context::Context;
use crate::error::{CliError, CliResult};
use crate::units::{UnitError, parse_pressure, parse_temperature};
use gp_eos::{EosModel, PropertyResult, StateConditions};
use serde::{Deserialize, Serialize};

/// A number in SI units or a unit-tagged string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Si(f64),
    Text(String),
}

impl QuantityInput {
    fn resolve(&self, parse: fn(&str) -> Result<f64, UnitError>) -> CliResult<f64> {
        match self {
            QuantityInput::Si(value) => Ok(*value),
            QuantityInput::Text(text) => Ok(parse(text)?),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSpec {
    pub species: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseState {
    pub temperature: QuantityInput,
    pub pressure: QuantityInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseFile {
    #[serde(default)]
    pub name: Option<String>,
    pub components: Vec<ComponentSpec>,
    pub models: Vec<EosModel>,
    pub states: Vec<CaseState>,
}

impl CaseFile {
    pub fn validate(&self) -> CliResult<()> {
        if self.models.is_empty() {
            return Err(CliError::InvalidInput("case lists no models".into()));
        }
        if self.states.is_empty() {
            return Err(CliError::InvalidInput("case lists no states".into()));
        }
        Ok(())
    }
}

/// One (model, state) evaluation of a case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRow {
    pub model: EosModel,
    pub temperature_k: f64,
    pub pressure_pa: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable label of the engine error kind, e.g. `non-convergence`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub rows: Vec<CaseRow>,
}

/// Evaluate every model at every state.
///
/// Malformed input fails the whole case; engine errors at a single state are
/// recorded in that row.
pub fn run_case(ctx: &Context, case: &CaseFile) -> CliResult<CaseReport> {
    case.validate()?;
    let comp = ctx.composition(
        case.components
            .iter()
            .map(|c| (c.species.as_str(), c.fraction)),
    )?;

    let mut rows = Vec::with_capacity(case.models.len() * case.states.len());
    for state in &case.states {
        let t = state.temperature.resolve(parse_temperature)?;
        let p = state.pressure.resolve(parse_pressure)?;
        for &model in &case.models {
            let outcome = StateConditions::from_si(t, p)
                .and_then(|conditions| model.evaluate_with(&comp, conditions, &ctx.config));
            let (properties, error, error_kind) = match outcome {
                Ok(props) => (Some(props), None, None),
                Err(err) => (None, Some(err.to_string()), Some(err.kind())),
            };
            rows.push(CaseRow {
                model,
                temperature_k: t,
                pressure_pa: p,
                properties,
                error,
                error_kind,
            });
        }
    }

    Ok(CaseReport {
        name: case.name.clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASE: &str = r#"
name: pipeline gas
components:
  - species: Methane
    fraction: 0.9
  - species: Ethane
    fraction: 0.1
models: [ideal-gas, van-der-waals, peng-robinson-mixture]
states:
  - temperature: 300
    pressure: 5 MPa
  - temperature: 15 C
    pressure: 1 atm
"#;

    #[test]
    fn case_parses_and_runs() {
        let case: CaseFile = serde_yaml::from_str(CASE).unwrap();
        assert_eq!(case.states[0].temperature, QuantityInput::Si(300.0));

        let report = run_case(&Context::default(), &case).unwrap();
        assert_eq!(report.rows.len(), 6);
        assert!(report.rows.iter().all(|row| row.error.is_none()));
        assert_eq!(report.rows[0].pressure_pa, 5e6);
        assert!(report.rows[2].properties.unwrap().enthalpy.is_some());
    }

    #[test]
    fn single_component_model_error_is_recorded_per_row() {
        let mut case: CaseFile = serde_yaml::from_str(CASE).unwrap();
        case.models = vec![EosModel::PengRobinsonSingleComponent];
        let report = run_case(&Context::default(), &case).unwrap();
        assert!(report.rows.iter().all(|row| row.error.is_some()));
        assert!(
            report
                .rows
                .iter()
                .all(|row| row.error_kind == Some("invalid-composition"))
        );
    }

    #[test]
    fn unknown_species_fails_the_case() {
        let mut case: CaseFile = serde_yaml::from_str(CASE).unwrap();
        case.components[0].species = "Kryptonite".into();
        assert!(matches!(
            run_case(&Context::default(), &case),
            Err(CliError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn shipped_case_files_parse() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("cases");
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let case: CaseFile = crate::context::load_yaml(&path).unwrap();
            case.validate().unwrap();
        }
    }
}
