//! Engine configuration and species source shared by all commands.

use crate::error::{CliError, CliResult};
use gp_eos::{Composition, EngineConfig, Species, SpeciesTable, lookup};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;

/// Read and deserialize a YAML file.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| CliError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Loaded once at startup and passed by reference.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub config: EngineConfig,
    /// Replacement for the built-in catalog
    pub table: Option<SpeciesTable>,
}

impl Context {
    pub fn load(config_path: Option<&Path>, table_path: Option<&Path>) -> CliResult<Self> {
        let config = match config_path {
            Some(path) => {
                let config: EngineConfig = load_yaml(path)?;
                info!(path = %path.display(), "loaded engine configuration");
                config
            }
            None => EngineConfig::default(),
        };
        config.validate()?;

        let table = match table_path {
            Some(path) => {
                let table: SpeciesTable = load_yaml(path)?;
                table.validate(config.gas_constant)?;
                info!(
                    path = %path.display(),
                    species = table.species.len(),
                    "loaded species table"
                );
                Some(table)
            }
            None => None,
        };

        Ok(Self { config, table })
    }

    /// Resolve a species by name from the table in use.
    pub fn species(&self, name: &str) -> CliResult<Species> {
        match &self.table {
            Some(table) => table
                .find(name)
                .ok_or_else(|| CliError::UnknownSpecies(name.to_string()))?
                .to_species(self.config.gas_constant)
                .map_err(CliError::from),
            None => lookup(name)
                .ok_or_else(|| CliError::UnknownSpecies(name.to_string()))?
                .species()
                .map_err(CliError::from),
        }
    }

    /// Build a composition from `(name, fraction)` pairs.
    pub fn composition<'a>(
        &self,
        components: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> CliResult<Composition> {
        let fractions = components
            .into_iter()
            .map(|(name, fraction)| Ok((self.species(name)?, fraction)))
            .collect::<CliResult<Vec<_>>>()?;
        Ok(Composition::new(fractions)?)
    }
}

/// Split `NAME=FRACTION`; a bare name means fraction 1.
pub fn parse_component(arg: &str) -> CliResult<(String, f64)> {
    match arg.rsplit_once('=') {
        Some((name, fraction)) => {
            let name = name.trim();
            let fraction: f64 = fraction
                .trim()
                .parse()
                .map_err(|_| CliError::InvalidComponent(arg.to_string()))?;
            if name.is_empty() {
                return Err(CliError::InvalidComponent(arg.to_string()));
            }
            Ok((name.to_string(), fraction))
        }
        None if !arg.trim().is_empty() => Ok((arg.trim().to_string(), 1.0)),
        None => Err(CliError::InvalidComponent(arg.to_string())),
    }
}
