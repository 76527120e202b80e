//! Reference species data.
//!
//! Van der Waals constants are in Pa·m⁶/mol² and m³/mol, molar masses in
//! kg/mol, critical pressures in Pa.

use crate::error::{EosError, EosResult};
use crate::params;
use crate::species::{CriticalProperties, Species};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasCatalogEntry {
    pub canonical_id: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
    /// Molar mass [kg/mol]
    pub molar_mass: f64,
    /// Van der Waals attraction constant [Pa·m⁶/mol²]
    pub a: f64,
    /// Van der Waals co-volume [m³/mol]
    pub b: f64,
    /// Critical temperature [K]
    pub critical_temperature: f64,
    /// Critical pressure [Pa]
    pub critical_pressure: f64,
    pub acentric_factor: f64,
}

impl GasCatalogEntry {
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.canonical_id.to_ascii_lowercase().contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }

    /// Exact, case-insensitive match on id, display name or alias.
    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.canonical_id.eq_ignore_ascii_case(name)
            || self.display_name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }

    pub fn critical(&self) -> EosResult<CriticalProperties> {
        CriticalProperties::new(
            self.critical_temperature,
            self.critical_pressure,
            self.acentric_factor,
        )
    }

    /// Build the species record, named by its canonical id.
    pub fn species(&self) -> EosResult<Species> {
        Ok(Species::new(self.canonical_id, self.molar_mass, self.a, self.b)?
            .with_critical(self.critical()?))
    }
}

macro_rules! gas {
    (
        $id:literal,
        $display:literal,
        [$($alias:literal),*],
        m = $m:expr,
        a = $a:expr,
        b = $b:expr,
        tc = $tc:expr,
        pc = $pc:expr,
        w = $w:expr $(,)?
    ) => {
        GasCatalogEntry {
            canonical_id: $id,
            display_name: $display,
            aliases: &[$($alias),*],
            molar_mass: $m,
            a: $a,
            b: $b,
            critical_temperature: $tc,
            critical_pressure: $pc,
            acentric_factor: $w,
        }
    };
}

const REFERENCE_CATALOG: [GasCatalogEntry; 26] = [
    gas!(
        "Methane",
        "Methane (CH4)",
        ["CH4", "C1"],
        m = 0.01604,
        a = 0.2283,
        b = 0.04278e-3,
        tc = 190.6,
        pc = 4.599e6,
        w = 0.011,
    ),
    gas!(
        "Ethane",
        "Ethane (C2H6)",
        ["C2H6", "C2"],
        m = 0.03007,
        a = 0.5507,
        b = 0.0638e-3,
        tc = 305.3,
        pc = 4.872e6,
        w = 0.099,
    ),
    gas!(
        "Propane",
        "Propane (C3H8)",
        ["C3H8", "C3"],
        m = 0.0441,
        a = 0.864,
        b = 0.0857e-3,
        tc = 369.8,
        pc = 4.248e6,
        w = 0.152,
    ),
    gas!(
        "Butane",
        "Butane (C4H10)",
        ["C4H10", "n-butane", "nC4"],
        m = 0.05812,
        a = 1.374,
        b = 0.118e-3,
        tc = 425.1,
        pc = 3.796e6,
        w = 0.200,
    ),
    gas!(
        "Pentane",
        "Pentane (C5H12)",
        ["C5H12", "n-pentane", "nC5"],
        m = 0.07215,
        a = 1.858,
        b = 0.146e-3,
        tc = 469.7,
        pc = 3.370e6,
        w = 0.252,
    ),
    gas!(
        "Hexane",
        "Hexane (C6H14)",
        ["C6H14", "n-hexane", "nC6"],
        m = 0.08618,
        a = 2.631,
        b = 0.173e-3,
        tc = 507.6,
        pc = 3.025e6,
        w = 0.301,
    ),
    gas!(
        "Heptane",
        "Heptane (C7H16)",
        ["C7H16", "n-heptane", "nC7"],
        m = 0.1002,
        a = 3.611,
        b = 0.200e-3,
        tc = 540.2,
        pc = 2.740e6,
        w = 0.350,
    ),
    gas!(
        "Octane",
        "Octane (C8H18)",
        ["C8H18", "n-octane", "nC8"],
        m = 0.11423,
        a = 4.876,
        b = 0.233e-3,
        tc = 568.7,
        pc = 2.490e6,
        w = 0.399,
    ),
    gas!(
        "Nonane",
        "Nonane (C9H20)",
        ["C9H20", "n-nonane", "nC9"],
        m = 0.12826,
        a = 6.395,
        b = 0.259e-3,
        tc = 594.6,
        pc = 2.290e6,
        w = 0.445,
    ),
    gas!(
        "Decane",
        "Decane (C10H22)",
        ["C10H22", "n-decane", "nC10"],
        m = 0.14229,
        a = 8.299,
        b = 0.286e-3,
        tc = 617.7,
        pc = 2.110e6,
        w = 0.490,
    ),
    gas!(
        "CO2",
        "Carbon Dioxide (CO2)",
        ["carbon dioxide"],
        m = 0.04401,
        a = 0.359,
        b = 0.04267e-3,
        tc = 304.2,
        pc = 7.383e6,
        w = 0.224,
    ),
    gas!(
        "N2",
        "Nitrogen (N2)",
        ["nitrogen"],
        m = 0.02802,
        a = 0.139,
        b = 0.03913e-3,
        tc = 126.2,
        pc = 3.398e6,
        w = 0.037,
    ),
    gas!(
        "O2",
        "Oxygen (O2)",
        ["oxygen"],
        m = 0.032,
        a = 0.1382,
        b = 0.03186e-3,
        tc = 154.6,
        pc = 5.043e6,
        w = 0.022,
    ),
    gas!(
        "H2",
        "Hydrogen (H2)",
        ["hydrogen"],
        m = 0.002016,
        a = 0.02476,
        b = 0.02661e-3,
        tc = 33.19,
        pc = 1.313e6,
        w = -0.216,
    ),
    gas!(
        "H2S",
        "Hydrogen Sulfide (H2S)",
        ["hydrogen sulfide"],
        m = 0.03408,
        a = 0.4484,
        b = 0.04313e-3,
        tc = 373.5,
        pc = 8.963e6,
        w = 0.094,
    ),
    gas!(
        "He",
        "Helium (He)",
        ["helium"],
        m = 0.004003,
        a = 0.00346,
        b = 0.0237e-3,
        tc = 5.2,
        pc = 0.228e6,
        w = -0.390,
    ),
    gas!(
        "H2O",
        "Water Vapor (H2O)",
        ["water", "steam"],
        m = 0.018015,
        a = 0.5537,
        b = 0.03049e-3,
        tc = 647.1,
        pc = 22.064e6,
        w = 0.345,
    ),
    gas!(
        "Benzene",
        "Benzene (C6H6)",
        ["C6H6"],
        m = 0.07811,
        a = 5.506,
        b = 0.1065e-3,
        tc = 562.2,
        pc = 4.898e6,
        w = 0.210,
    ),
    gas!(
        "Toluene",
        "Toluene (C7H8)",
        ["C7H8"],
        m = 0.09214,
        a = 6.960,
        b = 0.1128e-3,
        tc = 591.8,
        pc = 4.108e6,
        w = 0.262,
    ),
    gas!(
        "Xylenes",
        "Xylenes (C8H10)",
        ["C8H10", "xylene"],
        m = 0.10617,
        a = 8.613,
        b = 0.1243e-3,
        tc = 616.2,
        pc = 3.511e6,
        w = 0.322,
    ),
    gas!(
        "Ethylene",
        "Ethylene (C2H4)",
        ["C2H4", "ethene"],
        m = 0.02805,
        a = 0.456,
        b = 0.0519e-3,
        tc = 282.3,
        pc = 5.041e6,
        w = 0.087,
    ),
    gas!(
        "Propylene",
        "Propylene (C3H6)",
        ["C3H6", "propene"],
        m = 0.04208,
        a = 0.7036,
        b = 0.0631e-3,
        tc = 365.6,
        pc = 4.665e6,
        w = 0.140,
    ),
    gas!(
        "COS",
        "Carbonyl Sulfide (COS)",
        ["carbonyl sulfide"],
        m = 0.06007,
        a = 0.4535,
        b = 0.0485e-3,
        tc = 378.8,
        pc = 6.349e6,
        w = 0.097,
    ),
    gas!(
        "CS2",
        "Carbon Disulfide (CS2)",
        ["carbon disulfide"],
        m = 0.07614,
        a = 0.8074,
        b = 0.0652e-3,
        tc = 552.0,
        pc = 7.900e6,
        w = 0.111,
    ),
    gas!(
        "Ar",
        "Argon (Ar)",
        ["argon"],
        m = 0.03995,
        a = 0.1355,
        b = 0.03201e-3,
        tc = 150.9,
        pc = 4.898e6,
        w = 0.0,
    ),
    gas!(
        "Ne",
        "Neon (Ne)",
        ["neon"],
        m = 0.02018,
        a = 0.0208,
        b = 0.0171e-3,
        tc = 44.4,
        pc = 2.653e6,
        w = -0.029,
    ),
];

pub fn reference_catalog() -> &'static [GasCatalogEntry] {
    &REFERENCE_CATALOG
}

pub fn filter_catalog(query: &str) -> Vec<GasCatalogEntry> {
    reference_catalog()
        .iter()
        .copied()
        .filter(|entry| entry.matches_query(query))
        .collect()
}

/// Find a catalog entry by exact id, display name or alias.
pub fn lookup(name: &str) -> Option<&'static GasCatalogEntry> {
    reference_catalog().iter().find(|entry| entry.matches_name(name))
}

/// One species in a user-supplied table.
///
/// Either `a` and `b` or the three critical properties must be present. When
/// only critical data is given, `a` and `b` are derived with the Van der Waals
/// critical-point relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciesRecord {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Molar mass [kg/mol]
    pub molar_mass: f64,
    #[serde(default)]
    pub a: Option<f64>,
    #[serde(default)]
    pub b: Option<f64>,
    #[serde(default)]
    pub critical_temperature: Option<f64>,
    #[serde(default)]
    pub critical_pressure: Option<f64>,
    #[serde(default)]
    pub acentric_factor: Option<f64>,
}

impl SpeciesRecord {
    /// Case-insensitive substring match on name or alias; empty matches all.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }

    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }

    fn critical(&self) -> EosResult<Option<CriticalProperties>> {
        match (
            self.critical_temperature,
            self.critical_pressure,
            self.acentric_factor,
        ) {
            (Some(tc), Some(pc), Some(w)) => CriticalProperties::new(tc, pc, w).map(Some),
            (None, None, None) => Ok(None),
            _ => Err(EosError::InvalidParameter {
                what: "critical temperature, pressure and acentric factor must be supplied together",
            }),
        }
    }

    /// Build the species, deriving `a`/`b` from critical data when absent.
    pub fn to_species(&self, gas_constant: f64) -> EosResult<Species> {
        let critical = self.critical()?;
        let (a, b) = match (self.a, self.b, critical) {
            (Some(a), Some(b), _) => (a, b),
            (None, None, Some(c)) => {
                params::derive_van_der_waals(c.temperature, c.pressure, gas_constant)?
            }
            (None, None, None) => {
                return Err(EosError::InvalidParameter {
                    what: "species needs a and b or critical properties",
                });
            }
            _ => {
                return Err(EosError::InvalidParameter {
                    what: "a and b must be supplied together",
                });
            }
        };
        let species = Species::new(self.name.clone(), self.molar_mass, a, b)?;
        Ok(match critical {
            Some(c) => species.with_critical(c),
            None => species,
        })
    }
}

impl From<&GasCatalogEntry> for SpeciesRecord {
    fn from(entry: &GasCatalogEntry) -> Self {
        Self {
            name: entry.canonical_id.to_string(),
            aliases: entry.aliases.iter().map(|alias| alias.to_string()).collect(),
            molar_mass: entry.molar_mass,
            a: Some(entry.a),
            b: Some(entry.b),
            critical_temperature: Some(entry.critical_temperature),
            critical_pressure: Some(entry.critical_pressure),
            acentric_factor: Some(entry.acentric_factor),
        }
    }
}

/// A replacement species table, typically loaded once from YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciesTable {
    pub species: Vec<SpeciesRecord>,
}

impl SpeciesTable {
    /// The built-in catalog as an editable table.
    pub fn reference() -> Self {
        Self {
            species: reference_catalog().iter().map(SpeciesRecord::from).collect(),
        }
    }

    pub fn find(&self, name: &str) -> Option<&SpeciesRecord> {
        self.species.iter().find(|record| record.matches_name(name))
    }

    /// Check every record and reject duplicate names.
    pub fn validate(&self, gas_constant: f64) -> EosResult<()> {
        for (i, record) in self.species.iter().enumerate() {
            record.to_species(gas_constant)?;
            if self.species[..i]
                .iter()
                .any(|earlier| earlier.matches_name(&record.name))
            {
                return Err(EosError::InvalidParameter {
                    what: "duplicate species name in table",
                });
            }
        }
        Ok(())
    }
}
