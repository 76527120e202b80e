//! gp-eos: equation-of-state property engine for gases and gas mixtures.
//!
//! Given a composition, temperature and pressure, resolves the molar volume
//! with one of four models and derives the compressibility factor and density:
//! - Ideal Gas (closed form)
//! - Van der Waals (tabulated constants, one-fluid mixing)
//! - Peng-Robinson, single component
//! - Peng-Robinson mixture (with placeholder enthalpy and entropy)
//!
//! The engine is pure and thread-safe. It logs through `tracing` and never
//! installs a subscriber.

pub mod catalog;
pub mod composition;
pub mod config;
pub mod error;
pub mod mixing;
pub mod model;
pub mod params;
pub mod properties;
pub mod root;
pub mod species;
pub mod state;
pub mod sweeps;

pub use catalog::{
    GasCatalogEntry, SpeciesRecord, SpeciesTable, filter_catalog, lookup, reference_catalog,
};
pub use composition::Composition;
pub use config::{EngineConfig, SolverConfig};
pub use error::{EosError, EosResult};
pub use mixing::{MixtureParameters, mix};
pub use model::{
    EosModel, EquationOfState, Evaluation, IdealGasEos, PengRobinsonEos, PengRobinsonMixtureEos,
    VanDerWaalsEos, evaluate, evaluate_with,
};
pub use params::ComponentParameters;
pub use properties::{PropertyCalculator, PropertyResult};
pub use root::{CubicEquation, CubicForm, Root, RootFinder};
pub use species::{CriticalProperties, Species};
pub use state::StateConditions;
pub use sweeps::{SweepDefinition, SweepQuantity, SweepResult, SweepType, run_sweep};
