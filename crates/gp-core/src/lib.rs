//! gp-core: shared foundation for the gas property engine.
//!
//! Contains:
//! - units (uom SI types + constructors, the gas constant)
//! - numeric (Real + tolerances + float helpers)

pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use numeric::*;
pub use units::*;
