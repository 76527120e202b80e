//! Derived properties from a resolved molar volume.

use serde::Serialize;

/// Properties returned by one query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropertyResult {
    /// Molar volume [m³/mol]
    pub molar_volume: f64,
    /// Compressibility factor Z = P·Vm/(R·T) (dimensionless)
    pub compressibility_factor: f64,
    /// Density, molar mass per molar volume (kg/m³ for catalog species)
    pub density: f64,
    /// Placeholder enthalpy `T·R` (Peng-Robinson mixture only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enthalpy: Option<f64>,
    /// Placeholder entropy `T·R/P` (Peng-Robinson mixture only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
}

/// Pure property formulas for a fixed gas constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyCalculator {
    gas_constant: f64,
}

impl PropertyCalculator {
    pub fn new(gas_constant: f64) -> Self {
        Self { gas_constant }
    }

    /// Z = P·Vm/(R·T).
    pub fn compressibility_factor(&self, vm: f64, t: f64, p: f64) -> f64 {
        p * vm / (self.gas_constant * t)
    }

    /// ρ = M/Vm.
    pub fn density(&self, vm: f64, molar_mass: f64) -> f64 {
        molar_mass / vm
    }

    /// Placeholder `H = T·R`.
    ///
    /// Not a departure-function enthalpy; do not use as a rigorous
    /// thermodynamic value.
    pub fn placeholder_enthalpy(&self, t: f64) -> f64 {
        t * self.gas_constant
    }

    /// Placeholder `S = T·R/P`.
    ///
    /// Dimensionally inconsistent as an entropy; kept as a labeled stand-in.
    pub fn placeholder_entropy(&self, t: f64, p: f64) -> f64 {
        t * self.gas_constant / p
    }

    /// Assemble a result for a non-ideal root (Z computed from Vm).
    pub fn from_molar_volume(&self, vm: f64, t: f64, p: f64, molar_mass: f64) -> PropertyResult {
        PropertyResult {
            molar_volume: vm,
            compressibility_factor: self.compressibility_factor(vm, t, p),
            density: self.density(vm, molar_mass),
            enthalpy: None,
            entropy: None,
        }
    }
}

impl PropertyResult {
    /// Attach the Peng-Robinson mixture placeholders.
    pub fn with_placeholders(self, calc: &PropertyCalculator, t: f64, p: f64) -> Self {
        Self {
            enthalpy: Some(calc.placeholder_enthalpy(t)),
            entropy: Some(calc.placeholder_entropy(t, p)),
            ..self
        }
    }

    /// Return a summary string of all contained properties (for display).
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Vm={:.6e} m³/mol, Z={:.6}, ρ={:.6} kg/m³",
            self.molar_volume, self.compressibility_factor, self.density
        );
        if let Some(h) = self.enthalpy {
            s.push_str(&format!(", H={h:.4} (placeholder)"));
        }
        if let Some(entropy) = self.entropy {
            s.push_str(&format!(", S={entropy:.6e} (placeholder)"));
        }
        s
    }
}
