//! Molar-volume root finding.
//!
//! The cubic equations are written in pressure-explicit form
//!
//! ```text
//! P = R·T/(Vm − b) − a·α / D(Vm)
//! ```
//!
//! with `D = Vm²` (Van der Waals) or `D = Vm² + 2·b·Vm − b²` (Peng-Robinson),
//! and the root of `g(Vm) = f(Vm) − P` is sought with `Vm > b`.
//!
//! Every such root lies in `(b, b + R·T/P]`: `g → +∞` as `Vm → b⁺`, and above
//! `b + R·T/P` the repulsive term alone is below `P`. The solver keeps a sign
//! bracket inside that interval and takes Newton steps from the ideal-gas guess,
//! falling back to bisection whenever a step would leave the bracket. The
//! iteration count is capped per attempt.

use crate::config::{EngineConfig, SolverConfig};
use crate::error::{EosError, EosResult};
use crate::state::{validate_pressure, validate_temperature};
use gp_core::is_positive_finite;
use tracing::{debug, trace};

/// Upper bound on halvings while searching for the lower bracket end.
const MAX_BRACKET_HALVINGS: usize = 256;

/// Multiple of `ε·|g'|·Vm` below which `g` is indistinguishable from zero.
const ROUNDING_SLACK: f64 = 8.0;

/// Attraction-term shape of a cubic equation of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubicForm {
    /// `D(Vm) = Vm²`
    VanDerWaals,
    /// `D(Vm) = Vm² + 2·b·Vm − b²`
    PengRobinson,
}

impl CubicForm {
    fn denominator(self, v: f64, b: f64) -> f64 {
        match self {
            Self::VanDerWaals => v * v,
            Self::PengRobinson => v * v + 2.0 * b * v - b * b,
        }
    }

    fn denominator_slope(self, v: f64, b: f64) -> f64 {
        match self {
            Self::VanDerWaals => 2.0 * v,
            Self::PengRobinson => 2.0 * v + 2.0 * b,
        }
    }
}

/// A cubic equation of state with fixed mixture constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicEquation {
    form: CubicForm,
    a: f64,
    b: f64,
    alpha: f64,
}

impl CubicEquation {
    /// Create a validated equation; `alpha` is 1 for Van der Waals.
    pub fn new(form: CubicForm, a: f64, b: f64, alpha: f64) -> EosResult<Self> {
        if !is_positive_finite(a) {
            return Err(EosError::InvalidParameter {
                what: "attraction constant a must be positive and finite",
            });
        }
        if !is_positive_finite(b) {
            return Err(EosError::InvalidParameter {
                what: "co-volume b must be positive and finite",
            });
        }
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(EosError::InvalidParameter {
                what: "alpha must be non-negative and finite",
            });
        }
        Ok(Self { form, a, b, alpha })
    }

    /// Co-volume b [m³/mol].
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Pressure [Pa] at molar volume `v` for `rt = R·T`.
    pub fn pressure(&self, v: f64, rt: f64) -> f64 {
        rt / (v - self.b) - self.a * self.alpha / self.form.denominator(v, self.b)
    }

    /// `g(v) = f(v) − p` and `g'(v)`.
    fn residual_and_slope(&self, v: f64, rt: f64, p: f64) -> (f64, f64) {
        let free = v - self.b;
        let denom = self.form.denominator(v, self.b);
        let a_alpha = self.a * self.alpha;
        let g = rt / free - a_alpha / denom - p;
        let slope = self.form.denominator_slope(v, self.b);
        let dg = -rt / (free * free) + a_alpha * slope / (denom * denom);
        (g, dg)
    }
}

/// A converged molar-volume root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    /// Molar volume [m³/mol], always greater than b
    pub molar_volume: f64,
    /// Final pressure residual `f(Vm) − P` [Pa]
    pub residual: f64,
    /// Newton iterations used by the successful attempt
    pub iterations: usize,
    /// Attempts used (1 = converged from the ideal-gas guess)
    pub attempts: usize,
}

/// Bounded molar-volume solver.
#[derive(Debug, Clone, Copy)]
pub struct RootFinder<'a> {
    solver: &'a SolverConfig,
    gas_constant: f64,
}

impl<'a> RootFinder<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            solver: &config.solver,
            gas_constant: config.gas_constant,
        }
    }

    /// Ideal-gas closed form `Vm = R·T/P`.
    pub fn ideal_molar_volume(&self, t: f64, p: f64) -> EosResult<f64> {
        validate_temperature(t)?;
        validate_pressure(p)?;
        Ok(self.gas_constant * t / p)
    }

    /// Solve `eq` for the molar volume at temperature `t` [K] and pressure `p` [Pa].
    ///
    /// Every attempt shares the bracket found up front. A retry restarts from
    /// the previous guess times `retry_factor` with a fresh iteration budget,
    /// so it only differs from the first attempt in where Newton starts.
    pub fn molar_volume(&self, eq: &CubicEquation, t: f64, p: f64) -> EosResult<Root> {
        let v0 = self.ideal_molar_volume(t, p)?;
        let rt = self.gas_constant * t;
        let (lo, hi) = bracket(eq, rt, p)?;

        let mut guess = v0;
        let mut last_failure = String::new();
        for attempt in 1..=self.solver.max_attempts {
            match self.attempt(eq, rt, p, guess, lo, hi) {
                Ok((molar_volume, residual, iterations)) => {
                    trace!(molar_volume, residual, iterations, attempt, "molar volume converged");
                    return Ok(Root {
                        molar_volume,
                        residual,
                        iterations,
                        attempts: attempt,
                    });
                }
                Err(reason) => {
                    debug!(attempt, guess, %reason, "molar volume attempt failed");
                    last_failure = reason;
                    guess *= self.solver.retry_factor;
                }
            }
        }

        Err(EosError::NonConvergence {
            what: format!(
                "{} attempt(s) from ideal-gas guess {:e} m³/mol: {}",
                self.solver.max_attempts, v0, last_failure
            ),
        })
    }

    /// One safeguarded Newton run from `guess` inside `(lo, hi]`.
    ///
    /// Converges when `|g|` is within the configured tolerance or within the
    /// rounding noise of `g` near `v`. If the bracket shrinks to adjacent
    /// floats first, the end with the smaller `|g|` is the root.
    fn attempt(
        &self,
        eq: &CubicEquation,
        rt: f64,
        p: f64,
        guess: f64,
        mut lo: f64,
        mut hi: f64,
    ) -> Result<(f64, f64, usize), String> {
        let tol = self.solver.residual_tolerance(p);
        let (mut g_lo, _) = eq.residual_and_slope(lo, rt, p);
        let (mut g_hi, _) = eq.residual_and_slope(hi, rt, p);
        let mut v = if guess > lo && guess < hi {
            guess
        } else if guess >= hi {
            hi
        } else {
            0.5 * (lo + hi)
        };

        let mut g = f64::NAN;
        for iteration in 1..=self.solver.max_iterations {
            let (residual, slope) = eq.residual_and_slope(v, rt, p);
            g = residual;
            if !g.is_finite() {
                return Err(format!("non-finite residual at Vm={v:e}"));
            }
            let noise = ROUNDING_SLACK * f64::EPSILON * slope.abs() * v;
            if g.abs() < tol.max(noise) {
                if v <= eq.b {
                    return Err(format!("root Vm={v:e} is not above b={:e}", eq.b));
                }
                return Ok((v, g, iteration));
            }

            if g > 0.0 {
                lo = v;
                g_lo = g;
            } else {
                hi = v;
                g_hi = g;
            }
            if hi - lo <= 2.0 * f64::EPSILON * hi {
                let (v, g) = if g_lo.abs() <= g_hi.abs() {
                    (lo, g_lo)
                } else {
                    (hi, g_hi)
                };
                trace!(v, g, "bracket at machine precision");
                return Ok((v, g, iteration));
            }

            let newton = v - g / slope;
            v = if slope.is_finite() && slope != 0.0 && newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };
        }

        Err(format!(
            "{} iterations exhausted with residual {g:e} Pa",
            self.solver.max_iterations
        ))
    }
}

/// Find `lo < hi` in `(b, b + R·T/P]` with `g(lo) > 0` and `g(hi) <= 0`.
fn bracket(eq: &CubicEquation, rt: f64, p: f64) -> EosResult<(f64, f64)> {
    let hi = eq.b + rt / p;
    if !hi.is_finite() || hi <= eq.b {
        return Err(EosError::NonConvergence {
            what: format!(
                "no representable molar volume above b={:e} m³/mol at P={p:e} Pa",
                eq.b
            ),
        });
    }

    let mut delta = 0.5 * (hi - eq.b);
    for _ in 0..MAX_BRACKET_HALVINGS {
        let lo = eq.b + delta;
        if lo <= eq.b {
            break;
        }
        let (g, _) = eq.residual_and_slope(lo, rt, p);
        if g > 0.0 {
            return Ok((lo, hi));
        }
        delta *= 0.5;
    }

    Err(EosError::NonConvergence {
        what: format!(
            "no sign change found between b={:e} and {hi:e} m³/mol",
            eq.b
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f64 = 8.314;

    fn methane_vdw() -> CubicEquation {
        CubicEquation::new(CubicForm::VanDerWaals, 0.2283, 4.278e-5, 1.0).unwrap()
    }

    #[test]
    fn ideal_closed_form() {
        let config = EngineConfig::default();
        let finder = RootFinder::new(&config);
        let vm = finder.ideal_molar_volume(300.0, 101325.0).unwrap();
        assert_eq!(vm, R * 300.0 / 101325.0);
        assert!((vm - 0.024616).abs() < 1e-6);
    }

    #[test]
    fn van_der_waals_methane_converges_above_b() {
        let config = EngineConfig::default();
        let finder = RootFinder::new(&config);
        let eq = methane_vdw();
        let root = finder.molar_volume(&eq, 300.0, 5e6).unwrap();

        let vm = root.molar_volume;
        assert!(vm > 4.278e-5);
        assert!(root.residual.abs() < 1e-6);
        let implicit = (5e6 + 0.2283 / (vm * vm)) * (vm - 4.278e-5) - R * 300.0;
        assert!(implicit.abs() < 1e-6, "implicit residual = {implicit}");
        assert!(root.iterations <= 100);
        assert_eq!(root.attempts, 1);
    }

    #[test]
    fn peng_robinson_root_satisfies_pressure_equation() {
        let config = EngineConfig::default();
        let finder = RootFinder::new(&config);
        let eq = CubicEquation::new(CubicForm::PengRobinson, 0.2497, 2.681e-5, 0.75).unwrap();
        let root = finder.molar_volume(&eq, 300.0, 5e6).unwrap();
        let p = eq.pressure(root.molar_volume, R * 300.0);
        assert!((p - 5e6).abs() < 1e-6);
        assert!(root.molar_volume > eq.b());
    }

    #[test]
    fn low_pressure_approaches_ideal_gas() {
        let config = EngineConfig::default();
        let finder = RootFinder::new(&config);
        let root = finder.molar_volume(&methane_vdw(), 300.0, 100.0).unwrap();
        let ideal = R * 300.0 / 100.0;
        assert!((root.molar_volume - ideal).abs() / ideal < 1e-3);
    }

    #[test]
    fn reject_invalid_state() {
        let config = EngineConfig::default();
        let finder = RootFinder::new(&config);
        let eq = methane_vdw();
        assert!(matches!(
            finder.molar_volume(&eq, 300.0, 0.0),
            Err(EosError::InvalidState { .. })
        ));
        assert!(matches!(
            finder.molar_volume(&eq, -1.0, 1e5),
            Err(EosError::InvalidState { .. })
        ));
        assert!(finder.ideal_molar_volume(300.0, -5.0).is_err());
    }

    #[test]
    fn reject_invalid_constants() {
        assert!(matches!(
            CubicEquation::new(CubicForm::VanDerWaals, 0.0, 4.278e-5, 1.0),
            Err(EosError::InvalidParameter { .. })
        ));
        assert!(CubicEquation::new(CubicForm::VanDerWaals, 0.2, 0.0, 1.0).is_err());
        assert!(CubicEquation::new(CubicForm::PengRobinson, 0.2, 4e-5, -0.1).is_err());
    }

    #[test]
    fn pathological_pressure_does_not_converge() {
        let config = EngineConfig::default();
        let finder = RootFinder::new(&config);
        let err = finder.molar_volume(&methane_vdw(), 300.0, 1e25).unwrap_err();
        assert!(matches!(err, EosError::NonConvergence { .. }), "{err:?}");
    }

    #[test]
    fn iteration_cap_is_enforced() {
        let mut config = EngineConfig::default();
        config.solver.max_iterations = 1;
        let finder = RootFinder::new(&config);
        let err = finder.molar_volume(&methane_vdw(), 300.0, 5e6).unwrap_err();
        assert!(matches!(err, EosError::NonConvergence { .. }));
        assert!(err.to_string().contains("2 attempt(s)"), "{err}");

        config.solver.max_attempts = 1;
        let finder = RootFinder::new(&config);
        let err = finder.molar_volume(&methane_vdw(), 300.0, 5e6).unwrap_err();
        assert!(err.to_string().contains("1 attempt(s)"), "{err}");
    }

    #[test]
    fn retry_restarts_from_scaled_guess() {
        // Nearly ideal: g(b + RT/P) = -a/D is below tolerance, g(RT/P) is not.
        let mut config = EngineConfig::default();
        config.solver.max_iterations = 1;
        let finder = RootFinder::new(&config);
        let eq = CubicEquation::new(CubicForm::VanDerWaals, 1e-12, 4e-5, 1.0).unwrap();
        let root = finder.molar_volume(&eq, 300.0, 1e5).unwrap();

        assert_eq!(root.attempts, 2);
        assert_eq!(root.iterations, 1);
        assert_eq!(root.molar_volume, 4e-5 + R * 300.0 / 1e5);
    }

    fn assert_round_trip(eq: &CubicEquation, t: f64, p: f64) {
        let config = EngineConfig::default();
        let root = RootFinder::new(&config)
            .molar_volume(eq, t, p)
            .unwrap_or_else(|err| panic!("{eq:?} at T={t} P={p}: {err}"));
        assert!(root.molar_volume > eq.b());
        let back = eq.pressure(root.molar_volume, R * t);
        assert!(
            (back - p).abs() < 2e-6_f64.max(1e-9 * p),
            "{eq:?} at T={t} P={p}: P(Vm) = {back}"
        );
    }

    #[test]
    fn dense_states_resolve_at_machine_precision() {
        let xylenes = CubicEquation::new(CubicForm::VanDerWaals, 8.613, 0.1243e-3, 1.0).unwrap();
        assert_round_trip(&xylenes, 300.0, 1e7);
        let toluene = CubicEquation::new(CubicForm::VanDerWaals, 6.960, 0.1128e-3, 1.0).unwrap();
        assert_round_trip(&toluene, 100.0, 1e5);
    }

    #[test]
    fn every_catalog_species_solves_across_the_state_grid() {
        for entry in crate::catalog::reference_catalog() {
            let vdw = CubicEquation::new(CubicForm::VanDerWaals, entry.a, entry.b, 1.0).unwrap();
            let (a, b) =
                crate::params::derive(entry.critical_temperature, entry.critical_pressure, R)
                    .unwrap();
            for t in [100.0, 300.0, 1000.0] {
                let alpha =
                    crate::params::alpha(t, entry.critical_temperature, entry.acentric_factor)
                        .unwrap();
                let pr = CubicEquation::new(CubicForm::PengRobinson, a, b, alpha).unwrap();
                for p in [1e2, 1e5, 1e7, 1e9] {
                    assert_round_trip(&vdw, t, p);
                    assert_round_trip(&pr, t, p);
                }
            }
        }
    }
}
