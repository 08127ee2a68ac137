//! Scalar root finding behind a narrow interface.
//!
//! Physics code only sees [`RootFinder::solve`]; the numerical backend can be
//! swapped without touching the gap or vessel models.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConvergenceError;

/// Maximum number of times a step is halved when it lands outside the domain.
const MAX_HALVINGS: usize = 40;

/// Relative finite-difference step used to estimate slopes.
const DIFFERENCE_STEP: f64 = 1.0e-7;

/// Relative offset of the second secant point from the initial guess.
const SECANT_OFFSET: f64 = 1.0e-4;

/// Step or bracket width, relative to the iterate, below which the root is pinned to round-off.
const ROUNDOFF: f64 = 4.0 * f64::EPSILON;

/// Finds a root of a scalar function from an initial guess.
///
/// Implementations treat a non-finite function value as "outside the domain"
/// and must never report such a point as a root.
pub trait RootFinder {
    /// Return `x` with `f(x) ≈ 0`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvergenceError`] when no root is reached within the iteration budget.
    fn solve(&self, f: &dyn Fn(f64) -> f64, initial_guess: f64) -> Result<f64, ConvergenceError>;
}

/// Tolerance and iteration budget shared by the bundled solvers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Absolute residual below which an iterate is accepted.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-10,
            max_iterations: 100,
        }
    }
}

/// Newton-Raphson iteration with a central-difference slope and step halving.
///
/// Once two iterates straddle a sign change the iteration is safeguarded: a
/// Newton step that leaves the bracket, or that fails to halve the previous
/// step, is replaced by bisection. A bracket narrowed to round-off is accepted
/// even when steep functions keep the residual above the tolerance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NewtonSolver {
    /// Convergence settings.
    pub settings: SolverSettings,
}

impl NewtonSolver {
    /// Create a solver with explicit settings.
    #[must_use]
    pub const fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }
}

/// Estimate `f'(x)`, falling back to one-sided differences near a domain edge.
fn slope(f: &dyn Fn(f64) -> f64, x: f64, fx: f64) -> Option<f64> {
    let h = if x == 0.0 {
        DIFFERENCE_STEP
    } else {
        DIFFERENCE_STEP * x.abs()
    };
    let (ahead, behind) = (f(x + h), f(x - h));
    let estimate = match (ahead.is_finite(), behind.is_finite()) {
        (true, true) => (ahead - behind) / (2.0 * h),
        (true, false) => (ahead - fx) / h,
        (false, true) => (fx - behind) / h,
        (false, false) => return None,
    };
    (estimate.is_finite() && estimate != 0.0).then_some(estimate)
}

/// Step from `x` by `-delta`, halving until the function is defined again.
fn damped_step(f: &dyn Fn(f64) -> f64, x: f64, mut delta: f64) -> Option<(f64, f64)> {
    for _ in 0..=MAX_HALVINGS {
        let next = x - delta;
        let value = f(next);
        if value.is_finite() {
            return Some((next, value));
        }
        delta *= 0.5;
    }
    None
}

/// Two points on either side of a sign change, stored as `(x, f(x))`.
#[derive(Clone, Copy, Debug, Default)]
struct Bracket {
    /// Latest point with a negative value.
    below: Option<(f64, f64)>,
    /// Latest point with a positive value.
    above: Option<(f64, f64)>,
}

impl Bracket {
    /// Remember `(x, fx)` as the newest point on its side of the sign change.
    fn record(&mut self, x: f64, fx: f64) {
        if fx < 0.0 {
            self.below = Some((x, fx));
        } else if fx > 0.0 {
            self.above = Some((x, fx));
        }
    }

    /// Both ends, once a sign change has been seen.
    fn ends(&self) -> Option<((f64, f64), (f64, f64))> {
        self.below.zip(self.above)
    }
}

/// Whether `f` changes sign within round-off of `x`.
fn pinned(f: &dyn Fn(f64) -> f64, x: f64) -> bool {
    let spread = ROUNDOFF * x.abs();
    let (left, right) = (f(x - spread), f(x + spread));
    left.is_finite()
        && right.is_finite()
        && (left == 0.0 || right == 0.0 || (left < 0.0) != (right < 0.0))
}

/// Whether `x` lies strictly between `a` and `b`.
fn within(x: f64, a: f64, b: f64) -> bool {
    x > a.min(b) && x < a.max(b)
}

impl RootFinder for NewtonSolver {
    fn solve(&self, f: &dyn Fn(f64) -> f64, initial_guess: f64) -> Result<f64, ConvergenceError> {
        let mut x = initial_guess;
        let mut fx = f(x);
        let failure = |x: f64, fx: f64, iterations: usize| ConvergenceError {
            initial_guess,
            last_iterate: x,
            residual: fx,
            iterations,
        };
        if !fx.is_finite() {
            return Err(failure(x, fx, 0));
        }
        let mut bracket = Bracket::default();
        let mut last_step = f64::INFINITY;
        for iteration in 0..self.settings.max_iterations {
            if fx.abs() <= self.settings.tolerance {
                debug!(root = x, iterations = iteration, "newton converged");
                return Ok(x);
            }
            bracket.record(x, fx);
            let newton = slope(f, x, fx).map(|derivative| fx / derivative);
            if newton.is_some_and(|delta| delta.abs() <= ROUNDOFF * x.abs()) && pinned(f, x) {
                debug!(root = x, iterations = iteration, "newton step below round-off");
                return Ok(x);
            }

            let Some(((low, f_low), (high, f_high))) = bracket.ends() else {
                let Some(delta) = newton else {
                    return Err(failure(x, fx, iteration));
                };
                let Some((next, value)) = damped_step(f, x, delta) else {
                    return Err(failure(x, fx, iteration));
                };
                last_step = x - next;
                x = next;
                fx = value;
                continue;
            };

            if (high - low).abs() <= ROUNDOFF * x.abs() {
                let root = if f_low.abs() < f_high.abs() { low } else { high };
                debug!(root, iterations = iteration, "newton bracket closed");
                return Ok(root);
            }
            let accepted = newton
                .filter(|delta| {
                    within(x - delta, low, high) && delta.abs() <= 0.5 * last_step.abs()
                })
                .map(|delta| (x - delta, f(x - delta)))
                .filter(|(_, value)| value.is_finite());
            let (next, value) = match accepted {
                Some(point) => point,
                None => {
                    let middle = 0.5 * (low + high);
                    let value = f(middle);
                    if !value.is_finite() {
                        return Err(failure(x, fx, iteration));
                    }
                    (middle, value)
                }
            };
            last_step = x - next;
            x = next;
            fx = value;
        }
        if fx.abs() <= self.settings.tolerance {
            return Ok(x);
        }
        Err(failure(x, fx, self.settings.max_iterations))
    }
}

/// Secant iteration, useful when the function is expensive or noisy to differentiate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SecantSolver {
    /// Convergence settings.
    pub settings: SolverSettings,
}

impl SecantSolver {
    /// Create a solver with explicit settings.
    #[must_use]
    pub const fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }
}

impl RootFinder for SecantSolver {
    fn solve(&self, f: &dyn Fn(f64) -> f64, initial_guess: f64) -> Result<f64, ConvergenceError> {
        let failure = |x: f64, fx: f64, iterations: usize| ConvergenceError {
            initial_guess,
            last_iterate: x,
            residual: fx,
            iterations,
        };
        let mut previous = initial_guess;
        let mut f_previous = f(previous);
        if !f_previous.is_finite() {
            return Err(failure(previous, f_previous, 0));
        }
        if f_previous.abs() <= self.settings.tolerance {
            return Ok(previous);
        }
        let offset = if initial_guess == 0.0 {
            SECANT_OFFSET
        } else {
            SECANT_OFFSET * initial_guess.abs()
        };
        let Some((mut x, mut fx)) = damped_step(f, previous, -offset) else {
            return Err(failure(previous, f_previous, 0));
        };
        for iteration in 0..self.settings.max_iterations {
            if fx.abs() <= self.settings.tolerance {
                debug!(root = x, iterations = iteration, "secant converged");
                return Ok(x);
            }
            let secant = (fx - f_previous) / (x - previous);
            if !secant.is_finite() || secant == 0.0 {
                return Err(failure(x, fx, iteration));
            }
            let Some((next, value)) = damped_step(f, x, fx / secant) else {
                return Err(failure(x, fx, iteration));
            };
            previous = x;
            f_previous = fx;
            x = next;
            fx = value;
        }
        Err(failure(x, fx, self.settings.max_iterations))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn newton_finds_square_root() {
        let solver = NewtonSolver::default();
        let root = solver
            .solve(&|x| x * x - 2.0, 1.0)
            .expect("smooth function converges");
        assert_relative_eq!(root, 2f64.sqrt(), epsilon = 1.0e-9);
    }

    #[test]
    fn secant_finds_square_root() {
        let solver = SecantSolver::default();
        let root = solver
            .solve(&|x| x * x - 2.0, 1.0)
            .expect("smooth function converges");
        assert_relative_eq!(root, 2f64.sqrt(), epsilon = 1.0e-9);
    }

    #[test]
    fn newton_halves_steps_out_of_undefined_region() {
        // ln(x) - 1 is undefined for x <= 0; the first full Newton step from 10 overshoots.
        let f = |x: f64| if x > 0.0 { x.ln() - 1.0 } else { f64::NAN };
        let root = NewtonSolver::default()
            .solve(&f, 10.0)
            .expect("damped iteration converges");
        assert_relative_eq!(root, std::f64::consts::E, epsilon = 1.0e-9);
    }

    #[test]
    fn newton_bisects_when_steps_leave_the_bracket() {
        // Plain Newton on atan diverges from 1.5.
        let root = NewtonSolver::default()
            .solve(&f64::atan, 1.5)
            .expect("bracketed iteration converges");
        assert!(root.abs() < 1.0e-9);
    }

    #[test]
    fn steep_function_settles_at_round_off() {
        let f = |x: f64| 1.0e20 * (x - 1.0 / 3.0);
        let root = NewtonSolver::default()
            .solve(&f, 1.0)
            .expect("root is pinned to machine precision");
        assert_relative_eq!(root, 1.0 / 3.0, max_relative = 1.0e-14);
    }

    #[test]
    fn tiny_scale_roots_use_relative_differences() {
        let f = |x: f64| (x * 1.0e9).powi(2) - 4.0;
        let root = NewtonSolver::default()
            .solve(&f, 3.0e-9)
            .expect("tiny root converges");
        assert_relative_eq!(root, 2.0e-9, max_relative = 1.0e-9);
    }

    #[test]
    fn rootless_function_reports_convergence_error() {
        let solver = NewtonSolver::new(SolverSettings {
            tolerance: 1.0e-12,
            max_iterations: 25,
        });
        let error = solver
            .solve(&|x| x * x + 1.0, 0.5)
            .expect_err("no real root exists");
        assert_eq!(error.initial_guess, 0.5);
        assert!(error.residual >= 1.0);
    }

    #[test]
    fn undefined_initial_guess_is_rejected() {
        let error = SecantSolver::default()
            .solve(&|x: f64| x.sqrt() - 1.0, -1.0)
            .expect_err("guess outside the domain");
        assert_eq!(error.iterations, 0);
    }
}
