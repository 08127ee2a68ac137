//! Fuel-to-clad gap sizing.
//!
//! The gap is treated as an ideal-gas reservoir of unit height. As the fuel
//! swells the gas is compressed, so the cold gap must be wide enough for the
//! pressure after swelling to match the ratio between the moderator and the
//! fill gas:
//!
//! `V_gap(Rg, Rf) / V_gap(Rg, DR·Rf) = P_mod / P_gap`

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{growth_factor, FUEL_EXPANSION, PRESSURE_GAP, PRESSURE_MOD};
use crate::errors::{BuildError, ConfigurationError, DomainInconsistency};
use crate::solver::RootFinder;

/// Starting point of the search, relative to the fuel radius.
const INITIAL_GUESS_FACTOR: f64 = 1.1;

/// Cross-sectional area of the annulus between the fuel and the gap boundary.
#[must_use]
pub fn gap_area(gap_radius: f64, fuel_radius: f64) -> f64 {
    PI * (gap_radius * gap_radius - fuel_radius * fuel_radius)
}

/// Pressure balance across the fuel's cold and swollen states.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapEquilibrium {
    /// Linear growth of the fuel radius, `(1 + ΔV/V)^(1/3)`.
    pub growth_factor: f64,
    /// Pressure on the moderator side.
    pub moderator_pressure: f64,
    /// Gap pressure in the swollen state.
    pub gap_pressure: f64,
}

impl Default for GapEquilibrium {
    fn default() -> Self {
        Self {
            growth_factor: growth_factor(FUEL_EXPANSION),
            moderator_pressure: PRESSURE_MOD,
            gap_pressure: PRESSURE_GAP,
        }
    }
}

impl GapEquilibrium {
    /// Target ratio `P_mod / P_gap`.
    #[must_use]
    pub fn pressure_ratio(&self) -> f64 {
        self.moderator_pressure / self.gap_pressure
    }

    /// Radius of the fuel after swelling.
    #[must_use]
    pub fn swollen_radius(&self, fuel_radius: f64) -> f64 {
        self.growth_factor * fuel_radius
    }

    /// Balance residual; `NaN` when the gap does not enclose the swollen fuel.
    #[must_use]
    pub fn residual(&self, gap_radius: f64, fuel_radius: f64) -> f64 {
        let swollen = self.swollen_radius(fuel_radius);
        if gap_radius <= swollen {
            return f64::NAN;
        }
        gap_area(gap_radius, fuel_radius) / gap_area(gap_radius, swollen) - self.pressure_ratio()
    }

    /// Analytic root of the balance, used to cross-check the numerical result.
    #[must_use]
    pub fn analytic_gap_radius(&self, fuel_radius: f64) -> Option<f64> {
        let ratio = self.pressure_ratio();
        let dr2 = self.growth_factor * self.growth_factor;
        let scale = (ratio * dr2 - 1.0) / (ratio - 1.0);
        (ratio > 1.0 && scale > dr2).then(|| fuel_radius * scale.sqrt())
    }

    /// Solve for the gap radius that balances the pressures.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Configuration`] for a non-positive fuel radius or
    /// pressure, [`BuildError::Domain`] when the inputs cannot open a gap, and
    /// [`BuildError::GapBalance`] when the root finder gives up.
    ///
    /// # Examples
    /// ```
    /// use hexslice::{GapEquilibrium, NewtonSolver};
    ///
    /// let balance = GapEquilibrium::default();
    /// let gap = balance.solve(1.0, &NewtonSolver::default()).expect("reference inputs balance");
    /// assert!(gap > balance.swollen_radius(1.0));
    /// ```
    pub fn solve(&self, fuel_radius: f64, solver: &dyn RootFinder) -> Result<f64, BuildError> {
        if fuel_radius <= 0.0 || !fuel_radius.is_finite() {
            return Err(ConfigurationError::NonPositive {
                name: "fuel radius",
                value: fuel_radius,
            }
            .into());
        }
        for (name, value) in [
            ("moderator pressure", self.moderator_pressure),
            ("gap pressure", self.gap_pressure),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigurationError::NonPositive { name, value }.into());
            }
        }
        if !(self.growth_factor > 1.0) || !self.growth_factor.is_finite() {
            return Err(DomainInconsistency::NoSwelling(self.growth_factor).into());
        }
        let ratio = self.pressure_ratio();
        if !(ratio > 1.0) || !ratio.is_finite() {
            return Err(DomainInconsistency::PressureRatio(ratio).into());
        }
        let swollen = self.swollen_radius(fuel_radius);
        let initial_guess = if INITIAL_GUESS_FACTOR > self.growth_factor {
            INITIAL_GUESS_FACTOR * fuel_radius
        } else {
            INITIAL_GUESS_FACTOR * swollen
        };
        let gap_radius = solver
            .solve(&|rg| self.residual(rg, fuel_radius), initial_guess)
            .map_err(|source| BuildError::GapBalance {
                fuel_radius,
                growth_factor: self.growth_factor,
                pressure_ratio: ratio,
                source,
            })?;
        if gap_radius <= swollen {
            return Err(DomainInconsistency::GapInsideSwollenFuel {
                gap_radius,
                swollen_radius: swollen,
            }
            .into());
        }
        debug!(fuel_radius, gap_radius, "gap radius balanced");
        Ok(gap_radius)
    }
}
