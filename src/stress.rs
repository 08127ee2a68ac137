//! Thin-shell stresses in a cylindrical pressure vessel and inverse wall sizing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    equivalent_radius, PRESSURE_AMBIENT, PRESSURE_MOD, RAD_MAJ, VESSEL_THICKNESS_GUESS,
};
use crate::errors::{BuildError, ConfigurationError, DomainInconsistency};
use crate::materials::CladType;
use crate::solver::RootFinder;

/// Cylindrical shell loaded by internal and external pressure.
///
/// Every stress is derived on demand from the four stored quantities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PressureVessel {
    /// Mean radius of the shell.
    pub mean_radius: f64,
    /// Wall thickness.
    pub wall_thickness: f64,
    /// Pressure acting on the inner surface.
    pub internal_pressure: f64,
    /// Pressure acting on the outer surface.
    pub external_pressure: f64,
}

/// Principal and equivalent stresses of a [`PressureVessel`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StressState {
    /// Radial stress.
    pub radial: f64,
    /// Hoop (azimuthal) stress.
    pub hoop: f64,
    /// Axial stress.
    pub axial: f64,
    /// Tresca equivalent stress.
    pub tresca: f64,
    /// Von Mises equivalent stress.
    pub von_mises: f64,
}

impl StressState {
    /// Conservative envelope of the two criteria.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.tresca.max(self.von_mises)
    }
}

impl PressureVessel {
    /// Create a vessel description.
    #[must_use]
    pub const fn new(
        mean_radius: f64,
        wall_thickness: f64,
        internal_pressure: f64,
        external_pressure: f64,
    ) -> Self {
        Self {
            mean_radius,
            wall_thickness,
            internal_pressure,
            external_pressure,
        }
    }

    /// Area enclosed by the mean radius.
    #[must_use]
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.mean_radius * self.mean_radius
    }

    /// Radial stress, the mean of the two surface pressures.
    #[must_use]
    pub fn radial_stress(&self) -> f64 {
        -(self.internal_pressure + self.external_pressure) / 2.0
    }

    /// Hoop stress.
    #[must_use]
    pub fn hoop_stress(&self) -> f64 {
        (self.mean_radius / self.wall_thickness) * (self.internal_pressure - self.external_pressure)
    }

    /// Axial stress from the external pressure on the end caps.
    #[must_use]
    pub fn axial_stress(&self) -> f64 {
        -(self.external_pressure * self.mean_radius) / (2.0 * self.wall_thickness)
    }

    /// Pairwise principal stress differences `(σr−σa, σr−σz, σa−σz)`.
    fn differences(&self) -> [f64; 3] {
        let (radial, hoop, axial) = (self.radial_stress(), self.hoop_stress(), self.axial_stress());
        [radial - hoop, radial - axial, hoop - axial]
    }

    /// Maximum shear criterion.
    #[must_use]
    pub fn tresca_stress(&self) -> f64 {
        self.differences()
            .iter()
            .fold(0.0, |acc: f64, diff| acc.max(diff.abs()))
    }

    /// Distortion energy criterion.
    #[must_use]
    pub fn von_mises_stress(&self) -> f64 {
        let sum: f64 = self.differences().iter().map(|diff| diff * diff).sum();
        (0.5 * sum).sqrt()
    }

    /// Greater of the Tresca and von Mises stresses.
    ///
    /// # Examples
    /// ```
    /// use hexslice::PressureVessel;
    ///
    /// let vessel = PressureVessel::new(2.0, 0.2, 2.0, 10.0);
    /// assert!((vessel.max_stress() - 74.0).abs() < 1.0e-9);
    /// ```
    #[must_use]
    pub fn max_stress(&self) -> f64 {
        self.tresca_stress().max(self.von_mises_stress())
    }

    /// Every stress component at once.
    #[must_use]
    pub fn stress_state(&self) -> StressState {
        StressState {
            radial: self.radial_stress(),
            hoop: self.hoop_stress(),
            axial: self.axial_stress(),
            tresca: self.tresca_stress(),
            von_mises: self.von_mises_stress(),
        }
    }
}

/// Sizes a wall so that its maximum stress equals an allowable value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselSizing {
    /// Mean radius of the vessel.
    pub mean_radius: f64,
    /// Internal pressure.
    pub internal_pressure: f64,
    /// External pressure.
    pub external_pressure: f64,
    /// Allowable stress.
    pub allowable_stress: f64,
    /// Starting thickness for the search.
    pub initial_thickness: f64,
}

impl Default for VesselSizing {
    fn default() -> Self {
        Self::for_hexagonal_vessel(
            RAD_MAJ,
            PRESSURE_MOD,
            PRESSURE_AMBIENT,
            CladType::Ss316.yield_strength() / 2.0,
        )
    }
}

/// Result of a successful wall sizing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SizedVessel {
    /// Vessel at the solved thickness.
    pub vessel: PressureVessel,
    /// Stresses at the solved thickness.
    pub stresses: StressState,
    /// Allowable stress the wall was sized against.
    pub allowable_stress: f64,
}

impl VesselSizing {
    /// Sizing for a hexagonal vessel, replaced by the circle of equal area.
    #[must_use]
    pub fn for_hexagonal_vessel(
        major_radius: f64,
        internal_pressure: f64,
        external_pressure: f64,
        allowable_stress: f64,
    ) -> Self {
        Self {
            mean_radius: equivalent_radius(major_radius),
            internal_pressure,
            external_pressure,
            allowable_stress,
            initial_thickness: VESSEL_THICKNESS_GUESS,
        }
    }

    /// Maximum stress as a function of wall thickness; `NaN` for non-physical walls.
    #[must_use]
    pub fn stress_at(&self, thickness: f64) -> f64 {
        if thickness <= 0.0 {
            return f64::NAN;
        }
        PressureVessel::new(
            self.mean_radius,
            thickness,
            self.internal_pressure,
            self.external_pressure,
        )
        .max_stress()
    }

    /// Solve for the wall thickness whose maximum stress equals the allowable stress.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Configuration`] for non-positive radius or allowable
    /// stress, [`BuildError::Convergence`] when the root finder gives up and
    /// [`BuildError::Domain`] when the solution is not a positive thickness.
    pub fn solve(&self, solver: &dyn RootFinder) -> Result<SizedVessel, BuildError> {
        for (name, value) in [
            ("vessel radius", self.mean_radius),
            ("allowable stress", self.allowable_stress),
            ("initial thickness", self.initial_thickness),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigurationError::NonPositive { name, value }.into());
            }
        }
        let thickness = solver.solve(
            &|t| self.stress_at(t) - self.allowable_stress,
            self.initial_thickness,
        )?;
        if thickness <= 0.0 {
            return Err(DomainInconsistency::NonPositiveThickness(thickness).into());
        }
        let vessel = PressureVessel::new(
            self.mean_radius,
            thickness,
            self.internal_pressure,
            self.external_pressure,
        );
        debug!(thickness, radius = self.mean_radius, "vessel wall sized");
        Ok(SizedVessel {
            vessel,
            stresses: vessel.stress_state(),
            allowable_stress: self.allowable_stress,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::solver::NewtonSolver;

    #[test]
    fn reference_vessel_components() {
        let vessel = PressureVessel::new(2.0, 0.2, 2.0, 10.0);
        assert_relative_eq!(vessel.radial_stress(), -6.0, epsilon = 1.0e-12);
        assert_relative_eq!(vessel.hoop_stress(), -80.0, epsilon = 1.0e-12);
        assert_relative_eq!(vessel.axial_stress(), -50.0, epsilon = 1.0e-12);
        assert_relative_eq!(vessel.tresca_stress(), 74.0, epsilon = 1.0e-12);
        assert_relative_eq!(
            vessel.von_mises_stress(),
            (0.5f64 * (74.0 * 74.0 + 44.0 * 44.0 + 30.0 * 30.0)).sqrt(),
            epsilon = 1.0e-12
        );
        assert_relative_eq!(vessel.max_stress(), 74.0, epsilon = 1.0e-12);
    }

    #[test]
    fn balanced_pressures_remove_hoop_stress() {
        let vessel = PressureVessel::new(1.5, 0.1, 10.0, 10.0);
        assert_eq!(vessel.hoop_stress(), 0.0);
        let radial = vessel.radial_stress();
        let axial = vessel.axial_stress();
        let expected = radial.abs().max(axial.abs()).max((radial - axial).abs());
        assert_relative_eq!(vessel.tresca_stress(), expected, epsilon = 1.0e-12);
    }

    #[test]
    fn reference_containment_is_about_eleven_centimetres() {
        let sized = VesselSizing::default()
            .solve(&NewtonSolver::default())
            .expect("reference vessel sizes");
        assert!((sized.vessel.wall_thickness - 11.09).abs() < 0.05);
        assert_relative_eq!(sized.stresses.max(), 102.5, epsilon = 1.0e-6);
    }

    #[test]
    fn sized_thickness_reproduces_allowable_stress() {
        let sizing = VesselSizing {
            mean_radius: 50.0,
            internal_pressure: 7.0,
            external_pressure: 0.1,
            allowable_stress: 80.0,
            initial_thickness: 10.0,
        };
        let sized = sizing.solve(&NewtonSolver::default()).expect("sizes");
        assert_relative_eq!(
            sized.vessel.max_stress(),
            sizing.allowable_stress,
            epsilon = 1.0e-6
        );
    }

    #[test]
    fn non_positive_allowable_is_rejected() {
        let sizing = VesselSizing {
            allowable_stress: 0.0,
            ..VesselSizing::default()
        };
        let error = sizing
            .solve(&NewtonSolver::default())
            .expect_err("zero allowable stress");
        assert!(matches!(error, BuildError::Configuration(_)));
    }
}
