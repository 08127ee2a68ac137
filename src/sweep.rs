//! Clad stress sweep over fill pressure, fuel radius and clad thickness.
//!
//! Each point sizes the gap for a fill pressure, treats the clad as a thin
//! pressure vessel around the gap and records the worse of its cold and
//! swollen stresses. Points are independent and evaluated in parallel; every
//! point writes only its own slot of the result grid.

use ndarray::{Array1, Array3};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::constants::{growth_factor, FUEL_EXPANSION, PRESSURE_MOD};
use crate::errors::BuildError;
use crate::gap::GapEquilibrium;
use crate::solver::RootFinder;
use crate::stress::PressureVessel;

/// Axes of the sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepGrid {
    /// Initial fill-gas pressures.
    pub fill_pressures: Array1<f64>,
    /// Fuel radii.
    pub fuel_radii: Array1<f64>,
    /// Clad thickness as a fraction of the gap radius.
    pub thickness_ratios: Array1<f64>,
    /// Moderator pressure outside the clad.
    pub outer_pressure: f64,
    /// Linear growth of the fuel radius.
    pub growth_factor: f64,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            fill_pressures: Array1::linspace(0.69, 8.0, 6),
            fuel_radii: Array1::linspace(1.0, 2.0, 5),
            thickness_ratios: Array1::linspace(0.02, 0.10, 9),
            outer_pressure: PRESSURE_MOD,
            growth_factor: growth_factor(FUEL_EXPANSION),
        }
    }
}

/// Coordinates of one sweep point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SweepPoint {
    /// Initial fill-gas pressure.
    pub fill_pressure: f64,
    /// Fuel radius.
    pub fuel_radius: f64,
    /// Clad thickness as a fraction of the gap radius.
    pub thickness_ratio: f64,
}

/// A point that could not be evaluated.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepFailure {
    /// Grid index `[pressure, radius, ratio]`.
    pub index: [usize; 3],
    /// Coordinates of the point.
    pub point: SweepPoint,
    /// Reason for the failure.
    pub error: BuildError,
}

/// Maximum clad stress over the grid.
#[derive(Clone, Debug)]
pub struct SweepResult {
    /// Stress per `[pressure, radius, ratio]`; `NaN` where the point failed.
    pub max_stress: Array3<f64>,
    /// Points that failed, in grid order.
    pub failures: Vec<SweepFailure>,
}

impl SweepGrid {
    /// Grid dimensions `(pressures, radii, ratios)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (
            self.fill_pressures.len(),
            self.fuel_radii.len(),
            self.thickness_ratios.len(),
        )
    }

    /// Coordinates at a grid index.
    #[must_use]
    pub fn point(&self, [i, j, k]: [usize; 3]) -> SweepPoint {
        SweepPoint {
            fill_pressure: self.fill_pressures[i],
            fuel_radius: self.fuel_radii[j],
            thickness_ratio: self.thickness_ratios[k],
        }
    }

    /// Gap balance for a given fill pressure.
    fn balance(&self, fill_pressure: f64) -> GapEquilibrium {
        GapEquilibrium {
            growth_factor: self.growth_factor,
            moderator_pressure: self.outer_pressure,
            gap_pressure: fill_pressure,
        }
    }

    /// Worse of the cold and swollen clad stresses for a clad around `gap_radius`.
    fn clad_stress(&self, gap_radius: f64, point: &SweepPoint) -> f64 {
        let thickness = point.thickness_ratio * gap_radius;
        let cold = PressureVessel::new(
            gap_radius,
            thickness,
            point.fill_pressure,
            self.outer_pressure,
        );
        let swollen = PressureVessel::new(
            gap_radius,
            thickness,
            self.outer_pressure,
            self.outer_pressure,
        );
        cold.max_stress().max(swollen.max_stress())
    }

    /// Evaluate one point.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the gap balance for the point cannot be solved.
    pub fn evaluate(&self, point: &SweepPoint, solver: &dyn RootFinder) -> Result<f64, BuildError> {
        let gap_radius = self
            .balance(point.fill_pressure)
            .solve(point.fuel_radius, solver)?;
        Ok(self.clad_stress(gap_radius, point))
    }

    /// Evaluate every point of the grid in parallel.
    ///
    /// The gap is solved once per `(pressure, radius)` pair and shared by all
    /// thickness ratios of that pair.
    pub fn run(&self, solver: &(dyn RootFinder + Sync)) -> SweepResult {
        let (pressures, radii, ratios) = self.shape();
        let columns: Vec<(usize, usize, Result<f64, BuildError>)> = (0..pressures * radii)
            .into_par_iter()
            .map(|flat| {
                let (i, j) = (flat / radii, flat % radii);
                let gap = self
                    .balance(self.fill_pressures[i])
                    .solve(self.fuel_radii[j], solver);
                (i, j, gap)
            })
            .collect();

        let mut max_stress = Array3::from_elem((pressures, radii, ratios), f64::NAN);
        let mut failures = Vec::new();
        for (i, j, gap) in columns {
            for k in 0..ratios {
                let point = self.point([i, j, k]);
                match &gap {
                    Ok(gap_radius) => max_stress[[i, j, k]] = self.clad_stress(*gap_radius, &point),
                    Err(error) => {
                        warn!(
                            fill_pressure = point.fill_pressure,
                            fuel_radius = point.fuel_radius,
                            thickness_ratio = point.thickness_ratio,
                            %error,
                            "sweep point failed"
                        );
                        failures.push(SweepFailure {
                            index: [i, j, k],
                            point,
                            error: error.clone(),
                        });
                    }
                }
            }
        }
        info!(
            points = max_stress.len(),
            failures = failures.len(),
            "clad stress sweep finished"
        );
        SweepResult {
            max_stress,
            failures,
        }
    }
}

impl SweepResult {
    /// Every point with its stress, `None` where it failed, in grid order.
    pub fn rows<'a>(
        &'a self,
        grid: &'a SweepGrid,
    ) -> impl Iterator<Item = (SweepPoint, Option<f64>)> + 'a {
        self.max_stress.indexed_iter().map(move |((i, j, k), &stress)| {
            (grid.point([i, j, k]), stress.is_finite().then_some(stress))
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::DomainInconsistency;
    use crate::solver::NewtonSolver;

    #[test]
    fn reference_grid_is_fully_evaluated() {
        let grid = SweepGrid::default();
        assert_eq!(grid.shape(), (6, 5, 9));
        assert_relative_eq!(grid.fuel_radii[1], 1.25, epsilon = 1.0e-12);
        assert_relative_eq!(grid.thickness_ratios[8], 0.10, epsilon = 1.0e-12);

        let result = grid.run(&NewtonSolver::default());
        assert!(result.failures.is_empty());
        assert_eq!(result.max_stress.dim(), (6, 5, 9));
        assert!(result.max_stress.iter().all(|stress| stress.is_finite() && *stress > 0.0));
        assert_eq!(result.rows(&grid).count(), 270);
    }

    #[test]
    fn thicker_clad_carries_less_stress() {
        let grid = SweepGrid::default();
        let result = grid.run(&NewtonSolver::default());
        for i in 0..6 {
            for j in 0..5 {
                assert!(result.max_stress[[i, j, 0]] > result.max_stress[[i, j, 8]]);
            }
        }
    }

    #[test]
    fn grid_slot_matches_single_evaluation() {
        let grid = SweepGrid::default();
        let solver = NewtonSolver::default();
        let result = grid.run(&solver);
        let point = grid.point([2, 3, 4]);
        let single = grid.evaluate(&point, &solver).expect("point evaluates");
        assert_relative_eq!(result.max_stress[[2, 3, 4]], single, epsilon = 1.0e-9);
    }

    #[test]
    fn failures_are_isolated_per_point() {
        let grid = SweepGrid {
            fill_pressures: Array1::from(vec![5.0, 12.0]),
            ..SweepGrid::default()
        };
        let result = grid.run(&NewtonSolver::default());
        assert_eq!(result.failures.len(), 5 * 9);
        assert!(result
            .failures
            .iter()
            .all(|failure| failure.index[0] == 1
                && matches!(
                    failure.error,
                    BuildError::Domain(DomainInconsistency::PressureRatio(_))
                )));
        assert!(result.max_stress[[1, 0, 0]].is_nan());
        assert!(result.max_stress[[0, 0, 0]].is_finite());
        let failed_rows = result.rows(&grid).filter(|(_, stress)| stress.is_none()).count();
        assert_eq!(failed_rows, 45);
    }
}
