//! Scenario configuration.
//!
//! A scenario is one set of design parameters. Every field has a default equal
//! to the reference 2-D slice, so a JSON file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{REFERENCE_RINGS, SLICE_HEIGHT_2D, STEEL_THICK, WIDTH};
use crate::errors::{ConfigError, ConfigurationError};
use crate::gap::GapEquilibrium;
use crate::lattice::{HexPosition, SymmetryPolicy};
use crate::materials::CladType;
use crate::solver::SolverSettings;

/// Dimensionality of the slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliceKind {
    /// Axially periodic slab.
    #[default]
    #[serde(rename = "2d")]
    TwoD,
    /// Axially finite core with a steel end cap.
    #[serde(rename = "3d")]
    ThreeD,
}

/// Overall dimensions of the hexagonal core, in centimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreDimensions {
    /// Flat-to-flat width of the hexagon; also the height of the 3-D core.
    pub width: f64,
    /// Thickness of the steel containment wall and end cap.
    pub steel_thickness: f64,
    /// Height of the 2-D slab.
    pub slab_height: f64,
}

impl Default for CoreDimensions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            steel_thickness: STEEL_THICK,
            slab_height: SLICE_HEIGHT_2D,
        }
    }
}

impl CoreDimensions {
    /// Major radius of the hexagonal vessel.
    #[must_use]
    pub fn major_radius(&self) -> f64 {
        self.width / 2.0
    }
}

/// Everything needed to build one core slice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Label used in logs and reports.
    pub name: String,
    /// 2-D slab or 3-D core.
    pub kind: SliceKind,
    /// Fuel pellet radius.
    pub fuel_radius: f64,
    /// Lattice pitch.
    pub pitch: f64,
    /// Cladding alloy.
    pub clad: CladType,
    /// Whether guide tubes hold control rods.
    pub rodded: bool,
    /// Number of lattice rings.
    pub rings: usize,
    /// How the guide tube layout is checked against the lattice symmetry.
    pub symmetry: SymmetryPolicy,
    /// Guide tube positions; the reference layout for `kind` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_tubes: Option<Vec<HexPosition>>,
    /// Gap pressure balance.
    pub balance: GapEquilibrium,
    /// Core dimensions.
    pub dimensions: CoreDimensions,
    /// Root finder settings.
    pub solver: SolverSettings,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::reference_2d()
    }
}

impl ScenarioConfig {
    /// Reference 2-D slice: 2 cm Zircaloy-clad fuel on an 8 cm pitch, rodded.
    #[must_use]
    pub fn reference_2d() -> Self {
        Self {
            name: "reference-2d".to_owned(),
            kind: SliceKind::TwoD,
            fuel_radius: 2.0,
            pitch: 8.0,
            clad: CladType::Zr4,
            rodded: true,
            rings: REFERENCE_RINGS,
            symmetry: SymmetryPolicy::Explicit,
            guide_tubes: None,
            balance: GapEquilibrium::default(),
            dimensions: CoreDimensions::default(),
            solver: SolverSettings::default(),
        }
    }

    /// Reference 3-D core: 2.25 cm steel-clad fuel on a 9.8 cm pitch, unrodded.
    #[must_use]
    pub fn reference_3d() -> Self {
        Self {
            name: "reference-3d".to_owned(),
            kind: SliceKind::ThreeD,
            fuel_radius: 2.25,
            pitch: 9.8,
            clad: CladType::Ss316,
            rodded: false,
            ..Self::reference_2d()
        }
    }

    /// Load a scenario from a JSON file and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that can never describe a core.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for non-positive lengths or pressures, a
    /// non-positive growth factor, or an empty lattice.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("fuel radius", self.fuel_radius),
            ("pitch", self.pitch),
            ("core width", self.dimensions.width),
            ("steel thickness", self.dimensions.steel_thickness),
            ("slab height", self.dimensions.slab_height),
            ("solver tolerance", self.solver.tolerance),
            ("growth factor", self.balance.growth_factor),
            ("moderator pressure", self.balance.moderator_pressure),
            ("gap pressure", self.balance.gap_pressure),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigurationError::NonPositive { name, value });
            }
        }
        if self.rings == 0 {
            return Err(ConfigurationError::EmptyLattice);
        }
        Ok(())
    }
}
