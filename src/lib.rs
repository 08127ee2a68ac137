#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod constants;
pub mod csg;
pub mod errors;
pub mod gap;
pub mod lattice;
pub mod materials;
pub mod pincell;
pub mod report;
pub mod slice;
pub mod solver;
pub mod stress;
pub mod sweep;

pub use config::{CoreDimensions, ScenarioConfig, SliceKind};
pub use csg::{Geometry, Medium};
pub use errors::{
    BuildError, ConfigError, ConfigurationError, ConvergenceError, DomainInconsistency,
    GeometryError,
};
pub use gap::GapEquilibrium;
pub use lattice::{GuideTubeLayout, HexLattice, HexPosition, SymmetryPolicy};
pub use materials::{CladType, MaterialId, MaterialRegistry};
pub use pincell::{GuideTube, Pincell};
pub use slice::{build_batch, CoreSlice, ScenarioOutcome, SliceSummary};
pub use solver::{NewtonSolver, RootFinder, SecantSolver, SolverSettings};
pub use stress::{PressureVessel, SizedVessel, StressState, VesselSizing};
pub use sweep::{SweepGrid, SweepResult};
