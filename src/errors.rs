//! Error types produced while sizing and assembling a core slice.

use thiserror::Error;

/// Error returned when the supplied design parameters cannot describe a valid build.
///
/// These are detected before or during construction and abort the build of the
/// affected scenario.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    /// Returned when a clad type name is not part of the catalog.
    #[error("unknown clad type `{0}`")]
    UnknownCladType(String),
    /// Returned when a material name is missing from the registry.
    #[error("material `{0}` is not registered")]
    UnknownMaterial(String),
    /// Returned when a lattice override addresses a position outside its ring.
    #[error("lattice position ({ring}, {position}) is out of range for a lattice of {rings} rings")]
    PositionOutOfRange {
        /// Ring index, counted outward from the centre.
        ring: usize,
        /// Position index within the ring.
        position: usize,
        /// Number of rings in the lattice.
        rings: usize,
    },
    /// Returned when the same lattice position is overridden more than once.
    #[error("lattice position ({ring}, {position}) is overridden more than once")]
    DuplicateOverride {
        /// Ring index, counted outward from the centre.
        ring: usize,
        /// Position index within the ring.
        position: usize,
    },
    /// Returned when a layout is not closed under the lattice symmetry group.
    #[error("guide tube layout is missing {missing} symmetric image(s)")]
    AsymmetricLayout {
        /// Number of symmetric images absent from the layout.
        missing: usize,
    },
    /// Returned when concentric ring radii are not strictly increasing.
    #[error("ring radii must be strictly increasing (radius {index} is {radius} after {previous})")]
    NonIncreasingRadii {
        /// Index of the offending radius.
        index: usize,
        /// Offending radius.
        radius: f64,
        /// Radius that precedes it.
        previous: f64,
    },
    /// Returned when the number of fills does not match the number of ring boundaries.
    #[error("{fills} fills supplied for {radii} radii (expected {expected})")]
    RingFillMismatch {
        /// Number of radii supplied.
        radii: usize,
        /// Number of fills supplied.
        fills: usize,
        /// Number of fills required.
        expected: usize,
    },
    /// Returned when a dimension that must be positive is not.
    #[error("{name} must be positive (received {value})")]
    NonPositive {
        /// Name of the offending parameter.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when a lattice is requested with no rings.
    #[error("a lattice needs at least one ring")]
    EmptyLattice,
}

/// Error returned when a root finder exhausts its iteration budget.
#[derive(Clone, Debug, Error, PartialEq)]
#[error(
    "root finder did not converge from {initial_guess} after {iterations} iterations \
     (last iterate {last_iterate}, residual {residual})"
)]
pub struct ConvergenceError {
    /// Starting point handed to the solver.
    pub initial_guess: f64,
    /// Last iterate reached before giving up.
    pub last_iterate: f64,
    /// Residual at the last iterate.
    pub residual: f64,
    /// Number of iterations spent.
    pub iterations: usize,
}

/// Error returned when derived quantities violate their ordering invariants.
///
/// This signals physically inconsistent inputs, for instance a swelling factor that
/// does not exceed one, and is reported rather than clamped.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainInconsistency {
    /// Returned when the solved gap radius does not enclose the swollen fuel.
    #[error("gap radius {gap_radius} does not exceed swollen fuel radius {swollen_radius}")]
    GapInsideSwollenFuel {
        /// Solved gap radius.
        gap_radius: f64,
        /// Fuel radius after swelling.
        swollen_radius: f64,
    },
    /// Returned when the thermal growth factor cannot open a gap.
    #[error("growth factor {0} must exceed 1")]
    NoSwelling(f64),
    /// Returned when the pressure ratio cannot be balanced by any gap radius.
    #[error("pressure ratio {0} must exceed 1")]
    PressureRatio(f64),
    /// Returned when containment boundaries are not ordered outward.
    #[error(
        "containment offsets are out of order: fueled {fueled}, inner wall {inner_wall}, \
         outer wall {outer_wall}"
    )]
    ContainmentOrder {
        /// Offset of the fueled-area boundary.
        fueled: f64,
        /// Offset of the inner containment wall.
        inner_wall: f64,
        /// Offset of the outer containment wall.
        outer_wall: f64,
    },
    /// Returned when axial extents do not stack upward.
    #[error("axial planes are out of order: bottom {bottom}, fuel top {fuel_top}, top {top}")]
    AxialOrder {
        /// Lower reflecting plane.
        bottom: f64,
        /// Top of the fueled extent.
        fuel_top: f64,
        /// Upper absorbing plane.
        top: f64,
    },
    /// Returned when a sized wall thickness is not physical.
    #[error("solved wall thickness {0} is not positive")]
    NonPositiveThickness(f64),
}

/// Error returned when a geometry tree references missing or cyclic entries.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    /// Returned when a region references a surface that was never added.
    #[error("surface {0} does not exist")]
    UnknownSurface(usize),
    /// Returned when a fill references a universe that was never added.
    #[error("universe {0} does not exist")]
    UnknownUniverse(usize),
    /// Returned when a fill references a lattice that was never added.
    #[error("lattice {0} does not exist")]
    UnknownLattice(usize),
    /// Returned when a universe (directly or indirectly) contains itself.
    #[error("universe containment is cyclic")]
    Cycle,
    /// Returned when no root universe was assigned.
    #[error("geometry has no root universe")]
    MissingRoot,
}

/// Error returned when a single scenario cannot be built.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BuildError {
    /// The assembled geometry tree is malformed.
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
    /// Invalid design parameters.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    /// A root finder failed to converge.
    #[error("convergence error: {0}")]
    Convergence(#[from] ConvergenceError),
    /// The gap balance did not converge for the given physical inputs.
    #[error(
        "gap balance failed for fuel radius {fuel_radius}, growth factor {growth_factor} \
         and pressure ratio {pressure_ratio}: {source}"
    )]
    GapBalance {
        /// Cold fuel radius.
        fuel_radius: f64,
        /// Linear growth factor of the fuel.
        growth_factor: f64,
        /// Moderator to gap pressure ratio.
        pressure_ratio: f64,
        /// Failure reported by the root finder.
        source: ConvergenceError,
    },
    /// Derived quantities are physically inconsistent.
    #[error("domain inconsistency: {0}")]
    Domain(#[from] DomainInconsistency),
}

/// Error returned when loading a scenario file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid scenario description.
    #[error("failed to parse scenario: {0}")]
    Json(#[from] serde_json::Error),
    /// The scenario parsed but holds invalid values.
    #[error("{0}")]
    Invalid(#[from] ConfigurationError),
}
