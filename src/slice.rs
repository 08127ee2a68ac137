//! Assembly of a full core slice: lattice, radial shell and, in 3-D, axial shell.
//!
//! The modelled region is a thirty-degree wedge of the hexagonal core bounded
//! by the reflective plane `x = 0` and a reflective sector edge through the
//! origin. The lattice centre sits `pitch · (R − 1)` below the origin so that
//! its outermost ring touches the core axis.

use std::f64::consts::{FRAC_PI_3, FRAC_PI_6};

use nalgebra::Point2;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{CoreDimensions, ScenarioConfig, SliceKind};
use crate::csg::{
    BoundaryCondition, Cell, Fill, Geometry, LatticeId, Region, Surface, SurfaceKind, Universe,
    UniverseId,
};
use crate::errors::{BuildError, DomainInconsistency};
use crate::lattice::{GuideTubeLayout, HexLattice, SymmetryPolicy};
use crate::materials::MaterialRegistry;
use crate::pincell::{GuideTube, Pincell, MODERATOR};
use crate::solver::NewtonSolver;

/// Registry name of the containment wall and end cap.
pub const STRUCTURE: &str = "SS316";
/// Registry name of the region outside the vessel.
pub const EXTERIOR: &str = "Air";

/// Shrinkage of the pitch allowance at the fueled boundary of the 3-D core.
const AXIAL_PITCH_DIVISOR: f64 = 1.1;

/// Plane at `offset` along the lower right flat of the hexagon.
fn hexagon_flat(offset: f64) -> SurfaceKind {
    SurfaceKind::Plane {
        a: FRAC_PI_3.cos(),
        b: -FRAC_PI_6.cos(),
        c: 0.0,
        d: offset * FRAC_PI_6.cos(),
    }
}

/// Offsets of the radial boundaries, measured along the normal of the hexagon flat.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RadialContainment {
    /// Edge of the lattice region.
    pub fueled: f64,
    /// Inside face of the containment wall.
    pub inner_wall: f64,
    /// Outside face of the containment wall.
    pub outer_wall: f64,
}

impl RadialContainment {
    /// Derive the offsets for a slice of `kind` with lattice pitch `pitch`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainInconsistency::ContainmentOrder`] unless
    /// `0 < fueled < inner_wall < outer_wall`.
    pub fn for_slice(
        kind: SliceKind,
        pitch: f64,
        dimensions: &CoreDimensions,
    ) -> Result<Self, DomainInconsistency> {
        let outer_wall = dimensions.major_radius();
        let inner_wall = outer_wall - dimensions.steel_thickness;
        let allowance = 3f64.sqrt() / 2.0 * pitch;
        let fueled = match kind {
            SliceKind::TwoD => inner_wall - allowance,
            SliceKind::ThreeD => inner_wall - allowance / AXIAL_PITCH_DIVISOR,
        };
        let containment = Self {
            fueled,
            inner_wall,
            outer_wall,
        };
        if 0.0 < fueled && fueled < inner_wall && inner_wall < outer_wall {
            Ok(containment)
        } else {
            Err(DomainInconsistency::ContainmentOrder {
                fueled,
                inner_wall,
                outer_wall,
            })
        }
    }
}

/// Axial planes of the slice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AxialExtent {
    /// Lowest plane.
    pub bottom: f64,
    /// Top of the fuel; `None` when the fuel fills the whole height.
    pub fuel_top: Option<f64>,
    /// Highest plane.
    pub top: f64,
}

impl AxialExtent {
    /// Derive the planes for a slice of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainInconsistency::AxialOrder`] unless the planes stack upward.
    pub fn for_slice(
        kind: SliceKind,
        dimensions: &CoreDimensions,
    ) -> Result<Self, DomainInconsistency> {
        let extent = match kind {
            SliceKind::TwoD => Self {
                bottom: -dimensions.slab_height / 2.0,
                fuel_top: None,
                top: dimensions.slab_height / 2.0,
            },
            SliceKind::ThreeD => Self {
                bottom: 0.0,
                fuel_top: Some(dimensions.width - dimensions.steel_thickness),
                top: dimensions.width,
            },
        };
        let fuel_top = extent.fuel_top.unwrap_or(extent.top);
        let ordered = match extent.fuel_top {
            Some(fuel_top) => extent.bottom < fuel_top && fuel_top < extent.top,
            None => extent.bottom < extent.top,
        };
        if ordered {
            Ok(extent)
        } else {
            Err(DomainInconsistency::AxialOrder {
                bottom: extent.bottom,
                fuel_top,
                top: extent.top,
            })
        }
    }
}

/// Scalar description of a built slice.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SliceSummary {
    /// Scenario label.
    pub name: String,
    /// 2-D slab or 3-D core.
    pub kind: SliceKind,
    /// Fuel pellet radius.
    pub fuel_radius: f64,
    /// Inner clad radius.
    pub gap_radius: f64,
    /// Outer clad radius.
    pub clad_radius: f64,
    /// Outer radius of the guide tube wall.
    pub guide_tube_radius: f64,
    /// Whether guide tubes hold control rods.
    pub rodded: bool,
    /// Lattice pitch.
    pub pitch: f64,
    /// Number of lattice rings.
    pub rings: usize,
    /// Number of lattice positions.
    pub positions: usize,
    /// Number of guide tube positions.
    pub guide_tubes: usize,
    /// Radial boundary offsets.
    pub containment: RadialContainment,
    /// Axial planes.
    pub axial: AxialExtent,
    /// Number of surfaces in the geometry.
    pub surfaces: usize,
    /// Number of universes in the geometry.
    pub universes: usize,
    /// Number of cells in the geometry.
    pub cells: usize,
}

/// A fully assembled core slice.
#[derive(Clone, Debug, Serialize)]
pub struct CoreSlice {
    /// Scenario label.
    name: String,
    /// 2-D slab or 3-D core.
    kind: SliceKind,
    /// Fuel pin filling the lattice.
    pincell: Pincell,
    /// Guide tube placed at the layout positions.
    guide_tube: GuideTube,
    /// Guide tube positions after the symmetry policy.
    layout: GuideTubeLayout,
    /// Radial boundary offsets.
    containment: RadialContainment,
    /// Axial planes.
    axial: AxialExtent,
    /// Lattice handle inside `geometry`.
    lattice: LatticeId,
    /// Complete geometry tree.
    geometry: Geometry,
}

impl CoreSlice {
    /// Build the slice described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the configuration is invalid, the gap balance
    /// does not converge, the boundaries are out of order, or the finished tree
    /// fails validation.
    pub fn build(config: &ScenarioConfig, registry: &MaterialRegistry) -> Result<Self, BuildError> {
        config.validate()?;
        let containment =
            RadialContainment::for_slice(config.kind, config.pitch, &config.dimensions)?;
        let axial = AxialExtent::for_slice(config.kind, &config.dimensions)?;
        let solver = NewtonSolver::new(config.solver);

        let pincell = Pincell::new(
            config.fuel_radius,
            config.clad,
            registry,
            &config.balance,
            &solver,
        )?;
        let guide_tube = GuideTube::new(&pincell, config.rodded, registry)?;
        let layout = Self::resolve_layout(config)?;

        let mut geometry = Geometry::new();
        let pin_unit = pincell.build(&mut geometry)?;
        let tube_unit = guide_tube.build(&mut geometry)?;
        let center = Point2::new(0.0, -config.pitch * (config.rings as f64 - 1.0));
        let lattice = geometry.add_lattice(HexLattice::assemble(
            config.pitch,
            config.rings,
            center,
            pin_unit,
            tube_unit,
            &layout,
        )?);

        let radial = Self::radial_shell(&mut geometry, registry, lattice, &containment)?;
        let contents = match axial.fuel_top {
            Some(fuel_top) => Self::axial_shell(&mut geometry, registry, radial, fuel_top)?,
            None => radial,
        };
        let root = Self::root(&mut geometry, config.kind, contents, &config.dimensions, &axial);
        geometry.set_root(root);
        geometry.validate()?;

        let slice = Self {
            name: config.name.clone(),
            kind: config.kind,
            pincell,
            guide_tube,
            layout,
            containment,
            axial,
            lattice,
            geometry,
        };
        info!(
            scenario = %slice.name,
            gap_radius = slice.pincell.gap_radius(),
            clad_radius = slice.pincell.clad_radius(),
            guide_tubes = slice.layout.len(),
            cells = slice.geometry.cell_count(),
            "core slice built"
        );
        Ok(slice)
    }

    /// Guide tube layout for `config`, after its symmetry policy.
    fn resolve_layout(config: &ScenarioConfig) -> Result<GuideTubeLayout, BuildError> {
        let layout = match (&config.guide_tubes, config.kind) {
            (Some(positions), _) => {
                GuideTubeLayout::explicit(config.rings, positions.iter().copied())?
            }
            (None, SliceKind::TwoD) => GuideTubeLayout::reference_2d(),
            (None, SliceKind::ThreeD) => GuideTubeLayout::reference_3d(),
        };
        if config.symmetry == SymmetryPolicy::Explicit {
            let missing = layout.missing_images().len();
            if missing > 0 {
                warn!(
                    scenario = %config.name,
                    missing,
                    "guide tube layout is not closed under the hexagonal symmetry group"
                );
            }
        }
        Ok(layout.with_policy(config.symmetry)?)
    }

    /// Lattice, moderator buffer, containment wall and exterior.
    fn radial_shell(
        geometry: &mut Geometry,
        registry: &MaterialRegistry,
        lattice: LatticeId,
        containment: &RadialContainment,
    ) -> Result<UniverseId, BuildError> {
        let buffer = registry.lookup(MODERATOR)?;
        let wall = registry.lookup(STRUCTURE)?;
        let exterior = registry.lookup(EXTERIOR)?;
        let fueled = geometry
            .add_surface(Surface::new(hexagon_flat(containment.fueled)).named("Fueled Boundary"));
        let inner = geometry
            .add_surface(Surface::new(hexagon_flat(containment.inner_wall)).named("Inner Wall"));
        let outer = geometry
            .add_surface(Surface::new(hexagon_flat(containment.outer_wall)).named("Outer Wall"));

        let mut universe = Universe::new("Radial shell");
        universe.add_cell(
            Cell::new(Region::below(fueled), Fill::Lattice(lattice)).named("Fueled Area"),
        );
        universe.add_cell(
            Cell::new(Region::between(fueled, inner), Fill::Material(buffer)).named("Water Buffer"),
        );
        universe.add_cell(
            Cell::new(Region::between(inner, outer), Fill::Material(wall))
                .named("Reactor Pressure Vessel"),
        );
        universe.add_cell(
            Cell::new(Region::above(outer), Fill::Material(exterior)).named("Outside"),
        );
        Ok(geometry.add_universe(universe))
    }

    /// Fueled extent below `fuel_top` and the steel end cap above it.
    fn axial_shell(
        geometry: &mut Geometry,
        registry: &MaterialRegistry,
        radial: UniverseId,
        fuel_top: f64,
    ) -> Result<UniverseId, BuildError> {
        let cap = registry.lookup(STRUCTURE)?;
        let top = geometry
            .add_surface(Surface::new(SurfaceKind::ZPlane { z0: fuel_top }).named("Fuel Top"));
        let mut universe = Universe::new("Axial shell");
        universe.add_cell(
            Cell::new(Region::below(top), Fill::Universe(radial)).named("Fueled Height"),
        );
        universe.add_cell(Cell::new(Region::above(top), Fill::Material(cap)).named("End Cap"));
        Ok(geometry.add_universe(universe))
    }

    /// Root universe: the wedge between the bounding planes, filled with `contents`.
    fn root(
        geometry: &mut Geometry,
        kind: SliceKind,
        contents: UniverseId,
        dimensions: &CoreDimensions,
        axial: &AxialExtent,
    ) -> UniverseId {
        let (bottom_bc, top_bc) = match kind {
            SliceKind::TwoD => (BoundaryCondition::Periodic, BoundaryCondition::Periodic),
            SliceKind::ThreeD => (BoundaryCondition::Reflective, BoundaryCondition::Vacuum),
        };
        let mirror = geometry.add_surface(
            Surface::new(SurfaceKind::XPlane { x0: 0.0 })
                .with_boundary(BoundaryCondition::Reflective)
                .named("Mirror Plane"),
        );
        let edge = geometry.add_surface(
            Surface::new(SurfaceKind::Plane {
                a: FRAC_PI_6.cos(),
                b: FRAC_PI_3.cos(),
                c: 0.0,
                d: 0.0,
            })
            .with_boundary(BoundaryCondition::Reflective)
            .named("Sector Edge"),
        );
        let floor = geometry.add_surface(
            Surface::new(SurfaceKind::YPlane {
                y0: -dimensions.major_radius(),
            })
            .with_boundary(BoundaryCondition::Vacuum)
            .named("Lower Bound"),
        );
        let bottom = geometry.add_surface(
            Surface::new(SurfaceKind::ZPlane { z0: axial.bottom })
                .with_boundary(bottom_bc)
                .named("Bottom"),
        );
        let top = geometry.add_surface(
            Surface::new(SurfaceKind::ZPlane { z0: axial.top })
                .with_boundary(top_bc)
                .named("Top"),
        );
        let region = Region::above(mirror)
            .and(Region::above(floor))
            .and(Region::between(bottom, top))
            .and(Region::below(edge));
        let mut universe = Universe::new("Root");
        universe.add_cell(Cell::new(region, Fill::Universe(contents)).named("Core"));
        geometry.add_universe(universe)
    }

    /// Scenario label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 2-D slab or 3-D core.
    #[must_use]
    pub fn kind(&self) -> SliceKind {
        self.kind
    }

    /// Fuel pin filling the lattice.
    #[must_use]
    pub fn pincell(&self) -> &Pincell {
        &self.pincell
    }

    /// Guide tube placed at the layout positions.
    #[must_use]
    pub fn guide_tube(&self) -> &GuideTube {
        &self.guide_tube
    }

    /// Guide tube positions.
    #[must_use]
    pub fn layout(&self) -> &GuideTubeLayout {
        &self.layout
    }

    /// Radial boundary offsets.
    #[must_use]
    pub fn containment(&self) -> &RadialContainment {
        &self.containment
    }

    /// Axial planes.
    #[must_use]
    pub fn axial(&self) -> &AxialExtent {
        &self.axial
    }

    /// The assembled lattice.
    #[must_use]
    pub fn lattice(&self) -> Option<&HexLattice> {
        self.geometry.lattice(self.lattice)
    }

    /// Complete geometry tree.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Scalar description for reports.
    #[must_use]
    pub fn summary(&self) -> SliceSummary {
        let (pitch, rings, positions) = self
            .lattice()
            .map_or((0.0, 0, 0), |lattice| {
                (lattice.pitch(), lattice.ring_count(), lattice.position_count())
            });
        SliceSummary {
            name: self.name.clone(),
            kind: self.kind,
            fuel_radius: self.pincell.fuel_radius(),
            gap_radius: self.pincell.gap_radius(),
            clad_radius: self.pincell.clad_radius(),
            guide_tube_radius: self.guide_tube.outer_radius(),
            rodded: self.guide_tube.rod().is_some(),
            pitch,
            rings,
            positions,
            guide_tubes: self.layout.len(),
            containment: self.containment,
            axial: self.axial,
            surfaces: self.geometry.surface_count(),
            universes: self.geometry.universe_count(),
            cells: self.geometry.cell_count(),
        }
    }
}

/// Outcome of one scenario in a batch.
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// Scenario label.
    pub name: String,
    /// The built slice or the reason it failed.
    pub result: Result<CoreSlice, BuildError>,
}

/// Build every scenario in parallel, one outcome per scenario in input order.
///
/// A failing scenario is logged and reported in its own outcome; the others
/// are unaffected.
#[must_use]
pub fn build_batch(
    configs: &[ScenarioConfig],
    registry: &MaterialRegistry,
) -> Vec<ScenarioOutcome> {
    configs
        .par_iter()
        .map(|config| {
            let result = CoreSlice::build(config, registry);
            if let Err(error) = &result {
                warn!(scenario = %config.name, %error, "scenario failed");
            }
            ScenarioOutcome {
                name: config.name.clone(),
                result,
            }
        })
        .collect()
}
