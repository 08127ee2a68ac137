//! Constructive solid geometry tree handed to the transport engine.
//!
//! Surfaces, universes and lattices live in arenas owned by [`Geometry`] and are
//! referenced by index, so a single pin universe can fill hundreds of lattice
//! positions without being copied.

use nalgebra::{Point2, Point3};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use serde::Serialize;

use crate::errors::GeometryError;
use crate::lattice::HexLattice;
use crate::materials::MaterialId;

/// Nesting depth beyond which point location gives up.
const MAX_DEPTH: usize = 32;

/// Handle for a surface stored in a [`Geometry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SurfaceId(usize);

/// Handle for a universe stored in a [`Geometry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UniverseId(pub(crate) usize);

/// Handle for a lattice stored in a [`Geometry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LatticeId(usize);

impl UniverseId {
    /// Position of the universe in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Treatment of particles crossing a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryCondition {
    /// Ordinary internal surface.
    #[default]
    Transmission,
    /// Mirror boundary.
    Reflective,
    /// Absorbing boundary; particles leaving are lost.
    Vacuum,
    /// Paired periodic boundary.
    Periodic,
}

/// Quadric shapes used by the core slice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SurfaceKind {
    /// `x = x0`.
    XPlane {
        /// Plane position.
        x0: f64,
    },
    /// `y = y0`.
    YPlane {
        /// Plane position.
        y0: f64,
    },
    /// `z = z0`.
    ZPlane {
        /// Plane position.
        z0: f64,
    },
    /// `a·x + b·y + c·z = d`.
    Plane {
        /// X coefficient.
        a: f64,
        /// Y coefficient.
        b: f64,
        /// Z coefficient.
        c: f64,
        /// Offset.
        d: f64,
    },
    /// Infinite cylinder parallel to the z axis.
    ZCylinder {
        /// Axis x position.
        x0: f64,
        /// Axis y position.
        y0: f64,
        /// Radius.
        r: f64,
    },
}

impl SurfaceKind {
    /// Signed surface function; negative on the inside.
    #[must_use]
    pub fn evaluate(&self, point: &Point3<f64>) -> f64 {
        match *self {
            SurfaceKind::XPlane { x0 } => point.x - x0,
            SurfaceKind::YPlane { y0 } => point.y - y0,
            SurfaceKind::ZPlane { z0 } => point.z - z0,
            SurfaceKind::Plane { a, b, c, d } => a * point.x + b * point.y + c * point.z - d,
            SurfaceKind::ZCylinder { x0, y0, r } => {
                let (dx, dy) = (point.x - x0, point.y - y0);
                dx * dx + dy * dy - r * r
            }
        }
    }
}

/// A named surface with its boundary condition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Surface {
    /// Shape of the surface.
    pub kind: SurfaceKind,
    /// Boundary treatment.
    pub boundary: BoundaryCondition,
    /// Optional label.
    pub name: Option<String>,
}

impl Surface {
    /// Internal surface without a label.
    #[must_use]
    pub const fn new(kind: SurfaceKind) -> Self {
        Self {
            kind,
            boundary: BoundaryCondition::Transmission,
            name: None,
        }
    }

    /// Set the boundary condition.
    #[must_use]
    pub const fn with_boundary(mut self, boundary: BoundaryCondition) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the label.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }
}

/// Side of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    /// Where the surface function is negative.
    Negative,
    /// Where the surface function is positive.
    Positive,
}

/// One side of one surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Halfspace {
    /// Bounding surface.
    pub surface: SurfaceId,
    /// Selected side.
    pub sense: Sense,
}

/// Intersection of halfspaces; the empty intersection is all of space.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Region(Vec<Halfspace>);

impl Region {
    /// Region covering all of space.
    #[must_use]
    pub fn everywhere() -> Self {
        Self::default()
    }

    /// Negative side of `surface`.
    #[must_use]
    pub fn below(surface: SurfaceId) -> Self {
        Self(vec![Halfspace {
            surface,
            sense: Sense::Negative,
        }])
    }

    /// Positive side of `surface`.
    #[must_use]
    pub fn above(surface: SurfaceId) -> Self {
        Self(vec![Halfspace {
            surface,
            sense: Sense::Positive,
        }])
    }

    /// Positive side of `lower` and negative side of `upper`.
    #[must_use]
    pub fn between(lower: SurfaceId, upper: SurfaceId) -> Self {
        Self::above(lower).and(Self::below(upper))
    }

    /// Intersection with another region.
    #[must_use]
    pub fn and(mut self, other: Region) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Halfspaces making up the region.
    #[must_use]
    pub fn halfspaces(&self) -> &[Halfspace] {
        &self.0
    }
}

/// What occupies a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Fill {
    /// Nothing; particles stream freely.
    Void,
    /// A homogeneous material.
    Material(MaterialId),
    /// Another universe, in the same coordinate frame.
    Universe(UniverseId),
    /// A lattice of universes.
    Lattice(LatticeId),
}

/// Region of space together with its fill.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cell {
    /// Optional label.
    pub name: Option<String>,
    /// Space occupied by the cell.
    pub region: Region,
    /// Content of the cell.
    pub fill: Fill,
}

impl Cell {
    /// Unnamed cell.
    #[must_use]
    pub const fn new(region: Region, fill: Fill) -> Self {
        Self {
            name: None,
            region,
            fill,
        }
    }

    /// Set the label.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }
}

/// Collection of cells that together partition space.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Universe {
    /// Label.
    pub name: String,
    /// Cells, tested in order during point location.
    pub cells: Vec<Cell>,
}

impl Universe {
    /// Empty universe.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
        }
    }

    /// Append a cell.
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }
}

/// Terminal content found at a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Medium {
    /// Void cell.
    Void,
    /// Material cell.
    Material(MaterialId),
}

/// Node of the containment graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    /// A universe.
    Universe(UniverseId),
    /// A lattice.
    Lattice(LatticeId),
}

/// Arena-backed geometry tree.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Geometry {
    /// Surface arena.
    surfaces: Vec<Surface>,
    /// Universe arena.
    universes: Vec<Universe>,
    /// Lattice arena.
    lattices: Vec<HexLattice>,
    /// Universe at the top of the tree.
    root: Option<UniverseId>,
}

impl Geometry {
    /// Empty geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a surface.
    pub fn add_surface(&mut self, surface: Surface) -> SurfaceId {
        self.surfaces.push(surface);
        SurfaceId(self.surfaces.len() - 1)
    }

    /// Store a universe.
    pub fn add_universe(&mut self, universe: Universe) -> UniverseId {
        self.universes.push(universe);
        UniverseId(self.universes.len() - 1)
    }

    /// Store a lattice.
    pub fn add_lattice(&mut self, lattice: HexLattice) -> LatticeId {
        self.lattices.push(lattice);
        LatticeId(self.lattices.len() - 1)
    }

    /// Mark the top-level universe.
    pub fn set_root(&mut self, root: UniverseId) {
        self.root = Some(root);
    }

    /// Top-level universe, once assigned.
    #[must_use]
    pub fn root(&self) -> Option<UniverseId> {
        self.root
    }

    /// Look up a surface.
    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0)
    }

    /// Look up a universe.
    #[must_use]
    pub fn universe(&self, id: UniverseId) -> Option<&Universe> {
        self.universes.get(id.0)
    }

    /// Look up a lattice.
    #[must_use]
    pub fn lattice(&self, id: LatticeId) -> Option<&HexLattice> {
        self.lattices.get(id.0)
    }

    /// Number of stored surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Number of stored universes.
    #[must_use]
    pub fn universe_count(&self) -> usize {
        self.universes.len()
    }

    /// Number of cells across all universes.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.universes.iter().map(|u| u.cells.len()).sum()
    }

    /// Whether `point` lies in `region`.
    fn contains(&self, region: &Region, point: &Point3<f64>) -> bool {
        region.halfspaces().iter().all(|halfspace| {
            self.surface(halfspace.surface).is_some_and(|surface| {
                let value = surface.kind.evaluate(point);
                match halfspace.sense {
                    Sense::Negative => value < 0.0,
                    Sense::Positive => value > 0.0,
                }
            })
        })
    }

    /// Find the material (or void) at `point`, starting from the root universe.
    ///
    /// Returns `None` when the point is outside every root cell or lies exactly on a surface.
    #[must_use]
    pub fn locate(&self, point: Point3<f64>) -> Option<Medium> {
        self.locate_in(self.root?, point, 0)
    }

    /// Recursive step of [`Geometry::locate`].
    fn locate_in(&self, universe: UniverseId, point: Point3<f64>, depth: usize) -> Option<Medium> {
        if depth > MAX_DEPTH {
            return None;
        }
        let cell = self
            .universe(universe)?
            .cells
            .iter()
            .find(|cell| self.contains(&cell.region, &point))?;
        match cell.fill {
            Fill::Void => Some(Medium::Void),
            Fill::Material(material) => Some(Medium::Material(material)),
            Fill::Universe(inner) => self.locate_in(inner, point, depth + 1),
            Fill::Lattice(lattice) => {
                let lattice = self.lattice(lattice)?;
                let (unit, local) = lattice.resolve(Point2::new(point.x, point.y));
                self.locate_in(unit, Point3::new(local.x, local.y, point.z), depth + 1)
            }
        }
    }

    /// Directed graph of which universe or lattice is filled into which.
    ///
    /// Edges run from container to content; a lattice edge appears once per
    /// distinct universe it references.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when a fill or region references a missing entry.
    pub fn containment_graph(
        &self,
    ) -> Result<(DiGraph<Container, ()>, Vec<NodeIndex>), GeometryError> {
        let mut graph = DiGraph::new();
        let universe_nodes: Vec<NodeIndex> = (0..self.universes.len())
            .map(|idx| graph.add_node(Container::Universe(UniverseId(idx))))
            .collect();
        let lattice_nodes: Vec<NodeIndex> = (0..self.lattices.len())
            .map(|idx| graph.add_node(Container::Lattice(LatticeId(idx))))
            .collect();
        let universe_node = |id: UniverseId| {
            universe_nodes
                .get(id.0)
                .copied()
                .ok_or(GeometryError::UnknownUniverse(id.0))
        };

        for (idx, universe) in self.universes.iter().enumerate() {
            for cell in &universe.cells {
                if let Some(missing) = cell
                    .region
                    .halfspaces()
                    .iter()
                    .find(|h| self.surface(h.surface).is_none())
                {
                    return Err(GeometryError::UnknownSurface(missing.surface.0));
                }
                let target = match cell.fill {
                    Fill::Void | Fill::Material(_) => continue,
                    Fill::Universe(inner) => universe_node(inner)?,
                    Fill::Lattice(lattice) => *lattice_nodes
                        .get(lattice.0)
                        .ok_or(GeometryError::UnknownLattice(lattice.0))?,
                };
                graph.update_edge(universe_nodes[idx], target, ());
            }
        }
        for (idx, lattice) in self.lattices.iter().enumerate() {
            for unit in lattice.distinct_units() {
                graph.update_edge(lattice_nodes[idx], universe_node(unit)?, ());
            }
        }
        Ok((graph, universe_nodes))
    }

    /// Check references and tree shape.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] for dangling references, containment cycles or
    /// a missing root.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let root = self.root.ok_or(GeometryError::MissingRoot)?;
        if self.universe(root).is_none() {
            return Err(GeometryError::UnknownUniverse(root.0));
        }
        let (graph, _) = self.containment_graph()?;
        if is_cyclic_directed(&graph) {
            return Err(GeometryError::Cycle);
        }
        Ok(())
    }

    /// Universes reachable from the root, in depth-first order.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when the tree references missing entries.
    pub fn reachable_universes(&self) -> Result<Vec<UniverseId>, GeometryError> {
        let root = self.root.ok_or(GeometryError::MissingRoot)?;
        let (graph, universe_nodes) = self.containment_graph()?;
        let start = *universe_nodes
            .get(root.0)
            .ok_or(GeometryError::UnknownUniverse(root.0))?;
        let mut dfs = Dfs::new(&graph, start);
        let mut reached = Vec::new();
        while let Some(node) = dfs.next(&graph) {
            if let Container::Universe(id) = graph[node] {
                reached.push(id);
            }
        }
        Ok(reached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialRegistry;

    fn two_ring_geometry() -> (Geometry, MaterialId, MaterialId) {
        let registry = MaterialRegistry::reference();
        let fuel = registry.lookup("Fuel").expect("fuel");
        let water = registry.lookup("Mod").expect("water");
        let mut geometry = Geometry::new();
        let cylinder = geometry.add_surface(Surface::new(SurfaceKind::ZCylinder {
            x0: 0.0,
            y0: 0.0,
            r: 1.0,
        }));
        let mut inner = Universe::new("pin");
        inner.add_cell(Cell::new(Region::below(cylinder), Fill::Material(fuel)));
        inner.add_cell(Cell::new(Region::above(cylinder), Fill::Material(water)));
        let pin = geometry.add_universe(inner);
        let mut root = Universe::new("root");
        root.add_cell(Cell::new(Region::everywhere(), Fill::Universe(pin)));
        let root = geometry.add_universe(root);
        geometry.set_root(root);
        (geometry, fuel, water)
    }

    #[test]
    fn locates_points_through_nested_universes() {
        let (geometry, fuel, water) = two_ring_geometry();
        assert_eq!(
            geometry.locate(Point3::new(0.5, 0.0, 0.0)),
            Some(Medium::Material(fuel))
        );
        assert_eq!(
            geometry.locate(Point3::new(0.0, 1.5, 3.0)),
            Some(Medium::Material(water))
        );
    }

    #[test]
    fn valid_tree_passes_validation() {
        let (geometry, _, _) = two_ring_geometry();
        geometry.validate().expect("tree is well formed");
        let reached = geometry.reachable_universes().expect("reachable");
        assert_eq!(reached.len(), 2);
    }

    #[test]
    fn self_containing_universe_is_cyclic() {
        let mut geometry = Geometry::new();
        let mut looped = Universe::new("loop");
        looped.add_cell(Cell::new(Region::everywhere(), Fill::Universe(UniverseId(0))));
        let id = geometry.add_universe(looped);
        geometry.set_root(id);
        assert_eq!(geometry.validate(), Err(GeometryError::Cycle));
        assert_eq!(geometry.locate(Point3::origin()), None);
    }

    #[test]
    fn dangling_references_are_reported() {
        let mut geometry = Geometry::new();
        let mut broken = Universe::new("broken");
        broken.add_cell(Cell::new(Region::below(SurfaceId(7)), Fill::Void));
        let id = geometry.add_universe(broken);
        geometry.set_root(id);
        assert_eq!(geometry.validate(), Err(GeometryError::UnknownSurface(7)));

        let empty = Geometry::new();
        assert_eq!(empty.validate(), Err(GeometryError::MissingRoot));
    }

    #[test]
    fn plane_sign_convention() {
        let plane = SurfaceKind::Plane {
            a: 1.0,
            b: 1.0,
            c: 0.0,
            d: 1.0,
        };
        assert!(plane.evaluate(&Point3::origin()) < 0.0);
        assert!(plane.evaluate(&Point3::new(1.0, 1.0, 0.0)) > 0.0);
    }
}
