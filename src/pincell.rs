//! Fuel pins and guide tubes built from concentric rings.

use serde::Serialize;
use tracing::debug;

use crate::csg::{Cell, Fill, Geometry, Region, Surface, SurfaceKind, Universe, UniverseId};
use crate::errors::{BuildError, ConfigurationError};
use crate::gap::GapEquilibrium;
use crate::materials::{CladType, MaterialId, MaterialRegistry};
use crate::solver::RootFinder;

/// Registry name of the fuel material.
pub const FUEL: &str = "Fuel";
/// Registry name of the moderator.
pub const MODERATOR: &str = "Mod";
/// Registry name of the control rod absorber.
pub const POISON: &str = "Poison";
/// Registry name of the control rod cladding.
pub const ROD_CLAD: &str = "SS316";

/// Add a universe of concentric z-cylinders to `geometry`.
///
/// `fills[0]` occupies the inside of the first cylinder, `fills[i]` the ring
/// between cylinders `i − 1` and `i`, and the last fill everything outside the
/// last cylinder, so the rings tile the plane.
///
/// # Errors
///
/// Returns [`ConfigurationError::RingFillMismatch`] unless there is exactly one
/// more fill than radii, and [`ConfigurationError::NonIncreasingRadii`] unless the
/// radii are positive and strictly increasing.
pub fn concentric_universe(
    geometry: &mut Geometry,
    name: &str,
    radii: &[(f64, &str)],
    fills: &[(Fill, &str)],
) -> Result<UniverseId, ConfigurationError> {
    if fills.len() != radii.len() + 1 {
        return Err(ConfigurationError::RingFillMismatch {
            radii: radii.len(),
            fills: fills.len(),
            expected: radii.len() + 1,
        });
    }
    let mut previous = 0.0;
    for (index, &(radius, _)) in radii.iter().enumerate() {
        if !(radius > previous) {
            return Err(ConfigurationError::NonIncreasingRadii {
                index,
                radius,
                previous,
            });
        }
        previous = radius;
    }

    let surfaces: Vec<_> = radii
        .iter()
        .map(|&(r, label)| {
            let cylinder = SurfaceKind::ZCylinder { x0: 0.0, y0: 0.0, r };
            geometry.add_surface(Surface::new(cylinder).named(label))
        })
        .collect();
    let mut universe = Universe::new(name);
    for (index, &(fill, label)) in fills.iter().enumerate() {
        let region = match (index.checked_sub(1), surfaces.get(index)) {
            (None, Some(&outer)) => Region::below(outer),
            (Some(inner), Some(&outer)) => Region::between(surfaces[inner], outer),
            (Some(inner), None) => Region::above(surfaces[inner]),
            (None, None) => Region::everywhere(),
        };
        universe.add_cell(Cell::new(region, fill).named(label));
    }
    Ok(geometry.add_universe(universe))
}

/// Fuel pin: fuel, gas gap, cladding and surrounding moderator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pincell {
    /// Radius of the fuel pellet.
    fuel_radius: f64,
    /// Inner radius of the cladding.
    gap_radius: f64,
    /// Outer radius of the cladding.
    clad_radius: f64,
    /// Cladding alloy.
    clad_type: CladType,
    /// Fuel material.
    fuel: MaterialId,
    /// Gap fill; `None` leaves the gap void.
    gap: Option<MaterialId>,
    /// Cladding material.
    clad: MaterialId,
    /// Moderator surrounding the pin.
    moderator: MaterialId,
}

impl Pincell {
    /// Size a pin for `fuel_radius` and resolve its materials.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when a material is missing from `registry` or the gap
    /// balance cannot be solved.
    pub fn new(
        fuel_radius: f64,
        clad_type: CladType,
        registry: &MaterialRegistry,
        balance: &GapEquilibrium,
        solver: &dyn RootFinder,
    ) -> Result<Self, BuildError> {
        let fuel = registry.lookup(FUEL)?;
        let clad = registry.lookup(clad_type.material_name())?;
        let moderator = registry.lookup(MODERATOR)?;
        let gap_radius = balance.solve(fuel_radius, solver)?;
        let clad_radius = clad_type.thickness_ratio() * gap_radius;
        debug!(fuel_radius, gap_radius, clad_radius, clad = %clad_type, "pincell sized");
        Ok(Self {
            fuel_radius,
            gap_radius,
            clad_radius,
            clad_type,
            fuel,
            gap: None,
            clad,
            moderator,
        })
    }

    /// Radius of the fuel pellet.
    #[must_use]
    pub fn fuel_radius(&self) -> f64 {
        self.fuel_radius
    }

    /// Inner radius of the cladding.
    #[must_use]
    pub fn gap_radius(&self) -> f64 {
        self.gap_radius
    }

    /// Outer radius of the cladding.
    #[must_use]
    pub fn clad_radius(&self) -> f64 {
        self.clad_radius
    }

    /// Cladding alloy.
    #[must_use]
    pub fn clad_type(&self) -> CladType {
        self.clad_type
    }

    /// Add the pin universe to `geometry`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NonIncreasingRadii`] if the radii are not ordered.
    pub fn build(&self, geometry: &mut Geometry) -> Result<UniverseId, ConfigurationError> {
        let gap_fill = self.gap.map_or(Fill::Void, Fill::Material);
        concentric_universe(
            geometry,
            "Pincell",
            &[
                (self.fuel_radius, "Fuel Cylinder"),
                (self.gap_radius, "Gap Cylinder"),
                (self.clad_radius, "Clad Cylinder"),
            ],
            &[
                (Fill::Material(self.fuel), "Fuel"),
                (gap_fill, "Gap"),
                (Fill::Material(self.clad), "Clad"),
                (Fill::Material(self.moderator), "Moderator"),
            ],
        )
    }
}

/// Control rod occupying a guide tube.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RodFill {
    /// Radius of the absorber pin.
    pub poison_radius: f64,
    /// Outer radius of the absorber cladding.
    pub poison_clad_radius: f64,
    /// Absorber material.
    pub poison: MaterialId,
    /// Absorber cladding material.
    pub poison_clad: MaterialId,
    /// Moderator between the rod and the tube wall.
    pub fill: MaterialId,
}

/// Lattice position that replaces a fuel pin with a water or rod channel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GuideTube {
    /// Inner radius of the tube wall.
    inner_radius: f64,
    /// Outer radius of the tube wall.
    outer_radius: f64,
    /// Tube wall material.
    clad: MaterialId,
    /// Moderator inside and around the tube.
    moderator: MaterialId,
    /// Control rod, if the tube is rodded.
    rod: Option<RodFill>,
}

impl GuideTube {
    /// Derive a guide tube from the pin it replaces.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownMaterial`] when a rod material is not registered.
    pub fn new(
        host: &Pincell,
        rodded: bool,
        registry: &MaterialRegistry,
    ) -> Result<Self, ConfigurationError> {
        let inner_radius = host.clad_radius;
        let rod = if rodded {
            Some(RodFill {
                poison_radius: host.fuel_radius,
                poison_clad_radius: host.gap_radius,
                poison: registry.lookup(POISON)?,
                poison_clad: registry.lookup(ROD_CLAD)?,
                fill: host.moderator,
            })
        } else {
            None
        };
        Ok(Self {
            inner_radius,
            outer_radius: host.clad_type.thickness_ratio() * inner_radius,
            clad: host.clad,
            moderator: host.moderator,
            rod,
        })
    }

    /// Inner radius of the tube wall.
    #[must_use]
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Outer radius of the tube wall.
    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Control rod, if any.
    #[must_use]
    pub fn rod(&self) -> Option<&RodFill> {
        self.rod.as_ref()
    }

    /// Add the guide tube universe (and its rod universe, if rodded) to `geometry`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NonIncreasingRadii`] if the radii are not ordered.
    pub fn build(&self, geometry: &mut Geometry) -> Result<UniverseId, ConfigurationError> {
        let inside = match &self.rod {
            Some(rod) => Fill::Universe(concentric_universe(
                geometry,
                "Control rod",
                &[
                    (rod.poison_radius, "Poison Cylinder"),
                    (rod.poison_clad_radius, "Poison Clad Cylinder"),
                ],
                &[
                    (Fill::Material(rod.poison), "Poison"),
                    (Fill::Material(rod.poison_clad), "Poison Clad"),
                    (Fill::Material(rod.fill), "Rod Moderator"),
                ],
            )?),
            None => Fill::Material(self.moderator),
        };
        concentric_universe(
            geometry,
            "Guide tube",
            &[
                (self.inner_radius, "Guide Tube Inner Cylinder"),
                (self.outer_radius, "Guide Tube Outer Cylinder"),
            ],
            &[
                (inside, "Inside Tube"),
                (Fill::Material(self.clad), "Tube Wall"),
                (Fill::Material(self.moderator), "Moderator"),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use super::*;
    use crate::csg::Medium;
    use crate::solver::NewtonSolver;

    fn reference_pin(fuel_radius: f64, clad: CladType) -> (Pincell, MaterialRegistry) {
        let registry = MaterialRegistry::reference();
        let pin = Pincell::new(
            fuel_radius,
            clad,
            &registry,
            &GapEquilibrium::default(),
            &NewtonSolver::default(),
        )
        .expect("reference pin sizes");
        (pin, registry)
    }

    fn root_at(geometry: &mut Geometry, universe: UniverseId) {
        let mut root = Universe::new("root");
        root.add_cell(Cell::new(Region::everywhere(), Fill::Universe(universe)));
        let root = geometry.add_universe(root);
        geometry.set_root(root);
    }

    #[test]
    fn clad_radius_follows_thickness_ratio() {
        for clad in CladType::ALL {
            let (pin, _) = reference_pin(1.0, clad);
            assert!(pin.fuel_radius() < pin.gap_radius());
            assert!(pin.gap_radius() < pin.clad_radius());
            assert_eq!(pin.clad_radius(), clad.thickness_ratio() * pin.gap_radius());
        }
    }

    #[test]
    fn reference_scenario_radii() {
        let (pin, _) = reference_pin(1.0, CladType::Zr4);
        assert!(pin.gap_radius() > 1.0914);
        assert_relative_eq!(pin.clad_radius(), 1.07 * pin.gap_radius(), epsilon = 1.0e-12);
    }

    #[test]
    fn pin_rings_tile_the_plane() {
        let (pin, registry) = reference_pin(2.0, CladType::Zr4);
        let mut geometry = Geometry::new();
        let universe = pin.build(&mut geometry).expect("pin builds");
        root_at(&mut geometry, universe);
        let fuel = registry.lookup("Fuel").expect("fuel");
        let clad = registry.lookup("Zr4").expect("clad");
        let water = registry.lookup("Mod").expect("water");
        let at = |r: f64| geometry.locate(Point3::new(r, 0.0, 0.0));
        assert_eq!(at(0.5), Some(Medium::Material(fuel)));
        assert_eq!(at(0.5 * (pin.fuel_radius() + pin.gap_radius())), Some(Medium::Void));
        assert_eq!(
            at(0.5 * (pin.gap_radius() + pin.clad_radius())),
            Some(Medium::Material(clad))
        );
        assert_eq!(at(pin.clad_radius() + 0.1), Some(Medium::Material(water)));
    }

    #[test]
    fn guide_tube_wall_wraps_host_clad() {
        let (pin, registry) = reference_pin(2.25, CladType::Ss316);
        let tube = GuideTube::new(&pin, false, &registry).expect("tube");
        assert_eq!(tube.inner_radius(), pin.clad_radius());
        assert_relative_eq!(tube.outer_radius(), 1.05 * pin.clad_radius(), epsilon = 1.0e-12);
        assert!(tube.rod().is_none());

        let mut geometry = Geometry::new();
        let universe = tube.build(&mut geometry).expect("tube builds");
        root_at(&mut geometry, universe);
        let water = registry.lookup("Mod").expect("water");
        assert_eq!(
            geometry.locate(Point3::new(0.1, 0.0, 0.0)),
            Some(Medium::Material(water))
        );
    }

    #[test]
    fn rodded_guide_tube_holds_absorber() {
        let (pin, registry) = reference_pin(2.0, CladType::Zr4);
        let tube = GuideTube::new(&pin, true, &registry).expect("tube");
        let rod = *tube.rod().expect("rodded");
        assert_eq!(rod.poison_radius, pin.fuel_radius());
        assert_eq!(rod.poison_clad_radius, pin.gap_radius());

        let mut geometry = Geometry::new();
        let universe = tube.build(&mut geometry).expect("tube builds");
        root_at(&mut geometry, universe);
        geometry.validate().expect("nested rod universe is a tree");
        let at = |r: f64| geometry.locate(Point3::new(0.0, r, 1.0));
        assert_eq!(at(0.5), Some(Medium::Material(rod.poison)));
        assert_eq!(
            at(0.5 * (pin.fuel_radius() + pin.gap_radius())),
            Some(Medium::Material(rod.poison_clad))
        );
        assert_eq!(
            at(0.5 * (pin.gap_radius() + tube.inner_radius())),
            Some(Medium::Material(rod.fill))
        );
        let wall = registry.lookup("Zr4").expect("clad");
        assert_eq!(
            at(0.5 * (tube.inner_radius() + tube.outer_radius())),
            Some(Medium::Material(wall))
        );
    }

    #[test]
    fn rod_needs_registered_poison() {
        let (pin, _) = reference_pin(1.0, CladType::Zr4);
        let mut registry = MaterialRegistry::new();
        registry.register("Mod", "water", 1.0);
        let error = GuideTube::new(&pin, true, &registry).expect_err("no poison registered");
        assert_eq!(error, ConfigurationError::UnknownMaterial("Poison".to_owned()));
    }

    #[test]
    fn concentric_rings_require_increasing_radii() {
        let mut geometry = Geometry::new();
        let error = concentric_universe(
            &mut geometry,
            "bad",
            &[(1.0, "a"), (1.0, "b")],
            &[(Fill::Void, "x"), (Fill::Void, "y"), (Fill::Void, "z")],
        )
        .expect_err("equal radii rejected");
        assert!(matches!(
            error,
            ConfigurationError::NonIncreasingRadii { index: 1, .. }
        ));

        let mismatch =
            concentric_universe(&mut geometry, "bad", &[(1.0, "a")], &[(Fill::Void, "x")])
                .expect_err("missing outer fill");
        assert!(matches!(mismatch, ConfigurationError::RingFillMismatch { .. }));
    }
}
