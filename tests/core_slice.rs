#![warn(clippy::pedantic)]

use std::io::Write;

use approx::assert_relative_eq;
use hexslice::{
    build_batch, BuildError, CladType, ConfigurationError, CoreSlice, GapEquilibrium,
    GuideTubeLayout, HexPosition, MaterialRegistry, Medium, ScenarioConfig, SliceKind,
    SymmetryPolicy,
};
use nalgebra::Point3;

#[derive(Debug, Clone, Copy)]
struct Probe {
    x: f64,
    y: f64,
    z: f64,
    material: Option<&'static str>,
}

const fn probe(x: f64, y: f64, z: f64, material: Option<&'static str>) -> Probe {
    Probe { x, y, z, material }
}

fn build(config: &ScenarioConfig) -> (CoreSlice, MaterialRegistry) {
    let registry = MaterialRegistry::reference();
    let slice = CoreSlice::build(config, &registry).expect("reference scenario builds");
    (slice, registry)
}

fn assert_probes(slice: &CoreSlice, registry: &MaterialRegistry, probes: &[Probe]) {
    for probe in probes {
        let expected = probe.material.map(|name| {
            Medium::Material(registry.lookup(name).expect("probe material is registered"))
        });
        let found = slice
            .geometry()
            .locate(Point3::new(probe.x, probe.y, probe.z));
        assert_eq!(found, expected, "unexpected medium at {probe:?}");
    }
}

#[test]
fn two_dimensional_slice_matches_reference_layout() {
    let (slice, registry) = build(&ScenarioConfig::reference_2d());

    assert_eq!(slice.kind(), SliceKind::TwoD);
    assert_eq!(slice.layout(), &GuideTubeLayout::reference_2d());
    let lattice = slice.lattice().expect("lattice stored in the geometry");
    assert_eq!(lattice.ring_count(), 14);
    assert_relative_eq!(lattice.center().y, -104.0, epsilon = 1.0e-12);
    // The centre of the 2-D lattice is a guide tube.
    assert_ne!(lattice.unit_at(HexPosition::CENTER), Some(lattice.outer()));

    assert_probes(
        &slice,
        &registry,
        &[
            probe(0.1, -1.0, 0.0, Some("Poison")),
            probe(0.3, -8.0, 5.0, Some("Fuel")),
            probe(2.4, -8.0, -5.0, Some("Zr4")),
            probe(0.5, -104.5, 0.0, Some("Mod")),
            probe(0.5, -112.0, 0.0, Some("SS316")),
            probe(5.0, -119.0, 0.0, Some("Air")),
            probe(-0.5, -50.0, 0.0, None),
        ],
    );
}

#[test]
fn three_dimensional_slice_stacks_fuel_under_end_cap() {
    let (slice, registry) = build(&ScenarioConfig::reference_3d());

    assert_eq!(slice.axial().fuel_top, Some(229.0));
    assert_eq!(slice.pincell().clad_type(), CladType::Ss316);
    let lattice = slice.lattice().expect("lattice stored in the geometry");
    assert_eq!(lattice.unit_at(HexPosition::CENTER), Some(lattice.outer()));

    assert_probes(
        &slice,
        &registry,
        &[
            probe(0.3, -9.8, 1.0, Some("Fuel")),
            probe(0.3, -9.8, 228.0, Some("Fuel")),
            probe(0.3, -9.8, 230.0, Some("SS316")),
            probe(0.1, -1.0, 100.0, Some("Mod")),
            probe(0.3, -9.8, 241.0, None),
        ],
    );
}

#[test]
fn every_universe_is_reachable_from_the_root() {
    let (slice, _) = build(&ScenarioConfig::reference_3d());
    let geometry = slice.geometry();
    geometry.validate().expect("tree is valid");
    let reachable = geometry.reachable_universes().expect("tree is valid");
    assert_eq!(reachable.len(), geometry.universe_count());
}

#[test]
fn scenario_file_drives_the_build() {
    let mut file = tempfile::NamedTempFile::new().expect("temporary scenario file");
    write!(
        file,
        r#"{{
            "name": "custom",
            "kind": "3d",
            "fuel_radius": 1.5,
            "pitch": 6.0,
            "clad": "Zr4",
            "rodded": true,
            "rings": 6,
            "guide_tubes": [{{ "ring": 2, "position": 0 }}],
            "symmetry": "expand"
        }}"#
    )
    .expect("scenario written");

    let config = ScenarioConfig::from_file(file.path()).expect("scenario loads");
    let (slice, _) = build(&config);
    let summary = slice.summary();
    assert_eq!(summary.name, "custom");
    assert_eq!(summary.rings, 6);
    assert_eq!(summary.guide_tubes, 6);
    assert!(summary.rodded);
    assert!(slice.layout().is_symmetric());
}

#[test]
fn serialized_slice_names_its_boundaries() {
    let (slice, _) = build(&ScenarioConfig::reference_2d());
    let json = serde_json::to_string(&slice).expect("slice serializes");
    for label in ["Fueled Boundary", "Inner Wall", "Outer Wall", "Sector Edge"] {
        assert!(json.contains(label), "missing {label}");
    }
    assert!(json.contains("\"periodic\""));
}

#[test]
fn batch_reports_each_scenario() {
    let strict = ScenarioConfig {
        name: "strict".to_owned(),
        symmetry: SymmetryPolicy::Strict,
        ..ScenarioConfig::reference_3d()
    };
    let no_swelling = ScenarioConfig {
        name: "no-swelling".to_owned(),
        balance: GapEquilibrium {
            growth_factor: 1.0,
            ..GapEquilibrium::default()
        },
        ..ScenarioConfig::reference_2d()
    };
    let outcomes = build_batch(
        &[strict, ScenarioConfig::reference_2d(), no_swelling],
        &MaterialRegistry::reference(),
    );

    let names: Vec<&str> = outcomes.iter().map(|outcome| outcome.name.as_str()).collect();
    assert_eq!(names, ["strict", "reference-2d", "no-swelling"]);
    assert!(matches!(
        outcomes[0].result,
        Err(BuildError::Configuration(ConfigurationError::AsymmetricLayout { .. }))
    ));
    assert!(outcomes[1].result.is_ok());
    assert!(matches!(outcomes[2].result, Err(BuildError::Domain(_))));
}
