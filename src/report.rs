//! Plain-text reports for the command line.

use std::fmt::Write;

use crate::config::SliceKind;
use crate::slice::SliceSummary;
use crate::stress::SizedVessel;
use crate::sweep::{SweepGrid, SweepResult};

/// Render a textual summary of a built core slice.
///
/// Lengths are printed in centimetres so they can be compared directly with
/// the dimensions handed to the transport engine.
#[must_use]
pub fn render_slice(summary: &SliceSummary) -> String {
    let mut output = String::new();
    let kind = match summary.kind {
        SliceKind::TwoD => "2-D slice",
        SliceKind::ThreeD => "3-D core",
    };

    // Name the scenario first so batch output can be told apart.
    writeln!(
        &mut output,
        "{} ({kind}, pitch = {:.2} cm, {} rings)",
        summary.name, summary.pitch, summary.rings
    )
    .expect("writing to string cannot fail");

    // The gap radius comes from the pressure balance and the clad radius is a
    // fixed multiple of it, so printing all three lets the reader check both.
    writeln!(
        &mut output,
        "Pincell: fuel = {:.4} cm, gap = {:.4} cm, clad = {:.4} cm",
        summary.fuel_radius, summary.gap_radius, summary.clad_radius
    )
    .expect("writing to string cannot fail");

    // Guide tubes share the pincell radii; only their fill changes.
    let contents = if summary.rodded { "control rod" } else { "water" };
    writeln!(
        &mut output,
        "Guide tubes: {} of {} positions, outer radius = {:.4} cm, filled with {contents}",
        summary.guide_tubes, summary.positions, summary.guide_tube_radius
    )
    .expect("writing to string cannot fail");

    // Offsets are perpendicular distances from the lattice centre to the flat
    // containment planes.
    writeln!(
        &mut output,
        "Containment offsets: fueled = {:.3} cm, wall = {:.3}..{:.3} cm",
        summary.containment.fueled, summary.containment.inner_wall, summary.containment.outer_wall
    )
    .expect("writing to string cannot fail");

    // The 2-D slab has no end cap, so only the outer planes are reported.
    let axial = match summary.axial.fuel_top {
        Some(fuel_top) => writeln!(
            &mut output,
            "Axial planes: z = {:.1} / {fuel_top:.1} / {:.1} cm",
            summary.axial.bottom, summary.axial.top
        ),
        None => writeln!(
            &mut output,
            "Axial planes: z = {:.1} / {:.1} cm (periodic)",
            summary.axial.bottom, summary.axial.top
        ),
    };
    axial.expect("writing to string cannot fail");

    // Entity counts are a quick sanity check against the exported tree.
    writeln!(
        &mut output,
        "Geometry: {} surfaces, {} universes, {} cells",
        summary.surfaces, summary.universes, summary.cells
    )
    .expect("writing to string cannot fail");

    output
}

/// Render the result of a containment wall sizing.
#[must_use]
pub fn render_vessel(sized: &SizedVessel) -> String {
    let mut output = String::new();
    let vessel = &sized.vessel;
    let stresses = &sized.stresses;

    // The hexagonal vessel is replaced by the circle of equal area, so the
    // radius printed here is not the major radius of the hexagon.
    writeln!(
        &mut output,
        "Vessel: equivalent radius = {:.3} cm, p_in = {:.2} MPa, p_out = {:.2} MPa",
        vessel.mean_radius, vessel.internal_pressure, vessel.external_pressure
    )
    .expect("writing to string cannot fail");

    writeln!(
        &mut output,
        "Wall thickness: {:.3} cm (allowable stress = {:.1} MPa)",
        vessel.wall_thickness, sized.allowable_stress
    )
    .expect("writing to string cannot fail");

    // Principal stresses carry their sign; compression is negative.
    writeln!(
        &mut output,
        "Stresses: radial = {:+.2}, hoop = {:+.2}, axial = {:+.2} MPa",
        stresses.radial, stresses.hoop, stresses.axial
    )
    .expect("writing to string cannot fail");

    // The wall is sized on the larger of the two equivalent stresses.
    writeln!(
        &mut output,
        "Equivalent: Tresca = {:.2} MPa, von Mises = {:.2} MPa",
        stresses.tresca, stresses.von_mises
    )
    .expect("writing to string cannot fail");

    output
}

/// Render one line per sweep point, failed points marked as such.
#[must_use]
pub fn render_sweep(grid: &SweepGrid, result: &SweepResult) -> String {
    let mut output = String::new();
    output.push_str("p_fill [MPa]  r_fuel [cm]  t/r_gap  max stress [MPa]\n");
    // Failed points stay in the table so the grid keeps its shape.
    for (point, stress) in result.rows(grid) {
        let stress = stress.map_or_else(|| "failed".to_owned(), |value| format!("{value:.2}"));
        writeln!(
            &mut output,
            "{:>12.3}  {:>11.3}  {:>7.3}  {stress:>16}",
            point.fill_pressure, point.fuel_radius, point.thickness_ratio
        )
        .expect("writing to string cannot fail");
    }
    writeln!(
        &mut output,
        "{} point(s) failed",
        result.failures.len()
    )
    .expect("writing to string cannot fail");
    output
}
