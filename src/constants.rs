//! Reference dimensions and operating conditions.
//!
//! Lengths are in centimetres and pressures in megapascals.

use std::f64::consts::PI;

/// Moderator (and coolant) pressure.
pub const PRESSURE_MOD: f64 = 10.0;
/// Fill-gas pressure in the gap once the fuel has swollen.
pub const PRESSURE_GAP: f64 = 5.0;
/// Pressure outside the containment vessel.
pub const PRESSURE_AMBIENT: f64 = 0.1;

/// Fractional growth of the fuel volume (30 % swelling).
pub const FUEL_EXPANSION: f64 = 1.3;

/// Flat-to-flat width of the hexagonal core.
pub const WIDTH: f64 = 240.0;
/// Thickness of the structural steel wall.
pub const STEEL_THICK: f64 = 11.0;
/// Major radius of the hexagonal vessel.
pub const RAD_MAJ: f64 = WIDTH / 2.0;
/// Height of the 2-D slice, centred on `z = 0`.
pub const SLICE_HEIGHT_2D: f64 = 20.0;
/// Number of rings in the reference lattice.
pub const REFERENCE_RINGS: usize = 14;
/// Initial guess for the containment wall thickness.
pub const VESSEL_THICKNESS_GUESS: f64 = 20.0;

/// Linear growth factor of the fuel radius for a fractional volume growth.
#[must_use]
pub fn growth_factor(volume_expansion: f64) -> f64 {
    volume_expansion.cbrt()
}

/// Minor radius (apothem) of a hexagon with the given major radius.
#[must_use]
pub fn minor_radius(major_radius: f64) -> f64 {
    major_radius / 3f64.sqrt()
}

/// Area of a regular hexagon with the given circumradius.
#[must_use]
pub fn hexagon_area(major_radius: f64) -> f64 {
    1.5 * 3f64.sqrt() * major_radius * major_radius
}

/// Radius of the circle with the same area as a hexagon of the given circumradius.
#[must_use]
pub fn equivalent_radius(major_radius: f64) -> f64 {
    (hexagon_area(major_radius) / PI).sqrt()
}
