//! Hexagonal lattice indexing, guide tube layouts and lattice assembly.
//!
//! Rings are counted outward from the centre: ring 0 holds one position and
//! ring `k ≥ 1` holds `6k`. Within a ring, position 0 sits directly above the
//! centre and indices advance clockwise, so a rotation by one sixth of a turn
//! maps index `i` to `i + k` and a reflection about the vertical axis maps it
//! to `6k − i`.

use std::collections::{BTreeSet, HashSet};

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::csg::UniverseId;
use crate::errors::ConfigurationError;

/// Number of positions in ring `ring`.
///
/// # Examples
/// ```
/// use hexslice::lattice::ring_size;
///
/// assert_eq!(ring_size(0), 1);
/// assert_eq!(ring_size(3), 18);
/// ```
#[must_use]
pub const fn ring_size(ring: usize) -> usize {
    if ring == 0 {
        1
    } else {
        6 * ring
    }
}

/// Number of positions in a lattice of `rings` rings, `1 + 3R(R−1)`.
#[must_use]
pub const fn total_positions(rings: usize) -> usize {
    if rings == 0 {
        0
    } else {
        1 + 3 * rings * (rings - 1)
    }
}

/// Corner directions of a ring in axial `(q, r)` coordinates, clockwise from the top.
const CORNERS: [(i64, i64); 6] = [(0, 1), (1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1)];

/// A `(ring, position)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexPosition {
    /// Ring index, counted outward from the centre.
    pub ring: usize,
    /// Index within the ring, clockwise from the top.
    pub position: usize,
}

impl HexPosition {
    /// The centre position.
    pub const CENTER: HexPosition = HexPosition::new(0, 0);

    /// Create a position without validation.
    #[must_use]
    pub const fn new(ring: usize, position: usize) -> Self {
        Self { ring, position }
    }

    /// Check the position against a lattice of `rings` rings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::PositionOutOfRange`] when the ring does not
    /// exist or the index exceeds the ring size.
    pub fn validate(self, rings: usize) -> Result<(), ConfigurationError> {
        if self.ring >= rings || self.position >= ring_size(self.ring) {
            return Err(ConfigurationError::PositionOutOfRange {
                ring: self.ring,
                position: self.position,
                rings,
            });
        }
        Ok(())
    }

    /// Position reached by `turns` clockwise sixth-turns about the centre.
    #[must_use]
    pub fn rotated(self, turns: usize) -> Self {
        if self.ring == 0 {
            return self;
        }
        let size = ring_size(self.ring);
        Self::new(self.ring, (self.position + turns * self.ring) % size)
    }

    /// Mirror image about the vertical axis through the centre.
    #[must_use]
    pub fn mirrored(self) -> Self {
        if self.ring == 0 {
            return self;
        }
        let size = ring_size(self.ring);
        Self::new(self.ring, (size - self.position % size) % size)
    }

    /// Every image under the twelve rotations and reflections of the hexagon.
    ///
    /// The result is sorted and free of duplicates; it always contains `self`.
    #[must_use]
    pub fn symmetric_images(self) -> Vec<HexPosition> {
        let images: BTreeSet<HexPosition> = (0..6)
            .flat_map(|turns| [self.rotated(turns), self.mirrored().rotated(turns)])
            .collect();
        images.into_iter().collect()
    }

    /// Axial coordinates `(q, r)` relative to the centre, or `None` when the
    /// index does not exist in its ring.
    #[must_use]
    pub fn axial(self) -> Option<(i64, i64)> {
        if self.ring == 0 {
            return (self.position == 0).then_some((0, 0));
        }
        let k = i64::try_from(self.ring).ok()?;
        let side = self.position / self.ring;
        let step = i64::try_from(self.position % self.ring).ok()?;
        let (cq, cr) = *CORNERS.get(side)?;
        let (nq, nr) = CORNERS[(side + 1) % 6];
        Some((k * cq + step * (nq - cq), k * cr + step * (nr - cr)))
    }

    /// Inverse of [`HexPosition::axial`]; `None` when the coordinates lie too
    /// far out to index.
    #[must_use]
    pub fn from_axial(q: i64, r: i64) -> Option<Self> {
        let ring = q
            .checked_abs()?
            .max(r.checked_abs()?)
            .max(q.checked_add(r)?.checked_abs()?);
        if ring == 0 {
            return Some(Self::CENTER);
        }
        let width = usize::try_from(ring).ok()?;
        for (side, &(cq, cr)) in CORNERS.iter().enumerate() {
            let (nq, nr) = CORNERS[(side + 1) % 6];
            let (dq, dr) = (nq - cq, nr - cr);
            let (oq, or) = (q.checked_sub(ring * cq)?, r.checked_sub(ring * cr)?);
            // Offset along the side, read from whichever component moves.
            let step = if dq != 0 { oq / dq } else { or / dr };
            if (0..ring).contains(&step) && oq == step * dq && or == step * dr {
                let step = usize::try_from(step).ok()?;
                return Some(Self::new(width, side.checked_mul(width)?.checked_add(step)?));
            }
        }
        None
    }

    /// Offset of the position centre from the lattice centre, or `None` when
    /// the index does not exist in its ring.
    #[must_use]
    pub fn offset(self, pitch: f64) -> Option<Vector2<f64>> {
        let (q, r) = self.axial()?;
        Some(axial_to_cartesian(q as f64, r as f64, pitch))
    }
}

/// Cartesian offset of fractional axial coordinates.
fn axial_to_cartesian(q: f64, r: f64, pitch: f64) -> Vector2<f64> {
    Vector2::new(q * pitch * 3f64.sqrt() / 2.0, q * pitch / 2.0 + r * pitch)
}

/// Nearest lattice point to a Cartesian offset, in rounded axial coordinates.
fn nearest_axial(offset: Vector2<f64>, pitch: f64) -> (f64, f64) {
    let q = offset.x / (pitch * 3f64.sqrt() / 2.0);
    let r = (offset.y - q * pitch / 2.0) / pitch;
    let s = -q - r;
    let (mut rq, mut rr, rs) = (q.round(), r.round(), s.round());
    let (dq, dr, ds) = ((rq - q).abs(), (rr - r).abs(), (rs - s).abs());
    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq, rr)
}

/// How a guide tube layout is checked against the lattice symmetry group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymmetryPolicy {
    /// Use the layout as listed and log any missing images.
    #[default]
    Explicit,
    /// Close the layout under the symmetry group before use.
    Expand,
    /// Reject layouts that are not closed under the symmetry group.
    Strict,
}

/// Set of lattice positions occupied by guide tubes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GuideTubeLayout {
    /// Number of rings the positions were validated against.
    rings: usize,
    /// Occupied positions.
    positions: BTreeSet<HexPosition>,
}

impl GuideTubeLayout {
    /// Layout taken verbatim from `positions`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::PositionOutOfRange`] for an invalid position
    /// and [`ConfigurationError::DuplicateOverride`] for a repeated one.
    pub fn explicit(
        rings: usize,
        positions: impl IntoIterator<Item = HexPosition>,
    ) -> Result<Self, ConfigurationError> {
        if rings == 0 {
            return Err(ConfigurationError::EmptyLattice);
        }
        let mut layout = Self {
            rings,
            positions: BTreeSet::new(),
        };
        for position in positions {
            position.validate(rings)?;
            if !layout.positions.insert(position) {
                return Err(ConfigurationError::DuplicateOverride {
                    ring: position.ring,
                    position: position.position,
                });
            }
        }
        Ok(layout)
    }

    /// Layout generated from canonical positions and all of their symmetric images.
    ///
    /// # Errors
    ///
    /// Same as [`GuideTubeLayout::explicit`], applied to the canonical list.
    pub fn symmetric(
        rings: usize,
        canonical: impl IntoIterator<Item = HexPosition>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::explicit(rings, canonical)?.expanded())
    }

    /// Closure of this layout under the symmetry group.
    #[must_use]
    pub fn expanded(&self) -> Self {
        Self {
            rings: self.rings,
            positions: self
                .positions
                .iter()
                .flat_map(|position| position.symmetric_images())
                .collect(),
        }
    }

    /// Symmetric images of listed positions that the layout does not contain.
    #[must_use]
    pub fn missing_images(&self) -> Vec<HexPosition> {
        self.expanded()
            .positions
            .difference(&self.positions)
            .copied()
            .collect()
    }

    /// Whether the layout is closed under the symmetry group.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.missing_images().is_empty()
    }

    /// Apply a [`SymmetryPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::AsymmetricLayout`] under
    /// [`SymmetryPolicy::Strict`] when images are missing.
    pub fn with_policy(self, policy: SymmetryPolicy) -> Result<Self, ConfigurationError> {
        match policy {
            SymmetryPolicy::Explicit => Ok(self),
            SymmetryPolicy::Expand => Ok(self.expanded()),
            SymmetryPolicy::Strict => match self.missing_images().len() {
                0 => Ok(self),
                missing => Err(ConfigurationError::AsymmetricLayout { missing }),
            },
        }
    }

    /// Whether `position` holds a guide tube.
    #[must_use]
    pub fn contains(&self, position: HexPosition) -> bool {
        self.positions.contains(&position)
    }

    /// Number of guide tube positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the layout has no guide tubes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Ring count the layout was validated against.
    #[must_use]
    pub fn rings(&self) -> usize {
        self.rings
    }

    /// Guide tube positions in ring-major order.
    pub fn iter(&self) -> impl Iterator<Item = HexPosition> + '_ {
        self.positions.iter().copied()
    }

    /// Guide tube layout of the reference 2-D slice.
    ///
    /// Positions are listed for one sector only, exactly as surveyed.
    #[must_use]
    pub fn reference_2d() -> Self {
        Self::from_survey(&[
            (0, 0),
            // centre row
            (13, 39),
            (9, 27),
            (5, 15),
            (4, 0),
            (9, 0),
            (13, 0),
            // next row
            (13, 35),
            (9, 23),
            (4, 4),
            (5, 11),
            (9, 4),
            // another row
            (13, 31),
            (9, 19),
            (8, 13),
            // corner
            (13, 26),
        ])
    }

    /// Guide tube layout of the reference 3-D slice; the centre holds a fuel pin.
    #[must_use]
    pub fn reference_3d() -> Self {
        Self::from_survey(&[
            // centre row
            (13, 39),
            (10, 30),
            (7, 21),
            (4, 12),
            (1, 3),
            (1, 0),
            (4, 0),
            (7, 0),
            (10, 0),
            (13, 0),
            // next row
            (13, 36),
            (10, 27),
            (7, 18),
            (4, 9),
            (3, 4),
            (4, 3),
            (7, 3),
            (10, 3),
            // another row
            (13, 33),
            (10, 24),
            (7, 15),
            (6, 10),
            (7, 6),
            (10, 6),
            (13, 6),
            // another row
            (13, 30),
            (10, 21),
            (9, 16),
            (9, 14),
            (10, 9),
            (13, 9),
            // corner
            (13, 26),
        ])
    }

    /// Build a layout from a fixed survey table known to be in range and unique.
    fn from_survey(survey: &[(usize, usize)]) -> Self {
        Self {
            rings: crate::constants::REFERENCE_RINGS,
            positions: survey
                .iter()
                .map(|&(ring, position)| HexPosition::new(ring, position))
                .collect(),
        }
    }
}

/// Hexagonal lattice of universes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HexLattice {
    /// Centre-to-centre distance between neighbouring positions.
    pitch: f64,
    /// Location of the central position.
    center: [f64; 2],
    /// Universes per ring, ring 0 first.
    rings: Vec<Vec<UniverseId>>,
    /// Universe used outside the listed rings.
    outer: UniverseId,
}

impl HexLattice {
    /// Lattice of `rings` rings filled with `default_unit`, except for the
    /// guide tube positions which receive `guide_tube`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for a non-positive pitch, zero rings, or a
    /// layout validated against more rings than the lattice has.
    pub fn assemble(
        pitch: f64,
        rings: usize,
        center: Point2<f64>,
        default_unit: UniverseId,
        guide_tube: UniverseId,
        layout: &GuideTubeLayout,
    ) -> Result<Self, ConfigurationError> {
        if pitch <= 0.0 || !pitch.is_finite() {
            return Err(ConfigurationError::NonPositive {
                name: "pitch",
                value: pitch,
            });
        }
        if rings == 0 {
            return Err(ConfigurationError::EmptyLattice);
        }
        for position in layout.iter() {
            position.validate(rings)?;
        }
        let rings = (0..rings)
            .map(|ring| {
                (0..ring_size(ring))
                    .map(|position| {
                        if layout.contains(HexPosition::new(ring, position)) {
                            guide_tube
                        } else {
                            default_unit
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(Self {
            pitch,
            center: [center.x, center.y],
            rings,
            outer: default_unit,
        })
    }

    /// Centre-to-centre pitch.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Location of the central position.
    #[must_use]
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.center[0], self.center[1])
    }

    /// Number of rings.
    #[must_use]
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Number of positions across all rings.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    /// Universe used outside the listed rings.
    #[must_use]
    pub fn outer(&self) -> UniverseId {
        self.outer
    }

    /// Universe at `position`, or `None` outside the lattice.
    #[must_use]
    pub fn unit_at(&self, position: HexPosition) -> Option<UniverseId> {
        self.rings.get(position.ring)?.get(position.position).copied()
    }

    /// Universes per ring, outermost ring first, as transport engines list them.
    #[must_use]
    pub fn rings_outermost_first(&self) -> Vec<&[UniverseId]> {
        self.rings.iter().rev().map(Vec::as_slice).collect()
    }

    /// Every position holding `unit`.
    pub fn positions_of(&self, unit: UniverseId) -> impl Iterator<Item = HexPosition> + '_ {
        self.rings.iter().enumerate().flat_map(move |(ring, units)| {
            units
                .iter()
                .enumerate()
                .filter(move |&(_, &u)| u == unit)
                .map(move |(position, _)| HexPosition::new(ring, position))
        })
    }

    /// Distinct universes referenced by the lattice, including the outer one.
    #[must_use]
    pub fn distinct_units(&self) -> Vec<UniverseId> {
        let units: HashSet<UniverseId> = self
            .rings
            .iter()
            .flatten()
            .copied()
            .chain(std::iter::once(self.outer))
            .collect();
        let mut units: Vec<UniverseId> = units.into_iter().collect();
        units.sort();
        units
    }

    /// Absolute centre of `position`, or `None` when the index does not exist in its ring.
    #[must_use]
    pub fn center_of(&self, position: HexPosition) -> Option<Point2<f64>> {
        Some(self.center() + position.offset(self.pitch)?)
    }

    /// Universe containing `point` and the point in that universe's local frame.
    ///
    /// Beyond the last ring the outer universe repeats at the lattice pitch.
    #[must_use]
    pub fn resolve(&self, point: Point2<f64>) -> (UniverseId, Point2<f64>) {
        let offset = point - self.center();
        let (q, r) = nearest_axial(offset, self.pitch);
        let local = Point2::from(offset - axial_to_cartesian(q, r, self.pitch));
        let ring = q.abs().max(r.abs()).max((q + r).abs());
        if !(ring < self.rings.len() as f64) {
            return (self.outer, local);
        }
        let unit = HexPosition::from_axial(q as i64, r as i64)
            .and_then(|position| self.unit_at(position))
            .unwrap_or(self.outer);
        (unit, local)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Rotation2;

    use super::*;

    #[test]
    fn ring_sizes_sum_to_total() {
        for rings in 1..20 {
            let summed: usize = (0..rings).map(ring_size).sum();
            assert_eq!(summed, total_positions(rings));
        }
        assert_eq!(total_positions(14), 547);
    }

    #[test]
    fn axial_coordinates_round_trip_every_position() {
        for ring in 0..8 {
            for position in 0..ring_size(ring) {
                let hex = HexPosition::new(ring, position);
                let (q, r) = hex.axial().expect("position exists");
                assert_eq!(HexPosition::from_axial(q, r), Some(hex));
            }
        }
    }

    #[test]
    fn first_position_is_above_centre() {
        let offset = HexPosition::new(3, 0).offset(2.0).expect("position exists");
        assert_relative_eq!(offset.x, 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(offset.y, 6.0, epsilon = 1.0e-12);
        // Clockwise: the next position is to the right.
        assert!(HexPosition::new(3, 1).offset(2.0).expect("position exists").x > 0.0);
    }

    #[test]
    fn index_rotation_matches_cartesian_rotation() {
        let clockwise = Rotation2::new(-std::f64::consts::FRAC_PI_3);
        for ring in 1..6 {
            for position in 0..ring_size(ring) {
                let hex = HexPosition::new(ring, position);
                let rotated = clockwise * hex.offset(1.0).expect("position exists");
                let expected = hex.rotated(1).offset(1.0).expect("position exists");
                assert_relative_eq!(rotated.x, expected.x, epsilon = 1.0e-9);
                assert_relative_eq!(rotated.y, expected.y, epsilon = 1.0e-9);
            }
        }
    }

    #[test]
    fn index_mirror_matches_cartesian_mirror() {
        for ring in 1..6 {
            for position in 0..ring_size(ring) {
                let hex = HexPosition::new(ring, position);
                let offset = hex.offset(1.0).expect("position exists");
                let mirrored = hex.mirrored().offset(1.0).expect("position exists");
                assert_relative_eq!(mirrored.x, -offset.x, epsilon = 1.0e-9);
                assert_relative_eq!(mirrored.y, offset.y, epsilon = 1.0e-9);
            }
        }
    }

    #[test]
    fn symmetric_images_of_corner_and_edge_positions() {
        assert_eq!(HexPosition::CENTER.symmetric_images(), vec![HexPosition::CENTER]);
        // Corners of a ring form one orbit of six.
        assert_eq!(HexPosition::new(2, 0).symmetric_images().len(), 6);
        // Side midpoints of even rings also form an orbit of six.
        assert_eq!(HexPosition::new(2, 1).symmetric_images().len(), 6);
        // Generic positions have twelve images.
        assert_eq!(HexPosition::new(3, 1).symmetric_images().len(), 12);
    }

    #[test]
    fn explicit_layout_rejects_bad_overrides() {
        let out_of_range = GuideTubeLayout::explicit(3, [HexPosition::new(2, 12)]);
        assert_eq!(
            out_of_range,
            Err(ConfigurationError::PositionOutOfRange {
                ring: 2,
                position: 12,
                rings: 3
            })
        );
        let missing_ring = GuideTubeLayout::explicit(3, [HexPosition::new(3, 0)]);
        assert!(missing_ring.is_err());
        let duplicate =
            GuideTubeLayout::explicit(3, [HexPosition::new(1, 2), HexPosition::new(1, 2)]);
        assert_eq!(
            duplicate,
            Err(ConfigurationError::DuplicateOverride {
                ring: 1,
                position: 2
            })
        );
    }

    #[test]
    fn symmetric_layout_is_closed() {
        let layout = GuideTubeLayout::symmetric(4, [HexPosition::new(3, 1)]).expect("valid");
        assert_eq!(layout.len(), 12);
        assert!(layout.is_symmetric());
    }

    #[test]
    fn reference_layouts_are_valid_and_sector_only() {
        for (layout, expected) in [
            (GuideTubeLayout::reference_2d(), 16),
            (GuideTubeLayout::reference_3d(), 32),
        ] {
            assert_eq!(layout.len(), expected);
            for position in layout.iter() {
                position.validate(14).expect("surveyed position in range");
            }
            assert!(!layout.is_symmetric());
            assert!(layout.clone().with_policy(SymmetryPolicy::Strict).is_err());
            let expanded = layout.with_policy(SymmetryPolicy::Expand).expect("expand");
            assert!(expanded.is_symmetric());
        }
        assert!(GuideTubeLayout::reference_2d().contains(HexPosition::CENTER));
        assert!(!GuideTubeLayout::reference_3d().contains(HexPosition::CENTER));
    }

    #[test]
    fn assembled_lattice_places_guide_tubes() {
        let pin = UniverseId(0);
        let tube = UniverseId(1);
        let layout = GuideTubeLayout::explicit(3, [HexPosition::CENTER, HexPosition::new(2, 5)])
            .expect("ok");
        let lattice =
            HexLattice::assemble(1.5, 3, Point2::origin(), pin, tube, &layout).expect("assembled");
        assert_eq!(lattice.position_count(), total_positions(3));
        assert_eq!(lattice.unit_at(HexPosition::new(2, 5)), Some(tube));
        assert_eq!(lattice.unit_at(HexPosition::new(2, 4)), Some(pin));
        assert_eq!(lattice.positions_of(tube).count(), 2);
        assert_eq!(lattice.distinct_units(), vec![pin, tube]);
        assert_eq!(lattice.rings_outermost_first()[0].len(), 12);
    }

    #[test]
    fn assembly_rejects_layout_for_larger_lattice() {
        let layout = GuideTubeLayout::reference_2d();
        let error = HexLattice::assemble(
            1.0,
            5,
            Point2::origin(),
            UniverseId(0),
            UniverseId(1),
            &layout,
        )
        .expect_err("ring 13 does not exist");
        assert!(matches!(error, ConfigurationError::PositionOutOfRange { .. }));
    }

    #[test]
    fn resolve_finds_nearest_position() {
        let layout = GuideTubeLayout::explicit(3, [HexPosition::new(1, 2)]).expect("ok");
        let lattice = HexLattice::assemble(
            2.0,
            3,
            Point2::new(5.0, -1.0),
            UniverseId(0),
            UniverseId(1),
            &layout,
        )
        .expect("assembled");
        let target = lattice
            .center_of(HexPosition::new(1, 2))
            .expect("position exists");
        let (unit, local) = lattice.resolve(target + Vector2::new(0.3, -0.2));
        assert_eq!(unit, UniverseId(1));
        assert_relative_eq!(local.x, 0.3, epsilon = 1.0e-9);
        assert_relative_eq!(local.y, -0.2, epsilon = 1.0e-9);

        let far = lattice.center() + Vector2::new(0.0, 40.0);
        assert_eq!(lattice.resolve(far).0, lattice.outer());
    }

    #[test]
    fn distant_points_resolve_to_the_outer_unit() {
        let lattice = HexLattice::assemble(
            2.0,
            3,
            Point2::origin(),
            UniverseId(0),
            UniverseId(1),
            &GuideTubeLayout::default(),
        )
        .expect("assembled");
        for point in [
            Point2::new(1.0e19, 0.0),
            Point2::new(-1.0e300, 3.0e300),
            Point2::new(0.0, f64::MAX),
        ] {
            assert_eq!(lattice.resolve(point).0, lattice.outer());
        }
        let (unit, local) = lattice.resolve(Point2::new(f64::NAN, 0.0));
        assert_eq!(unit, lattice.outer());
        assert!(local.x.is_nan());
    }

    #[test]
    fn indices_beyond_their_ring_have_no_coordinates() {
        assert_eq!(HexPosition::new(2, 12).axial(), None);
        assert_eq!(HexPosition::new(0, 1).offset(1.0), None);
        assert_eq!(HexPosition::new(2, 13).mirrored().ring, 2);
        assert_eq!(HexPosition::from_axial(i64::MIN, 0), None);
        assert_eq!(HexPosition::from_axial(i64::MAX, i64::MAX), None);
    }
}
