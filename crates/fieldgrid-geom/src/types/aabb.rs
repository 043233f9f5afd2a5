// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::types::vec3::Vec3;

/// Axis-aligned bounding box in world coordinates.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Constructs an AABB from its minimum and maximum corners.
    ///
    /// Returns `None` if any component of `min` is greater than its
    /// counterpart in `max` (or either corner is non-finite).
    pub fn new(min: Vec3, max: Vec3) -> Option<Self> {
        let a = min.to_array();
        let b = max.to_array();
        let ordered = a.iter().zip(b.iter()).all(|(lo, hi)| lo <= hi);
        (ordered && min.is_finite() && max.is_finite()).then_some(Self { min, max })
    }

    /// Builds an axis-aligned cube from its minimum corner and edge length.
    pub fn cube(min: Vec3, edge: f32) -> Self {
        Self {
            min,
            max: min.add(&Vec3::new(edge, edge, edge)),
        }
    }

    /// Returns the minimum corner.
    pub const fn min(&self) -> Vec3 {
        self.min
    }

    /// Returns the maximum corner.
    pub const fn max(&self) -> Vec3 {
        self.max
    }

    /// Builds an AABB centered at `center` with half-extents `hx, hy, hz`.
    ///
    /// Negative half-extents are treated as their absolute value.
    pub fn from_center_half_extents(center: Vec3, hx: f32, hy: f32, hz: f32) -> Self {
        let he = Vec3::new(hx.abs(), hy.abs(), hz.abs());
        Self {
            min: center.sub(&he),
            max: center.add(&he),
        }
    }

    /// Returns `true` if this AABB overlaps another (inclusive on faces).
    pub fn overlaps(&self, other: &Self) -> bool {
        let a_min = self.min.to_array();
        let a_max = self.max.to_array();
        let b_min = other.min.to_array();
        let b_max = other.max.to_array();
        (0..3).all(|i| a_max[i] >= b_min[i] && a_min[i] <= b_max[i])
    }

    /// Returns `true` if `point` lies inside or on the boundary of the box.
    pub fn contains_point(&self, point: &Vec3) -> bool {
        let p = point.to_array();
        let lo = self.min.to_array();
        let hi = self.max.to_array();
        (0..3).all(|i| p[i] >= lo[i] && p[i] <= hi[i])
    }

    /// The eight corners, ordered by bit pattern `(x, y, z)` with `x` varying fastest.
    ///
    /// Index `i` selects `max` on X when bit 0 is set, on Y for bit 1 and on Z
    /// for bit 2.
    pub fn corners(&self) -> [Vec3; 8] {
        let [minx, miny, minz] = self.min.to_array();
        let [maxx, maxy, maxz] = self.max.to_array();
        [
            Vec3::new(minx, miny, minz),
            Vec3::new(maxx, miny, minz),
            Vec3::new(minx, maxy, minz),
            Vec3::new(maxx, maxy, minz),
            Vec3::new(minx, miny, maxz),
            Vec3::new(maxx, miny, maxz),
            Vec3::new(minx, maxy, maxz),
            Vec3::new(maxx, maxy, maxz),
        ]
    }

    /// Returns the union of two AABBs.
    pub fn union(&self, other: &Self) -> Self {
        let a = self.min.to_array();
        let b = self.max.to_array();
        let c = other.min.to_array();
        let d = other.max.to_array();
        Self {
            min: Vec3::new(a[0].min(c[0]), a[1].min(c[1]), a[2].min(c[2])),
            max: Vec3::new(b[0].max(d[0]), b[1].max(d[1]), b[2].max(d[2])),
        }
    }
}
