// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::types::aabb::Aabb;
use crate::types::vec3::Vec3;

/// Relationship between two bounding volumes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Containment {
    /// The volumes share no point.
    Disjoint,
    /// The volumes overlap (or touch) without full containment.
    Intersects,
    /// The first volume fully contains the second.
    Contains,
}

/// Bounding sphere in world coordinates.
///
/// Invariants:
/// - `radius` is finite and non-negative (enforced by the grid on
///   registration/update, not here, so hosts can build scratch spheres freely).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Creates a sphere from its center and radius.
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere center.
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Sphere radius.
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns a copy of this sphere moved to `center`.
    pub const fn with_center(&self, center: Vec3) -> Self {
        Self::new(center, self.radius)
    }

    /// Returns `true` when the center is finite and the radius is finite and `>= 0`.
    pub fn is_valid(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite() && self.radius >= 0.0
    }

    /// Classifies how `other` relates to this sphere.
    ///
    /// Touching surfaces classify as [`Containment::Intersects`].
    pub fn contains(&self, other: &Self) -> Containment {
        let dist_sq = self.center.distance_squared(&other.center);
        let sum = self.radius + other.radius;
        if dist_sq > sum * sum {
            return Containment::Disjoint;
        }
        let inner = self.radius - other.radius;
        if inner >= 0.0 && dist_sq <= inner * inner {
            return Containment::Contains;
        }
        Containment::Intersects
    }

    /// Returns `true` unless the spheres are disjoint.
    ///
    /// Symmetric: `a.overlaps(&b) == b.overlaps(&a)`.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.contains(other) != Containment::Disjoint
    }

    /// Smallest axis-aligned box enclosing the sphere.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.radius, self.radius, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_spheres_intersect() {
        let a = Sphere::new(Vec3::ZERO, 1.0);
        let b = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert_eq!(a.contains(&b), Containment::Intersects);
        assert!(b.overlaps(&a));
    }

    #[test]
    fn separated_spheres_are_disjoint() {
        let a = Sphere::new(Vec3::ZERO, 1.0);
        let b = Sphere::new(Vec3::new(2.5, 0.0, 0.0), 1.0);
        assert_eq!(a.contains(&b), Containment::Disjoint);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn containment_is_directional() {
        let big = Sphere::new(Vec3::ZERO, 5.0);
        let small = Sphere::new(Vec3::new(1.0, 1.0, 0.0), 1.0);
        assert_eq!(big.contains(&small), Containment::Contains);
        assert_eq!(small.contains(&big), Containment::Intersects);
        assert!(small.overlaps(&big));
    }

    #[test]
    fn invalid_radius_is_rejected() {
        assert!(!Sphere::new(Vec3::ZERO, -1.0).is_valid());
        assert!(!Sphere::new(Vec3::ZERO, f32::NAN).is_valid());
        assert!(Sphere::new(Vec3::ZERO, 0.0).is_valid());
    }
}
