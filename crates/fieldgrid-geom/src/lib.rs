// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for fieldgrid.

This crate provides:
- A float32 point/direction type (`Vec3`) with per-axis access and distance.
- Bounding spheres (`Sphere`) with an overlap/containment predicate.
- Axis-aligned bounding boxes (`Aabb`) used to describe grid cells.

Design notes:
- Float32 throughout; operations favor clarity and reproducibility.
- Overlap is inclusive: touching volumes count as overlapping, so pairs do not
  churn on contact boundaries.
- 2D callers use `z = 0`; nothing here special-cases the third axis.
"]

/// Foundational geometric types.
pub mod types;

pub use types::aabb::Aabb;
pub use types::sphere::{Containment, Sphere};
pub use types::vec3::{Axis, Vec3};
