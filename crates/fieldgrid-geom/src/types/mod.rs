// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types consumed by the grid (points, spheres, boxes).
//!
//! Overlap semantics are inclusive on faces and surfaces to avoid pair churn
//! on contact boundaries.

#[doc = "Axis-aligned bounding boxes (world space)."]
pub mod aabb;
#[doc = "Bounding spheres and containment classification."]
pub mod sphere;
#[doc = "Float32 3D vectors used for centers and offsets."]
pub mod vec3;
