// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Property tests for the sphere overlap predicate.

use fieldgrid_geom::{Containment, Sphere, Vec3};
use proptest::prelude::*;

fn sphere() -> impl Strategy<Value = Sphere> {
    let coord = -1.0e3f32..1.0e3f32;
    (coord.clone(), coord.clone(), coord, 0.0f32..50.0)
        .prop_map(|(x, y, z, r)| Sphere::new(Vec3::new(x, y, z), r))
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in sphere(), b in sphere()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn containment_implies_overlap(a in sphere(), b in sphere()) {
        if a.contains(&b) == Containment::Contains {
            prop_assert!(a.overlaps(&b));
            prop_assert!(a.radius() >= b.radius());
        }
    }

    #[test]
    fn overlap_matches_center_distance(a in sphere(), b in sphere()) {
        let dist = a.center().distance(&b.center());
        let sum = a.radius() + b.radius();
        // Stay clear of the rounding band around the touching distance.
        prop_assume!((dist - sum).abs() > 1e-2);
        prop_assert_eq!(a.overlaps(&b), dist < sum);
    }

    #[test]
    fn bounds_enclose_center(a in sphere()) {
        prop_assert!(a.bounds().contains_point(&a.center()));
    }
}
