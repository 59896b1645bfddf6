// Property tests for the geometry primitives:
//   overlap symmetry, winding-order invariance of area, containment of
//   scaled-down rings.

use geo::{Coord, LineString};
use parcelgeom::{ring_area, ring_contained_in, rings_overlap};
use proptest::prelude::*;

/// A closed ring of 3..12 arbitrary vertices in a 100×100 box.
fn ring() -> impl Strategy<Value = LineString<f64>> {
    prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), 3..12).prop_map(|mut points| {
        points.push(points[0]);
        LineString::from(points)
    })
}

/// A closed ring with integer-valued vertices, so every Shoelace partial sum is exact.
fn grid_ring() -> impl Strategy<Value = LineString<f64>> {
    prop::collection::vec((0i32..1000, 0i32..1000), 3..12).prop_map(|points| {
        let mut points = points.into_iter().map(|(x, y)| (x as f64, y as f64)).collect::<Vec<_>>();
        points.push(points[0]);
        LineString::from(points)
    })
}

/// An axis-aligned rectangle inside the 100×100 box.
fn rect() -> impl Strategy<Value = LineString<f64>> {
    (0.0f64..90.0, 0.0f64..90.0, 1.0f64..10.0, 1.0f64..10.0).prop_map(|(x, y, w, h)| {
        LineString::from(vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)])
    })
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in ring(), b in ring()) {
        prop_assert_eq!(rings_overlap(&a, &b), rings_overlap(&b, &a));
    }

    #[test]
    fn rect_overlap_is_symmetric(a in rect(), b in rect()) {
        prop_assert_eq!(rings_overlap(&a, &b), rings_overlap(&b, &a));
    }

    #[test]
    fn area_ignores_winding(a in grid_ring()) {
        let reversed = LineString::from(a.0.iter().rev().copied().collect::<Vec<Coord<f64>>>());
        prop_assert_eq!(ring_area(&a), ring_area(&reversed));
    }

    #[test]
    fn rect_area_is_width_times_height(x in 0.0f64..50.0, y in 0.0f64..50.0, w in 1u32..20, h in 1u32..20) {
        let (w, h) = (w as f64, h as f64);
        let r = LineString::from(vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)]);
        prop_assert!((ring_area(&r) - w * h).abs() < 1e-9);
    }

    #[test]
    fn rect_inside_parent_square_is_contained(r in rect()) {
        let parent = LineString::from(vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 0.0)]);
        prop_assert!(ring_contained_in(&r, &parent));
    }
}
