use geo::{Coord, LineString};

/// Where a point sits relative to a closed ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Inside,
    Boundary,
    Outside,
}

/// Locate `point` relative to `ring` by casting a ray in the +x direction
/// and counting the edges it crosses (odd ⇒ inside).
///
/// Points lying exactly on an edge are reported as `Boundary` before the ray
/// is cast, so the result does not depend on the ring's winding or on which
/// edge the point happens to sit on.
pub fn locate(point: Coord<f64>, ring: &LineString<f64>) -> Location {
    let mut inside = false;

    for line in ring.lines() {
        let (a, b) = (line.start, line.end);
        if on_segment(point, a, b) { return Location::Boundary }

        // Only edges straddling the horizontal line through `point` can be crossed.
        if (a.y > point.y) != (b.y > point.y) {
            let x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x { inside = !inside }
        }
    }

    if inside { Location::Inside } else { Location::Outside }
}

/// Returns `true` if `point` is inside `ring` or on its boundary.
#[inline]
pub fn point_in_ring(point: Coord<f64>, ring: &LineString<f64>) -> bool {
    locate(point, ring) != Location::Outside
}

/// Returns `true` only if `point` is strictly inside `ring`.
#[inline]
pub fn point_in_ring_interior(point: Coord<f64>, ring: &LineString<f64>) -> bool {
    locate(point, ring) == Location::Inside
}

#[inline]
fn on_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    cross == 0.0
        && p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> LineString<f64> {
        LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)])
    }

    #[test]
    fn center_is_inside() {
        assert_eq!(locate(Coord { x: 0.5, y: 0.5 }, &unit_square()), Location::Inside);
    }

    #[test]
    fn far_point_is_outside() {
        assert_eq!(locate(Coord { x: 2.0, y: 0.5 }, &unit_square()), Location::Outside);
        assert_eq!(locate(Coord { x: -0.1, y: 0.5 }, &unit_square()), Location::Outside);
    }

    #[test]
    fn edges_and_corners_are_boundary() {
        let ring = unit_square();
        for (x, y) in [(0.0, 0.0), (0.5, 0.0), (1.0, 0.5), (0.5, 1.0), (0.0, 1.0)] {
            assert_eq!(locate(Coord { x, y }, &ring), Location::Boundary, "({x}, {y})");
        }
    }

    #[test]
    fn boundary_counts_for_closed_test_only() {
        let p = Coord { x: 0.5, y: 1.0 };
        assert!(point_in_ring(p, &unit_square()));
        assert!(!point_in_ring_interior(p, &unit_square()));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape open at the top between x = 1 and x = 2.
        let ring = LineString::from(vec![
            (0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (2.0, 3.0),
            (2.0, 1.0), (1.0, 1.0), (1.0, 3.0), (0.0, 3.0), (0.0, 0.0),
        ]);
        assert!(!point_in_ring(Coord { x: 1.5, y: 2.0 }, &ring));
        assert!(point_in_ring(Coord { x: 0.5, y: 2.0 }, &ring));
        assert!(point_in_ring(Coord { x: 2.5, y: 2.0 }, &ring));
    }
}
