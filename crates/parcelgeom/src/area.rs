use geo::{LineString, MultiPolygon, Polygon};

/// Planar area of a closed ring using the Shoelace formula:
/// `|Σ(x_i·y_{i+1} − x_{i+1}·y_i)| / 2`.
///
/// The result is independent of winding order.
pub fn ring_area(ring: &LineString<f64>) -> f64 {
    let twice = ring.0.windows(2)
        .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
        .sum::<f64>();

    twice.abs() * 0.5
}

/// Planar area of a polygon's exterior ring. Holes are not subtracted.
#[inline]
pub fn polygon_area(polygon: &Polygon<f64>) -> f64 {
    ring_area(polygon.exterior())
}

/// Sum of the exterior-ring areas of every polygon in `mp`.
#[inline]
pub fn multi_polygon_area(mp: &MultiPolygon<f64>) -> f64 {
    mp.iter().map(polygon_area).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_has_unit_area() {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        assert_eq!(ring_area(&ring), 1.0);
    }

    #[test]
    fn holes_are_ignored() {
        let outer = LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let hole = LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)]);
        let polygon = Polygon::new(outer, vec![hole]);
        assert_eq!(polygon_area(&polygon), 16.0);
    }

    #[test]
    fn multipolygon_sums_parts() {
        let a = Polygon::new(LineString::from(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]), vec![]);
        let b = Polygon::new(LineString::from(vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0)]), vec![]);
        assert_eq!(multi_polygon_area(&MultiPolygon(vec![a, b])), 3.0);
    }

    #[test]
    fn open_ring_of_two_points_has_no_area() {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(ring_area(&ring), 0.0);
    }
}
