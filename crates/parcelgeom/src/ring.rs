use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::error::GeometryError;

/// Validate and normalize a raw ring coming from a drawing tool.
///
/// * fewer than 4 positions is rejected outright,
/// * NaN/infinite coordinates are rejected,
/// * consecutive repeated vertices are collapsed,
/// * an open ring is closed by repeating its first vertex,
/// * a ring left with fewer than 3 distinct vertices is rejected.
///
/// Winding order is preserved.
pub fn normalize_ring(coords: &[Coord<f64>]) -> Result<LineString<f64>, GeometryError> {
    if coords.len() < 4 { return Err(GeometryError::TooFewPoints(coords.len())) }
    if coords.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(GeometryError::NonFinite)
    }

    let mut ring = Vec::with_capacity(coords.len() + 1);
    for &c in coords {
        if ring.last() != Some(&c) { ring.push(c) }
    }

    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if first != last { ring.push(first) }
    }

    if ring.len() < 4 { return Err(GeometryError::Degenerate) }

    Ok(LineString(ring))
}

/// Normalize every ring (exterior and holes) of every polygon in `mp`.
pub fn normalize_multi_polygon(mp: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, GeometryError> {
    if mp.0.is_empty() { return Err(GeometryError::Empty) }

    mp.iter()
        .map(|polygon| {
            let exterior = normalize_ring(&polygon.exterior().0)?;
            let interiors = polygon.interiors().iter()
                .map(|hole| normalize_ring(&hole.0))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Polygon::new(exterior, interiors))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(MultiPolygon)
}

/// Iterate the exterior ring of every polygon in `mp`.
#[inline]
pub fn outer_rings(mp: &MultiPolygon<f64>) -> impl Iterator<Item = &LineString<f64>> {
    mp.iter().map(|polygon| polygon.exterior())
}

/// Copy of `mp` with all holes dropped.
pub fn shells(mp: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon(mp.iter()
        .map(|polygon| Polygon::new(polygon.exterior().clone(), vec![]))
        .collect())
}
