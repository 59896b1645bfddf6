use geo::{Coord, Geometry, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::ring::normalize_ring;

/// A GeoJSON position: `[longitude, latitude]` with an optional altitude.
pub type Position = Vec<f64>;

/// Polygonal geometry exactly as a drawing tool or a GeoJSON document
/// delivers it: unvalidated rings of raw positions.
///
/// Serializes to and from a GeoJSON geometry object
/// (`{"type": "Polygon", "coordinates": [...]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum RawGeometry {
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl RawGeometry {
    /// Normalize into a `MultiPolygon`: a Polygon becomes a single-element
    /// MultiPolygon, and every ring goes through [`normalize_ring`].
    pub fn to_multi_polygon(&self) -> Result<MultiPolygon<f64>, GeometryError> {
        let polygons = match self {
            RawGeometry::Polygon(rings) => vec![build_polygon(rings)?],
            RawGeometry::MultiPolygon(parts) => parts.iter()
                .map(|rings| build_polygon(rings))
                .collect::<Result<Vec<_>, _>>()?,
        };

        if polygons.is_empty() { return Err(GeometryError::Empty) }
        Ok(MultiPolygon(polygons))
    }
}

impl From<&MultiPolygon<f64>> for RawGeometry {
    fn from(mp: &MultiPolygon<f64>) -> Self {
        RawGeometry::MultiPolygon(mp.iter()
            .map(|polygon| std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect())
                .collect())
            .collect())
    }
}

/// Structural upgrade of a `geo` geometry: a MultiPolygon is returned
/// unchanged, a Polygon is wrapped, anything else is rejected.
pub fn to_multi_polygon(geometry: Geometry<f64>) -> Result<MultiPolygon<f64>, GeometryError> {
    match geometry {
        Geometry::MultiPolygon(mp) => Ok(mp),
        Geometry::Polygon(polygon) => Ok(MultiPolygon(vec![polygon])),
        Geometry::Point(_) => Err(GeometryError::Unsupported("Point")),
        Geometry::Line(_) => Err(GeometryError::Unsupported("Line")),
        Geometry::LineString(_) => Err(GeometryError::Unsupported("LineString")),
        Geometry::MultiPoint(_) => Err(GeometryError::Unsupported("MultiPoint")),
        Geometry::MultiLineString(_) => Err(GeometryError::Unsupported("MultiLineString")),
        Geometry::GeometryCollection(_) => Err(GeometryError::Unsupported("GeometryCollection")),
        Geometry::Rect(_) => Err(GeometryError::Unsupported("Rect")),
        Geometry::Triangle(_) => Err(GeometryError::Unsupported("Triangle")),
    }
}

fn build_polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>, GeometryError> {
    let (exterior, holes) = rings.split_first().ok_or(GeometryError::Empty)?;

    let exterior = normalize_ring(&to_coords(exterior)?)?;
    let interiors = holes.iter()
        .map(|hole| normalize_ring(&to_coords(hole)?))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn to_coords(ring: &[Position]) -> Result<Vec<Coord<f64>>, GeometryError> {
    ring.iter()
        .map(|position| match position.as_slice() {
            [x, y] | [x, y, _] => Ok(Coord { x: *x, y: *y }),
            other => Err(GeometryError::InvalidPosition(other.len())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Position> {
        vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![0.0, 0.0]]
    }

    #[test]
    fn polygon_is_wrapped() {
        let mp = RawGeometry::Polygon(vec![square()]).to_multi_polygon().unwrap();
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].exterior().0.len(), 5);
    }

    #[test]
    fn multipolygon_keeps_every_part() {
        let mp = RawGeometry::MultiPolygon(vec![vec![square()], vec![square()]]).to_multi_polygon().unwrap();
        assert_eq!(mp.0.len(), 2);
    }

    #[test]
    fn polygon_without_rings_is_empty() {
        assert_eq!(RawGeometry::Polygon(vec![]).to_multi_polygon(), Err(GeometryError::Empty));
        assert_eq!(RawGeometry::MultiPolygon(vec![]).to_multi_polygon(), Err(GeometryError::Empty));
    }

    #[test]
    fn one_value_position_is_rejected() {
        let mut ring = square();
        ring[1] = vec![1.0];
        assert_eq!(RawGeometry::Polygon(vec![ring]).to_multi_polygon(), Err(GeometryError::InvalidPosition(1)));
    }

    #[test]
    fn altitude_is_dropped() {
        let ring = square().into_iter().map(|mut p| { p.push(12.0); p }).collect();
        let mp = RawGeometry::Polygon(vec![ring]).to_multi_polygon().unwrap();
        assert_eq!(mp.0[0].exterior().0[2], Coord { x: 1.0, y: 1.0 });
    }

    #[test]
    fn geo_polygon_is_upgraded() {
        let polygon = Polygon::new(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)].into(), vec![]);
        let mp = to_multi_polygon(Geometry::Polygon(polygon.clone())).unwrap();
        assert_eq!(mp.0, vec![polygon]);
        assert_eq!(
            to_multi_polygon(Geometry::Point((0.0, 0.0).into())),
            Err(GeometryError::Unsupported("Point")),
        );
    }
}
