use thiserror::Error;

/// Malformed input geometry, rejected before any validation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A ring had fewer than the four positions a closed linear ring needs.
    #[error("ring has {0} positions, at least 4 are required")]
    TooFewPoints(usize),

    /// A position was not an `[x, y]` pair (GeoJSON allows an optional third value).
    #[error("position has {0} values, expected 2 or 3")]
    InvalidPosition(usize),

    /// A coordinate was NaN or infinite.
    #[error("ring contains a non-finite coordinate")]
    NonFinite,

    /// After removing repeated vertices the ring no longer encloses an area.
    #[error("ring has fewer than 3 distinct vertices")]
    Degenerate,

    /// A polygon without an exterior ring, or a multipolygon without polygons.
    #[error("geometry has no exterior ring")]
    Empty,

    /// Only Polygon and MultiPolygon geometries describe parcels.
    #[error("unsupported geometry type {0}, expected Polygon or MultiPolygon")]
    Unsupported(&'static str),
}
