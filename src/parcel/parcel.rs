use geo::MultiPolygon;
use parcelgeom::{multi_polygon_area, normalize_multi_polygon, GeometryError};
use serde::{Deserialize, Serialize};

use crate::parcel::ParcelId;

/// The land parcel being subdivided. Immutable for the duration of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentParcel {
    pub id: ParcelId,
    #[serde(with = "crate::io::geojson::geometry")]
    pub geometry: MultiPolygon<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_use_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
}

impl ParentParcel {
    /// Construct a parent parcel, normalizing every ring of `geometry`.
    pub fn new(id: impl Into<ParcelId>, geometry: MultiPolygon<f64>) -> Result<Self, GeometryError> {
        Ok(Self {
            id: id.into(),
            geometry: normalize_multi_polygon(&geometry)?,
            land_use_id: None,
            area_id: None,
        })
    }

    /// Set the land use inherited by new subdivisions.
    pub fn with_land_use(mut self, land_use_id: impl Into<String>) -> Self {
        self.land_use_id = Some(land_use_id.into());
        self
    }

    /// Planar area of the parcel's exterior rings.
    #[inline] pub fn area(&self) -> f64 { multi_polygon_area(&self.geometry) }
}
