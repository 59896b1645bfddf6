use geo::MultiPolygon;
use parcelgeom::multi_polygon_area;
use serde::{Deserialize, Serialize};

use crate::parcel::{FeatureId, ParcelId};

/// Registration status of a subdivision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Active,
    Retired,
}

/// Review outcome of a subdivision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A named party's percentage share of ownership in one subdivision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyAllocation {
    pub party_id: String,
    pub name: String,
    pub share: f64,
}

impl PartyAllocation {
    pub fn new(party_id: impl Into<String>, name: impl Into<String>, share: f64) -> Self {
        Self { party_id: party_id.into(), name: name.into(), share }
    }
}

/// One piece of a subdivided parent parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubdivisionFeature {
    pub id: FeatureId,
    #[serde(with = "crate::io::geojson::geometry")]
    pub geometry: MultiPolygon<f64>,
    pub title: String,
    /// Planar area of `geometry`; derived, never taken from user input.
    pub size: f64,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_use_id: Option<String>,
    pub parent_id: ParcelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub allocations: Vec<PartyAllocation>,
}

impl SubdivisionFeature {
    /// Create a feature with default attributes and a size computed from `geometry`.
    pub fn new(id: FeatureId, parent_id: ParcelId, title: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self {
            id,
            size: multi_polygon_area(&geometry),
            geometry,
            title: title.into(),
            status: Status::default(),
            approval_status: ApprovalStatus::default(),
            land_use_id: None,
            parent_id,
            subdivision_date: None,
            notes: None,
            allocations: Vec::new(),
        }
    }

    /// Replace the geometry and recompute `size`.
    pub fn set_geometry(&mut self, geometry: MultiPolygon<f64>) {
        self.size = multi_polygon_area(&geometry);
        self.geometry = geometry;
    }

    /// Recompute `size` from the current geometry, discarding whatever value it held.
    #[inline] pub fn refresh_size(&mut self) { self.size = multi_polygon_area(&self.geometry) }

    /// Sum of all allocation shares (UI-derived, not persisted).
    #[inline]
    pub fn total_share(&self) -> f64 {
        // an empty f64 sum is -0.0
        self.allocations.iter().map(|a| a.share).sum::<f64>() + 0.0
    }

    /// Apply every field present in `patch`.
    pub fn apply(&mut self, patch: &FeaturePatch) {
        if let Some(geometry) = &patch.geometry { self.set_geometry(geometry.clone()) }
        if let Some(title) = &patch.title { self.title = title.clone() }
        if let Some(status) = patch.status { self.status = status }
        if let Some(approval) = patch.approval_status { self.approval_status = approval }
        if let Some(land_use_id) = &patch.land_use_id { self.land_use_id = Some(land_use_id.clone()) }
        if let Some(date) = &patch.subdivision_date { self.subdivision_date = Some(date.clone()) }
        if let Some(notes) = &patch.notes { self.notes = Some(notes.clone()) }
        if let Some(allocations) = &patch.allocations { self.allocations = allocations.clone() }
    }

    /// The creation payload for this feature (everything except the id).
    pub fn to_new(&self) -> NewSubdivision {
        NewSubdivision {
            geometry: self.geometry.clone(),
            title: self.title.clone(),
            size: self.size,
            status: self.status,
            approval_status: self.approval_status,
            land_use_id: self.land_use_id.clone(),
            parent_id: self.parent_id.clone(),
            subdivision_date: self.subdivision_date.clone(),
            notes: self.notes.clone(),
            allocations: self.allocations.clone(),
        }
    }
}

/// A subdivision that has not been assigned an id by the server yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubdivision {
    #[serde(with = "crate::io::geojson::geometry")]
    pub geometry: MultiPolygon<f64>,
    pub title: String,
    pub size: f64,
    pub status: Status,
    pub approval_status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_use_id: Option<String>,
    pub parent_id: ParcelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub allocations: Vec<PartyAllocation>,
}

impl NewSubdivision {
    /// Attach an id. `size` is recomputed so a stale payload cannot carry a wrong area.
    pub fn with_id(self, id: FeatureId) -> SubdivisionFeature {
        let mut feature = SubdivisionFeature {
            id,
            geometry: self.geometry,
            title: self.title,
            size: self.size,
            status: self.status,
            approval_status: self.approval_status,
            land_use_id: self.land_use_id,
            parent_id: self.parent_id,
            subdivision_date: self.subdivision_date,
            notes: self.notes,
            allocations: self.allocations,
        };
        feature.refresh_size();
        feature
    }
}

/// Partial update of a subdivision. `None` leaves a field untouched; `size`
/// is not part of a patch since it follows the geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePatch {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::io::geojson::geometry::option")]
    pub geometry: Option<MultiPolygon<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_use_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocations: Option<Vec<PartyAllocation>>,
}

impl FeaturePatch {
    /// A patch that only replaces the geometry.
    pub fn geometry(geometry: MultiPolygon<f64>) -> Self {
        Self { geometry: Some(geometry), ..Self::default() }
    }

    /// A patch that only replaces the allocations.
    pub fn allocations(allocations: Vec<PartyAllocation>) -> Self {
        Self { allocations: Some(allocations), ..Self::default() }
    }

    /// Fold `newer` on top of `self`; fields set in `newer` win.
    pub fn merge(&mut self, newer: FeaturePatch) {
        if newer.geometry.is_some() { self.geometry = newer.geometry }
        if newer.title.is_some() { self.title = newer.title }
        if newer.status.is_some() { self.status = newer.status }
        if newer.approval_status.is_some() { self.approval_status = newer.approval_status }
        if newer.land_use_id.is_some() { self.land_use_id = newer.land_use_id }
        if newer.subdivision_date.is_some() { self.subdivision_date = newer.subdivision_date }
        if newer.notes.is_some() { self.notes = newer.notes }
        if newer.allocations.is_some() { self.allocations = newer.allocations }
    }
}
