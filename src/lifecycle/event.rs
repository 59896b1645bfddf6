use parcelgeom::RawGeometry;
use serde::{Deserialize, Serialize};

use crate::parcel::FeatureId;

/// What happened in the drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawEventKind {
    Create,
    Update,
    Delete,
    Select,
}

/// A feature as the drawing tool reports it. Geometry is required for
/// create and update events and ignored otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnFeature {
    pub id: FeatureId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<RawGeometry>,
}

/// One callback from the drawing tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawEvent {
    pub kind: DrawEventKind,
    #[serde(default)]
    pub features: Vec<DrawnFeature>,
}

impl DrawEvent {
    pub fn create(id: impl Into<FeatureId>, geometry: RawGeometry) -> Self {
        Self::single(DrawEventKind::Create, id.into(), Some(geometry))
    }

    pub fn update(id: impl Into<FeatureId>, geometry: RawGeometry) -> Self {
        Self::single(DrawEventKind::Update, id.into(), Some(geometry))
    }

    pub fn delete(ids: impl IntoIterator<Item = FeatureId>) -> Self {
        Self {
            kind: DrawEventKind::Delete,
            features: ids.into_iter().map(|id| DrawnFeature { id, geometry: None }).collect(),
        }
    }

    /// Select `id`, or clear the selection with `None`.
    pub fn select(id: Option<FeatureId>) -> Self {
        Self {
            kind: DrawEventKind::Select,
            features: id.into_iter().map(|id| DrawnFeature { id, geometry: None }).collect(),
        }
    }

    fn single(kind: DrawEventKind, id: FeatureId, geometry: Option<RawGeometry>) -> Self {
        Self { kind, features: vec![DrawnFeature { id, geometry }] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_draw_tool_payload() {
        let event: DrawEvent = serde_json::from_str(r#"{
            "kind": "update",
            "features": [{"id": "f1", "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}}]
        }"#).unwrap();

        assert_eq!(event.kind, DrawEventKind::Update);
        assert_eq!(event.features[0].id, FeatureId::new("f1"));
        assert!(event.features[0].geometry.is_some());
    }

    #[test]
    fn select_none_has_no_features() {
        assert!(DrawEvent::select(None).features.is_empty());
    }
}
