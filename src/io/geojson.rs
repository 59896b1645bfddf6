use anyhow::{anyhow, bail, Context, Result};
use parcelgeom::RawGeometry;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::parcel::{
    ApprovalStatus, FeatureId, ParcelId, ParentParcel, PartyAllocation, Status, SubdivisionFeature,
};

/// Serde adapter storing a `MultiPolygon<f64>` as a GeoJSON geometry object.
/// Polygons are accepted on input and upgraded; rings are normalized.
pub mod geometry {
    use geo::MultiPolygon;
    use parcelgeom::RawGeometry;
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(mp: &MultiPolygon<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        RawGeometry::from(mp).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MultiPolygon<f64>, D::Error> {
        RawGeometry::deserialize(deserializer)?
            .to_multi_polygon()
            .map_err(D::Error::custom)
    }

    /// Same as the parent module, for optional geometries.
    pub mod option {
        use geo::MultiPolygon;
        use parcelgeom::RawGeometry;
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(mp: &Option<MultiPolygon<f64>>, serializer: S) -> Result<S::Ok, S::Error> {
            match mp {
                Some(mp) => serializer.serialize_some(&RawGeometry::from(mp)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<MultiPolygon<f64>>, D::Error> {
            Option::<RawGeometry>::deserialize(deserializer)?
                .map(|raw| raw.to_multi_polygon().map_err(D::Error::custom))
                .transpose()
        }
    }
}

/// A single GeoJSON Feature as found in input documents.
#[derive(Debug, Deserialize)]
struct FeatureDoc {
    #[serde(default)]
    id: Option<Value>,
    geometry: RawGeometry,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Document {
    FeatureCollection { features: Vec<FeatureDoc> },
    Feature(FeatureDoc),
}

/// Attributes read from a subdivision feature's `properties`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SubdivisionProps {
    id: Option<Value>,
    title: Option<String>,
    status: Status,
    approval_status: ApprovalStatus,
    land_use_id: Option<String>,
    subdivision_date: Option<String>,
    notes: Option<String>,
    allocations: Vec<PartyAllocation>,
}

/// Attributes read from a parent parcel feature's `properties`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParentProps {
    id: Option<Value>,
    land_use_id: Option<String>,
    area_id: Option<String>,
}

fn read_features(bytes: &[u8]) -> Result<Vec<FeatureDoc>> {
    let document: Document = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    Ok(match document {
        Document::FeatureCollection { features } => features,
        Document::Feature(feature) => vec![feature],
    })
}

/// GeoJSON allows string or numeric feature ids.
fn id_text(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read the parent parcel from a GeoJSON Feature (or the first feature of a FeatureCollection).
/// The parcel id is taken from the feature id, falling back to `properties.id`.
pub fn read_parent_from_geojson_bytes(bytes: &[u8]) -> Result<ParentParcel> {
    let Some(feature) = read_features(bytes)?.into_iter().next() else {
        bail!("[read_parent_from_geojson_bytes] Document contains no features");
    };

    let props: ParentProps = serde_json::from_value(Value::Object(feature.properties.unwrap_or_default()))
        .context("[read_parent_from_geojson_bytes] Invalid parent properties")?;

    let id = feature.id.as_ref().and_then(id_text)
        .or_else(|| props.id.as_ref().and_then(id_text))
        .ok_or_else(|| anyhow!("[read_parent_from_geojson_bytes] Parent feature has no id"))?;

    let geometry = feature.geometry.to_multi_polygon()
        .with_context(|| format!("[read_parent_from_geojson_bytes] Invalid geometry for parcel {id}"))?;

    Ok(ParentParcel {
        id: ParcelId::from(id),
        geometry,
        land_use_id: props.land_use_id,
        area_id: props.area_id,
    })
}

/// Read subdivisions of `parent` from a GeoJSON FeatureCollection.
///
/// Features without an id get a fresh client id; features without a title
/// are named by position. `size` is always recomputed from the geometry.
pub fn read_subdivisions_from_geojson_bytes(bytes: &[u8], parent: &ParentParcel) -> Result<Vec<SubdivisionFeature>> {
    read_features(bytes)?.into_iter().enumerate()
        .map(|(i, feature)| {
            let props: SubdivisionProps = serde_json::from_value(Value::Object(feature.properties.unwrap_or_default()))
                .with_context(|| format!("[read_subdivisions_from_geojson_bytes] Invalid properties for feature {i}"))?;

            let id = feature.id.as_ref().and_then(id_text)
                .or_else(|| props.id.as_ref().and_then(id_text))
                .map(FeatureId::from)
                .unwrap_or_else(FeatureId::local);

            let geometry = feature.geometry.to_multi_polygon()
                .with_context(|| format!("[read_subdivisions_from_geojson_bytes] Invalid geometry for feature {id}"))?;

            let title = props.title.unwrap_or_else(|| format!("Subdivision {}", i + 1));
            let mut subdivision = SubdivisionFeature::new(id, parent.id.clone(), title, geometry);
            subdivision.status = props.status;
            subdivision.approval_status = props.approval_status;
            subdivision.land_use_id = props.land_use_id.or_else(|| parent.land_use_id.clone());
            subdivision.subdivision_date = props.subdivision_date;
            subdivision.notes = props.notes;
            subdivision.allocations = props.allocations;
            Ok(subdivision)
        })
        .collect()
}

/// Write subdivisions as a GeoJSON FeatureCollection of MultiPolygon features.
pub fn write_subdivisions_to_geojson_bytes(subdivisions: &[SubdivisionFeature]) -> Result<Vec<u8>> {
    let features = subdivisions.iter()
        .map(|subdivision| {
            let properties = json!({
                "title": subdivision.title,
                "size": subdivision.size,
                "status": subdivision.status,
                "approvalStatus": subdivision.approval_status,
                "landUseId": subdivision.land_use_id,
                "parentId": subdivision.parent_id,
                "subdivisionDate": subdivision.subdivision_date,
                "notes": subdivision.notes,
                "allocations": subdivision.allocations,
            });

            json!({
                "type": "Feature",
                "id": subdivision.id,
                "geometry": RawGeometry::from(&subdivision.geometry),
                "properties": properties,
            })
        })
        .collect::<Vec<_>>();

    let feature_collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });

    serde_json::to_vec(&feature_collection).context("Failed to serialize GeoJSON to bytes")
}
