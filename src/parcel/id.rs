use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a subdivision feature.
///
/// Starts out as a client-generated UUID and is replaced by the server's
/// id once the feature has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(Arc<str>);

impl FeatureId {
    /// Wrap an existing id (server-assigned or supplied by the draw tool).
    #[inline] pub fn new(id: impl AsRef<str>) -> Self { Self(Arc::from(id.as_ref())) }

    /// Generate a fresh client-side id.
    #[inline] pub fn local() -> Self { Self::new(Uuid::new_v4().to_string()) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self { Self(Arc::from(id)) }
}

/// Identifier of a parent parcel in the parcel catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParcelId(Arc<str>);

impl ParcelId {
    #[inline] pub fn new(id: impl AsRef<str>) -> Self { Self(Arc::from(id.as_ref())) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for ParcelId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<String> for ParcelId {
    fn from(id: String) -> Self { Self(Arc::from(id)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ids_are_unique_uuids() {
        let (a, b) = (FeatureId::local(), FeatureId::local());
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&FeatureId::new("sub-7")).unwrap(), r#""sub-7""#);
        assert_eq!(serde_json::from_str::<ParcelId>(r#""P-1""#).unwrap(), ParcelId::new("P-1"));
    }
}
