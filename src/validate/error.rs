use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parcel::FeatureId;

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A subdivision extends beyond its parent parcel.
    OutOfBounds,
    /// Two subdivisions of the same parent share area.
    Overlap,
    /// A subdivision's allocation shares do not add up.
    InvalidAllocation,
    /// The subdivisions do not reconstitute the parent's area.
    InvalidGeometry,
}

impl ErrorKind {
    /// Returns `true` for findings that block a freshly drawn subdivision.
    #[inline]
    pub fn is_geometric_conflict(self) -> bool {
        matches!(self, ErrorKind::OutOfBounds | ErrorKind::Overlap)
    }
}

/// An advisory finding about the current subdivision state. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    /// Offending subdivisions, if the finding is attributable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<FeatureId>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, features: Vec<FeatureId>) -> Self {
        Self { kind, message: message.into(), features }
    }

    /// Returns `true` if this finding references `id`.
    #[inline] pub fn involves(&self, id: &FeatureId) -> bool { self.features.contains(id) }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}
