use parcelgeom::GeometryError;
use thiserror::Error;

use crate::parcel::FeatureId;

/// Reasons an event is refused before anything is applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    /// A drawn or edited geometry is malformed.
    #[error("invalid geometry for subdivision {id}: {source}")]
    Geometry { id: FeatureId, source: GeometryError },

    /// Subdivisions can only be drawn once a parent parcel is set.
    #[error("no parent parcel is set for this session")]
    NoParent,
}
