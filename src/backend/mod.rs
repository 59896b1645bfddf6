mod memory;

use thiserror::Error;

use crate::parcel::{FeatureId, FeaturePatch, NewSubdivision, ParcelId, SubdivisionFeature};

pub use memory::InMemoryBackend;

/// The persistence operations the core relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
    List,
}

/// A failed persistence call. Never retried by the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("backend rejected {0:?} request: {1}")]
    Rejected(Operation, String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("subdivision {0} not found")]
    NotFound(FeatureId),
}

/// Persisted copy of the subdivisions, typically a REST service.
///
/// Calls are synchronous from the caller's point of view; hosts with an
/// asynchronous transport drive [`Controller`](crate::lifecycle::Controller)
/// directly and report completions when responses arrive.
pub trait SubdivisionBackend {
    /// Persist a new subdivision and return it with its server-assigned id.
    fn create_subdivision(&mut self, parent_id: &ParcelId, subdivision: NewSubdivision)
        -> Result<SubdivisionFeature, PersistenceError>;

    /// Apply a partial update to a persisted subdivision.
    fn update_subdivision(&mut self, parent_id: &ParcelId, id: &FeatureId, patch: &FeaturePatch)
        -> Result<(), PersistenceError>;

    /// Delete a persisted subdivision.
    fn delete_subdivision(&mut self, parent_id: &ParcelId, id: &FeatureId)
        -> Result<(), PersistenceError>;

    /// Load every persisted subdivision of `parent_id`.
    fn list_subdivisions(&mut self, parent_id: &ParcelId)
        -> Result<Vec<SubdivisionFeature>, PersistenceError>;
}
