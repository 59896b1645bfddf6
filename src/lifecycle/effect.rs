use std::fmt;

use crate::backend::{Operation, PersistenceError};
use crate::parcel::{FeatureId, FeaturePatch, NewSubdivision, ParcelId, SubdivisionFeature};
use crate::validate::ValidationError;

/// Tags a persistence request so its completion can be matched up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.0)
    }
}

/// A message for the user interface.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A drawn subdivision conflicted with the parent or a sibling and was discarded.
    Rejected { id: FeatureId, error: ValidationError },
    /// A drawn subdivision reused the id of an existing one and was discarded.
    DuplicateId { id: FeatureId },
    /// A persistence request failed.
    PersistenceFailed { id: FeatureId, operation: Operation, error: PersistenceError },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Rejected { id, error } => write!(f, "subdivision {id} rejected: {error}"),
            Notice::DuplicateId { id } => write!(f, "subdivision {id} already exists"),
            Notice::PersistenceFailed { id, operation, error } => {
                write!(f, "{operation:?} of subdivision {id} failed: {error}")
            }
        }
    }
}

/// Work the host must carry out on behalf of the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call `create_subdivision` and report the outcome as [`Completion::Created`].
    Create { request: RequestId, parent_id: ParcelId, subdivision: NewSubdivision },
    /// Call `update_subdivision` and report the outcome as [`Completion::Updated`].
    Update { request: RequestId, parent_id: ParcelId, id: FeatureId, patch: FeaturePatch },
    /// Call `delete_subdivision` and report the outcome as [`Completion::Deleted`].
    Delete { request: RequestId, parent_id: ParcelId, id: FeatureId },
    /// Remove the feature from the drawing tool.
    RollbackDraw { id: FeatureId },
    /// The drawing tool should refer to `local` as `server` from now on.
    Reidentify { local: FeatureId, server: FeatureId },
    /// Show a message to the user.
    Report(Notice),
}

impl Effect {
    /// Returns `true` for effects addressed to the persistence collaborator.
    #[inline]
    pub fn is_persistence(&self) -> bool {
        matches!(self, Effect::Create { .. } | Effect::Update { .. } | Effect::Delete { .. })
    }
}

/// Outcome of a persistence request.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Created(Result<SubdivisionFeature, PersistenceError>),
    Updated(Result<(), PersistenceError>),
    Deleted(Result<(), PersistenceError>),
}
