mod feature;
mod id;
mod parcel;

pub use feature::{
    ApprovalStatus, FeaturePatch, NewSubdivision, PartyAllocation, Status, SubdivisionFeature,
};
pub use id::{FeatureId, ParcelId};
pub use parcel::ParentParcel;
