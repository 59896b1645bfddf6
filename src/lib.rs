#![doc = "Parcelsplit public API"]
mod backend;
mod config;
mod parcel;

pub mod io;
pub mod lifecycle;
pub mod store;
pub mod validate;

#[doc(inline)]
pub use parcel::{
    ApprovalStatus, FeatureId, FeaturePatch, NewSubdivision, ParcelId, ParentParcel, PartyAllocation, Status,
    SubdivisionFeature,
};

#[doc(inline)]
pub use validate::{validate_all, validate_subdivision, ErrorKind, OverlapTest, ValidationConfig, ValidationError};

#[doc(inline)]
pub use store::SubdivisionStore;

#[doc(inline)]
pub use backend::{InMemoryBackend, Operation, PersistenceError, SubdivisionBackend};

#[doc(inline)]
pub use lifecycle::{
    Completion, Controller, DrawEvent, DrawEventKind, DrawnFeature, Effect, LifecycleError, Notice, Phase,
    RequestId, Session,
};

#[doc(inline)]
pub use config::SessionConfig;

#[doc(inline)]
pub use io::geojson::{
    read_parent_from_geojson_bytes, read_subdivisions_from_geojson_bytes, write_subdivisions_to_geojson_bytes,
};

pub use parcelgeom as geom;
