//! Turns draw-tool events into store mutations and persistence requests.
//!
//! [`Controller`] is a pure state machine: every handler returns the
//! [`Effect`]s the host must carry out, and the outcome of each persistence
//! request is handed back through [`Controller::complete`]. [`Session`]
//! wires a controller to a synchronous [`SubdivisionBackend`](crate::SubdivisionBackend).

mod controller;
mod effect;
mod error;
mod event;
mod session;

pub use controller::{Controller, Phase};
pub use effect::{Completion, Effect, Notice, RequestId};
pub use error::LifecycleError;
pub use event::{DrawEvent, DrawEventKind, DrawnFeature};
pub use session::Session;
