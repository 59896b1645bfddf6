use std::collections::VecDeque;

use tracing::info;

use crate::backend::{PersistenceError, SubdivisionBackend};
use crate::config::SessionConfig;
use crate::lifecycle::{Completion, Controller, DrawEvent, Effect, LifecycleError};
use crate::parcel::{FeatureId, FeaturePatch, ParentParcel};
use crate::store::SubdivisionStore;

/// A [`Controller`] bound to a synchronous backend. Persistence effects are
/// executed immediately and their completions fed back; everything else is
/// returned for the drawing tool and the user.
#[derive(Debug)]
pub struct Session<B> {
    controller: Controller,
    backend: B,
}

impl<B: SubdivisionBackend> Session<B> {
    pub fn new(backend: B, config: SessionConfig) -> Self {
        Self { controller: Controller::new(config), backend }
    }

    #[inline] pub fn controller(&self) -> &Controller { &self.controller }

    #[inline] pub fn store(&self) -> &SubdivisionStore { self.controller.store() }

    #[inline] pub fn backend(&self) -> &B { &self.backend }

    #[inline] pub fn backend_mut(&mut self) -> &mut B { &mut self.backend }

    /// Load the persisted subdivisions of `parent` and make it the current parcel.
    /// On failure the previous session is left untouched.
    pub fn open(&mut self, parent: ParentParcel) -> Result<(), PersistenceError> {
        let subdivisions = self.backend.list_subdivisions(&parent.id)?;
        info!(parent = %parent.id, count = subdivisions.len(), "opened subdivision session");
        self.controller.load(parent, subdivisions);
        Ok(())
    }

    /// Handle a drawing-tool event and run any persistence it triggers.
    pub fn dispatch(&mut self, event: DrawEvent) -> Result<Vec<Effect>, LifecycleError> {
        let effects = self.controller.handle(event)?;
        Ok(self.run(effects))
    }

    /// Apply an attribute edit and run any persistence it triggers.
    pub fn edit(&mut self, id: &FeatureId, patch: FeaturePatch) -> Result<Vec<Effect>, LifecycleError> {
        let effects = self.controller.edit(id, patch)?;
        Ok(self.run(effects))
    }

    fn run(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
        let mut queue = VecDeque::from(effects);
        let mut surfaced = Vec::new();

        while let Some(effect) = queue.pop_front() {
            let (request, completion) = match effect {
                Effect::Create { request, parent_id, subdivision } => {
                    (request, Completion::Created(self.backend.create_subdivision(&parent_id, subdivision)))
                }
                Effect::Update { request, parent_id, id, patch } => {
                    (request, Completion::Updated(self.backend.update_subdivision(&parent_id, &id, &patch)))
                }
                Effect::Delete { request, parent_id, id } => {
                    (request, Completion::Deleted(self.backend.delete_subdivision(&parent_id, &id)))
                }
                other => {
                    surfaced.push(other);
                    continue;
                }
            };
            queue.extend(self.controller.complete(request, completion));
        }

        surfaced
    }
}
