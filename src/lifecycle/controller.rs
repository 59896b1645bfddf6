use ahash::AHashMap;
use geo::MultiPolygon;
use parcelgeom::{normalize_multi_polygon, GeometryError};
use tracing::{debug, info, warn};

use crate::backend::{Operation, PersistenceError};
use crate::config::SessionConfig;
use crate::lifecycle::{Completion, DrawEvent, DrawEventKind, DrawnFeature, Effect, LifecycleError, Notice, RequestId};
use crate::parcel::{FeatureId, FeaturePatch, NewSubdivision, ParcelId, ParentParcel, SubdivisionFeature};
use crate::store::SubdivisionStore;
use crate::validate::{validate_all, validate_subdivision, ValidationError};

/// Where a subdivision stands relative to the persisted copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Drawn locally, no request sent yet.
    Drafting,
    /// A create or update request is in flight.
    Persisting,
    /// The backend holds the current state.
    Persisted,
    /// Removed locally; a delete may still be in flight.
    Deleted,
}

/// Per-feature synchronization bookkeeping.
#[derive(Debug, Clone)]
struct Tracked {
    phase: Phase,
    /// The backend knows the feature under its current id.
    persisted: bool,
    /// Update requests in flight.
    updates: usize,
    /// Edits made while the create request was in flight.
    deferred: Option<FeaturePatch>,
}

impl Tracked {
    fn drafting() -> Self {
        Self { phase: Phase::Drafting, persisted: false, updates: 0, deferred: None }
    }

    fn persisted() -> Self {
        Self { phase: Phase::Persisted, persisted: true, updates: 0, deferred: None }
    }
}

/// What an in-flight request was for.
#[derive(Debug, Clone)]
enum Pending {
    Create(FeatureId),
    Update(FeatureId),
    Delete(FeatureId),
}

/// Keeps a [`SubdivisionStore`] consistent with the drawing tool and the
/// persisted copy, and revalidates after every structural change.
#[derive(Debug)]
pub struct Controller {
    store: SubdivisionStore,
    config: SessionConfig,
    tracked: AHashMap<FeatureId, Tracked>,
    pending: AHashMap<RequestId, Pending>,
    last_request: u64,
}

impl Controller {
    /// Create a controller with an empty store and no parent.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            store: SubdivisionStore::new(),
            config,
            tracked: AHashMap::new(),
            pending: AHashMap::new(),
            last_request: 0,
        }
    }

    /// Get the collection state.
    #[inline] pub fn store(&self) -> &SubdivisionStore { &self.store }

    /// Get the session configuration.
    #[inline] pub fn config(&self) -> &SessionConfig { &self.config }

    /// Get the findings of the last validation run.
    #[inline] pub fn validation_errors(&self) -> &[ValidationError] { self.store.validation_errors() }

    /// Get the synchronization phase of subdivision `id`.
    #[inline] pub fn phase(&self, id: &FeatureId) -> Option<Phase> { self.tracked.get(id).map(|t| t.phase) }

    /// Get the number of persistence requests awaiting completion.
    #[inline] pub fn pending_requests(&self) -> usize { self.pending.len() }

    /// Start a session on `parent` without loading anything from the backend.
    /// Switching parents forgets all bookkeeping of the previous session.
    pub fn set_parent(&mut self, parent: ParentParcel) {
        if self.store.parent().is_some_and(|p| p.id != parent.id) {
            self.tracked.clear();
            self.pending.clear();
        }
        self.store.set_parent(parent);
        self.revalidate();
    }

    /// Replace the session wholesale with `parent` and its persisted subdivisions.
    pub fn load(&mut self, parent: ParentParcel, subdivisions: Vec<SubdivisionFeature>) {
        debug!(parent = %parent.id, count = subdivisions.len(), "loading subdivisions");

        self.tracked = subdivisions.iter().map(|s| (s.id.clone(), Tracked::persisted())).collect();
        self.pending.clear();
        self.store.set_parent(parent);
        self.store.replace_all(subdivisions);
        self.revalidate();
    }

    /// React to a drawing-tool event.
    ///
    /// Malformed geometry fails the whole event before anything is applied.
    pub fn handle(&mut self, event: DrawEvent) -> Result<Vec<Effect>, LifecycleError> {
        debug!(kind = ?event.kind, count = event.features.len(), "draw event");

        match event.kind {
            DrawEventKind::Create => self.on_create(event.features),
            DrawEventKind::Update => self.on_update(event.features),
            DrawEventKind::Delete => Ok(self.on_delete(event.features)),
            DrawEventKind::Select => Ok(self.on_select(event.features)),
        }
    }

    /// Apply an attribute edit from the UI (title, notes, allocations, ...).
    /// Unknown ids are ignored.
    pub fn edit(&mut self, id: &FeatureId, mut patch: FeaturePatch) -> Result<Vec<Effect>, LifecycleError> {
        let parent_id = self.parent_id()?;

        if let Some(geometry) = patch.geometry.take() {
            let geometry = normalize_multi_polygon(&geometry)
                .map_err(|source| LifecycleError::Geometry { id: id.clone(), source })?;
            patch.geometry = Some(geometry);
        }

        if !self.store.update(id, &patch) {
            debug!(%id, "ignoring edit of unknown subdivision");
            return Ok(Vec::new());
        }

        let effects = self.sync_edit(&parent_id, id, patch).into_iter().collect();
        self.revalidate();
        Ok(effects)
    }

    /// Feed back the outcome of a request previously emitted as an [`Effect`].
    pub fn complete(&mut self, request: RequestId, completion: Completion) -> Vec<Effect> {
        let Some(pending) = self.pending.remove(&request) else {
            warn!(%request, "completion for unknown request");
            return Vec::new();
        };

        match (pending, completion) {
            (Pending::Create(local), Completion::Created(result)) => self.on_created(local, result),
            (Pending::Update(id), Completion::Updated(result)) => self.on_updated(id, result),
            (Pending::Delete(id), Completion::Deleted(result)) => self.on_deleted(id, result),
            (pending, _) => {
                warn!(%request, ?pending, "completion does not match request");
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Draw events
    // -----------------------------------------------------------------------

    fn on_create(&mut self, features: Vec<DrawnFeature>) -> Result<Vec<Effect>, LifecycleError> {
        let parent = self.store.parent().cloned().ok_or(LifecycleError::NoParent)?;
        let drawn = normalize(features)?;

        let mut effects = Vec::new();
        let mut added = false;

        for (id, geometry) in drawn {
            if self.store.contains(&id) || self.tracked.contains_key(&id) {
                warn!(%id, "rejecting drawn subdivision: id already in use");
                effects.push(Effect::Report(Notice::DuplicateId { id: id.clone() }));
                effects.push(Effect::RollbackDraw { id });
                continue;
            }

            let candidate = self.candidate(&parent, id.clone(), geometry);

            let conflict = validate_subdivision(&candidate, &parent, self.store.subdivisions(), &self.config.validation)
                .into_iter()
                .find(|e| e.kind.is_geometric_conflict());

            if let Some(error) = conflict {
                warn!(%id, kind = ?error.kind, "rejecting drawn subdivision: {}", error.message);
                effects.push(Effect::Report(Notice::Rejected { id: id.clone(), error }));
                effects.push(Effect::RollbackDraw { id });
                continue;
            }

            debug!(%id, size = candidate.size, "adding drawn subdivision");
            let subdivision = candidate.to_new();
            self.store.add(candidate);
            self.tracked.insert(id.clone(), Tracked::drafting());
            effects.push(self.request_create(&parent.id, id, subdivision));
            added = true;
        }

        if added { self.revalidate() }
        Ok(effects)
    }

    fn on_update(&mut self, features: Vec<DrawnFeature>) -> Result<Vec<Effect>, LifecycleError> {
        let parent_id = self.parent_id()?;
        let drawn = normalize(features)?;

        let mut effects = Vec::new();
        let mut changed = false;

        for (id, geometry) in drawn {
            let patch = FeaturePatch::geometry(geometry);
            if !self.store.update(&id, &patch) {
                debug!(%id, "ignoring update of unknown subdivision");
                continue;
            }
            effects.extend(self.sync_edit(&parent_id, &id, patch));
            changed = true;
        }

        if changed { self.revalidate() }
        Ok(effects)
    }

    fn on_delete(&mut self, features: Vec<DrawnFeature>) -> Vec<Effect> {
        let ids = features.into_iter().map(|f| f.id).collect::<Vec<_>>();
        let parent_id = self.store.parent().map(|p| p.id.clone());

        let mut effects = Vec::new();
        for id in &ids {
            let Some(tracked) = self.tracked.get_mut(id) else { continue };
            if tracked.phase == Phase::Deleted { continue }
            tracked.phase = Phase::Deleted;

            if !tracked.persisted {
                debug!(%id, "create still in flight, deleting once the server id is known");
                continue;
            }
            if let Some(parent_id) = &parent_id {
                effects.push(self.request_delete(parent_id, id.clone()));
            }
        }

        let mut removed = false;
        for id in &ids {
            removed |= self.store.remove(id).is_some();
        }

        if removed { self.revalidate() }
        effects
    }

    fn on_select(&mut self, features: Vec<DrawnFeature>) -> Vec<Effect> {
        let id = features.into_iter().next().map(|f| f.id);
        if !self.store.select(id.clone()) {
            warn!(id = ?id, "cannot select unknown subdivision");
        }
        Vec::new()
    }

    // -----------------------------------------------------------------------
    // Completions
    // -----------------------------------------------------------------------

    fn on_created(&mut self, local: FeatureId, result: Result<SubdivisionFeature, PersistenceError>) -> Vec<Effect> {
        let Some(mut tracked) = self.tracked.remove(&local) else {
            warn!(%local, "create completed for untracked subdivision");
            return Vec::new();
        };

        match result {
            Ok(created) => {
                let server = created.id;

                if tracked.phase == Phase::Deleted {
                    info!(%local, %server, "subdivision deleted while being created, removing server copy");
                    self.tracked.insert(server.clone(), Tracked { phase: Phase::Deleted, ..Tracked::persisted() });
                    return self.store.parent().map(|p| p.id.clone())
                        .map(|parent_id| self.request_delete(&parent_id, server))
                        .into_iter()
                        .collect();
                }

                info!(%local, %server, "subdivision persisted");
                self.store.rekey(&local, server.clone());

                let deferred = tracked.deferred.take();
                self.tracked.insert(server.clone(), Tracked::persisted());

                let mut effects = vec![Effect::Reidentify { local, server: server.clone() }];
                if let (Some(patch), Ok(parent_id)) = (deferred, self.parent_id()) {
                    effects.extend(self.sync_edit(&parent_id, &server, patch));
                }

                self.revalidate();
                effects
            }
            Err(error) => {
                warn!(%local, %error, "create failed, rolling back drawn subdivision");

                let mut effects = Vec::new();
                if self.store.remove(&local).is_some() {
                    effects.push(Effect::RollbackDraw { id: local.clone() });
                    self.revalidate();
                }
                effects.push(Effect::Report(Notice::PersistenceFailed { id: local, operation: Operation::Create, error }));
                effects
            }
        }
    }

    fn on_updated(&mut self, id: FeatureId, result: Result<(), PersistenceError>) -> Vec<Effect> {
        let Some(tracked) = self.tracked.get_mut(&id) else {
            debug!(%id, "update completed for removed subdivision");
            return Vec::new();
        };

        tracked.updates = tracked.updates.saturating_sub(1);
        if tracked.phase == Phase::Deleted {
            debug!(%id, "update completed for deleted subdivision");
            return Vec::new();
        }
        if tracked.updates == 0 { tracked.phase = Phase::Persisted }

        match result {
            Ok(()) => Vec::new(),
            Err(error) => {
                warn!(%id, %error, "update failed, keeping local geometry");
                vec![Effect::Report(Notice::PersistenceFailed { id, operation: Operation::Update, error })]
            }
        }
    }

    fn on_deleted(&mut self, id: FeatureId, result: Result<(), PersistenceError>) -> Vec<Effect> {
        self.tracked.remove(&id);

        match result {
            Ok(()) => Vec::new(),
            Err(error) => {
                warn!(%id, %error, "delete failed");
                vec![Effect::Report(Notice::PersistenceFailed { id, operation: Operation::Delete, error })]
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn parent_id(&self) -> Result<ParcelId, LifecycleError> {
        self.store.parent().map(|p| p.id.clone()).ok_or(LifecycleError::NoParent)
    }

    fn candidate(&self, parent: &ParentParcel, id: FeatureId, geometry: MultiPolygon<f64>) -> SubdivisionFeature {
        let title = format!("{} {}", self.config.default_title_prefix, self.store.len() + 1);
        let mut candidate = SubdivisionFeature::new(id, parent.id.clone(), title, geometry);
        candidate.land_use_id = parent.land_use_id.clone();
        candidate
    }

    /// Send `patch` (already applied locally) to the backend, or hold it
    /// back until the create request for `id` has returned a server id.
    fn sync_edit(&mut self, parent_id: &ParcelId, id: &FeatureId, patch: FeaturePatch) -> Option<Effect> {
        let tracked = self.tracked.entry(id.clone()).or_insert_with(Tracked::persisted);

        if !tracked.persisted {
            match &mut tracked.deferred {
                Some(deferred) => deferred.merge(patch),
                None => tracked.deferred = Some(patch),
            }
            return None;
        }

        tracked.updates += 1;
        tracked.phase = Phase::Persisting;

        let request = self.issue(Pending::Update(id.clone()));
        Some(Effect::Update { request, parent_id: parent_id.clone(), id: id.clone(), patch })
    }

    fn request_create(&mut self, parent_id: &ParcelId, id: FeatureId, subdivision: NewSubdivision) -> Effect {
        if let Some(tracked) = self.tracked.get_mut(&id) { tracked.phase = Phase::Persisting }
        let request = self.issue(Pending::Create(id));
        Effect::Create { request, parent_id: parent_id.clone(), subdivision }
    }

    fn request_delete(&mut self, parent_id: &ParcelId, id: FeatureId) -> Effect {
        let request = self.issue(Pending::Delete(id.clone()));
        Effect::Delete { request, parent_id: parent_id.clone(), id }
    }

    fn issue(&mut self, pending: Pending) -> RequestId {
        self.last_request += 1;
        let request = RequestId(self.last_request);
        self.pending.insert(request, pending);
        request
    }

    fn revalidate(&mut self) {
        let errors = match self.store.parent() {
            Some(parent) => validate_all(self.store.subdivisions(), parent, &self.config.validation),
            None => Vec::new(),
        };
        debug!(count = errors.len(), "revalidated subdivisions");
        self.store.set_validation_errors(errors);
    }
}

/// Normalize the geometry of every drawn feature, failing on the first malformed one.
fn normalize(features: Vec<DrawnFeature>) -> Result<Vec<(FeatureId, MultiPolygon<f64>)>, LifecycleError> {
    features.into_iter()
        .map(|feature| {
            let geometry = feature.geometry
                .ok_or(GeometryError::Empty)
                .and_then(|raw| raw.to_multi_polygon());
            match geometry {
                Ok(geometry) => Ok((feature.id, geometry)),
                Err(source) => Err(LifecycleError::Geometry { id: feature.id, source }),
            }
        })
        .collect()
}
