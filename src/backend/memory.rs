use ahash::{AHashMap, AHashSet};

use crate::backend::{Operation, PersistenceError, SubdivisionBackend};
use crate::parcel::{FeatureId, FeaturePatch, NewSubdivision, ParcelId, SubdivisionFeature};

/// A process-local backend keeping subdivisions per parent in memory.
///
/// Server ids are `srv-1`, `srv-2`, ... in creation order. Individual
/// operations can be switched to fail, for exercising rollback paths.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    parcels: AHashMap<ParcelId, Vec<SubdivisionFeature>>,
    failing: AHashSet<Operation>,
    next_id: u64,
}

impl InMemoryBackend {
    pub fn new() -> Self { Self::default() }

    /// Seed the backend with already persisted subdivisions of `parent_id`.
    pub fn with_subdivisions(mut self, parent_id: ParcelId, subdivisions: Vec<SubdivisionFeature>) -> Self {
        self.parcels.insert(parent_id, subdivisions);
        self
    }

    /// Make every subsequent `operation` fail until [`recover`](Self::recover) is called.
    #[inline] pub fn fail_on(&mut self, operation: Operation) { self.failing.insert(operation); }

    /// Let `operation` succeed again.
    #[inline] pub fn recover(&mut self, operation: Operation) { self.failing.remove(&operation); }

    /// The persisted subdivisions of `parent_id`.
    #[inline]
    pub fn subdivisions(&self, parent_id: &ParcelId) -> &[SubdivisionFeature] {
        self.parcels.get(parent_id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn check(&self, operation: Operation) -> Result<(), PersistenceError> {
        if self.failing.contains(&operation) {
            return Err(PersistenceError::Rejected(operation, "injected failure".into()))
        }
        Ok(())
    }

    fn find_mut(&mut self, parent_id: &ParcelId, id: &FeatureId) -> Result<&mut SubdivisionFeature, PersistenceError> {
        self.parcels.get_mut(parent_id)
            .and_then(|subs| subs.iter_mut().find(|s| &s.id == id))
            .ok_or_else(|| PersistenceError::NotFound(id.clone()))
    }
}

impl SubdivisionBackend for InMemoryBackend {
    fn create_subdivision(&mut self, parent_id: &ParcelId, subdivision: NewSubdivision)
        -> Result<SubdivisionFeature, PersistenceError>
    {
        self.check(Operation::Create)?;

        self.next_id += 1;
        let created = subdivision.with_id(FeatureId::from(format!("srv-{}", self.next_id)));
        self.parcels.entry(parent_id.clone()).or_default().push(created.clone());
        Ok(created)
    }

    fn update_subdivision(&mut self, parent_id: &ParcelId, id: &FeatureId, patch: &FeaturePatch)
        -> Result<(), PersistenceError>
    {
        self.check(Operation::Update)?;
        self.find_mut(parent_id, id)?.apply(patch);
        Ok(())
    }

    fn delete_subdivision(&mut self, parent_id: &ParcelId, id: &FeatureId)
        -> Result<(), PersistenceError>
    {
        self.check(Operation::Delete)?;

        let subs = self.parcels.get_mut(parent_id).ok_or_else(|| PersistenceError::NotFound(id.clone()))?;
        let i = subs.iter().position(|s| &s.id == id).ok_or_else(|| PersistenceError::NotFound(id.clone()))?;
        subs.remove(i);
        Ok(())
    }

    fn list_subdivisions(&mut self, parent_id: &ParcelId)
        -> Result<Vec<SubdivisionFeature>, PersistenceError>
    {
        self.check(Operation::List)?;
        Ok(self.subdivisions(parent_id).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;

    fn draft() -> NewSubdivision {
        let geometry = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)]]);
        SubdivisionFeature::new(FeatureId::local(), ParcelId::new("p"), "Lot", geometry).to_new()
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let mut backend = InMemoryBackend::new();
        let parent = ParcelId::new("p");
        assert_eq!(backend.create_subdivision(&parent, draft()).unwrap().id, FeatureId::new("srv-1"));
        assert_eq!(backend.create_subdivision(&parent, draft()).unwrap().id, FeatureId::new("srv-2"));
        assert_eq!(backend.list_subdivisions(&parent).unwrap().len(), 2);
    }

    #[test]
    fn injected_failure_can_be_lifted() {
        let mut backend = InMemoryBackend::new();
        let parent = ParcelId::new("p");
        backend.fail_on(Operation::Create);
        assert!(matches!(
            backend.create_subdivision(&parent, draft()),
            Err(PersistenceError::Rejected(Operation::Create, _)),
        ));
        backend.recover(Operation::Create);
        assert!(backend.create_subdivision(&parent, draft()).is_ok());
    }

    #[test]
    fn missing_subdivision_is_not_found() {
        let mut backend = InMemoryBackend::new();
        let parent = ParcelId::new("p");
        let id = FeatureId::new("ghost");
        assert_eq!(backend.delete_subdivision(&parent, &id), Err(PersistenceError::NotFound(id.clone())));
        assert_eq!(
            backend.update_subdivision(&parent, &id, &FeaturePatch::default()),
            Err(PersistenceError::NotFound(id)),
        );
    }
}
