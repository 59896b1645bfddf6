use crate::parcel::{FeatureId, FeaturePatch, ParentParcel, SubdivisionFeature};
use crate::validate::ValidationError;

/// In-memory state of one subdivision session: the parent parcel, its
/// subdivisions in insertion order, the current selection, and the most
/// recently computed validation findings.
///
/// Mutations never run validation; the lifecycle controller does that.
#[derive(Debug, Clone, Default)]
pub struct SubdivisionStore {
    parent: Option<ParentParcel>,
    subdivisions: Vec<SubdivisionFeature>,
    selected: Option<FeatureId>,
    validation_errors: Vec<ValidationError>,
}

impl SubdivisionStore {
    /// Create an empty store with no parent.
    pub fn new() -> Self { Self::default() }

    /// Create a store for `parent`.
    pub fn with_parent(parent: ParentParcel) -> Self {
        Self { parent: Some(parent), ..Self::default() }
    }

    /// Get the parent parcel, if one is set.
    #[inline] pub fn parent(&self) -> Option<&ParentParcel> { self.parent.as_ref() }

    /// Get the subdivisions in insertion order.
    #[inline] pub fn subdivisions(&self) -> &[SubdivisionFeature] { &self.subdivisions }

    /// Get the selected subdivision id.
    #[inline] pub fn selected(&self) -> Option<&FeatureId> { self.selected.as_ref() }

    /// Get the findings of the last validation run.
    #[inline] pub fn validation_errors(&self) -> &[ValidationError] { &self.validation_errors }

    /// Get the number of subdivisions.
    #[inline] pub fn len(&self) -> usize { self.subdivisions.len() }

    /// Check if there are no subdivisions.
    #[inline] pub fn is_empty(&self) -> bool { self.subdivisions.is_empty() }

    /// Look up a subdivision by id.
    #[inline]
    pub fn get(&self, id: &FeatureId) -> Option<&SubdivisionFeature> {
        self.subdivisions.iter().find(|s| &s.id == id)
    }

    /// Check if a subdivision with `id` exists.
    #[inline] pub fn contains(&self, id: &FeatureId) -> bool { self.get(id).is_some() }

    /// Get the selected subdivision.
    #[inline]
    pub fn selected_subdivision(&self) -> Option<&SubdivisionFeature> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Sum of allocation shares of subdivision `id`, for display.
    #[inline]
    pub fn total_share(&self, id: &FeatureId) -> Option<f64> {
        self.get(id).map(SubdivisionFeature::total_share)
    }

    /// Set the parent parcel. Switching to a different parcel starts a new
    /// session: subdivisions, selection and findings are cleared.
    pub fn set_parent(&mut self, parent: ParentParcel) {
        if self.parent.as_ref().is_some_and(|p| p.id != parent.id) {
            self.subdivisions.clear();
            self.selected = None;
            self.validation_errors.clear();
        }
        self.parent = Some(parent);
    }

    /// Add a subdivision. An existing entry with the same id is replaced in place.
    pub fn add(&mut self, subdivision: SubdivisionFeature) {
        match self.position(&subdivision.id) {
            Some(i) => self.subdivisions[i] = subdivision,
            None => self.subdivisions.push(subdivision),
        }
    }

    /// Apply `patch` to subdivision `id`. Returns `false` if there is no such subdivision.
    pub fn update(&mut self, id: &FeatureId, patch: &FeaturePatch) -> bool {
        let Some(i) = self.position(id) else { return false };
        self.subdivisions[i].apply(patch);
        true
    }

    /// Remove subdivision `id`, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: &FeatureId) -> Option<SubdivisionFeature> {
        let i = self.position(id)?;
        if self.selected.as_ref() == Some(id) { self.selected = None }
        Some(self.subdivisions.remove(i))
    }

    /// Select subdivision `id`, or clear the selection with `None`.
    /// Returns `false` (and leaves the selection unchanged) for an unknown id.
    pub fn select(&mut self, id: Option<FeatureId>) -> bool {
        match id {
            Some(id) if !self.contains(&id) => false,
            id => { self.selected = id; true }
        }
    }

    /// Replace every subdivision with `subdivisions` (bulk load from the backend).
    /// The selection survives only if its id is still present.
    pub fn replace_all(&mut self, subdivisions: Vec<SubdivisionFeature>) {
        self.subdivisions = subdivisions;
        if self.selected.as_ref().is_some_and(|id| !self.contains(id)) { self.selected = None }
    }

    /// Change the id of subdivision `old` to `new`, carrying the selection along.
    /// Returns `false` if `old` is unknown.
    pub fn rekey(&mut self, old: &FeatureId, new: FeatureId) -> bool {
        let Some(i) = self.position(old) else { return false };
        if self.selected.as_ref() == Some(old) { self.selected = Some(new.clone()) }
        self.subdivisions[i].id = new;
        true
    }

    /// Store the findings of a validation run.
    #[inline]
    pub fn set_validation_errors(&mut self, errors: Vec<ValidationError>) {
        self.validation_errors = errors;
    }

    fn position(&self, id: &FeatureId) -> Option<usize> {
        self.subdivisions.iter().position(|s| &s.id == id)
    }
}
