use ahash::AHashSet;
use parcelgeom::{covered_by, interiors_overlap, outer_rings, ring_contained_in, rings_overlap};

use crate::parcel::{ParentParcel, SubdivisionFeature};
use crate::validate::index::SiblingIndex;
use crate::validate::{ErrorKind, OverlapTest, ValidationConfig, ValidationError};

/// Check one subdivision against its parent and its siblings.
///
/// Emits at most one `OutOfBounds`, one `Overlap` per overlapping sibling
/// (siblings with the same id as `subdivision` are skipped), and at most one
/// `InvalidAllocation`, in that order.
pub fn validate_subdivision(
    subdivision: &SubdivisionFeature,
    parent: &ParentParcel,
    siblings: &[SubdivisionFeature],
    config: &ValidationConfig,
) -> Vec<ValidationError> {
    validate_against(subdivision, parent, siblings.iter(), config)
}

/// Check every subdivision against the parent and each other, then check
/// that their areas add up to the parent's area.
pub fn validate_all(
    subdivisions: &[SubdivisionFeature],
    parent: &ParentParcel,
    config: &ValidationConfig,
) -> Vec<ValidationError> {
    let index = SiblingIndex::new(subdivisions);

    let mut errors = subdivisions.iter().enumerate()
        .flat_map(|(i, subdivision)| {
            let siblings = index.candidates(i, subdivision).into_iter().map(|j| &subdivisions[j]);
            validate_against(subdivision, parent, siblings, config)
        })
        .collect::<Vec<_>>();

    errors.extend(check_area_conservation(subdivisions, parent, config));
    errors
}

fn validate_against<'a>(
    subdivision: &SubdivisionFeature,
    parent: &ParentParcel,
    siblings: impl IntoIterator<Item = &'a SubdivisionFeature>,
    config: &ValidationConfig,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_contained(subdivision, parent, config.overlap_test) {
        errors.push(ValidationError::new(
            ErrorKind::OutOfBounds,
            format!("Subdivision '{}' extends beyond parent parcel {}", subdivision.title, parent.id),
            vec![subdivision.id.clone()],
        ));
    }

    for sibling in siblings {
        if sibling.id == subdivision.id { continue }
        if overlaps(subdivision, sibling, config.overlap_test) {
            errors.push(ValidationError::new(
                ErrorKind::Overlap,
                format!("Subdivision '{}' overlaps subdivision '{}' ({})", subdivision.title, sibling.title, sibling.id),
                vec![subdivision.id.clone(), sibling.id.clone()],
            ));
        }
    }

    errors.extend(check_allocations(subdivision, config));
    errors
}

fn is_contained(subdivision: &SubdivisionFeature, parent: &ParentParcel, test: OverlapTest) -> bool {
    match test {
        OverlapTest::Interiors => covered_by(&subdivision.geometry, &parent.geometry),
        OverlapTest::Vertices => outer_rings(&subdivision.geometry)
            .all(|ring| outer_rings(&parent.geometry).any(|outer| ring_contained_in(ring, outer))),
    }
}

fn overlaps(a: &SubdivisionFeature, b: &SubdivisionFeature, test: OverlapTest) -> bool {
    match test {
        OverlapTest::Interiors => interiors_overlap(&a.geometry, &b.geometry),
        OverlapTest::Vertices => outer_rings(&a.geometry)
            .any(|ra| outer_rings(&b.geometry).any(|rb| rings_overlap(ra, rb))),
    }
}

/// At most one finding per subdivision: a wrong total takes precedence over
/// out-of-range shares and repeated parties.
fn check_allocations(subdivision: &SubdivisionFeature, config: &ValidationConfig) -> Option<ValidationError> {
    let total = subdivision.total_share();

    let problem = if total != config.share_total {
        format!("Allocations of '{}' sum to {}%, expected {}%", subdivision.title, total, config.share_total)
    } else if let Some(a) = subdivision.allocations.iter().find(|a| !(0.0..=100.0).contains(&a.share)) {
        format!("Share of {} in '{}' is {}%, outside [0, 100]", a.name, subdivision.title, a.share)
    } else {
        let mut seen = AHashSet::new();
        let repeated = subdivision.allocations.iter().find(|a| !seen.insert(a.party_id.as_str()))?;
        format!("Party {} is allocated more than once in '{}'", repeated.party_id, subdivision.title)
    };

    Some(ValidationError::new(ErrorKind::InvalidAllocation, problem, vec![subdivision.id.clone()]))
}

fn check_area_conservation(
    subdivisions: &[SubdivisionFeature],
    parent: &ParentParcel,
    config: &ValidationConfig,
) -> Option<ValidationError> {
    if subdivisions.is_empty() { return None }

    let parent_area = parent.area();
    let total = subdivisions.iter().map(|s| parcelgeom::multi_polygon_area(&s.geometry)).sum::<f64>();
    let diff = (parent_area - total).abs();
    if diff <= config.area_tolerance * parent_area { return None }

    Some(ValidationError::new(
        ErrorKind::InvalidGeometry,
        format!(
            "Subdivision areas sum to {total} but parent parcel {} has area {parent_area} (difference {diff})",
            parent.id,
        ),
        subdivisions.iter().map(|s| s.id.clone()).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;
    use crate::parcel::{FeatureId, PartyAllocation};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]])
    }

    fn parent() -> ParentParcel {
        ParentParcel::new("parent", rect(0.0, 0.0, 20.0, 20.0)).unwrap()
    }

    fn sub(id: &str, geometry: MultiPolygon<f64>) -> SubdivisionFeature {
        let mut sub = SubdivisionFeature::new(FeatureId::new(id), "parent".into(), id, geometry);
        sub.allocations = vec![PartyAllocation::new("owner", "Owner", 100.0)];
        sub
    }

    fn kinds(errors: &[ValidationError]) -> Vec<ErrorKind> {
        errors.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn self_is_not_a_sibling() {
        let a = sub("a", rect(0.0, 0.0, 10.0, 20.0));
        let errors = validate_subdivision(&a, &parent(), std::slice::from_ref(&a), &ValidationConfig::default());
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn adjacent_halves_are_valid() {
        let subs = vec![sub("a", rect(0.0, 0.0, 10.0, 20.0)), sub("b", rect(10.0, 0.0, 20.0, 20.0))];
        for overlap_test in [OverlapTest::Interiors, OverlapTest::Vertices] {
            let config = ValidationConfig { overlap_test, ..Default::default() };
            assert!(validate_all(&subs, &parent(), &config).is_empty(), "{overlap_test:?}");
        }
    }

    #[test]
    fn overlap_is_reported_from_both_sides() {
        let subs = vec![sub("a", rect(0.0, 0.0, 12.0, 20.0)), sub("b", rect(8.0, 0.0, 20.0, 20.0))];
        let errors = validate_all(&subs, &parent(), &ValidationConfig::default());

        let overlaps = errors.iter().filter(|e| e.kind == ErrorKind::Overlap).collect::<Vec<_>>();
        assert_eq!(overlaps.len(), 2);
        assert_eq!(overlaps[0].features, vec![FeatureId::new("a"), FeatureId::new("b")]);
        assert_eq!(overlaps[1].features, vec![FeatureId::new("b"), FeatureId::new("a")]);
    }

    #[test]
    fn crossing_bars_need_the_exact_test() {
        let subs = vec![sub("h", rect(0.0, 8.0, 20.0, 12.0)), sub("v", rect(8.0, 0.0, 12.0, 20.0))];

        let exact = validate_all(&subs, &parent(), &ValidationConfig::default());
        assert!(kinds(&exact).contains(&ErrorKind::Overlap));

        let heuristic = ValidationConfig { overlap_test: OverlapTest::Vertices, ..Default::default() };
        assert!(!kinds(&validate_all(&subs, &parent(), &heuristic)).contains(&ErrorKind::Overlap));
    }

    #[test]
    fn out_of_range_share_is_one_finding() {
        let mut a = sub("a", rect(0.0, 0.0, 20.0, 20.0));
        a.allocations = vec![PartyAllocation::new("1", "Ana", 120.0), PartyAllocation::new("2", "Ben", -20.0)];
        let errors = validate_all(&[a], &parent(), &ValidationConfig::default());
        assert_eq!(kinds(&errors), vec![ErrorKind::InvalidAllocation]);
        assert!(errors[0].message.contains("Ana"));
    }

    #[test]
    fn repeated_party_is_one_finding() {
        let mut a = sub("a", rect(0.0, 0.0, 20.0, 20.0));
        a.allocations = vec![PartyAllocation::new("1", "Ana", 50.0), PartyAllocation::new("1", "Ana", 50.0)];
        let errors = validate_all(&[a], &parent(), &ValidationConfig::default());
        assert_eq!(kinds(&errors), vec![ErrorKind::InvalidAllocation]);
    }

    #[test]
    fn empty_allocations_are_invalid() {
        let mut a = sub("a", rect(0.0, 0.0, 20.0, 20.0));
        a.allocations.clear();
        let errors = validate_all(&[a], &parent(), &ValidationConfig::default());
        assert_eq!(kinds(&errors), vec![ErrorKind::InvalidAllocation]);
        assert!(errors[0].message.contains("sum to 0%"), "{}", errors[0].message);
    }

    #[test]
    fn no_subdivisions_means_no_findings() {
        assert!(validate_all(&[], &parent(), &ValidationConfig::default()).is_empty());
    }

    #[test]
    fn area_gap_within_tolerance_is_accepted() {
        // 400 * 0.001 = 0.4 of slack
        let subs = vec![sub("a", rect(0.0, 0.0, 20.0, 19.99))];
        assert!(validate_all(&subs, &parent(), &ValidationConfig::default()).is_empty());
    }

    #[test]
    fn invalid_geometry_references_every_subdivision() {
        let subs = vec![sub("a", rect(0.0, 0.0, 10.0, 20.0)), sub("b", rect(10.0, 0.0, 15.0, 20.0))];
        let errors = validate_all(&subs, &parent(), &ValidationConfig::default());
        assert_eq!(kinds(&errors), vec![ErrorKind::InvalidGeometry]);
        assert_eq!(errors[0].features.len(), 2);
    }
}
