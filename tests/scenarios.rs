use parcelsplit::geom::RawGeometry;
use parcelsplit::{
    validate_all, validate_subdivision, DrawEvent, ErrorKind, FeatureId, InMemoryBackend, LifecycleError,
    ParentParcel, PartyAllocation, SessionConfig, Session, SubdivisionFeature, ValidationConfig,
};

fn polygon(points: &[(f64, f64)]) -> RawGeometry {
    RawGeometry::Polygon(vec![points.iter().map(|&(x, y)| vec![x, y]).collect()])
}

fn unit_square() -> ParentParcel {
    let geometry = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
    ParentParcel::new("unit", geometry.to_multi_polygon().unwrap()).unwrap()
}

fn subdivision(id: &str, points: &[(f64, f64)]) -> SubdivisionFeature {
    let geometry = polygon(points).to_multi_polygon().unwrap();
    let mut sub = SubdivisionFeature::new(FeatureId::new(id), "unit".into(), id, geometry);
    sub.allocations = vec![PartyAllocation::new("p1", "Ana", 100.0)];
    sub
}

#[test]
fn left_half_of_unit_square_is_valid() {
    let sub = subdivision("left", &[(0.0, 0.0), (0.5, 0.0), (0.5, 1.0), (0.0, 1.0)]);
    assert_eq!(sub.size, 0.5);

    let errors = validate_subdivision(&sub, &unit_square(), &[], &ValidationConfig::default());
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn overlapping_strips_reference_both_ids() {
    let subs = vec![
        subdivision("a", &[(0.0, 0.0), (0.6, 0.0), (0.6, 1.0), (0.0, 1.0)]),
        subdivision("b", &[(0.4, 0.0), (1.0, 0.0), (1.0, 1.0), (0.4, 1.0)]),
    ];
    let errors = validate_all(&subs, &unit_square(), &ValidationConfig::default());

    let overlap = errors.iter().find(|e| e.kind == ErrorKind::Overlap).expect("no overlap reported");
    assert!(overlap.involves(&FeatureId::new("a")));
    assert!(overlap.involves(&FeatureId::new("b")));
}

#[test]
fn three_point_ring_never_reaches_the_store() {
    let mut session = Session::new(InMemoryBackend::new(), SessionConfig::default());
    session.open(unit_square()).unwrap();
    session.dispatch(DrawEvent::create("ok", polygon(&[(0.0, 0.0), (0.5, 0.0), (0.5, 1.0), (0.0, 1.0)]))).unwrap();
    let before = session.store().len();

    let err = session
        .dispatch(DrawEvent::create("tri", polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)])))
        .unwrap_err();

    assert!(matches!(err, LifecycleError::Geometry { .. }));
    assert_eq!(session.store().len(), before);
}
