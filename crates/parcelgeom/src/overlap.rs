use geo::{LineString, MultiPolygon, Relate};

use crate::locate::{point_in_ring, point_in_ring_interior};
use crate::ring::shells;

/// Vertex heuristic: `true` if any vertex of `a` lies strictly inside `b`,
/// or any vertex of `b` lies strictly inside `a`.
///
/// Rings that only share edges or corners do not overlap. Two rings that
/// cross edge-to-edge without either enclosing a vertex of the other are
/// not detected; use [`interiors_overlap`] for an exact answer.
pub fn rings_overlap(a: &LineString<f64>, b: &LineString<f64>) -> bool {
    a.coords().any(|&c| point_in_ring_interior(c, b))
        || b.coords().any(|&c| point_in_ring_interior(c, a))
}

/// Vertex heuristic: `true` if every vertex of `inner` is inside `outer` or on its boundary.
pub fn ring_contained_in(inner: &LineString<f64>, outer: &LineString<f64>) -> bool {
    inner.coords().all(|&c| point_in_ring(c, outer))
}

/// Exact test: `true` if the exterior shells of `a` and `b` share interior area.
/// Shells that merely touch along an edge or at a point do not overlap.
pub fn interiors_overlap(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    let im = shells(a).relate(&shells(b));

    // Overlap (including containment/equality) = intersects but not merely touching.
    im.is_intersects() && !im.is_touches()
}

/// Exact test: `true` if the exterior shell of `inner` lies within the
/// exterior shell of `outer`. Shared boundary is allowed.
pub fn covered_by(inner: &MultiPolygon<f64>, outer: &MultiPolygon<f64>) -> bool {
    shells(inner).relate(&shells(outer)).is_within()
}
