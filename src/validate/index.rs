use geo::{BoundingRect, Rect};
use rstar::{RTree, RTreeObject, AABB};

use crate::parcel::SubdivisionFeature;

/// A bounding box in an R-tree, associated with a subdivision by index.
#[derive(Debug, Clone)]
struct BoundingBox {
    idx: usize, // Index of corresponding subdivision
    bbox: Rect<f64>,
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Bounding-box index over a slice of subdivisions, used to skip pairwise
/// overlap tests between pieces that cannot possibly touch.
#[derive(Debug)]
pub(super) struct SiblingIndex {
    rtree: RTree<BoundingBox>,
}

impl SiblingIndex {
    pub(super) fn new(subdivisions: &[SubdivisionFeature]) -> Self {
        Self {
            rtree: RTree::bulk_load(subdivisions.iter().enumerate()
                .filter_map(|(idx, sub)| sub.geometry.bounding_rect().map(|bbox| BoundingBox { idx, bbox }))
                .collect()),
        }
    }

    /// Indices of the subdivisions whose bounding boxes meet that of
    /// `subdivision`, in ascending order, excluding `idx` itself.
    pub(super) fn candidates(&self, idx: usize, subdivision: &SubdivisionFeature) -> Vec<usize> {
        let Some(rect) = subdivision.geometry.bounding_rect() else { return Vec::new() };
        let envelope = AABB::from_corners(rect.min().into(), rect.max().into());

        let mut found = self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|bbox| bbox.idx)
            .filter(|&j| j != idx)
            .collect::<Vec<_>>();
        found.sort_unstable();
        found
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;
    use crate::parcel::{FeatureId, ParcelId};

    fn rect(id: &str, x0: f64, x1: f64) -> SubdivisionFeature {
        let geometry = MultiPolygon(vec![polygon![(x: x0, y: 0.0), (x: x1, y: 0.0), (x: x1, y: 1.0), (x: x0, y: 1.0)]]);
        SubdivisionFeature::new(FeatureId::new(id), ParcelId::new("p"), id, geometry)
    }

    #[test]
    fn far_apart_boxes_are_not_candidates() {
        let subs = vec![rect("a", 0.0, 1.0), rect("b", 1.0, 2.0), rect("c", 5.0, 6.0)];
        let index = SiblingIndex::new(&subs);

        assert_eq!(index.candidates(0, &subs[0]), vec![1]);
        assert_eq!(index.candidates(1, &subs[1]), vec![0]);
        assert!(index.candidates(2, &subs[2]).is_empty());
    }
}
