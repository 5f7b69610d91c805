use geo::{BoundingRect, Contains, MultiPolygon, Point, Rect};
use rstar::{RTree, RTreeObject, AABB};

#[derive(Debug, Clone)]
struct BoundingBox {
    idx: usize, // Index of corresponding MultiPolygon in the collection
    bbox: Rect<f64>,
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Spatial index over feature boundaries, used to turn a map click into a feature.
#[derive(Debug, Clone)]
pub(crate) struct BoundaryIndex {
    rtree: RTree<BoundingBox>,
    bounds: Option<Rect<f64>>,
}

impl BoundaryIndex {
    /// Index a slice of boundaries. Empty boundaries are skipped; they can never be hit.
    pub(crate) fn new<'a>(shapes: impl Iterator<Item = &'a MultiPolygon<f64>>) -> Self {
        let boxes: Vec<BoundingBox> = shapes.enumerate()
            .filter_map(|(idx, shape)| shape.bounding_rect().map(|bbox| BoundingBox { idx, bbox }))
            .collect();

        let bounds = boxes.iter()
            .map(|b| b.bbox)
            .reduce(|acc, r| Rect::new(
                (acc.min().x.min(r.min().x), acc.min().y.min(r.min().y)),
                (acc.max().x.max(r.max().x), acc.max().y.max(r.max().y)),
            ));

        Self { rtree: RTree::bulk_load(boxes), bounds }
    }

    /// Bounding rectangle of every indexed boundary, if any.
    #[inline] pub(crate) fn bounds(&self) -> Option<Rect<f64>> { self.bounds }

    /// Index of the first shape (in collection order) whose boundary contains `pt`.
    pub(crate) fn locate<'a>(
        &self,
        pt: Point<f64>,
        shape: impl Fn(usize) -> Option<&'a MultiPolygon<f64>>,
    ) -> Option<usize> {
        let env = AABB::from_corners([pt.x(), pt.y()], [pt.x(), pt.y()]);

        // Candidates come back in tree order; pick the lowest index for determinism.
        self.rtree.locate_in_envelope_intersecting(&env)
            .map(|bb| bb.idx)
            .filter(|&i| shape(i).is_some_and(|s| s.contains(&pt)))
            .min()
    }
}
