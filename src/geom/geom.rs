use geo::{BoundingRect, MultiPolygon, Rect};
use rstar::{AABB, RTree, RTreeObject};

/// Rectangle of one indexed polygon, tagged with its position in the source list.
#[derive(Debug, Clone, Copy)]
struct Slot {
    pos: usize,
    rect: Rect<f64>,
}

impl RTreeObject for Slot {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope { to_aabb(&self.rect) }
}

#[inline]
fn to_aabb(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(rect.min().into(), rect.max().into())
}

/// Smallest rectangle containing both `a` and `b`.
fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
        (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
    )
}

/// R-tree over the bounding rectangles of a list of MultiPolygons, addressed by position.
#[derive(Debug, Clone)]
pub(crate) struct BoxIndex {
    rtree: RTree<Slot>,
    bounds: Option<Rect<f64>>,
}

impl BoxIndex {
    /// Index the bounding rectangles of `polygons` by position; empty polygons are skipped.
    pub(crate) fn new<'a>(polygons: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Self {
        let slots = polygons.into_iter().enumerate()
            .filter_map(|(pos, polygon)| polygon.bounding_rect().map(|rect| Slot { pos, rect }))
            .collect::<Vec<_>>();

        let bounds = slots.iter().map(|slot| slot.rect).reduce(union);

        Self { rtree: RTree::bulk_load(slots), bounds }
    }

    /// Bounding rectangle of every indexed polygon, `None` if nothing was indexed.
    #[inline] pub(crate) fn bounds(&self) -> Option<Rect<f64>> { self.bounds }

    /// Positions of polygons whose bounding rectangle intersects `rect`.
    pub(crate) fn candidates(&self, rect: &Rect<f64>) -> impl Iterator<Item = usize> + '_ {
        self.rtree.locate_in_envelope_intersecting(&to_aabb(rect))
            .map(|slot| slot.pos)
    }
}

#[cfg(test)]
mod tests {
    use geo::{Coord, MultiPolygon, polygon};

    use super::*;

    fn unit_square(x: f64, y: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0), (x: x, y: y),
        ]])
    }

    #[test]
    fn candidates_only_returns_overlapping_boxes() {
        let index = BoxIndex::new(&[unit_square(0.0, 0.0), unit_square(5.0, 5.0)]);
        let query = Rect::new(Coord { x: 0.5, y: 0.5 }, Coord { x: 2.0, y: 2.0 });

        let found = index.candidates(&query).collect::<Vec<_>>();
        assert_eq!(found, vec![0]);
    }

    #[test]
    fn empty_polygons_keep_positions_of_the_rest() {
        let polygons = [MultiPolygon::<f64>(vec![]), unit_square(3.0, 3.0)];
        let index = BoxIndex::new(&polygons);
        let query = Rect::new(Coord { x: 3.5, y: 3.5 }, Coord { x: 3.6, y: 3.6 });

        assert_eq!(index.candidates(&query).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn bounds_cover_all_polygons() {
        let index = BoxIndex::new(&[unit_square(0.0, 0.0), unit_square(5.0, -3.0)]);
        let bounds = index.bounds().unwrap();
        assert_eq!(bounds.min(), Coord { x: 0.0, y: -3.0 });
        assert_eq!(bounds.max(), Coord { x: 6.0, y: 1.0 });
    }

    #[test]
    fn empty_index_has_no_bounds() {
        assert!(BoxIndex::new(&[] as &[MultiPolygon<f64>]).bounds().is_none());
    }
}
