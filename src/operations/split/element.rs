use slotmap::SlotMap;

use crate::error::{Result, SplitError};
use crate::geometry::{Edge, Polygon};
use crate::math::Epsilon;

slotmap::new_key_type! {
    /// Unique identifier for an element in a [`ShapeElements`] arena.
    pub struct ElementId;
}

/// Where an element's edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// A piece of the source polygon's edge with this index.
    Source(usize),
    /// Part of a bridge inserted along the cut.
    Bridge,
}

/// A node of the doubly linked boundary list.
#[derive(Debug, Clone)]
pub struct ShapeElement {
    pub edge: Edge,
    pub origin: EdgeOrigin,
    pub next: Option<ElementId>,
    pub prev: Option<ElementId>,
    /// Set once the element has been collected into a loop.
    pub visited: bool,
}

/// Point on the boundary where a bridge attaches: the element ending there
/// and the element starting there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Junction {
    pub incoming: ElementId,
    pub outgoing: ElementId,
}

/// One closed loop collected after splicing bridges, with the origin of
/// each of its edges.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub polygon: Polygon,
    pub origins: Vec<EdgeOrigin>,
}

/// Arena owning every element created for one split.
#[derive(Debug, Default)]
pub struct ShapeElements {
    elements: SlotMap<ElementId, ShapeElement>,
}

impl ShapeElements {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an unlinked element and returns its ID.
    pub fn insert(&mut self, edge: Edge, origin: EdgeOrigin) -> ElementId {
        self.elements.insert(ShapeElement {
            edge,
            origin,
            next: None,
            prev: None,
            visited: false,
        })
    }

    /// Returns the element, or an error if it is not in this arena.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidCut` for an unknown ID.
    pub fn element(&self, id: ElementId) -> Result<&ShapeElement> {
        self.elements
            .get(id)
            .ok_or_else(|| SplitError::InvalidCut("element not found".to_owned()).into())
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut ShapeElement> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| SplitError::InvalidCut("element not found".to_owned()).into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn next(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id).and_then(|e| e.next)
    }

    #[must_use]
    pub fn prev(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id).and_then(|e| e.prev)
    }

    /// Makes `to` follow `from`.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidCut` if either ID is unknown.
    pub fn link(&mut self, from: ElementId, to: ElementId) -> Result<()> {
        self.element(to)?;
        self.element_mut(from)?.next = Some(to);
        self.element_mut(to)?.prev = Some(from);
        Ok(())
    }

    /// Links `ids` in order; unless `is_open`, the last links back to the
    /// first so the list forms a single cycle.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidCut` if an ID is unknown.
    pub fn double_linked(&mut self, ids: &[ElementId], is_open: bool) -> Result<()> {
        for pair in ids.windows(2) {
            self.link(pair[0], pair[1])?;
        }
        if !is_open {
            if let (Some(&first), Some(&last)) = (ids.first(), ids.last()) {
                self.link(last, first)?;
            }
        }
        Ok(())
    }

    /// Splices a bridge running `from → to` along `path`, and its reverse,
    /// into the boundary cycle.
    ///
    /// The cycle through both junctions is cut in two: one loop takes the
    /// forward bridge, the other the reverse.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidCut` for an empty path or unknown IDs.
    pub fn create_bridge(&mut self, path: &[Edge], from: Junction, to: Junction) -> Result<()> {
        if path.is_empty() {
            return Err(SplitError::InvalidCut("bridge path is empty".to_owned()).into());
        }
        let forward: Vec<ElementId> = path
            .iter()
            .map(|e| self.insert(*e, EdgeOrigin::Bridge))
            .collect();
        let backward: Vec<ElementId> = path
            .iter()
            .rev()
            .map(|e| self.insert(e.reversed(), EdgeOrigin::Bridge))
            .collect();
        self.double_linked(&forward, true)?;
        self.double_linked(&backward, true)?;

        let (fwd_first, fwd_last) = (forward[0], forward[forward.len() - 1]);
        let (back_first, back_last) = (backward[0], backward[backward.len() - 1]);
        self.link(from.incoming, fwd_first)?;
        self.link(fwd_last, to.outgoing)?;
        self.link(to.incoming, back_first)?;
        self.link(back_last, from.outgoing)?;
        Ok(())
    }

    /// Walks every unvisited element around its loop and returns one
    /// fragment per loop.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidCut` if a chain is open or two loops
    /// share an element, and `GeometryError::MalformedPolygon` if a loop
    /// does not close geometrically.
    pub fn collect_polys(&mut self, eps: &Epsilon) -> Result<Vec<Fragment>> {
        let ids: Vec<ElementId> = self.elements.keys().collect();
        let limit = ids.len();
        let mut fragments = Vec::new();

        for start in ids {
            if self.element(start)?.visited {
                continue;
            }
            let mut edges = Vec::new();
            let mut origins = Vec::new();
            let mut current = start;
            loop {
                let element = self.element_mut(current)?;
                if element.visited {
                    return Err(SplitError::InvalidCut("loops share an element".to_owned()).into());
                }
                element.visited = true;
                edges.push(element.edge);
                origins.push(element.origin);
                current = element
                    .next
                    .ok_or_else(|| SplitError::InvalidCut("boundary chain is open".to_owned()))?;
                if current == start {
                    break;
                }
                if edges.len() > limit {
                    return Err(SplitError::InvalidCut("boundary walk does not terminate".to_owned()).into());
                }
            }
            fragments.push(Fragment {
                polygon: Polygon::with_epsilon(edges, eps)?,
                origins,
            });
        }
        Ok(fragments)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    fn square_elements(arena: &mut ShapeElements) -> Vec<ElementId> {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        (0..pts.len())
            .map(|i| arena.insert(Edge::segment(pts[i], pts[(i + 1) % pts.len()]), EdgeOrigin::Source(i)))
            .collect()
    }

    #[test]
    fn double_linked_forms_single_cycle() {
        let mut arena = ShapeElements::new();
        let ids = square_elements(&mut arena);
        arena.double_linked(&ids, false).unwrap();
        for &start in &ids {
            let mut current = start;
            for _ in 0..ids.len() {
                current = arena.next(current).unwrap();
            }
            assert_eq!(current, start);
            assert_eq!(arena.next(arena.prev(start).unwrap()), Some(start));
        }
    }

    #[test]
    fn open_list_has_free_ends() {
        let mut arena = ShapeElements::new();
        let ids = square_elements(&mut arena);
        arena.double_linked(&ids, true).unwrap();
        assert!(arena.prev(ids[0]).is_none());
        assert!(arena.next(ids[ids.len() - 1]).is_none());
        assert!(arena.collect_polys(&Epsilon::default()).is_err());
    }

    #[test]
    fn bridge_splits_cycle_in_two() {
        let mut arena = ShapeElements::new();
        let ids = square_elements(&mut arena);
        arena.double_linked(&ids, false).unwrap();
        // Bridge from (1,0) up to (1,2).
        let from = Junction {
            incoming: ids[0],
            outgoing: ids[1],
        };
        let to = Junction {
            incoming: ids[3],
            outgoing: ids[4],
        };
        let path = [Edge::segment(Point2::new(1.0, 0.0), Point2::new(1.0, 2.0))];
        arena.create_bridge(&path, from, to).unwrap();
        assert_eq!(arena.len(), 8);

        let fragments = arena.collect_polys(&Epsilon::default()).unwrap();
        assert_eq!(fragments.len(), 2);
        for f in &fragments {
            assert_abs_diff_eq!(f.polygon.area(), 2.0, epsilon = 1e-12);
            assert_eq!(f.origins.iter().filter(|o| **o == EdgeOrigin::Bridge).count(), 1);
        }
    }

    #[test]
    fn empty_bridge_is_rejected() {
        let mut arena = ShapeElements::new();
        let ids = square_elements(&mut arena);
        let j = Junction {
            incoming: ids[0],
            outgoing: ids[1],
        };
        assert!(arena.create_bridge(&[], j, j).is_err());
    }
}
