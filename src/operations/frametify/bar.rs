use crate::error::{OffsetError, Result};
use crate::geometry::{Edge, Polygon};
use crate::math::{Epsilon, Point2};
use crate::operations::offset::edge_intersection;

use super::joint::Corner;

/// A profile strip between an outer edge and its offset.
///
/// The polygon's `PolyId` is `{slot, pos}`: the slot the bar belongs to and
/// its running count among the bars of that slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub polygon: Polygon,
    /// Hidden from rendering: a zero-width side or a slot flagged virtual.
    pub is_virtual: bool,
}

impl Bar {
    #[must_use]
    pub fn slot(&self) -> usize {
        self.polygon.poly_id().index
    }
}

/// A zone with its inward offset and resolved corners, ready to be cut
/// into bars.
///
/// `corners[k]` is the corner at the start of edge `k`.
pub(crate) struct ZoneOutline<'a> {
    pub zone: &'a Polygon,
    pub inner: &'a [Edge],
    pub corners: &'a [Corner],
    pub widths: &'a [f64],
}

impl ZoneOutline<'_> {
    /// Builds the bar along edge `k`: outer piece, end side, inner piece
    /// reversed, start side.
    ///
    /// Returns `None` when fewer than two non-empty pieces remain.
    pub fn create_bar(&self, k: usize, eps: &Epsilon) -> Result<Option<Polygon>> {
        let outer = self.zone.edges();
        let n = outer.len();
        let (p, q) = ((k + n - 1) % n, (k + 1) % n);
        let (o, i) = (&outer[k], &self.inner[k]);
        let meet = |a: &Edge, b: &Edge, near: &Point2| {
            edge_intersection(a, b, near, eps).ok_or_else(|| OffsetError::Degenerate {
                edge: k,
                reason: "bar side does not meet its neighbour".to_owned(),
            })
        };

        let (mut outer_start, mut inner_start) = (o.start(), i.start());
        let start_side = match self.corners[k] {
            Corner::Miter => Edge::segment(inner_start, outer_start),
            Corner::PrevThrough => {
                outer_start = meet(o, &self.inner[p], &o.start())?;
                self.inner[p].with_endpoints(inner_start, outer_start)
            }
            Corner::NextThrough => {
                inner_start = meet(i, &outer[p], &o.start())?;
                outer[p].with_endpoints(inner_start, outer_start)
            }
        };

        let (mut outer_end, mut inner_end) = (o.end(), i.end());
        let end_side = match self.corners[q] {
            Corner::Miter => Edge::segment(outer_end, inner_end),
            Corner::PrevThrough => {
                inner_end = meet(i, &outer[q], &o.end())?;
                outer[q].with_endpoints(outer_end, inner_end)
            }
            Corner::NextThrough => {
                outer_end = meet(o, &self.inner[q], &o.end())?;
                self.inner[q].with_endpoints(outer_end, inner_end)
            }
        };

        // A bar whose inner joint leaves the zone would cross itself.
        if self.widths[k] > eps.length
            && [inner_start, inner_end]
                .iter()
                .any(|pt| !self.zone.contains_point(pt) && self.zone.distance_to_boundary(pt) > eps.length)
        {
            tracing::warn!("bar {} crosses itself at a reflex corner, collapsing it", k);
            return Polygon::with_epsilon(vec![*o, o.reversed()], eps).map(Some);
        }

        let edges: Vec<Edge> = [
            o.with_endpoints(outer_start, outer_end),
            end_side,
            i.with_endpoints(inner_start, inner_end).reversed(),
            start_side,
        ]
        .into_iter()
        .filter(|e| e.length() > eps.length)
        .collect();
        if edges.len() < 2 {
            return Ok(None);
        }
        Polygon::with_epsilon(edges, eps).map(Some)
    }
}

/// The annulus framing a full-circle zone.
///
/// Returns `None` for a zero-width ring.
pub(crate) fn ring_bar(zone: &Polygon, inner: &[Edge], eps: &Epsilon) -> Result<Option<Polygon>> {
    let (Some(o), Some(i)) = (
        zone.edges().first().and_then(Edge::as_arc),
        inner.first().and_then(Edge::as_arc),
    ) else {
        return Ok(None);
    };
    if (o.radius - i.radius).abs() <= eps.length {
        return Ok(None);
    }
    Polygon::annulus(o.center, o.radius.max(i.radius), o.radius.min(i.radius)).map(Some)
}
