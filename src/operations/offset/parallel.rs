use std::f64::consts::PI;

use crate::error::{GeometryError, OffsetError, Result};
use crate::geometry::{Edge, Orientation};
use crate::math::polygon_2d::{cross, left_normal};
use crate::math::{Epsilon, Point2};

use super::intersection::edge_intersection;

/// Offsets every edge of a chain by its own distance and re-resolves the
/// shared vertices.
///
/// Segments move along their normal, arcs change radius around the same
/// center. Each joint is recomputed from its two neighbours only, so the
/// cost is linear in the number of edges.
#[derive(Debug, Clone)]
pub struct ParallelEdges<'a> {
    edges: &'a [Edge],
    offsets: &'a [f64],
    orientation: Orientation,
    inward: bool,
    closed: bool,
    epsilon: Epsilon,
}

impl<'a> ParallelEdges<'a> {
    /// Creates an inward offset of a closed chain with default tolerances.
    ///
    /// `offsets` holds one distance per edge, or a single value applied to
    /// every edge.
    #[must_use]
    pub fn new(edges: &'a [Edge], offsets: &'a [f64], orientation: Orientation) -> Self {
        Self {
            edges,
            offsets,
            orientation,
            inward: true,
            closed: true,
            epsilon: Epsilon::DEFAULT,
        }
    }

    /// Offsets towards the interior (`true`) or the exterior (`false`).
    #[must_use]
    pub fn inward(mut self, inward: bool) -> Self {
        self.inward = inward;
        self
    }

    /// Whether the last edge joins back to the first.
    #[must_use]
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: Epsilon) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Executes the offset, returning one edge per input edge.
    ///
    /// Neighbours meeting at a tangent joint with different offsets are not
    /// joined; [`close_steps`] bridges the resulting steps.
    ///
    /// # Errors
    ///
    /// Returns `OffsetError::CountMismatch` if the offsets cannot be matched
    /// to the edges, and `OffsetError::Degenerate` if an arc collapses, an
    /// edge flips over, or two neighbours no longer meet.
    pub fn execute(&self) -> Result<Vec<Edge>> {
        let eps = &self.epsilon;
        let n = self.edges.len();
        if n == 0 {
            return Err(GeometryError::MalformedPolygon("no edges to offset".to_owned()).into());
        }
        let offsets = broadcast(self.offsets, n)?;

        // Interior lies on the left of a counter-clockwise loop.
        let side = if self.inward == (self.orientation == Orientation::CounterClockwise) {
            1.0
        } else {
            -1.0
        };

        if n == 1 && self.closed && self.edges[0].is_full_circle() {
            return Ok(vec![shift_edge(&self.edges[0], side * offsets[0], 0, eps)?]);
        }

        let shifted = self
            .edges
            .iter()
            .zip(&offsets)
            .enumerate()
            .map(|(i, (e, o))| shift_edge(e, side * o, i, eps))
            .collect::<Result<Vec<_>>>()?;

        let mut starts: Vec<Point2> = shifted.iter().map(Edge::start).collect();
        let mut ends: Vec<Point2> = shifted.iter().map(Edge::end).collect();
        let first_joint = usize::from(!self.closed);
        for i in first_joint..n {
            let prev = (i + n - 1) % n;
            let vertex = self.edges[i].start();
            match resolve_joint(&shifted[prev], &shifted[i], &vertex, eps) {
                Some(joint) => {
                    ends[prev] = joint;
                    starts[i] = joint;
                }
                // Tangent neighbours offset by different distances keep
                // their own ends and leave a step.
                None if is_smooth(&self.edges[prev], &self.edges[i], eps) => {}
                None => {
                    return Err(OffsetError::Degenerate {
                        edge: i,
                        reason: "offset neighbours no longer meet".to_owned(),
                    }
                    .into())
                }
            }
        }

        let mut result = Vec::with_capacity(n);
        for (i, e) in shifted.iter().enumerate() {
            let trimmed = e.with_endpoints(starts[i], ends[i]);
            check_inversion(&self.edges[i], &trimmed, i, eps)?;
            result.push(trimmed);
        }
        Ok(check_small_arc(result, eps))
    }
}

/// Functional form of [`ParallelEdges`].
///
/// # Errors
///
/// See [`ParallelEdges::execute`].
pub fn find_parallel_edges(
    edges: &[Edge],
    offsets: &[f64],
    inward: bool,
    orientation: Orientation,
    closed: bool,
    eps: &Epsilon,
) -> Result<Vec<Edge>> {
    ParallelEdges::new(edges, offsets, orientation)
        .inward(inward)
        .closed(closed)
        .epsilon(*eps)
        .execute()
}

/// Recomputes the vertex shared by `edges[index - 1]` and `edges[index]`
/// after one of them moved.
///
/// For an open chain index 0 has no joint and the chain is returned as is.
///
/// # Errors
///
/// Returns `OffsetError::Degenerate` if the index is out of range or the two
/// neighbours no longer meet.
pub fn rejoin_at(edges: &[Edge], index: usize, closed: bool, eps: &Epsilon) -> Result<Vec<Edge>> {
    let n = edges.len();
    if index >= n {
        return Err(OffsetError::Degenerate {
            edge: index,
            reason: format!("joint out of range for {n} edges"),
        }
        .into());
    }
    let mut out = edges.to_vec();
    if n == 1 || (!closed && index == 0) {
        return Ok(out);
    }
    let prev = (index + n - 1) % n;
    let near = nalgebra::center(&edges[prev].end(), &edges[index].start());
    let joint = resolve_joint(&edges[prev], &edges[index], &near, eps).ok_or_else(|| {
        OffsetError::Degenerate {
            edge: index,
            reason: "neighbours no longer meet".to_owned(),
        }
    })?;
    out[prev] = edges[prev].with_endpoints(edges[prev].start(), joint);
    out[index] = edges[index].with_endpoints(joint, edges[index].end());
    Ok(out)
}

/// Inserts a straight connector wherever an edge does not end where the
/// next one starts.
#[must_use]
pub fn close_steps(edges: Vec<Edge>, closed: bool, eps: &Epsilon) -> Vec<Edge> {
    let n = edges.len();
    let mut out = Vec::with_capacity(n + 2);
    for (i, edge) in edges.iter().enumerate() {
        out.push(*edge);
        if i + 1 == n && !closed {
            break;
        }
        let next = edges[(i + 1) % n].start();
        if !eps.same_point(&edge.end(), &next) {
            out.push(Edge::segment(edge.end(), next));
        }
    }
    out
}

fn is_smooth(prev: &Edge, next: &Edge, eps: &Epsilon) -> bool {
    let (a, b) = (prev.end_tangent(), next.start_tangent());
    cross(&a, &b).abs() < eps.angle && a.dot(&b) > 0.0
}

/// Matches the offsets to `n` edges, broadcasting a single value.
pub(crate) fn broadcast(offsets: &[f64], n: usize) -> Result<Vec<f64>> {
    match offsets.len() {
        1 => Ok(vec![offsets[0]; n]),
        len if len == n => Ok(offsets.to_vec()),
        found => Err(OffsetError::CountMismatch { expected: n, found }.into()),
    }
}

/// Joint of two consecutive edges: kept when their ends already touch,
/// otherwise the carrier intersection nearest `vertex`.
fn resolve_joint(prev: &Edge, next: &Edge, vertex: &Point2, eps: &Epsilon) -> Option<Point2> {
    if eps.same_point(&prev.end(), &next.start()) {
        return Some(prev.end());
    }
    edge_intersection(prev, next, vertex, eps)
}

/// Moves an edge `distance` to its left.
fn shift_edge(edge: &Edge, distance: f64, index: usize, eps: &Epsilon) -> Result<Edge> {
    match edge {
        Edge::Segment(s) => {
            let dir = s.delta().try_normalize(f64::EPSILON).ok_or_else(|| OffsetError::Degenerate {
                edge: index,
                reason: "zero-length segment".to_owned(),
            })?;
            Ok(edge.translate(&(left_normal(&dir) * distance)))
        }
        Edge::Arc(a) => {
            // The left side of a counter-clockwise arc faces its center.
            let radius = if a.clockwise {
                a.radius + distance
            } else {
                a.radius - distance
            };
            if radius <= eps.length {
                return Err(OffsetError::Degenerate {
                    edge: index,
                    reason: format!("arc radius {:.3} collapses to {radius:.3}", a.radius),
                }
                .into());
            }
            Ok(Edge::Arc(a.with_radius(radius)))
        }
    }
}

fn check_inversion(original: &Edge, offset: &Edge, index: usize, eps: &Epsilon) -> Result<()> {
    let inverted = match (original, offset) {
        (Edge::Segment(_), Edge::Segment(_)) => {
            offset.length() > eps.length
                && original.start_tangent().dot(&(offset.end() - offset.start())) < 0.0
        }
        (Edge::Arc(a), Edge::Arc(b)) => {
            !a.is_full_circle() && (a.sweep() - b.sweep()).abs() > PI
        }
        _ => false,
    };
    if inverted {
        return Err(OffsetError::Degenerate {
            edge: index,
            reason: "offset exceeds the local span and flips the edge".to_owned(),
        }
        .into());
    }
    Ok(())
}

/// Replaces arcs whose radius fell below `eps.small_arc` by their chord.
fn check_small_arc(edges: Vec<Edge>, eps: &Epsilon) -> Vec<Edge> {
    edges
        .into_iter()
        .map(|e| match e {
            Edge::Arc(a) if a.radius < eps.small_arc && !a.is_full_circle() => {
                tracing::trace!("offset arc of radius {} replaced by its chord", a.radius);
                Edge::segment(a.start(), a.end())
            }
            other => other,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FenestraError;
    use crate::geometry::{Arc, Polygon};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn rect(w: f64, h: f64) -> Polygon {
        Polygon::rectangle(Point2::origin(), w, h).unwrap()
    }

    fn offset(p: &Polygon, offsets: &[f64]) -> Result<Polygon> {
        let edges = find_parallel_edges(
            p.edges(),
            offsets,
            true,
            p.orientation(),
            true,
            &Epsilon::default(),
        )?;
        Polygon::new(edges)
    }

    #[test]
    fn uniform_inward_rectangle() {
        let inner = offset(&rect(2000.0, 1500.0), &[60.0]).unwrap();
        assert_eq!(inner.len(), 4);
        assert_abs_diff_eq!(inner.bbox().min.x, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(inner.bbox().max.y, 1440.0, epsilon = 1e-9);
        assert_abs_diff_eq!(inner.area(), 1880.0 * 1380.0, epsilon = 1e-6);
    }

    #[test]
    fn per_edge_offsets() {
        let inner = offset(&rect(2000.0, 1500.0), &[10.0, 20.0, 30.0, 40.0]).unwrap();
        let b = inner.bbox();
        assert_abs_diff_eq!(b.min.y, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.max.x, 1980.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.max.y, 1470.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.min.x, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn clockwise_input_still_shrinks() {
        let cw = rect(100.0, 100.0).reversed();
        let inner = offset(&cw, &[10.0]).unwrap();
        assert_abs_diff_eq!(inner.area(), 80.0 * 80.0, epsilon = 1e-9);
    }

    #[test]
    fn outward_offset_grows() {
        let p = rect(100.0, 50.0);
        let edges = ParallelEdges::new(p.edges(), &[5.0], p.orientation())
            .inward(false)
            .execute()
            .unwrap();
        let outer = Polygon::new(edges).unwrap();
        assert_abs_diff_eq!(outer.area(), 110.0 * 60.0, epsilon = 1e-9);
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let err = offset(&rect(10.0, 10.0), &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            FenestraError::Offset(OffsetError::CountMismatch {
                expected: 4,
                found: 2
            })
        ));
    }

    #[test]
    fn offset_past_half_span_is_degenerate() {
        let err = offset(&rect(100.0, 1000.0), &[60.0]).unwrap_err();
        assert!(matches!(err, FenestraError::Offset(OffsetError::Degenerate { .. })));
    }

    #[test]
    fn ring_branch_shrinks_circle() {
        let c = Polygon::circle(Point2::new(5.0, 5.0), 1000.0).unwrap();
        let inner = offset(&c, &[200.0]).unwrap();
        assert!(inner.is_circle());
        let arc = inner.edges()[0].as_arc().unwrap();
        assert_abs_diff_eq!(arc.radius, 800.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.center.x, 5.0, epsilon = 1e-12);
        assert!(offset(&c, &[1000.0]).is_err());
    }

    #[test]
    fn arch_keeps_tangent_joints() {
        // 1000 wide, straight sides 500 high, semicircular head.
        let r = 500.0;
        let p = Polygon::new(vec![
            Edge::segment(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0)),
            Edge::segment(Point2::new(1000.0, 0.0), Point2::new(1000.0, 500.0)),
            Edge::Arc(Arc::new(Point2::new(500.0, 500.0), r, 0.0, PI, false).unwrap()),
            Edge::segment(Point2::new(0.0, 500.0), Point2::new(0.0, 0.0)),
        ])
        .unwrap();
        let inner = offset(&p, &[50.0]).unwrap();
        let head = inner.edges()[2].as_arc().unwrap();
        assert_abs_diff_eq!(head.radius, 450.0, epsilon = 1e-9);
        assert_abs_diff_eq!(inner.edges()[1].end().y, 500.0, epsilon = 1e-6);
    }

    #[test]
    fn small_arc_becomes_chord() {
        // Square with one rounded corner of radius 1.
        let p = Polygon::new(vec![
            Edge::segment(Point2::new(0.0, 0.0), Point2::new(9.0, 0.0)),
            Edge::Arc(Arc::new(Point2::new(9.0, 1.0), 1.0, -FRAC_PI_2, 0.0, false).unwrap()),
            Edge::segment(Point2::new(10.0, 1.0), Point2::new(10.0, 10.0)),
            Edge::segment(Point2::new(10.0, 10.0), Point2::new(0.0, 10.0)),
            Edge::segment(Point2::new(0.0, 10.0), Point2::new(0.0, 0.0)),
        ])
        .unwrap();
        let inner = offset(&p, &[0.6]).unwrap();
        assert!(inner.edges()[1].is_segment());
        assert_abs_diff_eq!(inner.edges()[1].start().x, 9.0, epsilon = 1e-9);
        assert_abs_diff_eq!(inner.edges()[1].end().x, 9.4, epsilon = 1e-9);
    }

    #[test]
    fn open_chain_keeps_free_ends() {
        let chain = [
            Edge::segment(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)),
            Edge::segment(Point2::new(10.0, 0.0), Point2::new(10.0, 10.0)),
        ];
        let out = find_parallel_edges(
            &chain,
            &[1.0],
            true,
            Orientation::CounterClockwise,
            false,
            &Epsilon::default(),
        )
        .unwrap();
        assert_abs_diff_eq!(out[0].start().x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0].start().y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0].end().x, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1].end().y, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn tangent_joint_with_unequal_offsets_leaves_a_step() {
        // Bottom made of two collinear pieces offset by 10 and 20.
        let p = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(0.0, 100.0),
        ])
        .unwrap();
        let eps = Epsilon::default();
        let edges = find_parallel_edges(
            p.edges(),
            &[10.0, 20.0, 0.0, 0.0, 0.0],
            true,
            p.orientation(),
            true,
            &eps,
        )
        .unwrap();
        assert_abs_diff_eq!(edges[0].end().y, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(edges[1].start().y, 20.0, epsilon = 1e-12);
        let closed = close_steps(edges, true, &eps);
        assert_eq!(closed.len(), 6);
        let inner = Polygon::new(closed).unwrap();
        assert_abs_diff_eq!(inner.area(), 50.0 * 90.0 + 50.0 * 80.0, epsilon = 1e-9);
    }

    #[test]
    fn rejoin_after_moving_one_edge() {
        let p = rect(10.0, 10.0);
        let mut edges = p.edges().to_vec();
        edges[0] = edges[0].translate(&crate::math::Vector2::new(0.0, 2.0));
        let fixed = rejoin_at(&edges, 0, true, &Epsilon::default()).unwrap();
        assert_abs_diff_eq!(fixed[3].end().y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fixed[0].start().x, 0.0, epsilon = 1e-12);
    }
}
