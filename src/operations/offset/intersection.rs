use crate::geometry::{Arc, Edge, Segment};
use crate::math::intersect_2d::{
    circle_circle_intersect, line_circle_intersect, line_line_intersect, nearest_to,
};
use crate::math::{Epsilon, Point2};

/// Intersection of the lines/circles carrying two edges, nearest to `near`.
///
/// Edges are treated as their infinite carriers: segments as lines, arcs as
/// full circles. Returns `None` for parallel lines, concentric circles or
/// carriers that do not meet.
#[must_use]
pub fn edge_intersection(a: &Edge, b: &Edge, near: &Point2, eps: &Epsilon) -> Option<Point2> {
    match (a, b) {
        (Edge::Segment(s), Edge::Segment(t)) => {
            line_line_intersect(&s.start, &s.delta(), &t.start, &t.delta(), eps.angle)
                .map(|(u, _)| s.start + s.delta() * u)
        }
        (Edge::Segment(s), Edge::Arc(c)) | (Edge::Arc(c), Edge::Segment(s)) => {
            nearest_to(&line_circle_points(s, c, eps), near)
        }
        (Edge::Arc(c1), Edge::Arc(c2)) => nearest_to(
            &circle_circle_intersect(&c1.center, c1.radius, &c2.center, c2.radius, eps.length),
            near,
        ),
    }
}

fn line_circle_points(s: &Segment, c: &Arc, eps: &Epsilon) -> Vec<Point2> {
    let d = s.delta();
    let len = d.norm();
    if len < f64::EPSILON {
        return Vec::new();
    }
    let dir = d / len;
    line_circle_intersect(&s.start, &dir, &c.center, c.radius, eps.length)
        .into_iter()
        .map(|t| s.start + dir * t)
        .collect()
}
