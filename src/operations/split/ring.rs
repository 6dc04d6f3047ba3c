use crate::error::{Result, SplitError};
use crate::geometry::{Arc, Edge, Line, Polygon, Ring};
use crate::math::arc_2d::angle_of;
use crate::math::intersect_2d::{line_circle_intersect, nearest_to};
use crate::math::{Epsilon, Point2};

/// A radial cut across the band: a point on the outer circle and one on
/// the inner circle.
pub(crate) type RadialCut = (Point2, Point2);

/// The two sectors left by cutting a ring at `a` and `b`.
///
/// The first sector runs counter-clockwise from `a` to `b` on the outer
/// circle, the second from `b` back to `a`. Both are counter-clockwise
/// loops: outer arc, cut, inner arc (clockwise), cut.
pub(crate) fn ring_sectors(ring: &Ring, a: RadialCut, b: RadialCut, eps: &Epsilon) -> Result<[Polygon; 2]> {
    Ok([sector(ring, a, b, eps)?, sector(ring, b, a, eps)?])
}

fn sector(ring: &Ring, from: RadialCut, to: RadialCut, eps: &Epsilon) -> Result<Polygon> {
    let c = ring.center;
    let outer = Arc::new(c, ring.outer_radius, angle_of(&c, &from.0), angle_of(&c, &to.0), false)?;
    let inner = Arc::new(c, ring.inner_radius, angle_of(&c, &to.1), angle_of(&c, &from.1), true)?;
    Polygon::with_epsilon(
        vec![
            Edge::Arc(outer),
            Edge::segment(outer.end(), inner.start()),
            Edge::Arc(inner),
            Edge::segment(inner.end(), outer.start()),
        ],
        eps,
    )
}

/// Cuts a ring along a line through its opening.
///
/// # Errors
///
/// `SplitError::NoCrossing` if the line misses the ring, `InvalidCut` if it
/// crosses the band without passing through the opening.
pub(crate) fn partition_ring(ring: &Ring, line: &Line, eps: &Epsilon) -> Result<[Polygon; 2]> {
    let outer = line_circle_intersect(line.origin(), line.direction(), &ring.center, ring.outer_radius, eps.length);
    if outer.len() < 2 {
        return Err(SplitError::NoCrossing.into());
    }
    let inner = line_circle_intersect(line.origin(), line.direction(), &ring.center, ring.inner_radius, eps.length);
    if inner.len() < 2 {
        return Err(
            SplitError::InvalidCut("a ring can only be cut through its opening".to_owned()).into(),
        );
    }
    let a = (line.point_at(outer[0]), line.point_at(inner[0]));
    let b = (line.point_at(outer[1]), line.point_at(inner[1]));
    ring_sectors(ring, a, b, eps)
}

/// Radial cut of `line` across the band on the side nearest `near`.
///
/// # Errors
///
/// `SplitError::NoCrossing` if the line misses either circle, `InvalidCut`
/// if the chosen points do not bound a piece of the band.
pub(crate) fn radial_cut(ring: &Ring, line: &Line, near: &Point2, eps: &Epsilon) -> Result<RadialCut> {
    let hits = |radius: f64| -> Vec<Point2> {
        line_circle_intersect(line.origin(), line.direction(), &ring.center, radius, eps.length)
            .into_iter()
            .map(|t| line.point_at(t))
            .collect()
    };
    let outer = nearest_to(&hits(ring.outer_radius), near).ok_or(SplitError::NoCrossing)?;
    let inner = nearest_to(&hits(ring.inner_radius), near).ok_or(SplitError::NoCrossing)?;
    let mid = nalgebra::center(&outer, &inner);
    let r = (mid - ring.center).norm();
    if r <= ring.inner_radius + eps.length || r >= ring.outer_radius - eps.length {
        return Err(SplitError::InvalidCut("radial cut does not cross the band".to_owned()).into());
    }
    Ok((outer, inner))
}
