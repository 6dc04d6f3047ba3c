use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{
    angle_of, angle_to_arc_param, arc_subdivision_count, point_on_circle, tangent_on_circle,
};
use crate::math::distance_2d::{point_to_arc_dist, point_to_segment_dist};
use crate::math::polygon_2d::{rotate_point, rotate_vector};
use crate::math::{Point2, Vector2};

/// Sweeps shorter than this are treated as zero when deriving an arc's sweep.
const SWEEP_EPS: f64 = 1e-12;

/// A straight edge from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2,
    pub end: Point2,
}

impl Segment {
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Vector from `start` to `end`.
    #[must_use]
    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }
}

/// A circular arc travelled from `start_angle` to `end_angle`.
///
/// The direction of travel is given by `clockwise`; the angles themselves
/// are not required to be ordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub clockwise: bool,
}

impl Arc {
    /// Creates a new arc.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the radius is not a positive
    /// finite number.
    pub fn new(
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    ) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::Degenerate(format!("arc radius {radius} must be positive")).into());
        }
        Ok(Self {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        })
    }

    /// A full counter-clockwise circle starting and ending at angle 0.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a non-positive radius.
    pub fn circle(center: Point2, radius: f64) -> Result<Self> {
        Self::new(center, radius, 0.0, TAU, false)
    }

    /// Signed sweep angle: positive counter-clockwise, negative clockwise.
    ///
    /// Equal start and end angles that were given a full turn apart yield a
    /// full circle.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        let raw = if self.clockwise {
            self.start_angle - self.end_angle
        } else {
            self.end_angle - self.start_angle
        };
        let mut sweep = raw.rem_euclid(TAU);
        if sweep < SWEEP_EPS && raw.abs() > SWEEP_EPS {
            sweep = TAU;
        }
        if self.clockwise {
            -sweep
        } else {
            sweep
        }
    }

    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        (self.sweep().abs() - TAU).abs() < 1e-9
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        point_on_circle(&self.center, self.radius, self.start_angle)
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        point_on_circle(&self.center, self.radius, self.end_angle)
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        point_on_circle(&self.center, self.radius, self.start_angle + self.sweep() * t)
    }

    /// Returns a copy with a different radius around the same center.
    #[must_use]
    pub fn with_radius(&self, radius: f64) -> Self {
        Self { radius, ..*self }
    }
}

/// One boundary piece of a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    Segment(Segment),
    Arc(Arc),
}

impl From<Segment> for Edge {
    fn from(s: Segment) -> Self {
        Self::Segment(s)
    }
}

impl From<Arc> for Edge {
    fn from(a: Arc) -> Self {
        Self::Arc(a)
    }
}

impl Edge {
    /// Shorthand for a segment edge.
    #[must_use]
    pub fn segment(start: Point2, end: Point2) -> Self {
        Self::Segment(Segment::new(start, end))
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        match self {
            Self::Segment(s) => s.start,
            Self::Arc(a) => a.start(),
        }
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        match self {
            Self::Segment(s) => s.end,
            Self::Arc(a) => a.end(),
        }
    }

    #[must_use]
    pub fn is_segment(&self) -> bool {
        matches!(self, Self::Segment(_))
    }

    #[must_use]
    pub fn as_arc(&self) -> Option<&Arc> {
        match self {
            Self::Arc(a) => Some(a),
            Self::Segment(_) => None,
        }
    }

    /// Whether this edge is a closed circle on its own.
    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        self.as_arc().is_some_and(Arc::is_full_circle)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Segment(s) => s.delta().norm(),
            Self::Arc(a) => a.radius * a.sweep().abs(),
        }
    }

    /// Unit tangent at the start, in the direction of travel.
    ///
    /// Zero for a zero-length segment.
    #[must_use]
    pub fn start_tangent(&self) -> Vector2 {
        match self {
            Self::Segment(s) => s.delta().try_normalize(f64::EPSILON).unwrap_or_else(Vector2::zeros),
            Self::Arc(a) => tangent_on_circle(a.start_angle, a.clockwise),
        }
    }

    /// Unit tangent at the end, in the direction of travel.
    #[must_use]
    pub fn end_tangent(&self) -> Vector2 {
        match self {
            Self::Segment(_) => self.start_tangent(),
            Self::Arc(a) => tangent_on_circle(a.end_angle, a.clockwise),
        }
    }

    /// Point at normalized parameter `t` (0 at start, 1 at end).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        match self {
            Self::Segment(s) => s.start + s.delta() * t,
            Self::Arc(a) => a.point_at(t),
        }
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        self.point_at(0.5)
    }

    /// Direction angle of a segment in radians, `None` for arcs.
    #[must_use]
    pub fn slope(&self) -> Option<f64> {
        match self {
            Self::Segment(s) => {
                let d = s.delta();
                Some(d.y.atan2(d.x))
            }
            Self::Arc(_) => None,
        }
    }

    /// Signed sweep of an arc, `None` for segments.
    #[must_use]
    pub fn sweep(&self) -> Option<f64> {
        self.as_arc().map(Arc::sweep)
    }

    #[must_use]
    pub fn translate(&self, v: &Vector2) -> Self {
        match self {
            Self::Segment(s) => Self::segment(s.start + v, s.end + v),
            Self::Arc(a) => Self::Arc(Arc {
                center: a.center + v,
                ..*a
            }),
        }
    }

    /// Rotates counter-clockwise by `angle` radians around `center`.
    #[must_use]
    pub fn rotate(&self, angle: f64, center: &Point2) -> Self {
        match self {
            Self::Segment(s) => Self::segment(
                rotate_point(&s.start, angle, center),
                rotate_point(&s.end, angle, center),
            ),
            Self::Arc(a) => Self::Arc(Arc {
                center: center + rotate_vector(&(a.center - center), angle),
                start_angle: a.start_angle + angle,
                end_angle: a.end_angle + angle,
                ..*a
            }),
        }
    }

    /// The same geometry travelled the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Segment(s) => Self::segment(s.end, s.start),
            Self::Arc(a) => Self::Arc(Arc {
                start_angle: a.end_angle,
                end_angle: a.start_angle,
                clockwise: !a.clockwise,
                ..*a
            }),
        }
    }

    /// Moves the endpoints while keeping the underlying line or circle.
    ///
    /// Arc endpoints are projected onto the circle by angle. A full circle
    /// whose new endpoints coincide stays a full circle.
    #[must_use]
    pub fn with_endpoints(&self, start: Point2, end: Point2) -> Self {
        match self {
            Self::Segment(_) => Self::segment(start, end),
            Self::Arc(a) => {
                let start_angle = angle_of(&a.center, &start);
                let mut end_angle = angle_of(&a.center, &end);
                if a.is_full_circle() && (end_angle - start_angle).abs() < SWEEP_EPS {
                    end_angle = if a.clockwise {
                        start_angle - TAU
                    } else {
                        start_angle + TAU
                    };
                }
                Self::Arc(Arc {
                    start_angle,
                    end_angle,
                    ..*a
                })
            }
        }
    }

    /// Parameter of a point lying on this edge, `None` when it is off the
    /// edge's extent.
    #[must_use]
    pub fn param_of(&self, p: &Point2) -> Option<f64> {
        const RANGE_TOL: f64 = 1e-9;
        match self {
            Self::Segment(s) => {
                let d = s.delta();
                let len_sq = d.norm_squared();
                if len_sq < f64::EPSILON {
                    return None;
                }
                let t = (p - s.start).dot(&d) / len_sq;
                (-RANGE_TOL..=1.0 + RANGE_TOL)
                    .contains(&t)
                    .then(|| t.clamp(0.0, 1.0))
            }
            Self::Arc(a) => angle_to_arc_param(angle_of(&a.center, p), a.start_angle, a.sweep(), RANGE_TOL),
        }
    }

    /// Splits at parameter `t` into two edges sharing the split point.
    #[must_use]
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        match self {
            Self::Segment(s) => {
                let mid = self.point_at(t);
                (Self::segment(s.start, mid), Self::segment(mid, s.end))
            }
            Self::Arc(a) => {
                let mid_angle = a.start_angle + a.sweep() * t;
                (
                    Self::Arc(Arc {
                        end_angle: mid_angle,
                        ..*a
                    }),
                    Self::Arc(Arc {
                        start_angle: mid_angle,
                        ..*a
                    }),
                )
            }
        }
    }

    /// Minimum distance from `p` to this edge.
    #[must_use]
    pub fn distance_to(&self, p: &Point2) -> f64 {
        match self {
            Self::Segment(s) => point_to_segment_dist(p, &s.start, &s.end),
            Self::Arc(a) => point_to_arc_dist(p, &a.center, a.radius, a.start_angle, a.sweep()),
        }
    }

    /// This edge's contribution to the enclosed signed area, `½∮(x dy − y dx)`.
    #[must_use]
    pub fn area_term(&self) -> f64 {
        match self {
            Self::Segment(s) => 0.5 * (s.start.x * s.end.y - s.end.x * s.start.y),
            Self::Arc(a) => {
                let sweep = a.sweep();
                let t0 = a.start_angle;
                let t1 = t0 + sweep;
                let r = a.radius;
                0.5 * (r * a.center.x * (t1.sin() - t0.sin())
                    - r * a.center.y * (t1.cos() - t0.cos())
                    + r * r * sweep)
            }
        }
    }

    /// Points bounding the edge: endpoints plus any axis extremes an arc
    /// passes through.
    #[must_use]
    pub fn bounding_points(&self) -> Vec<Point2> {
        match self {
            Self::Segment(s) => vec![s.start, s.end],
            Self::Arc(a) => {
                let mut pts = vec![a.start(), a.end()];
                let sweep = a.sweep();
                for k in 0..4 {
                    let angle = f64::from(k) * FRAC_PI_2;
                    if angle_to_arc_param(angle, a.start_angle, sweep, 0.0).is_some() {
                        pts.push(point_on_circle(&a.center, a.radius, angle));
                    }
                }
                pts
            }
        }
    }

    /// Approximates the edge by points within `tolerance`, starting with
    /// the start point and excluding the end point.
    #[must_use]
    pub fn flatten(&self, tolerance: f64) -> Vec<Point2> {
        match self {
            Self::Segment(s) => vec![s.start],
            Self::Arc(a) => {
                let n = arc_subdivision_count(a.radius, a.sweep().abs(), tolerance);
                (0..n).map(|i| a.point_at(f64::from(i) / f64::from(n))).collect()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn quarter_ccw() -> Edge {
        Edge::Arc(Arc::new(Point2::origin(), 2.0, 0.0, FRAC_PI_2, false).unwrap())
    }

    #[test]
    fn arc_rejects_non_positive_radius() {
        assert!(Arc::new(Point2::origin(), 0.0, 0.0, 1.0, false).is_err());
        assert!(Arc::circle(Point2::origin(), -1.0).is_err());
    }

    #[test]
    fn sweep_direction_and_wrap() {
        let ccw = Arc::new(Point2::origin(), 1.0, 3.0 * FRAC_PI_2, 0.0, false).unwrap();
        assert_abs_diff_eq!(ccw.sweep(), FRAC_PI_2, epsilon = 1e-12);
        let cw = Arc::new(Point2::origin(), 1.0, 0.0, 3.0 * FRAC_PI_2, true).unwrap();
        assert_abs_diff_eq!(cw.sweep(), -FRAC_PI_2, epsilon = 1e-12);
        let circle = Arc::circle(Point2::origin(), 1.0).unwrap();
        assert_abs_diff_eq!(circle.sweep(), TAU, epsilon = 1e-12);
        assert!(circle.is_full_circle());
    }

    #[test]
    fn segment_basics() {
        let e = Edge::segment(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
        assert_abs_diff_eq!(e.length(), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.midpoint().x, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(e.start_tangent().norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.slope().unwrap(), 4.0_f64.atan2(3.0), epsilon = 1e-12);
        assert!(e.sweep().is_none());
    }

    #[test]
    fn arc_endpoints_and_length() {
        let e = quarter_ccw();
        assert_abs_diff_eq!(e.start().x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.end().y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.length(), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(e.start_tangent().y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.end_tangent().x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn reversed_arc_swaps_endpoints() {
        let e = quarter_ccw();
        let r = e.reversed();
        assert_abs_diff_eq!((r.start() - e.end()).norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!((r.end() - e.start()).norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.sweep().unwrap(), -FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(r.area_term(), -e.area_term(), epsilon = 1e-12);
    }

    #[test]
    fn split_arc_keeps_endpoints() {
        let (a, b) = quarter_ccw().split_at(0.5);
        assert_abs_diff_eq!((a.end() - b.start()).norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.length() + b.length(), PI, epsilon = 1e-12);
    }

    #[test]
    fn circle_area_term_is_pi_r_squared() {
        let c = Edge::Arc(Arc::circle(Point2::new(5.0, -3.0), 2.0).unwrap());
        assert_abs_diff_eq!(c.area_term(), 4.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn param_of_on_and_off_edge() {
        let e = quarter_ccw();
        let t = e.param_of(&Point2::new(2.0_f64.sqrt(), 2.0_f64.sqrt())).unwrap();
        assert_abs_diff_eq!(t, 0.5, epsilon = 1e-9);
        assert!(e.param_of(&Point2::new(-2.0, 0.0)).is_none());
        let s = Edge::segment(Point2::origin(), Point2::new(2.0, 0.0));
        assert_abs_diff_eq!(s.param_of(&Point2::new(1.5, 0.0)).unwrap(), 0.75, epsilon = 1e-12);
        assert!(s.param_of(&Point2::new(3.0, 0.0)).is_none());
    }

    #[test]
    fn with_endpoints_keeps_full_circle() {
        let c = Edge::Arc(Arc::circle(Point2::origin(), 1.0).unwrap());
        let p = Point2::new(0.0, 1.0);
        let moved = c.with_endpoints(p, p);
        assert!(moved.is_full_circle());
    }

    #[test]
    fn rotate_arc_quarter_turn() {
        let r = quarter_ccw().rotate(FRAC_PI_2, &Point2::origin());
        assert_abs_diff_eq!(r.start().y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.end().x, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn bounding_points_include_extremes() {
        let semi = Edge::Arc(Arc::new(Point2::origin(), 1.0, 0.0, PI, false).unwrap());
        let top = semi
            .bounding_points()
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_abs_diff_eq!(top, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn flatten_excludes_end() {
        let s = Edge::segment(Point2::origin(), Point2::new(1.0, 0.0));
        assert_eq!(s.flatten(0.1).len(), 1);
        let pts = quarter_ccw().flatten(1e-3);
        assert!(pts.len() > 4);
        assert_abs_diff_eq!(pts[0].x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn distance_to_edges() {
        let s = Edge::segment(Point2::origin(), Point2::new(2.0, 0.0));
        assert_abs_diff_eq!(s.distance_to(&Point2::new(1.0, 3.0)), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(quarter_ccw().distance_to(&Point2::new(1.0, 0.0)), 1.0, epsilon = 1e-12);
    }
}
