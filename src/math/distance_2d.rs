use super::arc_2d::{angle_of, angle_to_arc_param, point_on_circle};
use super::Point2;

/// Returns the minimum distance from `p` to the segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < f64::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Distance from `p` to the arc of `radius` around `center` that starts at
/// `start_angle` and turns by the signed `sweep`.
///
/// Points outside the arc's angular range are measured to the nearer end.
#[must_use]
pub fn point_to_arc_dist(p: &Point2, center: &Point2, radius: f64, start_angle: f64, sweep: f64) -> f64 {
    if angle_to_arc_param(angle_of(center, p), start_angle, sweep, 1e-10).is_some() {
        return ((p - center).norm() - radius).abs();
    }
    [start_angle, start_angle + sweep]
        .iter()
        .map(|&a| (p - point_on_circle(center, radius, a)).norm())
        .fold(f64::INFINITY, f64::min)
}
