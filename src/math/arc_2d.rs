//! 2D circular-arc math utilities.
//!
//! Arcs are described by a center, a radius, a start angle and a signed
//! sweep. Positive sweeps run counter-clockwise, negative sweeps clockwise.

use std::f64::consts::{PI, TAU};

use super::{Point2, Vector2};

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Polar angle of `p` around `center`.
#[must_use]
pub fn angle_of(center: &Point2, p: &Point2) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

/// Point on the circle `(center, radius)` at `angle`.
#[must_use]
pub fn point_on_circle(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Unit tangent of a circle at `angle`, pointing in the direction of travel.
#[must_use]
pub fn tangent_on_circle(angle: f64, clockwise: bool) -> Vector2 {
    // Tangent to circle at angle θ is (-sin θ, cos θ) for CCW; negate for CW.
    let sign = if clockwise { -1.0 } else { 1.0 };
    Vector2::new(-sign * angle.sin(), sign * angle.cos())
}

/// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
///
/// Returns `None` if the angle is not within the arc's angular range
/// (with `tol` radians of slack at both ends).
#[must_use]
pub fn angle_to_arc_param(angle: f64, start_angle: f64, sweep: f64, tol: f64) -> Option<f64> {
    if sweep.abs() < f64::EPSILON {
        return None;
    }
    let delta = if sweep > 0.0 {
        (angle - start_angle).rem_euclid(TAU)
    } else {
        (start_angle - angle).rem_euclid(TAU)
    };
    // A point just behind the start wraps to almost 2π.
    let delta = if delta > TAU - tol { delta - TAU } else { delta };

    let t = delta / sweep.abs();
    if t >= -tol && t <= 1.0 + tol {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Sagitta (arc height over its chord) of an arc.
#[must_use]
pub fn sagitta(radius: f64, sweep: f64) -> f64 {
    let half = (sweep.abs() / 2.0).min(PI);
    radius * (1.0 - half.cos())
}

/// Computes the number of line segments needed to approximate an arc
/// within the given tolerance.
#[must_use]
pub fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // From the sagitta formula: sagitta = r * (1 - cos(θ/2))
    // For a given tolerance: θ = 2 * acos(1 - tolerance/r)
    let max_angle = if tolerance >= radius {
        PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil().min(4096.0) as u32;
    n.max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn normalize_wraps_negative_angles() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < TOL);
        assert!(normalize_angle(TAU).abs() < TOL);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < TOL);
    }

    #[test]
    fn tangent_is_unit_and_follows_direction() {
        let ccw = tangent_on_circle(0.0, false);
        assert!(ccw.x.abs() < TOL);
        assert!((ccw.y - 1.0).abs() < TOL);

        let cw = tangent_on_circle(0.0, true);
        assert!((cw.y + 1.0).abs() < TOL);
        assert!((cw.norm() - 1.0).abs() < TOL);
    }

    #[test]
    fn arc_param_inside_ccw_range() {
        let t = angle_to_arc_param(PI / 2.0, 0.0, PI, 1e-9).unwrap();
        assert!((t - 0.5).abs() < TOL, "t={t}");
    }

    #[test]
    fn arc_param_inside_cw_range() {
        // CW from π/2 down through 0 to -π/2.
        let t = angle_to_arc_param(0.0, PI / 2.0, -PI, 1e-9).unwrap();
        assert!((t - 0.5).abs() < TOL, "t={t}");
    }

    #[test]
    fn arc_param_outside_range() {
        assert!(angle_to_arc_param(-PI / 2.0, 0.0, PI / 2.0, 1e-9).is_none());
    }

    #[test]
    fn arc_param_slightly_before_start_clamps() {
        let t = angle_to_arc_param(-1e-12, 0.0, PI / 2.0, 1e-9).unwrap();
        assert!(t.abs() < TOL);
    }

    #[test]
    fn sagitta_of_semicircle_is_radius() {
        assert!((sagitta(2.0, PI) - 2.0).abs() < TOL);
    }

    #[test]
    fn arc_subdivision_count_large_tolerance() {
        assert_eq!(arc_subdivision_count(1.0, PI, 10.0), 1);
    }

    #[test]
    fn arc_subdivision_count_small_tolerance() {
        let n = arc_subdivision_count(1.0, PI, 0.001);
        assert!(n > 10, "expected many subdivisions, got {n}");
    }
}
