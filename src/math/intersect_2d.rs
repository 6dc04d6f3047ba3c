use super::{Point2, Vector2};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` unless the
/// directions are parallel, i.e. the sine of the angle between them is below
/// `angle_tol`.
#[must_use]
pub fn line_line_intersect(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
    angle_tol: f64,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    let scale = d1.norm() * d2.norm();
    if scale < f64::EPSILON || (cross / scale).abs() < angle_tol {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Intersection of the infinite line `p + t * d` with a full circle.
///
/// Returns the line parameters of the intersection points in increasing
/// order: none, one (tangent within `tol`) or two.
#[must_use]
pub fn line_circle_intersect(
    p: &Point2,
    d: &Vector2,
    center: &Point2,
    radius: f64,
    tol: f64,
) -> Vec<f64> {
    let a = d.norm_squared();
    if a < f64::EPSILON || radius <= 0.0 {
        return Vec::new();
    }

    // Substitute parametric line into circle equation:
    // |p + t*d - c|² = r²
    let f = p - center;
    let b = 2.0 * f.dot(d);
    let c = f.norm_squared() - radius * radius;

    // Distance from the center to the line decides tangency robustly.
    let along = -b / (2.0 * a);
    let closest = p + d * along;
    let dist = (closest - center).norm();
    if dist > radius + tol {
        return Vec::new();
    }
    if (dist - radius).abs() <= tol {
        return vec![along];
    }

    let disc = (b * b - 4.0 * a * c).max(0.0).sqrt();
    vec![(-b - disc) / (2.0 * a), (-b + disc) / (2.0 * a)]
}

/// Intersection points of two full circles.
///
/// Concentric circles yield no points; circles touching within `tol` yield
/// one.
#[must_use]
pub fn circle_circle_intersect(
    c1: &Point2,
    r1: f64,
    c2: &Point2,
    r2: f64,
    tol: f64,
) -> Vec<Point2> {
    if r1 <= 0.0 || r2 <= 0.0 {
        return Vec::new();
    }

    let delta = c2 - c1;
    let dist_sq = delta.norm_squared();
    let dist = dist_sq.sqrt();

    if dist < tol {
        // Concentric circles never cross at isolated points.
        return Vec::new();
    }

    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    if dist > sum + tol || dist < diff - tol {
        return Vec::new();
    }

    // Distance from c1 along the line c1→c2 to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();

    let unit = delta / dist;
    let mid = c1 + unit * a;
    let perp = Vector2::new(-unit.y, unit.x);

    if h < tol {
        vec![mid]
    } else {
        vec![mid + perp * h, mid - perp * h]
    }
}

/// Returns the candidate closest to `target`, if any.
#[must_use]
pub fn nearest_to(candidates: &[Point2], target: &Point2) -> Option<Point2> {
    candidates
        .iter()
        .min_by(|a, b| {
            (*a - target)
                .norm_squared()
                .total_cmp(&(*b - target).norm_squared())
        })
        .copied()
}
