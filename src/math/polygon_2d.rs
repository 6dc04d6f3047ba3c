use super::{Point2, Vector2};

/// Computes the signed area of a point loop (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Even-odd point-in-polygon test on a flattened loop.
///
/// Points exactly on the boundary may report either side.
#[must_use]
pub fn point_in_polygon(points: &[Point2], p: &Point2) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = &points[i];
        let b = &points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Z component of the 2D cross product `a × b`.
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Rotates a vector counter-clockwise by `angle` radians.
#[must_use]
pub fn rotate_vector(v: &Vector2, angle: f64) -> Vector2 {
    let (s, c) = angle.sin_cos();
    Vector2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Rotates `p` counter-clockwise by `angle` radians around `center`.
#[must_use]
pub fn rotate_point(p: &Point2, angle: f64, center: &Point2) -> Point2 {
    center + rotate_vector(&(p - center), angle)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area(&unit_square()) - 1.0).abs() < TOL);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = unit_square();
        pts.reverse();
        assert!((signed_area(&pts) + 1.0).abs() < TOL);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[Point2::new(0.0, 0.0)]).abs() < TOL);
        assert!(signed_area(&[]).abs() < TOL);
    }

    #[test]
    fn point_in_square() {
        let pts = unit_square();
        assert!(point_in_polygon(&pts, &Point2::new(0.5, 0.5)));
        assert!(!point_in_polygon(&pts, &Point2::new(1.5, 0.5)));
        assert!(!point_in_polygon(&pts, &Point2::new(0.5, -0.1)));
    }

    #[test]
    fn point_in_concave_notch() {
        // U shape open at the top between x=1 and x=2.
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(2.0, 3.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 3.0),
            Point2::new(0.0, 3.0),
        ];
        assert!(!point_in_polygon(&pts, &Point2::new(1.5, 2.0)));
        assert!(point_in_polygon(&pts, &Point2::new(0.5, 2.0)));
    }

    #[test]
    fn left_normal_basic() {
        let n = left_normal(&Vector2::new(1.0, 0.0));
        assert!(n.x.abs() < TOL);
        assert!((n.y - 1.0).abs() < TOL);
    }

    #[test]
    fn rotate_point_quarter_turn() {
        let p = rotate_point(
            &Point2::new(2.0, 1.0),
            std::f64::consts::FRAC_PI_2,
            &Point2::new(1.0, 1.0),
        );
        assert!((p.x - 1.0).abs() < TOL);
        assert!((p.y - 2.0).abs() < TOL);
    }
}
