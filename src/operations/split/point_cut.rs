use crate::error::{Result, SplitError};
use crate::geometry::{Edge, Line, PolyId, Polygon};
use crate::math::intersect_2d::nearest_to;
use crate::math::{Epsilon, Point2};

use super::crossing::{find_crossings, Crossing};
use super::cut::{cut_along, Bridge};
use super::ring::{radial_cut, ring_sectors};
use super::splitter::find_line_pos;

/// Cuts a polygon along an explicit point path.
///
/// The path enters the boundary where `line1` crosses it nearest the first
/// point and leaves where `line2` crosses it nearest the last point. Rings
/// take exactly two points, one per radial cut.
#[derive(Debug, Clone)]
pub struct PointCut<'a> {
    polygon: &'a Polygon,
    epsilon: Epsilon,
}

impl<'a> PointCut<'a> {
    #[must_use]
    pub fn new(polygon: &'a Polygon) -> Self {
        Self {
            polygon,
            epsilon: Epsilon::DEFAULT,
        }
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: Epsilon) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Splits the polygon along `points`, entering on `line1` and leaving
    /// on `line2`.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::NoCrossing` if either line misses the boundary
    /// and `SplitError::InvalidCut` if the path leaves the polygon, starts
    /// and ends at the same boundary point, or a ring is not given exactly
    /// two points.
    pub fn split_by_pts(&self, points: &[Point2], line1: &Line, line2: &Line) -> Result<Vec<Polygon>> {
        let index = self.polygon.poly_id().index;
        if let Some(ring) = self.polygon.ring() {
            let [p, q] = points else {
                return Err(SplitError::InvalidCut(format!(
                    "a ring is cut at exactly two points, got {}",
                    points.len()
                ))
                .into());
            };
            let a = radial_cut(&ring, line1, p, &self.epsilon)?;
            let b = radial_cut(&ring, line2, q, &self.epsilon)?;
            let [first, second] = ring_sectors(&ring, a, b, &self.epsilon)?;
            return Ok(vec![
                first.with_poly_id(PolyId::new(index, 0)),
                second.with_poly_id(PolyId::new(index, 1)),
            ]);
        }

        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(SplitError::InvalidCut("point cut needs at least one point".to_owned()).into());
        };
        let entry = self.nearest_crossing(line1, first)?;
        let exit = self.nearest_crossing(line2, last)?;
        if entry.site == exit.site || self.epsilon.same_point(&entry.point, &exit.point) {
            return Err(SplitError::InvalidCut("cut path starts and ends at the same point".to_owned()).into());
        }

        let path = self.path(entry.point, points, exit.point)?;
        let bridge = Bridge {
            from: entry.site,
            to: exit.site,
            path,
        };
        let pieces: Vec<Polygon> = cut_along(self.polygon, &[bridge], &self.epsilon)?
            .into_iter()
            .map(|f| f.polygon)
            .collect();
        tracing::debug!("point cut of {:?} gave {} fragments", self.polygon.poly_id(), pieces.len());
        Ok(find_line_pos(pieces, &Line::through(entry.point, exit.point)?, index))
    }

    fn nearest_crossing(&self, line: &Line, near: &Point2) -> Result<Crossing> {
        let crossings = find_crossings(self.polygon.edges(), line, &self.epsilon);
        let points: Vec<Point2> = crossings.iter().map(|c| c.point).collect();
        let best = nearest_to(&points, near).ok_or(SplitError::NoCrossing)?;
        crossings
            .into_iter()
            .find(|c| c.point == best)
            .ok_or_else(|| SplitError::NoCrossing.into())
    }

    /// Straight pieces from `entry` through `points` to `exit`, each of
    /// which must run through the interior.
    fn path(&self, entry: Point2, points: &[Point2], exit: Point2) -> Result<Vec<Edge>> {
        let eps = &self.epsilon;
        let mut stops = Vec::with_capacity(points.len() + 2);
        stops.push(entry);
        stops.extend_from_slice(points);
        stops.push(exit);
        stops.dedup_by(|b, a| eps.same_point(a, b));

        let mut path = Vec::with_capacity(stops.len());
        for pair in stops.windows(2) {
            let mid = nalgebra::center(&pair[0], &pair[1]);
            if !self.polygon.is_strictly_inside(&mid, eps) {
                return Err(SplitError::InvalidCut(format!(
                    "cut path leaves the polygon near ({:.3}, {:.3})",
                    mid.x, mid.y
                ))
                .into());
            }
            path.push(Edge::segment(pair[0], pair[1]));
        }
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FenestraError;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn square() -> Polygon {
        Polygon::rectangle(Point2::origin(), 1000.0, 1000.0)
            .unwrap()
            .with_poly_id(PolyId::new(3, 0))
    }

    #[test]
    fn stepped_cut_through_square() {
        let sq = square();
        let parts = PointCut::new(&sq)
            .split_by_pts(
                &[Point2::new(300.0, 200.0), Point2::new(700.0, 800.0)],
                &Line::vertical(300.0),
                &Line::vertical(700.0),
            )
            .unwrap();
        assert_eq!(parts.len(), 2);
        let total: f64 = parts.iter().map(Polygon::area).sum();
        assert_abs_diff_eq!(total, 1e6, epsilon = 1e-6);
        // Left piece: 300 wide strip plus the trapezoid under the slanted step.
        let left = parts.iter().find(|p| p.bbox().min.x < 1.0).unwrap();
        assert_abs_diff_eq!(left.area(), 300.0 * 1000.0 + 400.0 * 500.0, epsilon = 1e-6);
        assert!(parts.iter().all(|p| p.poly_id().index == 3));
        assert_ne!(parts[0].poly_id().pos, parts[1].poly_id().pos);
    }

    #[test]
    fn path_outside_polygon_is_rejected() {
        let sq = square();
        let err = PointCut::new(&sq)
            .split_by_pts(
                &[Point2::new(300.0, 200.0), Point2::new(1500.0, 500.0), Point2::new(700.0, 800.0)],
                &Line::vertical(300.0),
                &Line::vertical(700.0),
            )
            .unwrap_err();
        assert!(matches!(err, FenestraError::Split(SplitError::InvalidCut(_))));
    }

    #[test]
    fn empty_points_are_rejected() {
        let sq = square();
        assert!(PointCut::new(&sq)
            .split_by_pts(&[], &Line::vertical(300.0), &Line::vertical(700.0))
            .is_err());
    }

    #[test]
    fn ring_cut_into_quarter_and_rest() {
        let ring = Polygon::annulus(Point2::origin(), 1000.0, 800.0).unwrap();
        let parts = PointCut::new(&ring)
            .split_by_pts(
                &[Point2::new(0.0, 900.0), Point2::new(-900.0, 0.0)],
                &Line::vertical(0.0),
                &Line::horizontal(0.0),
            )
            .unwrap();
        let full = PI * (1000.0_f64.powi(2) - 800.0_f64.powi(2));
        assert_abs_diff_eq!(parts[0].area(), full / 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(parts[1].area(), full * 0.75, epsilon = 1e-6);
        assert_eq!(parts[1].poly_id(), PolyId::new(0, 1));

        assert!(PointCut::new(&ring)
            .split_by_pts(&[Point2::new(0.0, 900.0)], &Line::vertical(0.0), &Line::horizontal(0.0))
            .is_err());
    }
}
