use std::f64::consts::TAU;

use crate::error::{FenestraError, Result, SplitError};
use crate::geometry::{Arc, Edge, Line, PolyId, Polygon};
use crate::math::arc_2d::angle_of;
use crate::math::intersect_2d::line_circle_intersect;
use crate::math::Epsilon;

use super::crossing::{find_crossings, pair_crossings};
use super::cut::{cut_along, Bridge};
use super::element::Fragment;
use super::ring::partition_ring;

/// Cuts a polygon along a straight line.
///
/// Fragments carry the source polygon's `PolyId::index`; `pos` is 0 for
/// the first fragment left of the line, 1 for the first fragment right of
/// it, and 2, 3, ... for mullion strips and any further fragments.
#[derive(Debug, Clone)]
pub struct Splitter<'a> {
    polygon: &'a Polygon,
    line: Line,
    epsilon: Epsilon,
}

impl<'a> Splitter<'a> {
    /// Creates a new splitter with default tolerances.
    #[must_use]
    pub fn new(polygon: &'a Polygon, line: Line) -> Self {
        Self {
            polygon,
            line,
            epsilon: Epsilon::DEFAULT,
        }
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: Epsilon) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[must_use]
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Bisects the polygon along the line.
    ///
    /// Concave polygons may yield more than two fragments.
    ///
    /// # Errors
    ///
    /// Returns a `SplitError` if the line does not properly cross the
    /// polygon.
    pub fn partition(&self) -> Result<Vec<Polygon>> {
        let pieces = self.pieces()?;
        tracing::debug!("partitioned polygon {:?} into {} fragments", self.polygon.poly_id(), pieces.len());
        Ok(find_line_pos(pieces, &self.line, self.polygon.poly_id().index))
    }

    /// Bisects the polygon and carves a mullion strip of `thickness`
    /// centred on the line.
    ///
    /// When only one of the two mullion lines crosses the polygon, the
    /// fragment on the mullion side of it is tagged as mullion as a whole.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidCut` for a non-positive thickness and
    /// `SplitError::NoCrossing` if neither mullion line crosses.
    pub fn split(&self, thickness: f64) -> Result<Vec<Polygon>> {
        let eps = &self.epsilon;
        if thickness.is_nan() || thickness <= eps.length {
            return Err(SplitError::InvalidCut(format!("mullion thickness {thickness} must be positive")).into());
        }
        let (left_line, right_line) = gen_mullion_lines(&self.line, thickness);

        let mut sides = Vec::new();
        let mut mullions = Vec::new();
        if let Some(pieces) = self.with_line(left_line).try_pieces()? {
            for piece in pieces {
                if side_of_polygon(&piece, &left_line) > 0.0 {
                    sides.push(piece);
                    continue;
                }
                match Splitter::new(&piece, right_line).epsilon(*eps).try_pieces()? {
                    Some(sub) => {
                        for s in sub {
                            if side_of_polygon(&s, &right_line) > 0.0 {
                                mullions.push(s);
                            } else {
                                sides.push(s);
                            }
                        }
                    }
                    None => mullions.push(piece),
                }
            }
        } else {
            let pieces = self
                .with_line(right_line)
                .try_pieces()?
                .ok_or(SplitError::NoCrossing)?;
            for piece in pieces {
                if side_of_polygon(&piece, &right_line) > 0.0 {
                    mullions.push(piece);
                } else {
                    sides.push(piece);
                }
            }
        }

        tracing::debug!(
            "split polygon {:?}: {} panes, {} mullion pieces",
            self.polygon.poly_id(),
            sides.len(),
            mullions.len()
        );
        Ok(assign_positions(sides, mullions, &self.line, self.polygon.poly_id().index))
    }

    /// Bisection for committing an edit: sliver fragments are dropped,
    /// the source winding is restored and positions are reassigned.
    ///
    /// # Errors
    ///
    /// Returns a `SplitError` if the line does not cross, or only slivers
    /// would remain on one side.
    pub fn split_final(&self) -> Result<Vec<Polygon>> {
        let eps = &self.epsilon;
        let orientation = self.polygon.orientation();
        let kept: Vec<Polygon> = self
            .pieces()?
            .into_iter()
            .filter(|p| !is_sliver(p, eps))
            .map(|p| p.reoriented(orientation))
            .collect();
        if kept.len() < 2 {
            return Err(SplitError::InvalidCut("cut leaves only slivers on one side".to_owned()).into());
        }
        Ok(find_line_pos(kept, &self.line, self.polygon.poly_id().index))
    }

    /// Fragments of a plain line cut with the origin of every edge.
    ///
    /// Rings are not handled here; callers dispatch them first.
    pub(crate) fn fragments(&self) -> Result<Vec<Fragment>> {
        let eps = &self.epsilon;
        let working = self.working_polygon()?;
        let crossings = find_crossings(working.edges(), &self.line, eps);
        let bridges: Vec<Bridge> = pair_crossings(&working, &crossings, eps)?
            .into_iter()
            .map(|(a, b)| Bridge {
                from: a.site,
                to: b.site,
                path: vec![Edge::segment(a.point, b.point)],
            })
            .collect();
        cut_along(&working, &bridges, eps)
    }

    fn with_line(&self, line: Line) -> Self {
        Self {
            polygon: self.polygon,
            line,
            epsilon: self.epsilon,
        }
    }

    fn pieces(&self) -> Result<Vec<Polygon>> {
        if let Some(ring) = self.polygon.ring() {
            return Ok(partition_ring(&ring, &self.line, &self.epsilon)?.to_vec());
        }
        Ok(self.fragments()?.into_iter().map(|f| f.polygon).collect())
    }

    /// Like `pieces`, but a line that misses the polygon yields `None`.
    fn try_pieces(&self) -> Result<Option<Vec<Polygon>>> {
        match self.pieces() {
            Ok(pieces) => Ok(Some(pieces)),
            Err(FenestraError::Split(SplitError::NoCrossing)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// A full circle is restarted at the first crossing so that the cut
    /// yields clean arcs between the cut points.
    fn working_polygon(&self) -> Result<Polygon> {
        let Some(arc) = self.polygon.edges().first().and_then(Edge::as_arc).filter(|_| self.polygon.is_circle()) else {
            return Ok(self.polygon.clone());
        };
        let roots = line_circle_intersect(
            self.line.origin(),
            self.line.direction(),
            &arc.center,
            arc.radius,
            self.epsilon.length,
        );
        if roots.len() < 2 {
            return Err(SplitError::NoCrossing.into());
        }
        let start_angle = angle_of(&arc.center, &self.line.point_at(roots[0]));
        let end_angle = if arc.clockwise {
            start_angle - TAU
        } else {
            start_angle + TAU
        };
        let restarted = Arc::new(arc.center, arc.radius, start_angle, end_angle, arc.clockwise)?;
        Ok(Polygon::with_epsilon(vec![Edge::Arc(restarted)], &self.epsilon)?
            .with_poly_id(self.polygon.poly_id()))
    }
}

/// The two lines bounding a mullion of `thickness` centred on `line`:
/// left first, then right.
#[must_use]
pub fn gen_mullion_lines(line: &Line, thickness: f64) -> (Line, Line) {
    (line.offset(thickness / 2.0), line.offset(-thickness / 2.0))
}

/// Assigns `PolyId`s to cut fragments by the side of `line` they lie on.
#[must_use]
pub fn find_line_pos(pieces: Vec<Polygon>, line: &Line, index: usize) -> Vec<Polygon> {
    assign_positions(pieces, Vec::new(), line, index)
}

fn assign_positions(sides: Vec<Polygon>, mullions: Vec<Polygon>, line: &Line, index: usize) -> Vec<Polygon> {
    let (left, right): (Vec<Polygon>, Vec<Polygon>) =
        sides.into_iter().partition(|p| side_of_polygon(p, line) > 0.0);

    let mut next = 2;
    let mut extra = || {
        let pos = next;
        next += 1;
        pos
    };
    let mut out = Vec::with_capacity(left.len() + mullions.len() + right.len());
    for (k, p) in left.into_iter().enumerate() {
        let pos = if k == 0 { 0 } else { extra() };
        out.push((pos, p.with_mullion(false)));
    }
    for p in mullions {
        out.push((extra(), p.with_mullion(true)));
    }
    for (k, p) in right.into_iter().enumerate() {
        let pos = if k == 0 { 1 } else { extra() };
        out.push((pos, p.with_mullion(false)));
    }
    out.into_iter()
        .map(|(pos, p)| p.with_poly_id(PolyId::new(index, pos)))
        .collect()
}

/// Signed distance from `line` of the polygon point farthest from it.
///
/// A fragment of a line cut lies entirely on one side, so the sign tells
/// which.
fn side_of_polygon(polygon: &Polygon, line: &Line) -> f64 {
    let diag = (polygon.bbox().max - polygon.bbox().min).norm();
    polygon
        .flatten((diag * 1e-4).max(1e-9))
        .iter()
        .map(|p| line.side_of(p))
        .fold(0.0, |best: f64, s| if s.abs() > best.abs() { s } else { best })
}

fn is_sliver(polygon: &Polygon, eps: &Epsilon) -> bool {
    let perimeter: f64 = polygon.edges().iter().map(Edge::length).sum();
    polygon.area() <= eps.length * perimeter
}
