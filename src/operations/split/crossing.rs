use crate::error::{Result, SplitError};
use crate::geometry::{Edge, Line, Polygon};
use crate::math::intersect_2d::line_circle_intersect;
use crate::math::{Epsilon, Point2};

/// Parameter offset used to sample an edge just next to a vertex.
const SIDE_SAMPLE: f64 = 1e-4;

/// Where on the boundary a cut point sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Site {
    /// The start vertex of edge `i`.
    Vertex(usize),
    /// Strictly inside an edge at parameter `t`.
    Interior { edge: usize, t: f64 },
}

/// A point where a cut line meets the boundary.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Crossing {
    pub point: Point2,
    /// Position along the cut line.
    pub along: f64,
    pub site: Site,
    /// The boundary passes from one side of the line to the other here.
    /// Ends of a run lying on the line are not strict.
    pub strict: bool,
}

fn side_sign(value: f64, eps: &Epsilon) -> i8 {
    if value > eps.length {
        1
    } else if value < -eps.length {
        -1
    } else {
        0
    }
}

/// Every point where `line` crosses or leaves the boundary, sorted along
/// the line. Tangent touches are skipped.
pub(crate) fn find_crossings(edges: &[Edge], line: &Line, eps: &Epsilon) -> Vec<Crossing> {
    let n = edges.len();
    let mut found = Vec::new();

    for (j, edge) in edges.iter().enumerate() {
        let v = edge.start();
        if line.side_of(&v).abs() <= eps.length {
            let prev = &edges[(j + n - 1) % n];
            let before = side_sign(line.side_of(&prev.point_at(1.0 - SIDE_SAMPLE)), eps);
            let after = side_sign(line.side_of(&edge.point_at(SIDE_SAMPLE)), eps);
            let strict = match (before, after) {
                (0, 0) => None,
                (b, a) if b == -a => Some(true),
                (0, _) | (_, 0) => Some(false),
                _ => None,
            };
            if let Some(strict) = strict {
                found.push(Crossing {
                    point: v,
                    along: line.project(&v),
                    site: Site::Vertex(j),
                    strict,
                });
            }
        }
        interior_crossings(edge, j, line, eps, &mut found);
    }

    found.sort_by(|a, b| a.along.total_cmp(&b.along));
    found.dedup_by(|b, a| eps.same_point(&a.point, &b.point));
    found
}

fn interior_crossings(edge: &Edge, index: usize, line: &Line, eps: &Epsilon, out: &mut Vec<Crossing>) {
    let (start, end) = (edge.start(), edge.end());
    match edge {
        Edge::Segment(_) => {
            let s0 = line.side_of(&start);
            let s1 = line.side_of(&end);
            if s0.abs() <= eps.length || s1.abs() <= eps.length || s0 * s1 > 0.0 {
                return;
            }
            let t = s0 / (s0 - s1);
            let point = edge.point_at(t);
            out.push(Crossing {
                point,
                along: line.project(&point),
                site: Site::Interior { edge: index, t },
                strict: true,
            });
        }
        Edge::Arc(a) => {
            let roots = line_circle_intersect(line.origin(), line.direction(), &a.center, a.radius, eps.length);
            if roots.len() < 2 {
                return;
            }
            for u in roots {
                let point = line.point_at(u);
                if eps.same_point(&point, &start) || eps.same_point(&point, &end) {
                    continue;
                }
                if let Some(t) = edge.param_of(&point) {
                    out.push(Crossing {
                        point,
                        along: u,
                        site: Site::Interior { edge: index, t },
                        strict: true,
                    });
                }
            }
        }
    }
}

/// Pairs consecutive crossings whose connecting chord runs through the
/// interior.
///
/// # Errors
///
/// `SplitError::NoCrossing` if no chord lies inside, `InvalidCut` if one
/// point would carry two bridges, and `OddCrossings` if a strict crossing
/// is left without a partner. Crossings found on a closed boundary pair up
/// exactly, so the last case only guards against numerical drift in the
/// crossing list.
pub(crate) fn pair_crossings(
    polygon: &Polygon,
    crossings: &[Crossing],
    eps: &Epsilon,
) -> Result<Vec<(Crossing, Crossing)>> {
    let mut used = vec![false; crossings.len()];
    let mut pairs = Vec::new();
    for i in 1..crossings.len() {
        let (a, b) = (crossings[i - 1], crossings[i]);
        if eps.same_point(&a.point, &b.point) {
            continue;
        }
        let mid = nalgebra::center(&a.point, &b.point);
        if !polygon.is_strictly_inside(&mid, eps) {
            continue;
        }
        if used[i - 1] {
            return Err(SplitError::InvalidCut(format!(
                "cut point ({:.3}, {:.3}) would carry two bridges",
                a.point.x, a.point.y
            ))
            .into());
        }
        used[i - 1] = true;
        used[i] = true;
        pairs.push((a, b));
    }

    if pairs.is_empty() {
        return Err(SplitError::NoCrossing.into());
    }
    if crossings.iter().zip(&used).any(|(c, u)| c.strict && !u) {
        let strict = crossings.iter().filter(|c| c.strict).count();
        return Err(SplitError::OddCrossings(strict).into());
    }
    Ok(pairs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FenestraError;
    use crate::math::Vector2;
    use approx::assert_abs_diff_eq;

    fn rect() -> Polygon {
        Polygon::rectangle(Point2::origin(), 1200.0, 1000.0).unwrap()
    }

    #[test]
    fn vertical_line_crosses_rectangle_twice() {
        let eps = Epsilon::default();
        let c = find_crossings(rect().edges(), &Line::vertical(600.0), &eps);
        assert_eq!(c.len(), 2);
        assert!(c.iter().all(|x| x.strict));
        assert_abs_diff_eq!(c[0].point.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c[1].point.y, 1000.0, epsilon = 1e-9);
        assert!(matches!(c[0].site, Site::Interior { edge: 0, .. }));
    }

    #[test]
    fn unpaired_strict_crossing_is_odd() {
        let eps = Epsilon::default();
        let line = Line::vertical(600.0);
        let mut c = find_crossings(rect().edges(), &line, &eps);
        let stray = Point2::new(600.0, 1500.0);
        c.push(Crossing {
            point: stray,
            along: line.project(&stray),
            site: Site::Interior { edge: 2, t: 0.5 },
            strict: true,
        });
        let err = pair_crossings(&rect(), &c, &eps).unwrap_err();
        assert!(matches!(err, FenestraError::Split(SplitError::OddCrossings(3))));
    }

    #[test]
    fn line_through_vertex_is_a_vertex_crossing() {
        let eps = Epsilon::default();
        let diagonal = Line::new(Point2::origin(), Vector2::new(1200.0, 1000.0)).unwrap();
        let c = find_crossings(rect().edges(), &diagonal, &eps);
        assert_eq!(c.len(), 2);
        assert!(matches!(c[0].site, Site::Vertex(0)));
        assert!(matches!(c[1].site, Site::Vertex(2)));
        assert!(c.iter().all(|x| x.strict));
    }

    #[test]
    fn line_along_edge_gives_chain_ends() {
        let eps = Epsilon::default();
        let c = find_crossings(rect().edges(), &Line::horizontal(0.0), &eps);
        assert_eq!(c.len(), 2);
        assert!(c.iter().all(|x| !x.strict));
        let err = pair_crossings(&rect(), &c, &eps).unwrap_err();
        assert!(matches!(err, FenestraError::Split(SplitError::NoCrossing)));
    }

    #[test]
    fn touching_apex_is_skipped() {
        let eps = Epsilon::default();
        let tri = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(5.0, 5.0),
        ])
        .unwrap();
        let c = find_crossings(tri.edges(), &Line::horizontal(5.0), &eps);
        assert!(c.is_empty());
    }

    #[test]
    fn concave_polygon_pairs_two_chords() {
        let eps = Epsilon::default();
        let u = Polygon::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(2.0, 3.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 3.0),
            Point2::new(0.0, 3.0),
        ])
        .unwrap();
        let c = find_crossings(u.edges(), &Line::horizontal(2.0), &eps);
        assert_eq!(c.len(), 4);
        let pairs = pair_crossings(&u, &c, &eps).unwrap();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn arc_crossings_are_interior() {
        let eps = Epsilon::default();
        let circle = Polygon::circle(Point2::origin(), 10.0).unwrap();
        let c = find_crossings(circle.edges(), &Line::vertical(0.0), &eps);
        assert_eq!(c.len(), 2);
        assert_abs_diff_eq!(c[0].point.y, -10.0, epsilon = 1e-9);
        let tangent = find_crossings(circle.edges(), &Line::vertical(10.0), &eps);
        assert!(tangent.is_empty());
    }
}
