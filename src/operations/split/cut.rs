use crate::error::{Result, SplitError};
use crate::geometry::{Edge, Polygon};
use crate::math::Epsilon;

use super::crossing::Site;
use super::element::{EdgeOrigin, ElementId, Fragment, Junction, ShapeElements};

/// A path to splice between two boundary sites.
#[derive(Debug, Clone)]
pub(crate) struct Bridge {
    pub from: Site,
    pub to: Site,
    pub path: Vec<Edge>,
}

/// Pieces of one source edge, each with the edge parameter it starts at.
type Pieces = Vec<(f64, ElementId)>;

/// Breaks the boundary at every bridge site, splices the bridges and
/// collects the resulting loops.
pub(crate) fn cut_along(polygon: &Polygon, bridges: &[Bridge], eps: &Epsilon) -> Result<Vec<Fragment>> {
    let edges = polygon.edges();
    let n = edges.len();

    let mut params: Vec<Vec<f64>> = vec![Vec::new(); n];
    for site in bridges.iter().flat_map(|b| [b.from, b.to]) {
        if let Site::Interior { edge, t } = site {
            params
                .get_mut(edge)
                .ok_or_else(|| SplitError::InvalidCut(format!("cut on missing edge {edge}")))?
                .push(t);
        }
    }

    let mut arena = ShapeElements::new();
    let mut pieces: Vec<Pieces> = Vec::with_capacity(n);
    for (j, edge) in edges.iter().enumerate() {
        let cuts = &mut params[j];
        cuts.sort_by(f64::total_cmp);
        cuts.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

        let mut rest = *edge;
        let mut consumed = 0.0;
        let mut list = Vec::with_capacity(cuts.len() + 1);
        for &t in cuts.iter() {
            let (head, tail) = rest.split_at((t - consumed) / (1.0 - consumed));
            list.push((consumed, arena.insert(head, EdgeOrigin::Source(j))));
            rest = tail;
            consumed = t;
        }
        list.push((consumed, arena.insert(rest, EdgeOrigin::Source(j))));
        pieces.push(list);
    }

    let order: Vec<ElementId> = pieces.iter().flatten().map(|&(_, id)| id).collect();
    arena.double_linked(&order, false)?;

    for bridge in bridges {
        let from = junction(&pieces, bridge.from)?;
        let to = junction(&pieces, bridge.to)?;
        arena.create_bridge(&bridge.path, from, to)?;
    }
    arena.collect_polys(eps)
}

fn junction(pieces: &[Pieces], site: Site) -> Result<Junction> {
    let n = pieces.len();
    let missing = || SplitError::InvalidCut("cut site not found on the boundary".to_owned());
    match site {
        Site::Vertex(j) => {
            let incoming = pieces
                .get((j + n - 1) % n)
                .and_then(|p| p.last())
                .ok_or_else(missing)?
                .1;
            let outgoing = pieces.get(j).and_then(|p| p.first()).ok_or_else(missing)?.1;
            Ok(Junction { incoming, outgoing })
        }
        Site::Interior { edge, t } => {
            let list = pieces.get(edge).ok_or_else(missing)?;
            let k = list
                .iter()
                .position(|(start, _)| (start - t).abs() < 1e-12)
                .filter(|&k| k > 0)
                .ok_or_else(missing)?;
            Ok(Junction {
                incoming: list[k - 1].1,
                outgoing: list[k].1,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    #[test]
    fn interior_sites_split_edges() {
        let p = Polygon::rectangle(Point2::origin(), 4.0, 2.0).unwrap();
        let bridge = Bridge {
            from: Site::Interior { edge: 0, t: 0.25 },
            to: Site::Interior { edge: 2, t: 0.75 },
            path: vec![Edge::segment(Point2::new(1.0, 0.0), Point2::new(1.0, 2.0))],
        };
        let frags = cut_along(&p, &[bridge], &Epsilon::default()).unwrap();
        assert_eq!(frags.len(), 2);
        let mut areas: Vec<f64> = frags.iter().map(|f| f.polygon.area()).collect();
        areas.sort_by(f64::total_cmp);
        assert_abs_diff_eq!(areas[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(areas[1], 6.0, epsilon = 1e-12);
    }

    #[test]
    fn vertex_sites_reuse_existing_corners() {
        let p = Polygon::rectangle(Point2::origin(), 4.0, 2.0).unwrap();
        let bridge = Bridge {
            from: Site::Vertex(0),
            to: Site::Vertex(2),
            path: vec![Edge::segment(Point2::new(0.0, 0.0), Point2::new(4.0, 2.0))],
        };
        let frags = cut_along(&p, &[bridge], &Epsilon::default()).unwrap();
        assert_eq!(frags.len(), 2);
        for f in &frags {
            assert_eq!(f.polygon.len(), 3);
            assert_abs_diff_eq!(f.polygon.area(), 4.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn unknown_site_is_invalid() {
        let p = Polygon::rectangle(Point2::origin(), 4.0, 2.0).unwrap();
        let bridge = Bridge {
            from: Site::Interior { edge: 9, t: 0.5 },
            to: Site::Vertex(2),
            path: vec![Edge::segment(Point2::new(0.0, 0.0), Point2::new(4.0, 2.0))],
        };
        assert!(cut_along(&p, &[bridge], &Epsilon::default()).is_err());
    }
}
