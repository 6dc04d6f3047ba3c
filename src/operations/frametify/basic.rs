use crate::error::{GeometryError, Result};
use crate::geometry::{Edge, Line, Polygon};
use crate::math::polygon_2d::left_normal;
use crate::math::Epsilon;

use super::strategy::FrametifyStrategy;

/// Frames a polygon as a single zone: rectangles, octagons, arches,
/// circles and free polygons.
#[derive(Debug, Clone)]
pub struct Frametify<'a> {
    outer: &'a Polygon,
    epsilon: Epsilon,
}

impl<'a> Frametify<'a> {
    #[must_use]
    pub fn new(outer: &'a Polygon) -> Self {
        Self {
            outer,
            epsilon: Epsilon::DEFAULT,
        }
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: Epsilon) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl FrametifyStrategy for Frametify<'_> {
    fn outer(&self) -> &Polygon {
        self.outer
    }

    fn epsilon(&self) -> &Epsilon {
        &self.epsilon
    }
}

/// Fails unless `polygon` has exactly `count` edges.
pub(super) fn require_edges(polygon: &Polygon, count: usize, shape: &str) -> Result<()> {
    if polygon.len() == count {
        Ok(())
    } else {
        Err(GeometryError::MalformedPolygon(format!(
            "{shape} needs {count} edges, got {}",
            polygon.len()
        ))
        .into())
    }
}

/// The line through the start of edge `index`, square to that edge.
pub(super) fn square_through(polygon: &Polygon, index: usize) -> Result<Line> {
    let edge = edge_at(polygon, index)?;
    Line::new(edge.start(), left_normal(&edge.start_tangent()))
}

/// The line through both ends of edge `index`.
pub(super) fn chord_line(polygon: &Polygon, index: usize) -> Result<Line> {
    let edge = edge_at(polygon, index)?;
    Line::through(edge.start(), edge.end())
}

fn edge_at(polygon: &Polygon, index: usize) -> Result<&Edge> {
    polygon.edge(index).ok_or_else(|| {
        GeometryError::MalformedPolygon(format!("no edge {index} in a {}-edge polygon", polygon.len())).into()
    })
}
