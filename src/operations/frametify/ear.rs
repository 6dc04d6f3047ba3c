use crate::error::{GeometryError, Result};
use crate::geometry::{Line, Polygon};
use crate::math::Epsilon;

use super::basic::{chord_line, require_edges};
use super::strategy::FrametifyStrategy;

/// An arched head light over a rectangular light, separated by a transom
/// along the chord of the arch.
///
/// Expects four edges: bottom, right, the arch (edge 2) and left. The
/// transom runs through vertices 2 and 3 and is slot 4.
#[derive(Debug, Clone)]
pub struct Ear2Frametify<'a> {
    outer: &'a Polygon,
    dividers: [Line; 1],
    epsilon: Epsilon,
}

impl<'a> Ear2Frametify<'a> {
    /// # Errors
    ///
    /// Returns `GeometryError::MalformedPolygon` unless `outer` has four
    /// edges with an arc as edge 2.
    pub fn new(outer: &'a Polygon) -> Result<Self> {
        require_edges(outer, 4, "arched frame")?;
        if outer.edge(2).is_some_and(|e| e.is_segment()) {
            return Err(GeometryError::MalformedPolygon("arched frame needs an arc as edge 2".to_owned()).into());
        }
        Ok(Self {
            outer,
            dividers: [chord_line(outer, 2)?],
            epsilon: Epsilon::DEFAULT,
        })
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: Epsilon) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl FrametifyStrategy for Ear2Frametify<'_> {
    fn outer(&self) -> &Polygon {
        self.outer
    }

    fn epsilon(&self) -> &Epsilon {
        &self.epsilon
    }

    fn dividers(&self) -> &[Line] {
        &self.dividers
    }
}
