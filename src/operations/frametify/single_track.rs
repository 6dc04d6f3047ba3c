use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{Line, Polygon};
use crate::math::polygon_2d::left_normal;
use crate::math::Epsilon;

use super::basic::require_edges;
use super::strategy::FrametifyStrategy;
use super::zone::SlotRole;

/// A side of a rectangular frame, as laid out by `Polygon::rectangle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Bottom,
    Right,
    Top,
    Left,
}

impl Direction {
    /// Sides hidden on a single-track frame unless told otherwise.
    pub const DEFAULT_HIDDEN: [Self; 1] = [Self::Right];

    /// Slot of this side in a rectangle.
    #[must_use]
    pub fn slot(self) -> usize {
        match self {
            Self::Bottom => 0,
            Self::Right => 1,
            Self::Top => 2,
            Self::Left => 3,
        }
    }
}

/// Two sliding sashes on one track, meeting at an interlock through the
/// bottom midpoint (slot 4).
///
/// Hidden sides are framed with zero width and yield virtual bars.
#[derive(Debug, Clone)]
pub struct SingleTrackFrametify<'a> {
    outer: &'a Polygon,
    dividers: [Line; 1],
    hidden: Vec<usize>,
    epsilon: Epsilon,
}

impl<'a> SingleTrackFrametify<'a> {
    /// # Errors
    ///
    /// Returns `GeometryError::MalformedPolygon` unless `outer` has four
    /// edges.
    pub fn new(outer: &'a Polygon, hidden: &[Direction]) -> Result<Self> {
        require_edges(outer, 4, "single track frame")?;
        let bottom = &outer.edges()[0];
        let interlock = Line::new(bottom.midpoint(), left_normal(&bottom.start_tangent()))?;
        let mut hidden: Vec<usize> = hidden.iter().map(|d| d.slot()).collect();
        hidden.sort_unstable();
        hidden.dedup();
        Ok(Self {
            outer,
            dividers: [interlock],
            hidden,
            epsilon: Epsilon::DEFAULT,
        })
    }

    #[must_use]
    pub fn epsilon(mut self, epsilon: Epsilon) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl FrametifyStrategy for SingleTrackFrametify<'_> {
    fn outer(&self) -> &Polygon {
        self.outer
    }

    fn epsilon(&self) -> &Epsilon {
        &self.epsilon
    }

    fn dividers(&self) -> &[Line] {
        &self.dividers
    }

    fn divider_role(&self) -> SlotRole {
        SlotRole::Interlock
    }

    fn hidden_slots(&self) -> &[usize] {
        &self.hidden
    }
}
