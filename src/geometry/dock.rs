use serde::{Deserialize, Serialize};

use crate::math::polygon_2d::cross;
use crate::math::{Epsilon, Vector2};

use super::Orientation;

/// How a bar meets its neighbour at one end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DockKind {
    /// Smooth continuation (tangent joint), nothing to miter.
    None,
    /// Convex corner: the neighbouring bar is mitered against this one.
    Frame,
    /// Reflex corner or cusp: the bar end is left open for a control joint.
    Control,
}

/// Dock kinds at both ends of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Docking {
    pub start: DockKind,
    pub end: DockKind,
}

/// Classifies the corner where a chain arriving with tangent `incoming`
/// leaves with tangent `outgoing`.
#[must_use]
pub fn corner_kind(
    incoming: &Vector2,
    outgoing: &Vector2,
    orientation: Orientation,
    eps: &Epsilon,
) -> DockKind {
    let turn = cross(incoming, outgoing);
    if turn.abs() < eps.angle {
        if incoming.dot(outgoing) > 0.0 {
            DockKind::None
        } else {
            DockKind::Control
        }
    } else if turn * orientation.sign() > 0.0 {
        DockKind::Frame
    } else {
        DockKind::Control
    }
}
