use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};
use crate::geometry::Edge;
use crate::math::polygon_2d::cross;
use crate::math::Epsilon;

use super::zone::SlotRole;

/// How two bars meet at the corner governed by a slot.
///
/// Serialized as its numeric code (0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum JointWay {
    /// Both bars meet on the miter line through the offset intersection.
    #[default]
    Default,
    /// The more vertical bar runs through the corner.
    StraightV,
    /// The more horizontal bar runs through the corner.
    StraightH,
    /// A true 45° miter; needs bars of equal width.
    Straight45,
}

impl From<JointWay> for u8 {
    fn from(jw: JointWay) -> Self {
        match jw {
            JointWay::Default => 0,
            JointWay::StraightV => 1,
            JointWay::StraightH => 2,
            JointWay::Straight45 => 3,
        }
    }
}

impl TryFrom<u8> for JointWay {
    type Error = FrameError;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Default),
            1 => Ok(Self::StraightV),
            2 => Ok(Self::StraightH),
            3 => Ok(Self::Straight45),
            other => Err(FrameError::UnknownJointWay(other)),
        }
    }
}

/// Resolved shape of one bar corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// Both bars end on the line from the outer vertex to the inner joint.
    Miter,
    /// The bar ending at the corner runs through; the next one stops short.
    PrevThrough,
    /// The bar starting at the corner runs through; the previous one stops
    /// short.
    NextThrough,
}

/// One of the two bars meeting at a corner.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CornerSide<'a> {
    pub edge: &'a Edge,
    pub role: SlotRole,
    pub width: f64,
}

/// Picks the corner shape where `prev` ends and `next` starts.
///
/// A frame bar always runs through a divider. Between bars of the same kind
/// the joint way of `slot` decides.
///
/// # Errors
///
/// Returns `FrameError::InvalidJointWay` for a straight joint way across a
/// tangent joint, or `Straight45` between bars of unequal width.
pub(crate) fn resolve_corner(
    prev: &CornerSide<'_>,
    next: &CornerSide<'_>,
    joint_way: JointWay,
    slot: usize,
    eps: &Epsilon,
) -> Result<Corner> {
    let (a, b) = (prev.edge.end_tangent(), next.edge.start_tangent());
    let smooth = cross(&a, &b).abs() < eps.angle && a.dot(&b) > 0.0;

    if prev.role.is_divider() != next.role.is_divider() {
        return Ok(if smooth {
            Corner::Miter
        } else if prev.role.is_divider() {
            Corner::NextThrough
        } else {
            Corner::PrevThrough
        });
    }

    let invalid = |reason: &str| FrameError::InvalidJointWay {
        slot,
        joint_way: joint_way.into(),
        reason: reason.to_owned(),
    };
    match joint_way {
        JointWay::Default => Ok(Corner::Miter),
        _ if smooth => Err(invalid("straight joints need a corner, not a tangent joint").into()),
        JointWay::Straight45 => {
            if (prev.width - next.width).abs() > eps.length {
                Err(invalid("a 45° joint needs bars of equal width").into())
            } else {
                Ok(Corner::Miter)
            }
        }
        JointWay::StraightH => Ok(through(a.x.abs(), b.x.abs(), eps)),
        JointWay::StraightV => Ok(through(a.y.abs(), b.y.abs(), eps)),
    }
}

fn through(prev_score: f64, next_score: f64, eps: &Epsilon) -> Corner {
    if (prev_score - next_score).abs() < eps.angle {
        Corner::Miter
    } else if prev_score > next_score {
        Corner::PrevThrough
    } else {
        Corner::NextThrough
    }
}
