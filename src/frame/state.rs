use serde::{Deserialize, Serialize};

use crate::geometry::PolyId;
use crate::operations::frametify::JointWay;

/// The durable part of a frame manager.
///
/// Serialized as `{"ejw": [..], "ew": [..], "vs": [{"idx": .., "pos": ..}]}`;
/// bars and cavities are rebuilt from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameState {
    /// Joint way per slot.
    pub ejw: Vec<JointWay>,
    /// Profile width per slot.
    pub ew: Vec<f64>,
    /// Bars flagged virtual.
    pub vs: Vec<PolyId>,
}
