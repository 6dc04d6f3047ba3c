use crate::error::{FrameError, Result, SplitError};
use crate::geometry::{Docking, Line, PolyId, Polygon};
use crate::operations::frametify::{Bar, JointWay};
use crate::operations::split::Splitter;
use crate::shapes::Shape;

use super::profile::ProfileConfig;
use super::state::FrameState;

/// Owns the per-slot frame parameters of one host shape and the bars and
/// cavities they produce.
///
/// Every mutating call rebuilds the frame. A call that fails leaves the
/// manager exactly as it was before the call.
#[derive(Debug, Clone)]
pub struct FrameManager {
    shape: Shape,
    profile: ProfileConfig,
    is_sash: bool,
    edge_width: Vec<f64>,
    ejw: Vec<JointWay>,
    virtuals: Vec<PolyId>,
    inner_polys: Vec<Polygon>,
    bars: Vec<Bar>,
}

impl FrameManager {
    /// A manager with no frame built yet; widths and joint ways read as
    /// their defaults until set.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            profile: ProfileConfig::default(),
            is_sash: false,
            edge_width: Vec::new(),
            ejw: Vec::new(),
            virtuals: Vec::new(),
            inner_polys: Vec::new(),
            bars: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: ProfileConfig) -> Self {
        self.profile = profile;
        self
    }

    /// Frames a sash instead of a fixed frame: outer bars take the sash
    /// width.
    #[must_use]
    pub fn sash(mut self, is_sash: bool) -> Self {
        self.is_sash = is_sash;
        self
    }

    /// Rebuilds a manager from persisted state.
    ///
    /// Entries past the shape's slot count, including virtual flags on
    /// slots the shape lacks, are dropped.
    ///
    /// # Errors
    ///
    /// Returns the frametify error if the stored widths or joint ways do
    /// not frame `shape`.
    pub fn from_state(shape: Shape, state: FrameState) -> Result<Self> {
        let mut manager = Self::new(shape);
        let n = manager.shape.slot_count();
        manager.edge_width = state.ew;
        manager.edge_width.truncate(n);
        manager.ejw = state.ejw;
        manager.ejw.truncate(n);
        manager.virtuals = state.vs;
        manager.virtuals.retain(|id| id.index < n);
        manager.create()?;
        Ok(manager)
    }

    /// # Errors
    ///
    /// Returns `FenestraError::Serialization` for malformed JSON, otherwise
    /// see [`FrameManager::from_state`].
    pub fn from_json(shape: Shape, json: &str) -> Result<Self> {
        let state: FrameState = serde_json::from_str(json)?;
        Self::from_state(shape, state)
    }

    #[must_use]
    pub fn state(&self) -> FrameState {
        FrameState {
            ejw: self.joint_ways(),
            ew: self.edge_width(),
            vs: self.virtuals.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns `FenestraError::Serialization` if the state cannot be
    /// encoded.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.state())?)
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn profile(&self) -> &ProfileConfig {
        &self.profile
    }

    #[must_use]
    pub fn inner_polys(&self) -> &[Polygon] {
        &self.inner_polys
    }

    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    #[must_use]
    pub fn virtuals(&self) -> &[PolyId] {
        &self.virtuals
    }

    /// Width of every slot; unset slots read as the profile default for
    /// their role.
    #[must_use]
    pub fn edge_width(&self) -> Vec<f64> {
        (0..self.shape.slot_count())
            .map(|slot| {
                self.edge_width
                    .get(slot)
                    .copied()
                    .unwrap_or_else(|| self.default_width(slot))
            })
            .collect()
    }

    /// Joint way of every slot; unset slots read as `JointWay::Default`.
    #[must_use]
    pub fn joint_ways(&self) -> Vec<JointWay> {
        (0..self.shape.slot_count())
            .map(|slot| self.ejw.get(slot).copied().unwrap_or_default())
            .collect()
    }

    /// End docking of each outer edge.
    #[must_use]
    pub fn docking(&self) -> Vec<Docking> {
        self.shape.polygon().docking(self.shape.epsilon())
    }

    /// Resets every slot to its profile default and default joint.
    pub fn init_profile_size(&mut self) {
        let n = self.shape.slot_count();
        self.edge_width = (0..n).map(|slot| self.default_width(slot)).collect();
        self.ejw = vec![JointWay::Default; n];
    }

    /// Rebuilds bars and cavities from the current parameters.
    ///
    /// # Errors
    ///
    /// Returns the frametify error; the cached bars and cavities are only
    /// replaced on success.
    pub fn create(&mut self) -> Result<()> {
        let widths = self.edge_width();
        let ways = self.joint_ways();
        let result = self.shape.frametify()?.run(&widths, &ways)?;
        self.inner_polys = result.inner_polys;
        self.bars = result.bar_polys;
        self.flag_virtuals();
        tracing::debug!(
            "frame rebuilt: {} bars, {} cavities",
            self.bars.len(),
            self.inner_polys.len()
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `FrameError::SlotOutOfRange`, `FrameError::InvalidWidth` for
    /// a negative or non-finite width, or the frametify error if the new
    /// width does not fit.
    pub fn set_edge_width(&mut self, slot: usize, width: f64) -> Result<()> {
        self.check_slot(slot)?;
        if !width.is_finite() || width < 0.0 {
            return Err(FrameError::InvalidWidth { slot, width }.into());
        }
        self.transition("set_edge_width", |m| {
            let mut widths = m.edge_width();
            widths[slot] = width;
            m.edge_width = widths;
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Returns `FrameError::SlotOutOfRange` for a bad slot and
    /// `FrameError::InvalidJointWay` if a corner of the slot cannot take
    /// `joint_way`.
    pub fn set_joint_way(&mut self, slot: usize, joint_way: JointWay) -> Result<()> {
        self.check_slot(slot)?;
        self.transition("set_joint_way", |m| {
            let mut ways = m.joint_ways();
            ways[slot] = joint_way;
            m.ejw = ways;
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Returns `FrameError::InvalidJointWay` if any corner cannot take
    /// `joint_way`.
    pub fn set_all_joint_ways(&mut self, joint_way: JointWay) -> Result<()> {
        self.transition("set_all_joint_ways", |m| {
            m.ejw = vec![joint_way; m.shape.slot_count()];
            Ok(())
        })
    }

    /// Swaps in a reshaped host and rebuilds.
    ///
    /// Slots the new shape shares with the old keep their parameters; new
    /// slots take defaults.
    ///
    /// # Errors
    ///
    /// Returns the frametify error if the kept parameters do not frame the
    /// new shape.
    pub fn recreated(&mut self, shape: Shape) -> Result<()> {
        self.transition("recreated", |m| {
            let n = shape.slot_count();
            m.shape = shape;
            m.edge_width.truncate(n);
            m.ejw.truncate(n);
            m.virtuals.retain(|id| id.index < n);
            Ok(())
        })
    }

    /// Flags or clears the bar `poly_id` as virtual.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::SlotOutOfRange` if the id names no slot and
    /// `FrameError::NoBar` when flagging an id no built bar carries.
    pub fn set_virtual(&mut self, poly_id: PolyId, is_virtual: bool) -> Result<()> {
        self.check_slot(poly_id.index)?;
        if is_virtual && !self.bars.iter().any(|b| b.polygon.poly_id() == poly_id) {
            return Err(FrameError::NoBar {
                slot: poly_id.index,
                pos: poly_id.pos,
            }
            .into());
        }
        if is_virtual {
            if !self.virtuals.contains(&poly_id) {
                self.virtuals.push(poly_id);
            }
        } else {
            self.virtuals.retain(|id| *id != poly_id);
        }
        self.flag_virtuals();
        Ok(())
    }

    /// Cuts cavity `index` along `line` without touching the manager.
    ///
    /// With a `thickness` the cut carries a mullion of that width.
    ///
    /// # Errors
    ///
    /// Returns `SplitError::InvalidCut` if there is no such cavity, or the
    /// split error.
    pub fn split_inner(&self, index: usize, line: Line, thickness: Option<f64>) -> Result<Vec<Polygon>> {
        let pane = self
            .inner_polys
            .get(index)
            .ok_or_else(|| SplitError::InvalidCut(format!("no cavity {index}")))?;
        let splitter = Splitter::new(pane, line).epsilon(*self.shape.epsilon());
        match thickness {
            Some(t) => splitter.split(t),
            None => splitter.partition(),
        }
    }

    fn default_width(&self, slot: usize) -> f64 {
        self.profile.width_for(self.shape.slot_role(slot), self.is_sash)
    }

    fn check_slot(&self, slot: usize) -> Result<()> {
        let count = self.shape.slot_count();
        if slot < count {
            Ok(())
        } else {
            Err(FrameError::SlotOutOfRange { slot, count }.into())
        }
    }

    fn flag_virtuals(&mut self) {
        for bar in &mut self.bars {
            let id = bar.polygon.poly_id();
            bar.is_virtual = self.shape.is_hidden(id.index) || self.virtuals.contains(&id);
        }
    }

    /// Applies `change` and rebuilds, restoring the previous manager if
    /// either step fails.
    fn transition(&mut self, name: &str, change: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        let last_good = self.clone();
        let outcome = change(self).and_then(|()| self.create());
        if let Err(e) = &outcome {
            tracing::warn!("{} failed, keeping the last good frame: {}", name, e);
            *self = last_good;
        }
        outcome
    }
}
