use serde::{Deserialize, Serialize};

use crate::operations::frametify::SlotRole;

/// Default profile widths per slot role, in model units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub frame: f64,
    /// Outer bars of a sash, which is lighter than a fixed frame.
    pub sash: f64,
    pub mullion: f64,
    pub interlock: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            frame: 60.0,
            sash: 50.0,
            mullion: 80.0,
            interlock: 40.0,
        }
    }
}

impl ProfileConfig {
    /// Width a fresh slot of `role` starts with.
    #[must_use]
    pub fn width_for(&self, role: SlotRole, is_sash: bool) -> f64 {
        match role {
            SlotRole::Frame if is_sash => self.sash,
            SlotRole::Frame => self.frame,
            SlotRole::Mullion => self.mullion,
            SlotRole::Interlock => self.interlock,
        }
    }
}
