//! Frame bars and cavities for window and door openings.
//!
//! Every variant implements [`FrametifyStrategy`] and only names the
//! dividers that split its outer polygon into zones. Offsets, corner joints
//! and bar construction are shared.

mod bar;
mod basic;
mod ear;
mod joint;
mod kfc;
mod single_track;
mod strategy;
mod zone;

pub use bar::Bar;
pub use basic::Frametify;
pub use ear::Ear2Frametify;
pub use joint::{Corner, JointWay};
pub use kfc::{HalfKfc2Frametify, HalfKfcFrametify, KfcFrametify};
pub use single_track::{Direction, SingleTrackFrametify};
pub use strategy::{FrameResult, FrametifyStrategy};
pub use zone::{SlotRole, Zone};
