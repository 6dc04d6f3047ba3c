//! Per-shape frame state: profile widths, joint ways and virtual bars, with
//! the cached frametify result they produce.

mod manager;
mod profile;
mod state;

pub use manager::FrameManager;
pub use profile::ProfileConfig;
pub use state::FrameState;
