pub mod error;
pub mod frame;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod shapes;

pub use error::{FenestraError, Result};
