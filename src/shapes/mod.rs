//! Host shapes: an outer polygon paired with the frametify variant that
//! frames it.

mod shape;

pub use shape::{Shape, ShapeKind};
