pub mod arc_2d;
pub mod distance_2d;
mod epsilon;
pub mod intersect_2d;
pub mod polygon_2d;

pub use epsilon::Epsilon;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;
