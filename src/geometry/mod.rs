pub mod dock;
pub mod edge;
pub mod line;
pub mod polygon;

pub use dock::{DockKind, Docking};
pub use edge::{Arc, Edge, Segment};
pub use line::Line;
pub use polygon::{Aabb, Orientation, PolyId, Polygon, Ring};
