//! Cutting polygons along lines and point paths.
//!
//! The boundary is broken into [`ShapeElement`]s held in a slotmap arena,
//! bridges are spliced in along the cut and the resulting loops are
//! collected back into polygons.

mod crossing;
mod cut;
mod element;
mod point_cut;
mod ring;
mod splitter;

pub use element::{EdgeOrigin, ElementId, Fragment, Junction, ShapeElement, ShapeElements};
pub use point_cut::PointCut;
pub use splitter::{find_line_pos, gen_mullion_lines, Splitter};
