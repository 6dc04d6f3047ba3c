mod intersection;
mod parallel;

pub use intersection::edge_intersection;
pub(crate) use parallel::broadcast;
pub use parallel::{close_steps, find_parallel_edges, rejoin_at, ParallelEdges};
