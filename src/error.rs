use thiserror::Error;

/// Top-level error type for the fenestra frame kernel.
#[derive(Debug, Error)]
pub enum FenestraError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Offset(#[from] OffsetError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error("frame state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors related to edges and polygons.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("malformed polygon: {0}")]
    MalformedPolygon(String),

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised by the parallel-edge offset.
#[derive(Debug, Error)]
pub enum OffsetError {
    #[error("offset of edge {edge} is degenerate: {reason}")]
    Degenerate { edge: usize, reason: String },

    #[error("expected {expected} offsets (or a single broadcast value), got {found}")]
    CountMismatch { expected: usize, found: usize },
}

/// Errors raised while building frame bars or mutating a frame manager.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("joint way {joint_way} is invalid at slot {slot}: {reason}")]
    InvalidJointWay {
        slot: usize,
        joint_way: u8,
        reason: String,
    },

    #[error("profile width {width} for slot {slot} must be finite and not negative")]
    InvalidWidth { slot: usize, width: f64 },

    #[error("slot {slot} is out of range (shape has {count} slots)")]
    SlotOutOfRange { slot: usize, count: usize },

    #[error("expected {expected} joint ways (or a single broadcast value), got {found}")]
    JointWayCount { expected: usize, found: usize },

    #[error("unknown joint way {0}")]
    UnknownJointWay(u8),

    #[error("shape has no divider {0}")]
    NoDivider(usize),

    #[error("no bar {slot}/{pos} in the built frame")]
    NoBar { slot: usize, pos: usize },
}

/// Errors raised when cutting a polygon.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("cut line does not cross the polygon")]
    NoCrossing,

    #[error("cut line crosses the boundary an odd number of times ({0})")]
    OddCrossings(usize),

    #[error("invalid cut: {0}")]
    InvalidCut(String),
}

/// Convenience type alias for results using [`FenestraError`].
pub type Result<T> = std::result::Result<T, FenestraError>;
