//! Error types for the geoshape pipeline.
//!
//! Each fallible concern gets its own enum so callers can match on exactly
//! what went wrong. `Error` wraps them all for code that just wants `?`.
//!
//! Empty results are NOT errors: a selection that filters down to nothing
//! produces `None` / an empty `Vec`, and the host step becomes a no-op.

use thiserror::Error;

/// Failures while decoding or walking a TopoJSON topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("topology JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("topology has no object named '{0}'")]
    UnknownObject(String),
    #[error("arc index {index} out of range ({count} arcs)")]
    ArcIndex { index: i64, count: usize },
    #[error("arc {0} has a position with fewer than 2 coordinates")]
    ShortPosition(usize),
}

/// Failures of the scale/stroke adjustment step.
///
/// These refuse the operation rather than producing NaN coordinates.
#[derive(Debug, Error, PartialEq)]
pub enum AdjustError {
    #[error("group has zero or invalid size ({width} x {height})")]
    EmptyGroup { width: f64, height: f64 },
    #[error("target box has zero or invalid size ({width} x {height})")]
    EmptyTarget { width: f64, height: f64 },
    #[error("margin factor must be in (0, 1], got {0}")]
    InvalidMargin(f64),
    #[error("scale factor {0} cannot be used to derive a stroke width")]
    DegenerateScale(f64),
}

/// Failures while reading path data.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("path data parse error: {0}")]
    Parse(String),
}

/// Failures of the persisted selection store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("saved selection is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("selection store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reported by a document host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("unknown node {0}")]
    UnknownNode(usize),
    #[error("node {0} has no measurable bounds")]
    NoBounds(usize),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("host rejected the request: {0}")]
    Rejected(String),
}

/// Umbrella error for pipeline entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Adjust(#[from] AdjustError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Host(#[from] HostError),
}

pub type Result<T> = std::result::Result<T, Error>;
