//! Error types for gridscope-rs.

use thiserror::Error;

use crate::axis::Axis;

/// The main error type for gridscope-rs operations.
#[derive(Error, Debug)]
pub enum GridscopeError {
    /// The axis has no meaning for the requested operation (e.g. labels on Z).
    #[error("axis {0} is not supported by this operation")]
    UnsupportedAxis(Axis),

    /// A raw axis index (as sent by interactive clients) is out of range.
    #[error("invalid axis index {0}, expected 0, 1 or 2")]
    InvalidAxisIndex(u32),

    /// A grid or table index is out of range.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The grid has no data cells.
    #[error("grid has no data cells ({rows} rows x {columns} columns)")]
    EmptyGrid { rows: usize, columns: usize },

    /// The reserved axis row/column of an explicit-axis grid does not exist.
    #[error("reserved {what} {index} out of range for length {len}")]
    InvalidReservedLine {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// The operation only applies to the other grid shape.
    #[error("{operation} requires an {expected} grid")]
    GridShapeMismatch {
        operation: &'static str,
        expected: &'static str,
    },

    /// Stacked bar series must all have the same dimensions.
    #[error(
        "dimensions of stacked bar series do not match: expected {expected:?}, got {actual:?}"
    )]
    StackDimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// No series is registered under this id.
    #[error("unknown series id {0}")]
    UnknownSeries(u64),

    /// Hardware buffer limits are unusable.
    #[error("invalid buffer limits: {0}")]
    InvalidLimits(String),

    /// Rendering backend error.
    #[error("render error: {0}")]
    RenderError(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for gridscope-rs operations.
pub type Result<T> = std::result::Result<T, GridscopeError>;
