//! Error types for buffer, window and kernel operations.

use thiserror::Error;

use crate::pixel_buffer::Dimensions;

/// Errors reported by the checked public API.
///
/// Every kernel validates its inputs before touching any output, so an error
/// always means no output cell was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid dimensions {width}x{height}x{bands}: {reason}")]
    InvalidDimension {
        width: usize,
        height: usize,
        bands: usize,
        reason: &'static str,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: Dimensions,
        actual: Dimensions,
    },

    #[error("Cannot advance window by {requested} lines, it only holds {capacity}")]
    InvalidAdvance { requested: usize, capacity: usize },

    #[error("{context} access at (x={x}, y={y}, band={band}) is out of range")]
    OutOfRange {
        context: &'static str,
        x: isize,
        y: isize,
        band: usize,
    },

    #[error("Window has not been drafted")]
    NotDrafted,
}

pub type Result<T> = std::result::Result<T, Error>;
