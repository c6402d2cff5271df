//! Error types for grid operations

use thiserror::Error;

/// Errors raised by grid, selection and layout operations.
///
/// All of these are reported at the point of detection and leave the target
/// unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Coordinates fall outside `[0, width) x [0, height)`
    #[error("position ({x}, {y}) is out of bounds")]
    OutOfBounds { x: i32, y: i32 },
    /// Requested dimensions exceed the configured map data budget
    #[error("{width}x{height} needs {size} map data units, maximum is {max}")]
    GridTooLarge {
        width: u32,
        height: u32,
        size: usize,
        max: usize,
    },
    /// A cell sequence does not match the declared dimensions
    #[error("expected {expected} cells, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    /// Zero-sized dimensions where at least one cell is required
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}
