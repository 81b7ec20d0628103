//! Error types for the rubik crate

use glam::IVec3;
use thiserror::Error;

use crate::SliceAxis;

/// Result type alias for grid and rotation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or twisting a cube grid
#[derive(Debug, Error)]
pub enum Error {
    /// Grid size must be at least 1
    #[error("Invalid grid size: {0} (must be >= 1)")]
    InvalidSize(i32),

    /// Grid size beyond what the cell store can index
    #[error("Grid size {size} too large (at most {max})")]
    TooLarge { size: i32, max: i32 },

    /// Spacing between cells must be a positive finite number
    #[error("Invalid cell spacing: {0}")]
    InvalidSpacing(f32),

    /// Coordinate lies outside `[0, size)` on some axis
    #[error("Coordinate {coord} out of range for grid of size {size}")]
    CoordOutOfRange { coord: IVec3, size: i32 },

    /// Slice index lies outside `[0, size)`
    #[error("Slice {axis:?}{index} out of range for grid of size {size}")]
    SliceOutOfRange {
        axis: SliceAxis,
        index: i32,
        size: i32,
    },

    /// A rotation was requested while another slice is still turning
    #[error("Rotation already in progress")]
    RotationInProgress,

    /// Rotation command text could not be parsed
    #[error("Invalid rotation command: {0}")]
    InvalidCommand(String),

    /// Face painter has no tile variants to place
    #[error("No tile variants available for face painting")]
    MissingTemplate,

    /// Level data could not be decoded
    #[error("Invalid level data: {0}")]
    Level(#[from] serde_json::Error),

    /// Grid bijection check failed
    #[error("Grid corrupted: {0}")]
    GridCorrupted(String),
}
