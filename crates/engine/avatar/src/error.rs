//! Error types for the avatar crate

use glam::Vec3;
use thiserror::Error;

/// Result type alias for navigator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up a navigator
#[derive(Debug, Error)]
pub enum Error {
    /// A navigator setting is out of range
    #[error("Invalid navigator config: {0}")]
    InvalidConfig(String),

    /// Surface tile normal cannot be normalized
    #[error("Invalid surface normal: {0}")]
    InvalidNormal(Vec3),
}
