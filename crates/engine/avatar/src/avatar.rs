use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::TileId;

/// What the avatar's body is doing this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    #[default]
    Idle,
    Moving,
    RotatingToAlign,
}

/// The walking avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as quaternion
    pub rotation: Quat,
    /// Tile currently underfoot
    pub tile: Option<TileId>,
    pub motion: Motion,
}

impl Avatar {
    pub fn with_transform(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            tile: None,
            motion: Motion::Idle,
        }
    }

    /// Local +Z in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Local +X in world space
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local +Y in world space
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

impl Default for Avatar {
    fn default() -> Self {
        Self::with_transform(Vec3::ZERO, Quat::IDENTITY)
    }
}
