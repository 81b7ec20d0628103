//! Avatar crate - walking the outside of the Rubik'scape cube
//!
//! The avatar follows a trail of goal points laid on the painted tiles. It
//! walks to the nearest goal on its own, stops at junctions until the player
//! picks a direction, and keeps its feet on whichever tile it stands on.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Navigator                           │
//! │  ├── Seeking → Moving → Seeking                         │
//! │  ├── Seeking → AwaitingChoice → (choose) → Moving       │
//! │  └── surface alignment while standing still             │
//! ├─────────────────────────────────────────────────────────┤
//! │  Course                                                  │
//! │  ├── GoalPoint (normal / branch, active / consumed)     │
//! │  └── SurfaceTile (centre + outward normal)              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use avatar::{Course, GoalKind, NavState, Navigator, NavigatorConfig};
//! use avatar::glam::Vec3;
//!
//! let mut course = Course::new();
//! course.add_goal(Vec3::new(0.0, 0.0, 1.0), GoalKind::Normal);
//!
//! let mut nav = Navigator::new(NavigatorConfig::default()).unwrap();
//! while course.remaining() > 0 {
//!     nav.step(&mut course, 1.0 / 60.0);
//! }
//! assert_eq!(*nav.state(), NavState::Seeking);
//! ```

mod avatar;
mod course;
mod error;
mod motion;
mod navigator;

pub use avatar::{Avatar, Motion};
pub use course::{Course, GoalId, GoalKind, GoalPoint, GoalState, SurfaceTile, TileId};
pub use error::{Error, Result};
pub use motion::{look_rotation, move_towards};
pub use navigator::{AvatarSnapshot, Candidate, Direction, NavState, Navigator, NavigatorConfig};

// Re-export glam for convenience
pub use glam;
