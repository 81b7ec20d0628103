//! Rubik crate - cube grid and slice rotation for Rubik'scape
//!
//! This crate owns the puzzle half of the game: an NxNxN grid of cells that
//! can be twisted one slice at a time, plus the level data that decides how
//! the outside of the cube is decorated.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                        Grid                              │
//! │  ├── Cells (identity, coordinate, world transform)      │
//! │  ├── O(1) coordinate lookup                             │
//! │  └── Bijection check (verify)                           │
//! ├─────────────────────────────────────────────────────────┤
//! │  Slices                                                  │
//! │  ├── select_slice(axis, index)                          │
//! │  ├── RotationCommand (axis, index, turn)                │
//! │  └── DragGesture → RotationCommand                      │
//! ├─────────────────────────────────────────────────────────┤
//! │  SliceRotator                                            │
//! │  ├── Idle → Rotating → Committing → Idle                │
//! │  ├── advance(dt) once per simulation tick               │
//! │  └── exact integer re-indexing + orientation snap       │
//! ├─────────────────────────────────────────────────────────┤
//! │  Levels                                                  │
//! │  ├── Level / LevelResponse (JSON)                       │
//! │  └── FacePainter (faces_data → tile placements)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use rubik::{Grid, RotationCommand, RotationState, SliceRotator};
//!
//! let mut grid = Grid::build(3, 1.0).unwrap();
//! let mut rotator = SliceRotator::default();
//!
//! let command: RotationCommand = "Y2+".parse().unwrap();
//! rotator.request_rotation(&grid, command).unwrap();
//!
//! while rotator.advance(&mut grid, 1.0 / 60.0) != RotationState::Idle {}
//! grid.verify().unwrap();
//! ```

mod axis;
mod error;
mod faces;
mod grid;
mod input;
mod level;
mod rotator;
mod slice;

pub use axis::{Axis, SliceAxis, Turn};
pub use error::{Error, Result};
pub use faces::{ExteriorTile, Face, FacePainter, TilePlacement};
pub use grid::{snap_rotation, Cell, CellId, CellSnapshot, Grid, GridSnapshot, MAX_GRID_SIZE};
pub use input::{command_from_drag, DragConfig, DragGesture};
pub use level::{Level, LevelResponse};
pub use rotator::{RotationState, RotatorConfig, SliceRotator, DEFAULT_ROTATION_SPEED};
pub use slice::{RotationCommand, Slice};

// Re-export glam for convenience
pub use glam;
