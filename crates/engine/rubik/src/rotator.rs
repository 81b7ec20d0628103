//! Slice rotator - tick-driven quarter turns
//!
//! A rotation runs through three states:
//!
//! ```text
//! Idle ──request_rotation──► Rotating ──angle reaches 90°──► Committing ──► Idle
//! ```
//!
//! While `Rotating`, every cell of the slice moves rigidly about the grid
//! centre. `Committing` re-indexes the cells with the exact integer quarter
//! turn of their old coordinates and snaps their transforms, so no floating
//! point error survives from one rotation to the next.

use std::f32::consts::FRAC_PI_2;

use glam::{IVec3, Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::grid::snap_rotation;
use crate::{CellId, Error, Grid, Result, RotationCommand, Slice};

/// Default angular speed, degrees per second
pub const DEFAULT_ROTATION_SPEED: f32 = 90.0;

/// Observable state of the rotator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationState {
    /// Waiting for a command
    #[default]
    Idle,
    /// Slice is turning
    Rotating,
    /// Slice reached 90° and will be re-indexed on the next tick
    Committing,
}

/// Configuration for the slice rotator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatorConfig {
    /// Angular speed in degrees per second; non-positive means instant
    pub speed: f32,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_ROTATION_SPEED,
        }
    }
}

#[derive(Debug, Clone)]
struct TrackedCell {
    id: CellId,
    coord: IVec3,
    position: Vec3,
    rotation: Quat,
    missing: bool,
}

#[derive(Debug, Clone)]
struct ActiveRotation {
    command: RotationCommand,
    slice: Slice,
    /// Degrees turned so far, in `[0, 90]`
    angle: f32,
    cells: Vec<TrackedCell>,
}

/// Animates one slice rotation at a time over a grid passed in per tick
#[derive(Debug, Clone, Default)]
pub struct SliceRotator {
    config: RotatorConfig,
    state: RotationState,
    active: Option<ActiveRotation>,
    completed: u64,
}

impl SliceRotator {
    pub fn new(config: RotatorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &RotatorConfig {
        &self.config
    }

    pub fn current_state(&self) -> RotationState {
        self.state
    }

    /// True while a slice is rotating or waiting to commit
    pub fn is_rotating(&self) -> bool {
        self.state != RotationState::Idle
    }

    /// Command currently being executed
    pub fn active_command(&self) -> Option<RotationCommand> {
        self.active.as_ref().map(|active| active.command)
    }

    /// Degrees turned by the active rotation
    pub fn angle(&self) -> f32 {
        self.active.as_ref().map_or(0.0, |active| active.angle)
    }

    /// Number of rotations committed since creation
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Start turning a slice.
    ///
    /// Rejected with no state change if another rotation is still running or
    /// the slice index is out of range.
    pub fn request_rotation(&mut self, grid: &Grid, command: RotationCommand) -> Result<()> {
        if self.is_rotating() {
            return Err(Error::RotationInProgress);
        }
        let slice = command.slice(grid.size())?;

        let cells: Vec<TrackedCell> = grid
            .select_slice(command.axis, command.index)?
            .into_iter()
            .map(|cell| TrackedCell {
                id: cell.id(),
                coord: cell.coord(),
                position: cell.position(),
                rotation: cell.rotation(),
                missing: false,
            })
            .collect();

        debug!(%command, cells = cells.len(), "Starting slice rotation");

        self.active = Some(ActiveRotation {
            command,
            slice,
            angle: 0.0,
            cells,
        });
        self.state = RotationState::Rotating;
        Ok(())
    }

    /// Advance the rotation by `dt` seconds and return the new state
    pub fn advance(&mut self, grid: &mut Grid, dt: f32) -> RotationState {
        match self.state {
            RotationState::Idle => {}
            RotationState::Rotating => {
                let speed = self.config.speed;
                if let Some(active) = self.active.as_mut() {
                    active.angle = if speed > 0.0 {
                        (active.angle + speed * dt.max(0.0)).min(90.0)
                    } else {
                        90.0
                    };
                    apply_pose(grid, active);
                    if active.angle >= 90.0 {
                        self.state = RotationState::Committing;
                    }
                }
            }
            RotationState::Committing => self.commit(grid),
        }
        self.state
    }

    /// Force the active rotation to exactly 90° and commit it immediately
    pub fn finish(&mut self, grid: &mut Grid) -> RotationState {
        if let Some(active) = self.active.as_mut() {
            active.angle = 90.0;
            apply_pose(grid, active);
        }
        self.commit(grid);
        self.state
    }

    /// Request a rotation and commit it without animation
    pub fn rotate_now(&mut self, grid: &mut Grid, command: RotationCommand) -> Result<()> {
        self.request_rotation(grid, command)?;
        self.finish(grid);
        Ok(())
    }

    fn commit(&mut self, grid: &mut Grid) {
        let Some(mut active) = self.active.take() else {
            self.state = RotationState::Idle;
            return;
        };
        let command = active.command;
        let quarter = command.axis.rotation(command.turn, FRAC_PI_2);

        // Lift every surviving cell out first; the slice maps onto itself, so
        // the freed slots are exactly the destinations.
        let mut lifted = Vec::with_capacity(active.cells.len());
        for tracked in active.cells.iter_mut() {
            match take_tracked(grid, tracked) {
                Some(cell) => lifted.push((tracked.clone(), cell)),
                None => note_missing(tracked),
            }
        }

        // A destination still occupied holds a cell the host moved in during
        // the turn; cells are never overwritten, so the rotation is undone.
        let blocked = lifted.iter().find_map(|(tracked, _)| {
            let coord = active.slice.turn_coord(tracked.coord, command.turn);
            matches!(grid.cell_at(coord), Ok(Some(_))).then_some(coord)
        });
        if let Some(coord) = blocked {
            warn!(%command, %coord, "Slot taken while rotating, rolling back");
            for (tracked, mut cell) in lifted {
                cell.set_coord(tracked.coord);
                cell.set_transform(tracked.position, tracked.rotation);
                if let Some(slot) = grid.slot_mut(tracked.coord) {
                    *slot = Some(cell);
                }
            }
            self.state = RotationState::Idle;
            return;
        }

        for (tracked, mut cell) in lifted {
            let coord = active.slice.turn_coord(tracked.coord, command.turn);
            cell.set_coord(coord);
            cell.set_transform(
                grid.position_of(coord),
                snap_rotation(quarter * tracked.rotation),
            );
            if let Some(slot) = grid.slot_mut(coord) {
                *slot = Some(cell);
            }
        }

        self.completed += 1;
        self.state = RotationState::Idle;
        debug!(%command, "Committed slice rotation");
    }
}

fn take_tracked(grid: &mut Grid, tracked: &TrackedCell) -> Option<crate::Cell> {
    let slot = grid.slot_mut(tracked.coord)?;
    if slot.as_ref().is_some_and(|cell| cell.id() == tracked.id) {
        slot.take()
    } else {
        None
    }
}

fn note_missing(tracked: &mut TrackedCell) {
    if !tracked.missing {
        tracked.missing = true;
        warn!(id = ?tracked.id, coord = %tracked.coord, "Skipping missing cell in rotating slice");
    }
}

fn apply_pose(grid: &mut Grid, active: &mut ActiveRotation) {
    let center = grid.origin();
    let pivot = active
        .command
        .axis
        .rotation(active.command.turn, active.angle.to_radians());

    for tracked in active.cells.iter_mut() {
        match grid.cell_at_mut(tracked.coord) {
            Ok(Some(cell)) if cell.id() == tracked.id => {
                cell.set_transform(
                    center + pivot * (tracked.position - center),
                    pivot * tracked.rotation,
                );
            }
            _ => note_missing(tracked),
        }
    }
}
