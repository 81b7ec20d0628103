//! Turning drag gestures into rotation commands

use glam::{IVec3, Vec3};
use tracing::debug;

use crate::{Axis, CellId, Grid, RotationCommand, SliceAxis, Turn};

/// Interpret a drag across a cell as a slice rotation.
///
/// The cell's offset from the grid centre picks the face being touched
/// (dominant component). The slice then turns about the axis that would carry
/// the touched point along the drag: the dominant component of
/// `face_normal × drag`. Returns `None` for the centre cell, or when the drag
/// points straight into the face.
pub fn command_from_drag(grid: &Grid, coord: IVec3, drag: Vec3) -> Option<RotationCommand> {
    let half = (grid.size() - 1) as f32 / 2.0;
    let relative = coord.as_vec3() - Vec3::splat(half);
    let normal = Axis::from_vec3(relative)?;
    let spin = normal.as_vec3().cross(drag);

    let axis = SliceAxis::ALL
        .into_iter()
        .filter(|axis| *axis != normal.slice_axis())
        .max_by(|a, b| {
            a.component_f32(spin)
                .abs()
                .total_cmp(&b.component_f32(spin).abs())
        })?;

    let component = axis.component_f32(spin);
    if component == 0.0 {
        return None;
    }
    let turn = if component > 0.0 {
        Turn::Clockwise
    } else {
        Turn::CounterClockwise
    };
    Some(RotationCommand::new(axis, axis.component(coord), turn))
}

/// Thresholds for drag gestures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Drag length that commits the gesture to a rotation
    pub min_swipe_distance: f32,
    /// How far from a cell centre a grab may start
    pub max_selection_distance: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            min_swipe_distance: 0.05,
            max_selection_distance: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Grab {
    cell: CellId,
    coord: IVec3,
    start: Vec3,
}

/// Grab-and-swipe gesture over a grid.
///
/// A gesture emits at most one command; grab again to turn another slice.
#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    config: DragConfig,
    grab: Option<Grab>,
}

impl DragGesture {
    pub fn new(config: DragConfig) -> Self {
        Self { config, grab: None }
    }

    pub fn is_active(&self) -> bool {
        self.grab.is_some()
    }

    /// Start a gesture at `point`, grabbing the nearest cell in reach
    pub fn begin(&mut self, grid: &Grid, point: Vec3) -> Option<CellId> {
        let cell = grid.nearest_cell(point, self.config.max_selection_distance)?;
        debug!(cell = %cell.name(), "Grabbed cell");
        self.grab = Some(Grab {
            cell: cell.id(),
            coord: cell.coord(),
            start: point,
        });
        Some(cell.id())
    }

    /// Feed the current pointer position.
    ///
    /// Once the drag is long enough, ends the gesture and returns the
    /// rotation it describes.
    pub fn update(&mut self, grid: &Grid, point: Vec3) -> Option<RotationCommand> {
        let grab = self.grab?;
        let drag = point - grab.start;
        if drag.length() < self.config.min_swipe_distance {
            return None;
        }
        let command = command_from_drag(grid, grab.coord, drag)?;
        debug!(cell = ?grab.cell, %command, "Drag resolved to rotation");
        self.grab = None;
        Some(command)
    }

    /// Release without rotating
    pub fn cancel(&mut self) {
        self.grab = None;
    }
}
