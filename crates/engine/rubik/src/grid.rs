//! Grid - the NxNxN arrangement of cube cells
//!
//! Every coordinate in `[0, size)³` holds exactly one cell. Cells keep the
//! coordinate they were built at (`home`) as a stable identity and carry a
//! current coordinate that slice rotations rewrite.
//!
//! # Coordinate System
//!
//! Coordinates are corner-based integers. World positions are centred on the
//! grid origin:
//!
//! ```text
//! position = origin + (coord - (size - 1) / 2) * spacing
//! ```

use glam::{IVec3, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Error, Result};

/// Largest edge length a grid may be built with
pub const MAX_GRID_SIZE: i32 = 256;

/// Stable identity of a cell, assigned at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub u32);

/// One piece of the cube
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    id: CellId,
    home: IVec3,
    coord: IVec3,
    position: Vec3,
    rotation: Quat,
}

impl Cell {
    /// Create a cell at `coord` with identity orientation
    pub fn new(id: CellId, coord: IVec3, position: Vec3) -> Self {
        Self {
            id,
            home: coord,
            coord,
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    /// Coordinate the cell was built at
    pub fn home(&self) -> IVec3 {
        self.home
    }

    /// Current grid coordinate
    pub fn coord(&self) -> IVec3 {
        self.coord
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Display name derived from the home coordinate, e.g. `Cube02_1`
    pub fn name(&self) -> String {
        format!("Cube{}{}_{}", self.home.x, self.home.y, self.home.z)
    }

    pub fn set_transform(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }

    pub(crate) fn set_coord(&mut self, coord: IVec3) {
        self.coord = coord;
    }
}

/// Owned NxNxN grid of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: i32,
    spacing: f32,
    origin: Vec3,
    /// Slots indexed by `(x * size + y) * size + z`
    slots: Vec<Option<Cell>>,
}

impl Grid {
    /// Build a grid of `size³` cells centred on the world origin
    pub fn build(size: i32, spacing: f32) -> Result<Self> {
        Self::build_at(Vec3::ZERO, size, spacing)
    }

    /// Build a grid of `size³` cells centred on `origin`
    ///
    /// Fails without allocating anything if `size` is outside
    /// `1..=MAX_GRID_SIZE` or `spacing` is not a positive finite number.
    pub fn build_at(origin: Vec3, size: i32, spacing: f32) -> Result<Self> {
        if size < 1 {
            return Err(Error::InvalidSize(size));
        }
        let too_large = Error::TooLarge {
            size,
            max: MAX_GRID_SIZE,
        };
        if size > MAX_GRID_SIZE {
            return Err(too_large);
        }
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(Error::InvalidSpacing(spacing));
        }
        let count = size
            .checked_mul(size)
            .and_then(|square| square.checked_mul(size))
            .ok_or(too_large)?;

        let mut grid = Self {
            size,
            spacing,
            origin,
            slots: Vec::with_capacity(count as usize),
        };

        let mut next_id = 0u32;
        for x in 0..size {
            for y in 0..size {
                for z in 0..size {
                    let coord = IVec3::new(x, y, z);
                    let cell = Cell::new(CellId(next_id), coord, grid.position_of(coord));
                    grid.slots.push(Some(cell));
                    next_id += 1;
                }
            }
        }

        info!(size, spacing, cells = grid.slots.len(), "Built cube grid");
        Ok(grid)
    }

    /// Edge length in cells
    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// World-space centre of the grid (the rotation pivot)
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Check if a coordinate lies within `[0, size)³`
    pub fn contains(&self, coord: IVec3) -> bool {
        coord.cmpge(IVec3::ZERO).all() && coord.cmplt(IVec3::splat(self.size)).all()
    }

    /// Canonical world position of a grid coordinate
    pub fn position_of(&self, coord: IVec3) -> Vec3 {
        let half = (self.size - 1) as f32 / 2.0;
        self.origin + (coord.as_vec3() - Vec3::splat(half)) * self.spacing
    }

    /// Nearest grid coordinate to a world position, clamped to bounds
    pub fn coord_from_position(&self, position: Vec3) -> IVec3 {
        let half = (self.size - 1) as f32 / 2.0;
        let local = (position - self.origin) / self.spacing + Vec3::splat(half);
        local
            .round()
            .as_ivec3()
            .clamp(IVec3::ZERO, IVec3::splat(self.size - 1))
    }

    fn index(&self, coord: IVec3) -> Result<usize> {
        if !self.contains(coord) {
            return Err(Error::CoordOutOfRange {
                coord,
                size: self.size,
            });
        }
        Ok(((coord.x * self.size + coord.y) * self.size + coord.z) as usize)
    }

    /// Cell currently occupying `coord`, if any
    pub fn cell_at(&self, coord: IVec3) -> Result<Option<&Cell>> {
        let index = self.index(coord)?;
        Ok(self.slots[index].as_ref())
    }

    pub fn cell_at_mut(&mut self, coord: IVec3) -> Result<Option<&mut Cell>> {
        let index = self.index(coord)?;
        Ok(self.slots[index].as_mut())
    }

    /// Place `cell` at `coord`, returning the previous occupant
    ///
    /// The cell's stored coordinate is rewritten to `coord`; its world
    /// transform is left to the caller.
    pub fn set_cell_at(&mut self, coord: IVec3, mut cell: Cell) -> Result<Option<Cell>> {
        let index = self.index(coord)?;
        cell.set_coord(coord);
        Ok(self.slots[index].replace(cell))
    }

    /// Take the cell out of `coord`, leaving the slot empty
    pub fn remove_cell(&mut self, coord: IVec3) -> Result<Option<Cell>> {
        let index = self.index(coord)?;
        Ok(self.slots[index].take())
    }

    /// Iterate over all present cells in coordinate order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.slots.iter().flatten()
    }

    /// Number of cells currently in the grid
    pub fn len(&self) -> usize {
        self.cells().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find a cell by identity
    pub fn find(&self, id: CellId) -> Option<&Cell> {
        self.cells().find(|cell| cell.id == id)
    }

    /// Cell whose centre is nearest to `point`, strictly within `max_distance`
    pub fn nearest_cell(&self, point: Vec3, max_distance: f32) -> Option<&Cell> {
        let mut best: Option<(&Cell, f32)> = None;
        for cell in self.cells() {
            let distance = cell.position.distance(point);
            if distance < max_distance && best.map_or(true, |(_, d)| distance < d) {
                best = Some((cell, distance));
            }
        }
        best.map(|(cell, _)| cell)
    }

    /// Check the coordinate/cell bijection.
    ///
    /// Every present cell must sit in the slot named by its stored
    /// coordinate, identities must be unique, and re-deriving the coordinate
    /// from the cell's world position must agree with the stored one.
    pub fn verify(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(cell) = slot else { continue };
            if self.index(cell.coord)? != index {
                return Err(Error::GridCorrupted(format!(
                    "{} stored at slot {index} but claims {}",
                    cell.name(),
                    cell.coord
                )));
            }
            if !seen.insert(cell.id) {
                return Err(Error::GridCorrupted(format!(
                    "{:?} occupies more than one slot",
                    cell.id
                )));
            }
            let derived = self.coord_from_position(cell.position);
            if derived != cell.coord {
                return Err(Error::GridCorrupted(format!(
                    "{} at {} but positioned over {derived}",
                    cell.name(),
                    cell.coord
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn slot_mut(&mut self, coord: IVec3) -> Option<&mut Option<Cell>> {
        let index = self.index(coord).ok()?;
        self.slots.get_mut(index)
    }

    /// Serializable view of the grid for renderers
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            size: self.size,
            spacing: self.spacing,
            origin: self.origin,
            cells: self
                .cells()
                .map(|cell| CellSnapshot {
                    id: cell.id,
                    name: cell.name(),
                    home: cell.home,
                    coord: cell.coord,
                    position: cell.position,
                    rotation: cell.rotation,
                })
                .collect(),
        }
    }
}

/// Snap a near-axis-aligned orientation to the exact 90° multiple.
///
/// Rounds each rotation matrix entry to -1, 0 or 1. Only meaningful for
/// orientations that are already within a few degrees of a cube symmetry.
pub fn snap_rotation(rotation: Quat) -> Quat {
    let m = Mat3::from_quat(rotation.normalize());
    let snapped = Mat3::from_cols(m.x_axis.round(), m.y_axis.round(), m.z_axis.round());
    Quat::from_mat3(&snapped).normalize()
}

/// Serializable grid state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub size: i32,
    pub spacing: f32,
    pub origin: Vec3,
    pub cells: Vec<CellSnapshot>,
}

/// Serializable cell state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub id: CellId,
    pub name: String,
    pub home: IVec3,
    pub coord: IVec3,
    pub position: Vec3,
    pub rotation: Quat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_invalid_size() {
        assert!(matches!(Grid::build(0, 1.0), Err(Error::InvalidSize(0))));
        assert!(matches!(Grid::build(-2, 1.0), Err(Error::InvalidSize(-2))));
    }

    #[test]
    fn test_build_rejects_oversized_grid() {
        assert!(matches!(
            Grid::build(1300, 1.0),
            Err(Error::TooLarge { size: 1300, max: MAX_GRID_SIZE })
        ));
        assert!(matches!(
            Grid::build(i32::MAX, 1.0),
            Err(Error::TooLarge { .. })
        ));
    }

    #[test]
    fn test_build_rejects_invalid_spacing() {
        assert!(matches!(Grid::build(3, 0.0), Err(Error::InvalidSpacing(_))));
        assert!(matches!(
            Grid::build(3, f32::NAN),
            Err(Error::InvalidSpacing(_))
        ));
    }

    #[test]
    fn test_positions_centred_on_origin() {
        let grid = Grid::build_at(Vec3::new(10.0, 0.0, 0.0), 3, 2.0).unwrap();
        assert_eq!(grid.position_of(IVec3::ONE), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(grid.position_of(IVec3::ZERO), Vec3::new(8.0, -2.0, -2.0));

        let even = Grid::build(2, 1.0).unwrap();
        assert_eq!(even.position_of(IVec3::ZERO), Vec3::splat(-0.5));
    }

    #[test]
    fn test_cell_at_bounds() {
        let grid = Grid::build(2, 1.0).unwrap();
        assert!(grid.cell_at(IVec3::new(1, 1, 1)).unwrap().is_some());
        assert!(matches!(
            grid.cell_at(IVec3::new(2, 0, 0)),
            Err(Error::CoordOutOfRange { .. })
        ));
        assert!(grid.cell_at(IVec3::new(0, -1, 0)).is_err());
    }

    #[test]
    fn test_set_cell_at_returns_previous() {
        let mut grid = Grid::build(2, 1.0).unwrap();
        let moved = grid.remove_cell(IVec3::ZERO).unwrap().unwrap();
        let previous = grid.set_cell_at(IVec3::ONE, moved.clone()).unwrap().unwrap();

        assert_eq!(previous.coord(), IVec3::ONE);
        let placed = grid.cell_at(IVec3::ONE).unwrap().unwrap();
        assert_eq!(placed.id(), moved.id());
        assert_eq!(placed.coord(), IVec3::ONE);
        assert_eq!(grid.len(), 7);
    }

    #[test]
    fn test_coord_from_position_rounds_and_clamps() {
        let grid = Grid::build(3, 1.0).unwrap();
        assert_eq!(grid.coord_from_position(Vec3::new(0.9, -0.1, 0.4)), IVec3::new(2, 1, 1));
        assert_eq!(grid.coord_from_position(Vec3::splat(50.0)), IVec3::splat(2));
        assert_eq!(grid.coord_from_position(Vec3::splat(-50.0)), IVec3::ZERO);
    }

    #[test]
    fn test_verify_detects_misplaced_cell() {
        let mut grid = Grid::build(2, 1.0).unwrap();
        assert!(grid.verify().is_ok());

        let cell = grid.remove_cell(IVec3::ZERO).unwrap().unwrap();
        grid.set_cell_at(IVec3::new(1, 0, 0), cell).unwrap();
        assert!(matches!(grid.verify(), Err(Error::GridCorrupted(_))));
    }

    #[test]
    fn test_nearest_cell() {
        let grid = Grid::build(3, 1.0).unwrap();
        let cell = grid.nearest_cell(Vec3::new(1.05, 1.0, 0.95), 0.15).unwrap();
        assert_eq!(cell.coord(), IVec3::new(2, 2, 2));
        assert!(grid.nearest_cell(Vec3::new(0.5, 0.5, 0.5), 0.15).is_none());
    }

    #[test]
    fn test_cell_name_uses_home() {
        let grid = Grid::build(3, 1.0).unwrap();
        let cell = grid.cell_at(IVec3::new(0, 2, 1)).unwrap().unwrap();
        assert_eq!(cell.name(), "Cube02_1");
    }

    #[test]
    fn test_snap_rotation_removes_residue() {
        let almost = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2 + 0.01);
        let snapped = snap_rotation(almost);
        let rotated = snapped * Vec3::X;
        assert_eq!(rotated.round(), Vec3::new(0.0, 0.0, -1.0));
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_snapshot_lists_every_cell() {
        let grid = Grid::build(2, 1.0).unwrap();
        let snapshot = grid.snapshot();
        assert_eq!(snapshot.cells.len(), 8);
        assert_eq!(snapshot.cells[0].name, "Cube00_0");
    }
}
