//! Exterior faces and the face painter
//!
//! Each exterior cell face has a plane index within its cube face, so that a
//! level's `faces_data` list can say which tile variant goes where. Indices
//! run row by row as seen from outside the cube:
//!
//! | Face   | Cells        | Plane index          |
//! |--------|--------------|----------------------|
//! | Front  | `z == N-1`   | `x + y*N`            |
//! | Back   | `z == 0`     | `(N-1-x) + y*N`      |
//! | Left   | `x == 0`     | `z + y*N`            |
//! | Right  | `x == N-1`   | `(N-1-z) + y*N`      |
//! | Top    | `y == N-1`   | `x + z*N`            |
//! | Bottom | `y == 0`     | `x + (N-1-z)*N`      |

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Axis, CellId, Error, Grid, Level, Result};

/// One of the six outer faces of the cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    /// Faces in level order (`face_1` .. `face_6`)
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Top,
        Face::Bottom,
    ];

    /// Outward normal
    pub fn normal(self) -> Axis {
        match self {
            Face::Front => Axis::PosZ,
            Face::Back => Axis::NegZ,
            Face::Left => Axis::NegX,
            Face::Right => Axis::PosX,
            Face::Top => Axis::PosY,
            Face::Bottom => Axis::NegY,
        }
    }

    /// Key of this face in a level's `faces_data`
    pub fn level_key(self) -> &'static str {
        match self {
            Face::Front => "face_1",
            Face::Back => "face_2",
            Face::Left => "face_3",
            Face::Right => "face_4",
            Face::Top => "face_5",
            Face::Bottom => "face_6",
        }
    }

    /// Check if a cell at `coord` shows this face on the outside
    pub fn contains(self, coord: IVec3, size: i32) -> bool {
        let last = size - 1;
        match self {
            Face::Front => coord.z == last,
            Face::Back => coord.z == 0,
            Face::Left => coord.x == 0,
            Face::Right => coord.x == last,
            Face::Top => coord.y == last,
            Face::Bottom => coord.y == 0,
        }
    }

    /// Position of `coord` within this face's `faces_data` list
    pub fn plane_index(self, coord: IVec3, size: i32) -> usize {
        let last = size - 1;
        let index = match self {
            Face::Front => coord.x + coord.y * size,
            Face::Back => (last - coord.x) + coord.y * size,
            Face::Left => coord.z + coord.y * size,
            Face::Right => (last - coord.z) + coord.y * size,
            Face::Top => coord.x + coord.z * size,
            Face::Bottom => coord.x + (last - coord.z) * size,
        };
        index as usize
    }
}

/// An exterior face of one cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExteriorTile {
    pub cell: CellId,
    pub coord: IVec3,
    pub face: Face,
    pub plane_index: usize,
    /// Centre of the cell face in world space
    pub position: Vec3,
    pub normal: Vec3,
}

impl Grid {
    /// All exterior cell faces, by current coordinate
    pub fn exterior_tiles(&self) -> Vec<ExteriorTile> {
        let size = self.size();
        let half_step = self.spacing() / 2.0;
        let mut tiles = Vec::new();
        for cell in self.cells() {
            let center = self.position_of(cell.coord());
            for face in Face::ALL {
                if !face.contains(cell.coord(), size) {
                    continue;
                }
                let normal = face.normal().as_vec3();
                tiles.push(ExteriorTile {
                    cell: cell.id(),
                    coord: cell.coord(),
                    face,
                    plane_index: face.plane_index(cell.coord(), size),
                    position: center + normal * half_step,
                    normal,
                });
            }
        }
        tiles
    }
}

/// A tile variant placed on an exterior face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub tile: ExteriorTile,
    pub variant: usize,
}

/// Maps a level's `faces_data` onto the exterior faces of a grid
#[derive(Debug, Clone, Copy)]
pub struct FacePainter {
    variant_count: usize,
}

impl FacePainter {
    /// Create a painter choosing among `variant_count` tile variants
    pub fn new(variant_count: usize) -> Result<Self> {
        if variant_count == 0 {
            return Err(Error::MissingTemplate);
        }
        Ok(Self { variant_count })
    }

    pub fn variant_count(&self) -> usize {
        self.variant_count
    }

    /// Decorate every exterior face the level has a valid variant for.
    ///
    /// Faces whose entry is missing or outside `[0, variant_count)` keep
    /// their plain look and produce no placement.
    pub fn paint(&self, grid: &Grid, level: &Level) -> Vec<TilePlacement> {
        for face in Face::ALL {
            if level.face_data(face).is_none() {
                warn!(key = face.level_key(), "Face missing from level data");
            }
        }

        let mut placements = Vec::new();
        for tile in grid.exterior_tiles() {
            let Some(data) = level.face_data(tile.face) else {
                continue;
            };
            let variant = data
                .get(tile.plane_index)
                .copied()
                .and_then(|v| usize::try_from(v).ok())
                .filter(|&v| v < self.variant_count);
            match variant {
                Some(variant) => placements.push(TilePlacement { tile, variant }),
                None => debug!(
                    face = ?tile.face,
                    plane = tile.plane_index,
                    "No valid tile variant, leaving face plain"
                ),
            }
        }
        placements
    }
}
