//! Laying a walkable course over a painted cube

use anyhow::Context;
use avatar::{Course, GoalKind};
use glam::{Quat, Vec3};
use rubik::{ExteriorTile, TilePlacement};
use tracing::{info, warn};

use crate::config::TilesConfig;

/// A course plus where the avatar starts
#[derive(Debug, Clone)]
pub struct CourseLayout {
    pub course: Course,
    /// Start tile position and orientation, if the level has one
    pub start: Option<(Vec3, Quat)>,
}

/// Build the course for a painted grid.
///
/// Every exterior face becomes a surface tile. Painted faces then add goal
/// points by variant: the start variant marks the spawn, path variants carry
/// normal goals and branch variants carry junctions. Goals and the spawn sit
/// `goal_height` above the tile.
pub fn build_course(
    exterior: &[ExteriorTile],
    placements: &[TilePlacement],
    tiles: &TilesConfig,
) -> anyhow::Result<CourseLayout> {
    let mut course = Course::new();
    for tile in exterior {
        course
            .add_tile(tile.position, tile.normal)
            .with_context(|| format!("surface tile on {:?} at {}", tile.face, tile.coord))?;
    }

    let mut start = None;
    for placement in placements {
        let tile = &placement.tile;
        let above = tile.position + tile.normal * tiles.goal_height;

        if placement.variant == tiles.start_variant {
            if start.is_some() {
                warn!(coord = %tile.coord, face = ?tile.face, "Extra start tile ignored");
                continue;
            }
            start = Some((above, Quat::from_rotation_arc(Vec3::Y, tile.normal)));
        } else if tiles.branch_variants.contains(&placement.variant) {
            course.add_goal(above, GoalKind::Branch);
        } else if tiles.path_variants.contains(&placement.variant) {
            course.add_goal(above, GoalKind::Normal);
        }
    }

    if start.is_none() {
        warn!("Level has no start tile");
    }
    info!(
        tiles = course.tiles().len(),
        goals = course.goals().len(),
        "Course laid out"
    );
    Ok(CourseLayout { course, start })
}
