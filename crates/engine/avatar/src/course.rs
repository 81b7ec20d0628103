//! Goal points and surface tiles the avatar walks over

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Index of a goal point within its course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoalId(pub usize);

/// Index of a surface tile within its course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub usize);

/// What happens when the avatar reaches a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalKind {
    /// Consumed on arrival
    Normal,
    /// Junction: stays active while occupied, consumed on departure
    Branch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalState {
    Active,
    Consumed,
}

/// A world-space marker the avatar can walk to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalPoint {
    pub id: GoalId,
    pub position: Vec3,
    pub kind: GoalKind,
    pub state: GoalState,
}

impl GoalPoint {
    pub fn is_active(&self) -> bool {
        self.state == GoalState::Active
    }
}

/// A walkable tile: its centre and outward normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceTile {
    pub position: Vec3,
    pub normal: Vec3,
}

/// The goal points and tiles of one level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    goals: Vec<GoalPoint>,
    tiles: Vec<SurfaceTile>,
}

impl Course {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active goal point
    pub fn add_goal(&mut self, position: Vec3, kind: GoalKind) -> GoalId {
        let id = GoalId(self.goals.len());
        self.goals.push(GoalPoint {
            id,
            position,
            kind,
            state: GoalState::Active,
        });
        id
    }

    /// Add a surface tile. The normal is normalized.
    pub fn add_tile(&mut self, position: Vec3, normal: Vec3) -> Result<TileId> {
        let normal = normal.try_normalize().ok_or(Error::InvalidNormal(normal))?;
        let id = TileId(self.tiles.len());
        self.tiles.push(SurfaceTile { position, normal });
        Ok(id)
    }

    pub fn goals(&self) -> &[GoalPoint] {
        &self.goals
    }

    pub fn goal(&self, id: GoalId) -> Option<&GoalPoint> {
        self.goals.get(id.0)
    }

    pub fn active_goals(&self) -> impl Iterator<Item = &GoalPoint> {
        self.goals.iter().filter(|goal| goal.is_active())
    }

    /// Number of goals not yet consumed
    pub fn remaining(&self) -> usize {
        self.active_goals().count()
    }

    /// Mark a goal as consumed, returning whether it was active
    pub fn consume(&mut self, id: GoalId) -> bool {
        match self.goals.get_mut(id.0) {
            Some(goal) if goal.is_active() => {
                goal.state = GoalState::Consumed;
                debug!(goal = id.0, "Goal consumed");
                true
            }
            _ => false,
        }
    }

    pub fn tiles(&self) -> &[SurfaceTile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&SurfaceTile> {
        self.tiles.get(id.0)
    }

    /// Closest tile centre within `radius` of `point`
    pub fn nearest_tile(&self, point: Vec3, radius: f32) -> Option<TileId> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, tile)| (i, tile.position.distance(point)))
            .filter(|&(_, distance)| distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| TileId(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_only_once() {
        let mut course = Course::new();
        let id = course.add_goal(Vec3::X, GoalKind::Normal);
        assert_eq!(course.remaining(), 1);
        assert!(course.consume(id));
        assert!(!course.consume(id));
        assert_eq!(course.remaining(), 0);
        assert!(!course.consume(GoalId(7)));
    }

    #[test]
    fn test_nearest_tile_within_radius() {
        let mut course = Course::new();
        course.add_tile(Vec3::ZERO, Vec3::Y).unwrap();
        let far = course.add_tile(Vec3::new(1.0, 0.0, 0.0), Vec3::Y).unwrap();

        assert_eq!(course.nearest_tile(Vec3::new(0.1, 0.0, 0.0), 0.5), Some(TileId(0)));
        assert_eq!(course.nearest_tile(Vec3::new(0.8, 0.0, 0.0), 0.5), Some(far));
        assert_eq!(course.nearest_tile(Vec3::new(0.5, 2.0, 0.0), 0.5), None);
    }

    #[test]
    fn test_tile_normal_normalized() {
        let mut course = Course::new();
        let id = course.add_tile(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0)).unwrap();
        assert_eq!(course.tile(id).unwrap().normal, Vec3::Z);
        assert!(matches!(
            course.add_tile(Vec3::ZERO, Vec3::ZERO),
            Err(Error::InvalidNormal(_))
        ));
    }
}
