//! Goal seeking, junction choices and surface alignment
//!
//! The navigator is stepped once per simulation tick:
//!
//! 1. Find the tile underfoot; a new tile queues an alignment to its normal.
//! 2. While `Seeking`, pick the nearest active goal within the detection
//!    radius. Several goals at the same distance block in `AwaitingChoice`
//!    until [`Navigator::choose`] picks one by direction.
//! 3. While `Moving`, walk towards the target and face along the path.
//! 4. While standing still, turn so that local up matches the tile normal.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::motion::{look_rotation, move_towards};
use crate::{Avatar, Course, Error, GoalId, GoalKind, Motion, Result};

/// Movement below this per tick counts as standing still
const MOVE_EPSILON: f32 = 0.001;

/// Alignment snaps once within this angle (radians, 0.1 degrees)
const ALIGN_SNAP: f32 = 0.1 * PI / 180.0;

/// Navigator tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// How far away goals are noticed
    pub detection_radius: f32,
    /// Walking speed in units per second
    pub speed: f32,
    /// Turn blend rate per second
    pub rotation_speed: f32,
    /// How far away a tile still counts as underfoot
    pub tile_detection_radius: f32,
    /// Distance at which a goal counts as reached
    pub arrival_threshold: f32,
    /// Goals no further than this beyond the nearest one are tied with it;
    /// zero means exact equality
    pub tie_epsilon: f32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            detection_radius: 5.0,
            speed: 4.0,
            rotation_speed: 10.0,
            tile_detection_radius: 0.5,
            arrival_threshold: 0.1,
            tie_epsilon: 0.01,
        }
    }
}

impl NavigatorConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("detection_radius", self.detection_radius),
            ("speed", self.speed),
            ("rotation_speed", self.rotation_speed),
            ("tile_detection_radius", self.tile_detection_radius),
            ("arrival_threshold", self.arrival_threshold),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.tie_epsilon.is_finite() && self.tie_epsilon >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "tie_epsilon must not be negative, got {}",
                self.tie_epsilon
            )));
        }
        Ok(())
    }
}

/// Direction of a candidate goal relative to the avatar's facing
///
/// Variant order is the order candidates are listed in at a junction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Left,
    Right,
    Back,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Left,
        Direction::Right,
        Direction::Back,
    ];

    /// Bearing in the avatar's horizontal plane, clockwise from forward when
    /// seen from above
    pub fn bearing(self) -> f32 {
        match self {
            Direction::Forward => 0.0,
            Direction::Right => FRAC_PI_2,
            Direction::Back => PI,
            Direction::Left => -FRAC_PI_2,
        }
    }

    /// Parse `F`, `R`, `B` or `L`
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'F' => Some(Direction::Forward),
            'R' => Some(Direction::Right),
            'B' => Some(Direction::Back),
            'L' => Some(Direction::Left),
            _ => None,
        }
    }
}

/// A goal offered at a junction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub goal: GoalId,
    pub direction: Direction,
    pub distance: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum NavState {
    #[default]
    Seeking,
    Moving {
        target: GoalId,
    },
    AwaitingChoice {
        candidates: Vec<Candidate>,
    },
}

/// Serializable navigator state for UI and animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarSnapshot {
    pub avatar: Avatar,
    pub state: NavState,
    pub junction: Option<GoalId>,
}

/// Drives an avatar across a course of goal points
#[derive(Debug, Clone)]
pub struct Navigator {
    config: NavigatorConfig,
    avatar: Avatar,
    state: NavState,
    /// Branch goal the avatar is standing on
    junction: Option<GoalId>,
    /// Tile normal to align with once the avatar stands still
    pending_normal: Option<Vec3>,
    align_target: Option<Quat>,
}

impl Navigator {
    pub fn new(config: NavigatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            avatar: Avatar::default(),
            state: NavState::Seeking,
            junction: None,
            pending_normal: None,
            align_target: None,
        })
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn junction(&self) -> Option<GoalId> {
        self.junction
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.state, NavState::AwaitingChoice { .. })
    }

    /// Place the avatar on a start tile, turned half way round about its up
    /// axis so it faces away from the tile's front.
    pub fn spawn(&mut self, position: Vec3, rotation: Quat) {
        self.avatar = Avatar::with_transform(position, rotation * Quat::from_rotation_y(PI));
        self.state = NavState::Seeking;
        self.junction = None;
        self.pending_normal = None;
        self.align_target = None;
        info!(?position, "Avatar spawned");
    }

    /// Advance one tick
    pub fn step(&mut self, course: &mut Course, dt: f32) -> NavState {
        self.check_tile(course);

        if matches!(self.state, NavState::Seeking) {
            self.seek(course);
        }

        let before = self.avatar.position;
        if let NavState::Moving { target } = self.state {
            self.walk(course, target, dt);
        }

        let moved = self.avatar.position - before;
        if moved.length() > MOVE_EPSILON {
            self.face_along(course, moved, dt);
        } else {
            self.align(course, dt);
        }

        self.state.clone()
    }

    /// Resolve a pending junction choice.
    ///
    /// Returns false, leaving the navigator blocked, when no candidate lies
    /// in `direction` or nothing is waiting for a choice.
    pub fn choose(&mut self, direction: Direction) -> bool {
        let NavState::AwaitingChoice { candidates } = &self.state else {
            return false;
        };
        let Some(candidate) = candidates.iter().find(|c| c.direction == direction) else {
            debug!(?direction, "No path in that direction");
            return false;
        };
        let target = candidate.goal;
        debug!(?direction, goal = target.0, "Path chosen");
        self.state = NavState::Moving { target };
        true
    }

    pub fn snapshot(&self) -> AvatarSnapshot {
        AvatarSnapshot {
            avatar: self.avatar.clone(),
            state: self.state.clone(),
            junction: self.junction,
        }
    }

    fn check_tile(&mut self, course: &Course) {
        let Some(id) = course.nearest_tile(self.avatar.position, self.config.tile_detection_radius)
        else {
            return;
        };
        if self.avatar.tile == Some(id) {
            return;
        }
        self.avatar.tile = Some(id);
        if let Some(tile) = course.tile(id) {
            debug!(tile = id.0, normal = ?tile.normal, "Entered tile");
            self.pending_normal = Some(tile.normal);
        }
    }

    fn seek(&mut self, course: &Course) {
        let position = self.avatar.position;
        let reachable: Vec<(GoalId, f32)> = course
            .active_goals()
            .filter(|goal| Some(goal.id) != self.junction)
            .map(|goal| (goal.id, goal.position.distance(position)))
            .filter(|&(_, distance)| distance <= self.config.detection_radius)
            .collect();

        let Some(nearest) = reachable.iter().map(|&(_, d)| d).min_by(f32::total_cmp) else {
            return;
        };
        let tied: Vec<(GoalId, f32)> = reachable
            .into_iter()
            .filter(|&(_, distance)| distance - nearest <= self.config.tie_epsilon)
            .collect();

        if let [(target, distance)] = tied.as_slice() {
            debug!(goal = target.0, distance, "Heading to goal");
            self.state = NavState::Moving { target: *target };
        } else {
            let candidates = self.label(course, &tied);
            debug!(count = candidates.len(), "Waiting for a path choice");
            self.state = NavState::AwaitingChoice { candidates };
        }
    }

    /// Give each tied goal the free direction closest to its bearing,
    /// best matches first
    fn label(&self, course: &Course, tied: &[(GoalId, f32)]) -> Vec<Candidate> {
        let inverse = self.avatar.rotation.inverse();
        let bearings: Vec<(GoalId, f32, f32)> = tied
            .iter()
            .filter_map(|&(id, distance)| {
                let goal = course.goal(id)?;
                let local = inverse * (goal.position - self.avatar.position);
                Some((id, distance, local.x.atan2(local.z)))
            })
            .collect();

        let mut pairs = Vec::with_capacity(bearings.len() * Direction::ALL.len());
        for (ci, &(_, _, bearing)) in bearings.iter().enumerate() {
            for (di, direction) in Direction::ALL.iter().enumerate() {
                pairs.push((angle_between(bearing, direction.bearing()), ci, di));
            }
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

        let mut goal_taken = vec![false; bearings.len()];
        let mut direction_taken = [false; 4];
        let mut candidates = Vec::new();
        for (_, ci, di) in pairs {
            if goal_taken[ci] || direction_taken[di] {
                continue;
            }
            goal_taken[ci] = true;
            direction_taken[di] = true;
            let (goal, distance, _) = bearings[ci];
            candidates.push(Candidate {
                goal,
                direction: Direction::ALL[di],
                distance,
            });
        }

        if bearings.len() > candidates.len() {
            warn!(
                dropped = bearings.len() - candidates.len(),
                "More tied goals than directions"
            );
        }
        candidates.sort_by_key(|c| c.direction);
        candidates
    }

    fn walk(&mut self, course: &mut Course, target: GoalId, dt: f32) {
        if let Some(junction) = self.junction {
            if junction != target {
                course.consume(junction);
                self.junction = None;
                debug!(goal = junction.0, "Left junction");
            }
        }

        let Some(goal) = course.goal(target).copied().filter(|g| g.is_active()) else {
            warn!(goal = target.0, "Target goal no longer active");
            self.state = NavState::Seeking;
            return;
        };

        let position = move_towards(self.avatar.position, goal.position, self.config.speed * dt);
        self.avatar.position = position;
        if position.distance(goal.position) >= self.config.arrival_threshold {
            return;
        }

        self.avatar.position = goal.position;
        match goal.kind {
            GoalKind::Normal => {
                course.consume(goal.id);
            }
            GoalKind::Branch => self.junction = Some(goal.id),
        }
        debug!(goal = goal.id.0, kind = ?goal.kind, "Reached goal");
        self.state = NavState::Seeking;
    }

    fn face_along(&mut self, course: &Course, movement: Vec3, dt: f32) {
        let up = self
            .avatar
            .tile
            .and_then(|id| course.tile(id))
            .map_or(Vec3::Y, |tile| tile.normal);
        let heading = look_rotation(movement, up);
        let t = (self.config.rotation_speed * dt).min(1.0);
        self.avatar.rotation = self.avatar.rotation.slerp(heading, t).normalize();
        self.avatar.motion = Motion::Moving;
    }

    fn align(&mut self, course: &Course, dt: f32) {
        // Settle onto the current tile after walking
        if self.avatar.motion == Motion::Moving {
            if let Some(tile) = self.avatar.tile.and_then(|id| course.tile(id)) {
                self.pending_normal = Some(tile.normal);
            }
        }

        if let Some(normal) = self.pending_normal.take() {
            let up = self.avatar.up().normalize();
            let arc = Quat::from_rotation_arc(up, normal);
            self.align_target = Some((arc * self.avatar.rotation).normalize());
        }

        let Some(target) = self.align_target else {
            self.avatar.motion = Motion::Idle;
            return;
        };

        let t = (self.config.rotation_speed * dt).min(1.0);
        self.avatar.rotation = self.avatar.rotation.slerp(target, t).normalize();
        if self.avatar.rotation.angle_between(target) <= ALIGN_SNAP {
            self.avatar.rotation = target;
            self.align_target = None;
            self.avatar.motion = Motion::Idle;
        } else {
            self.avatar.motion = Motion::RotatingToAlign;
        }
    }
}

/// Smallest angle between two bearings
fn angle_between(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % TAU;
    d.min(TAU - d)
}
