//! Scripted runs: rotation sequences and avatar walks

use anyhow::{bail, Context};
use avatar::{AvatarSnapshot, Course, Direction, Motion, NavState, Navigator};
use glam::Vec3;
use rubik::{DragGesture, Grid, RotationCommand, RotationState, SliceRotator};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;

/// Parse a whitespace-separated move list such as `"Y2+ X0-"`
pub fn parse_moves(text: &str) -> anyhow::Result<Vec<RotationCommand>> {
    text.split_whitespace()
        .map(|word| {
            word.parse::<RotationCommand>()
                .with_context(|| format!("bad move {word:?}"))
        })
        .collect()
}

/// Parse a choice list such as `"F L R"` (or `"FLR"`)
pub fn parse_choices(text: &str) -> anyhow::Result<Vec<Direction>> {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| match Direction::from_char(c) {
            Some(direction) => Ok(direction),
            None => bail!("bad direction {c:?}, expected F, R, B or L"),
        })
        .collect()
}

/// A pointer drag in world space, grabbed at `from` and released at `to`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swipe {
    pub from: Vec3,
    pub to: Vec3,
}

/// Parse swipes such as `"1,0,-1>1,0.5,-1"`, separated by whitespace
pub fn parse_swipes(text: &str) -> anyhow::Result<Vec<Swipe>> {
    text.split_whitespace()
        .map(|word| {
            let (from, to) = word
                .split_once('>')
                .with_context(|| format!("bad swipe {word:?}, expected x,y,z>x,y,z"))?;
            Ok(Swipe {
                from: parse_point(from).with_context(|| format!("bad swipe {word:?}"))?,
                to: parse_point(to).with_context(|| format!("bad swipe {word:?}"))?,
            })
        })
        .collect()
}

fn parse_point(text: &str) -> anyhow::Result<Vec3> {
    let parts = text
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()?;
    let [x, y, z] = parts[..] else {
        bail!("expected three coordinates, got {}", parts.len());
    };
    Ok(Vec3::new(x, y, z))
}

/// Play each move tick by tick, returning the ticks spent
pub fn run_moves(
    grid: &mut Grid,
    rotator: &mut SliceRotator,
    moves: &[RotationCommand],
    sim: &SimulationConfig,
) -> anyhow::Result<u32> {
    let mut ticks = 0;
    for &command in moves {
        play(grid, rotator, command, sim, &mut ticks)?;
    }
    grid.verify()?;
    info!(moves = moves.len(), ticks, "Rotations applied");
    Ok(ticks)
}

/// Resolve each swipe against the grid as it stands, then play the turn
pub fn run_swipes(
    grid: &mut Grid,
    rotator: &mut SliceRotator,
    gesture: &mut DragGesture,
    swipes: &[Swipe],
    sim: &SimulationConfig,
) -> anyhow::Result<u32> {
    let mut ticks = 0;
    for swipe in swipes {
        if gesture.begin(grid, swipe.from).is_none() {
            bail!("no cell in reach of {}", swipe.from);
        }
        let Some(command) = gesture.update(grid, swipe.to) else {
            gesture.cancel();
            bail!("swipe {} -> {} turns no slice", swipe.from, swipe.to);
        };
        play(grid, rotator, command, sim, &mut ticks)?;
    }
    grid.verify()?;
    info!(swipes = swipes.len(), ticks, "Swipes applied");
    Ok(ticks)
}

fn play(
    grid: &mut Grid,
    rotator: &mut SliceRotator,
    command: RotationCommand,
    sim: &SimulationConfig,
    ticks: &mut u32,
) -> anyhow::Result<()> {
    let dt = sim.dt();
    rotator.request_rotation(grid, command)?;
    while rotator.advance(grid, dt) != RotationState::Idle {
        *ticks += 1;
        if *ticks >= sim.max_ticks {
            bail!("rotation {command} still running after {ticks} ticks");
        }
    }
    debug!(%command, ticks = *ticks, "Move done");
    Ok(())
}

/// Why a walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WalkOutcome {
    /// Every goal has been consumed
    Finished,
    /// Goals remain but none is in reach
    Stranded,
    /// Waiting at a junction with no scripted choices left
    AwaitingChoice,
    /// A scripted choice matched no path
    BadChoice(Direction),
    /// Ran into the tick limit
    OutOfTicks,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalkReport {
    pub outcome: WalkOutcome,
    pub ticks: u32,
    pub goals_reached: usize,
    pub goals_left: usize,
    pub choices_used: usize,
    pub avatar: AvatarSnapshot,
}

/// Step the navigator until it settles, answering junctions from `choices`
pub fn walk(
    navigator: &mut Navigator,
    course: &mut Course,
    choices: &[Direction],
    sim: &SimulationConfig,
) -> WalkReport {
    let dt = sim.dt();
    let total = course.goals().len();
    let mut pending = choices.iter().copied();
    let mut choices_used = 0;
    let mut ticks = 0;

    let outcome = loop {
        if ticks >= sim.max_ticks {
            warn!(ticks, "Walk hit the tick limit");
            break WalkOutcome::OutOfTicks;
        }
        let state = navigator.step(course, dt);
        ticks += 1;

        match state {
            NavState::AwaitingChoice { .. } => {
                let Some(direction) = pending.next() else {
                    break WalkOutcome::AwaitingChoice;
                };
                choices_used += 1;
                if !navigator.choose(direction) {
                    warn!(?direction, "Scripted choice matched no path");
                    break WalkOutcome::BadChoice(direction);
                }
            }
            NavState::Seeking if navigator.avatar().motion == Motion::Idle => {
                if course.remaining() == 0 {
                    break WalkOutcome::Finished;
                }
                // Seeking found nothing this tick and the avatar is at rest
                break WalkOutcome::Stranded;
            }
            _ => {}
        }
    };

    let goals_left = course.remaining();
    info!(?outcome, ticks, goals_left, "Walk ended");
    WalkReport {
        outcome,
        ticks,
        goals_reached: total - goals_left,
        goals_left,
        choices_used,
        avatar: navigator.snapshot(),
    }
}
