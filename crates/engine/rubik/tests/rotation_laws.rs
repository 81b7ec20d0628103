//! Whole-grid properties of slice rotation

use std::collections::{HashMap, HashSet};

use rubik::glam::{IVec3, Mat3};
use rubik::{CellId, Grid, RotationCommand, RotationState, SliceAxis, SliceRotator, Turn};

const TURNS: [Turn; 2] = [Turn::Clockwise, Turn::CounterClockwise];

fn coords_by_id(grid: &Grid) -> HashMap<CellId, IVec3> {
    grid.cells().map(|cell| (cell.id(), cell.coord())).collect()
}

fn id_at(grid: &Grid, coord: IVec3) -> CellId {
    grid.cell_at(coord).unwrap().unwrap().id()
}

/// Run a rotation tick by tick at 60 Hz, returning the ticks taken
fn animate(grid: &mut Grid, rotator: &mut SliceRotator, command: RotationCommand) -> usize {
    rotator.request_rotation(grid, command).unwrap();
    let mut ticks = 0;
    while rotator.advance(grid, 1.0 / 60.0) != RotationState::Idle {
        ticks += 1;
        assert!(ticks < 10_000, "rotation never finished");
    }
    ticks
}

#[test]
fn test_build_is_bijection() {
    for size in 1..=5 {
        let grid = Grid::build(size, 1.0).unwrap();
        assert_eq!(grid.len(), (size * size * size) as usize);

        let coords: HashSet<IVec3> = grid.cells().map(|cell| cell.coord()).collect();
        let ids: HashSet<CellId> = grid.cells().map(|cell| cell.id()).collect();
        assert_eq!(coords.len(), grid.len());
        assert_eq!(ids.len(), grid.len());
        grid.verify().unwrap();
    }
}

#[test]
fn test_slice_size_preserved_and_round_trip() {
    for size in 1..=4 {
        for axis in SliceAxis::ALL {
            for index in 0..size {
                for turn in TURNS {
                    let mut grid = Grid::build(size, 1.0).unwrap();
                    let before = coords_by_id(&grid);
                    let mut rotator = SliceRotator::default();
                    let command = RotationCommand::new(axis, index, turn);

                    rotator.rotate_now(&mut grid, command).unwrap();
                    assert_eq!(
                        grid.select_slice(axis, index).unwrap().len(),
                        (size * size) as usize
                    );
                    grid.verify().unwrap();

                    rotator.rotate_now(&mut grid, command.inverse()).unwrap();
                    assert_eq!(coords_by_id(&grid), before, "{command} round trip");
                }
            }
        }
    }
}

#[test]
fn test_four_turns_restore_grid() {
    for size in [2, 3, 4] {
        for axis in SliceAxis::ALL {
            for turn in TURNS {
                let mut grid = Grid::build(size, 0.5).unwrap();
                let before = coords_by_id(&grid);
                let mut rotator = SliceRotator::default();
                let command = RotationCommand::new(axis, size - 1, turn);

                for _ in 0..4 {
                    animate(&mut grid, &mut rotator, command);
                }
                assert_eq!(coords_by_id(&grid), before, "{command} x4");
                for cell in grid.cells() {
                    assert!(cell.rotation().abs_diff_eq(rubik::glam::Quat::IDENTITY, 1e-6)
                        || cell.rotation().abs_diff_eq(-rubik::glam::Quat::IDENTITY, 1e-6));
                }
            }
        }
    }
}

#[test]
fn test_top_slice_clockwise_permutation() {
    let mut grid = Grid::build(3, 1.0).unwrap();
    let before: HashMap<IVec3, CellId> = grid.cells().map(|c| (c.coord(), c.id())).collect();

    let mut rotator = SliceRotator::default();
    animate(
        &mut grid,
        &mut rotator,
        RotationCommand::new(SliceAxis::Y, 2, Turn::Clockwise),
    );

    // (x, y, z) -> (z, y, N-1-x) for every cell of the slice
    let expected = [
        ((0, 0), (0, 2)),
        ((0, 1), (1, 2)),
        ((0, 2), (2, 2)),
        ((1, 0), (0, 1)),
        ((1, 1), (1, 1)),
        ((1, 2), (2, 1)),
        ((2, 0), (0, 0)),
        ((2, 1), (1, 0)),
        ((2, 2), (2, 0)),
    ];
    for ((x, z), (nx, nz)) in expected {
        let from = IVec3::new(x, 2, z);
        let to = IVec3::new(nx, 2, nz);
        assert_eq!(id_at(&grid, to), before[&from], "{from} should move to {to}");
    }

    // Other layers untouched
    for y in 0..2 {
        for x in 0..3 {
            for z in 0..3 {
                let coord = IVec3::new(x, y, z);
                assert_eq!(id_at(&grid, coord), before[&coord]);
            }
        }
    }
}

#[test]
fn test_committed_transforms_are_exact() {
    let mut grid = Grid::build(3, 1.5).unwrap();
    let mut rotator = SliceRotator::default();
    let moves = ["Y2+", "X0-", "Z1+", "Y2+", "X2+", "Z0-", "Y1-"];

    for text in moves {
        animate(&mut grid, &mut rotator, text.parse().unwrap());
    }

    grid.verify().unwrap();
    for cell in grid.cells() {
        assert_eq!(cell.position(), grid.position_of(cell.coord()));
        let m = Mat3::from_quat(cell.rotation());
        for column in [m.x_axis, m.y_axis, m.z_axis] {
            assert!(
                column.abs_diff_eq(column.round(), 1e-5),
                "{} orientation drifted: {column}",
                cell.name()
            );
        }
    }
}

#[test]
fn test_animation_length_matches_speed() {
    let mut grid = Grid::build(3, 1.0).unwrap();
    let mut rotator = SliceRotator::default();
    // 90°/s at 60 Hz: 60 ticks of rotation, the last one entering Committing
    let ticks = animate(
        &mut grid,
        &mut rotator,
        RotationCommand::new(SliceAxis::X, 1, Turn::Clockwise),
    );
    assert!((59..=61).contains(&ticks), "took {ticks} ticks");
}
