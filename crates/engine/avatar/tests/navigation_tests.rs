use avatar::glam::{Quat, Vec3};
use avatar::{Course, Direction, GoalKind, GoalState, Motion, NavState, Navigator, NavigatorConfig};

const DT: f32 = 1.0 / 60.0;

fn navigator(detection_radius: f32) -> Navigator {
    Navigator::new(NavigatorConfig {
        detection_radius,
        ..Default::default()
    })
    .unwrap()
}

fn run_until_seeking(nav: &mut Navigator, course: &mut Course, limit: usize) -> usize {
    for tick in 1..=limit {
        if nav.step(course, DT) == NavState::Seeking {
            return tick;
        }
    }
    panic!("navigator did not settle within {limit} ticks");
}

#[test]
fn test_tied_goals_wait_for_choice() {
    let mut course = Course::new();
    course.add_goal(Vec3::new(0.0, 0.0, 3.0), GoalKind::Normal);
    course.add_goal(Vec3::new(3.0, 0.0, 0.0), GoalKind::Normal);
    course.add_goal(Vec3::new(0.0, 0.0, -5.0), GoalKind::Normal);

    let mut nav = navigator(4.0);
    match nav.step(&mut course, DT) {
        NavState::AwaitingChoice { candidates } => assert_eq!(candidates.len(), 2),
        other => panic!("expected a choice, got {other:?}"),
    }
}

#[test]
fn test_nothing_in_range_keeps_seeking() {
    let mut course = Course::new();
    course.add_goal(Vec3::new(0.0, 0.0, 3.0), GoalKind::Normal);
    course.add_goal(Vec3::new(3.0, 0.0, 0.0), GoalKind::Normal);
    course.add_goal(Vec3::new(0.0, 0.0, -5.0), GoalKind::Normal);

    let mut nav = navigator(2.0);
    for _ in 0..30 {
        assert_eq!(nav.step(&mut course, DT), NavState::Seeking);
    }
    assert_eq!(nav.avatar().position, Vec3::ZERO);
    assert_eq!(course.remaining(), 3);
}

#[test]
fn test_empty_course_is_not_an_error() {
    let mut course = Course::new();
    let mut nav = navigator(5.0);
    assert_eq!(nav.step(&mut course, DT), NavState::Seeking);
}

#[test]
fn test_reaches_goal_one_unit_away() {
    let mut course = Course::new();
    let goal = course.add_goal(Vec3::new(0.0, 0.0, 1.0), GoalKind::Normal);

    let mut nav = navigator(5.0);
    let ticks = run_until_seeking(&mut nav, &mut course, 15);
    assert!(ticks <= 15, "took {ticks} ticks");
    assert_eq!(nav.avatar().position, Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(course.goal(goal).unwrap().state, GoalState::Consumed);
}

#[test]
fn test_walks_a_trail_in_order() {
    let mut course = Course::new();
    let trail = [
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, 2.0),
        Vec3::new(1.0, 0.0, 2.0),
        Vec3::new(1.0, 0.0, 3.0),
    ];
    let ids: Vec<_> = trail
        .iter()
        .map(|&p| course.add_goal(p, GoalKind::Normal))
        .collect();

    let mut nav = navigator(1.5);
    for (id, position) in ids.iter().zip(trail) {
        run_until_seeking(&mut nav, &mut course, 30);
        assert_eq!(nav.avatar().position, position);
        assert_eq!(course.goal(*id).unwrap().state, GoalState::Consumed);
    }
    assert_eq!(course.remaining(), 0);
}

#[test]
fn test_branch_goal_consumed_on_departure() {
    let mut course = Course::new();
    let junction = course.add_goal(Vec3::new(0.0, 0.0, 1.0), GoalKind::Branch);
    let east = course.add_goal(Vec3::new(1.0, 0.0, 1.0), GoalKind::Normal);
    let west = course.add_goal(Vec3::new(-1.0, 0.0, 1.0), GoalKind::Normal);

    let mut nav = navigator(1.2);
    run_until_seeking(&mut nav, &mut course, 30);
    assert_eq!(nav.junction(), Some(junction));
    assert_eq!(course.goal(junction).unwrap().state, GoalState::Active);

    // Standing on the junction: both exits tie, the junction itself is ignored
    let NavState::AwaitingChoice { candidates } = nav.step(&mut course, DT) else {
        panic!("expected a choice at the junction");
    };
    assert_eq!(candidates.len(), 2);
    assert!(candidates
        .iter()
        .any(|c| c.goal == east && c.direction == Direction::Right));
    assert!(candidates
        .iter()
        .any(|c| c.goal == west && c.direction == Direction::Left));
    assert_eq!(course.goal(junction).unwrap().state, GoalState::Active);

    assert!(nav.choose(Direction::Left));
    nav.step(&mut course, DT);
    assert_eq!(course.goal(junction).unwrap().state, GoalState::Consumed);
    assert_eq!(nav.junction(), None);

    run_until_seeking(&mut nav, &mut course, 30);
    assert_eq!(nav.avatar().position, Vec3::new(-1.0, 0.0, 1.0));
    assert_eq!(course.goal(west).unwrap().state, GoalState::Consumed);
    assert_eq!(course.goal(east).unwrap().state, GoalState::Active);
}

#[test]
fn test_faces_direction_of_travel() {
    let mut course = Course::new();
    course.add_goal(Vec3::new(3.0, 0.0, 0.0), GoalKind::Normal);

    let mut nav = navigator(5.0);
    for _ in 0..20 {
        nav.step(&mut course, DT);
    }
    assert_eq!(nav.avatar().motion, Motion::Moving);
    assert!(nav.avatar().forward().dot(Vec3::X) > 0.9);
}

#[test]
fn test_settles_onto_tile_after_walking() {
    let mut course = Course::new();
    course.add_tile(Vec3::new(0.0, 0.0, 0.0), Vec3::Y).unwrap();
    course.add_tile(Vec3::new(0.0, 0.0, 1.0), Vec3::Y).unwrap();
    course.add_goal(Vec3::new(0.0, 0.0, 1.0), GoalKind::Normal);

    let mut nav = navigator(5.0);
    nav.spawn(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::PI));
    for _ in 0..200 {
        nav.step(&mut course, DT);
    }
    assert_eq!(course.remaining(), 0);
    assert_eq!(nav.avatar().motion, Motion::Idle);
    assert!((nav.avatar().up() - Vec3::Y).length() < 1e-4);
}

#[test]
fn test_snapshot_serializes() {
    let mut course = Course::new();
    course.add_goal(Vec3::new(0.0, 0.0, 2.0), GoalKind::Normal);

    let mut nav = navigator(5.0);
    nav.step(&mut course, DT);
    let json = serde_json::to_string(&nav.snapshot()).unwrap();
    assert!(json.contains("Moving"));
}
