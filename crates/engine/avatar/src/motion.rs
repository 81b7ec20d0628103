//! Small vector and rotation helpers

use glam::{Mat3, Quat, Vec3};

/// Step from `current` towards `target` by at most `max_delta`, without overshooting
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let offset = target - current;
    let distance = offset.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + offset / distance * max_delta
    }
}

/// Orientation whose local +Z points along `forward` and whose local +Y is as
/// close to `up` as possible.
///
/// Falls back to the shortest arc from +Z when `forward` and `up` are parallel.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let Some(forward) = forward.try_normalize() else {
        return Quat::IDENTITY;
    };
    match up.cross(forward).try_normalize() {
        Some(right) => {
            let up = forward.cross(right);
            Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize()
        }
        None => Quat::from_rotation_arc(Vec3::Z, forward),
    }
}
