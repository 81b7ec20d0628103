use glam::{IVec3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned normal direction, used for cube faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Axis {
    /// Convert to Vec3 normal
    pub fn as_vec3(&self) -> Vec3 {
        self.as_ivec3().as_vec3()
    }

    /// Convert to integer normal
    pub fn as_ivec3(&self) -> IVec3 {
        match self {
            Axis::PosX => IVec3::X,
            Axis::NegX => IVec3::NEG_X,
            Axis::PosY => IVec3::Y,
            Axis::NegY => IVec3::NEG_Y,
            Axis::PosZ => IVec3::Z,
            Axis::NegZ => IVec3::NEG_Z,
        }
    }

    /// Get the opposite axis
    pub fn opposite(&self) -> Self {
        match self {
            Axis::PosX => Axis::NegX,
            Axis::NegX => Axis::PosX,
            Axis::PosY => Axis::NegY,
            Axis::NegY => Axis::PosY,
            Axis::PosZ => Axis::NegZ,
            Axis::NegZ => Axis::PosZ,
        }
    }

    /// Unsigned slice axis this normal lies along
    pub fn slice_axis(&self) -> SliceAxis {
        match self {
            Axis::PosX | Axis::NegX => SliceAxis::X,
            Axis::PosY | Axis::NegY => SliceAxis::Y,
            Axis::PosZ | Axis::NegZ => SliceAxis::Z,
        }
    }

    /// Dominant-component direction of `v`.
    ///
    /// Ties between components go to X, then Y, then Z, so corner and edge
    /// cells still resolve to a face. Returns `None` only for the zero vector.
    pub fn from_vec3(v: Vec3) -> Option<Self> {
        let abs = v.abs();
        let axis = if abs.x >= abs.y && abs.x >= abs.z {
            SliceAxis::X
        } else if abs.y >= abs.z {
            SliceAxis::Y
        } else {
            SliceAxis::Z
        };
        let component = axis.component_f32(v);
        if component == 0.0 {
            return None;
        }
        Some(axis.signed(component > 0.0))
    }
}

/// Unsigned rotation axis of a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SliceAxis {
    X,
    Y,
    Z,
}

impl SliceAxis {
    pub const ALL: [SliceAxis; 3] = [SliceAxis::X, SliceAxis::Y, SliceAxis::Z];

    /// Unit vector along the positive axis
    pub fn unit(self) -> Vec3 {
        match self {
            SliceAxis::X => Vec3::X,
            SliceAxis::Y => Vec3::Y,
            SliceAxis::Z => Vec3::Z,
        }
    }

    /// Component of an integer coordinate along this axis
    pub fn component(self, v: IVec3) -> i32 {
        match self {
            SliceAxis::X => v.x,
            SliceAxis::Y => v.y,
            SliceAxis::Z => v.z,
        }
    }

    /// Component of a float vector along this axis
    pub fn component_f32(self, v: Vec3) -> f32 {
        match self {
            SliceAxis::X => v.x,
            SliceAxis::Y => v.y,
            SliceAxis::Z => v.z,
        }
    }

    /// Signed face normal along this axis
    pub fn signed(self, positive: bool) -> Axis {
        match (self, positive) {
            (SliceAxis::X, true) => Axis::PosX,
            (SliceAxis::X, false) => Axis::NegX,
            (SliceAxis::Y, true) => Axis::PosY,
            (SliceAxis::Y, false) => Axis::NegY,
            (SliceAxis::Z, true) => Axis::PosZ,
            (SliceAxis::Z, false) => Axis::NegZ,
        }
    }

    /// Create from char (x/X, y/Y, z/Z)
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'x' | 'X' => Some(SliceAxis::X),
            'y' | 'Y' => Some(SliceAxis::Y),
            'z' | 'Z' => Some(SliceAxis::Z),
            _ => None,
        }
    }

    /// Convert to uppercase char
    pub fn to_char(self) -> char {
        match self {
            SliceAxis::X => 'X',
            SliceAxis::Y => 'Y',
            SliceAxis::Z => 'Z',
        }
    }

    /// Rotation of `angle` radians about this axis in the direction of `turn`
    pub fn rotation(self, turn: Turn, angle: f32) -> Quat {
        Quat::from_axis_angle(self.unit(), turn.sign() * angle)
    }

    /// Exact quarter turn of an integer vector about this axis.
    ///
    /// Matches `rotation(turn, FRAC_PI_2)` applied to the same vector, with
    /// no floating point involved.
    pub fn quarter_turn(self, v: IVec3, turn: Turn) -> IVec3 {
        match (self, turn) {
            (SliceAxis::X, Turn::Clockwise) => IVec3::new(v.x, -v.z, v.y),
            (SliceAxis::X, Turn::CounterClockwise) => IVec3::new(v.x, v.z, -v.y),
            (SliceAxis::Y, Turn::Clockwise) => IVec3::new(v.z, v.y, -v.x),
            (SliceAxis::Y, Turn::CounterClockwise) => IVec3::new(-v.z, v.y, v.x),
            (SliceAxis::Z, Turn::Clockwise) => IVec3::new(-v.y, v.x, v.z),
            (SliceAxis::Z, Turn::CounterClockwise) => IVec3::new(v.y, -v.x, v.z),
        }
    }
}

/// Direction of a quarter turn.
///
/// `Clockwise` is a positive (right-handed) rotation about the positive axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
}

impl Turn {
    /// +1 for clockwise, -1 for counter-clockwise
    pub fn sign(self) -> f32 {
        match self {
            Turn::Clockwise => 1.0,
            Turn::CounterClockwise => -1.0,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::CounterClockwise => Turn::Clockwise,
        }
    }
}
