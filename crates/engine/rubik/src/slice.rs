//! Slices and rotation commands

use std::fmt;
use std::str::FromStr;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::{Cell, Error, Grid, Result, SliceAxis, Turn};

/// The N² coordinates sharing one value along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub axis: SliceAxis,
    pub index: i32,
    size: i32,
}

impl Slice {
    /// Create a slice of a grid with edge length `size`
    pub fn new(axis: SliceAxis, index: i32, size: i32) -> Result<Self> {
        if index < 0 || index >= size {
            return Err(Error::SliceOutOfRange { axis, index, size });
        }
        Ok(Self { axis, index, size })
    }

    /// Number of coordinates in the slice
    pub fn len(&self) -> usize {
        (self.size * self.size) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Check if a coordinate belongs to this slice
    pub fn contains(&self, coord: IVec3) -> bool {
        self.axis.component(coord) == self.index
    }

    /// Iterate over the slice coordinates
    pub fn coords(&self) -> impl Iterator<Item = IVec3> + '_ {
        let size = self.size;
        (0..size).flat_map(move |a| {
            (0..size).map(move |b| match self.axis {
                SliceAxis::X => IVec3::new(self.index, a, b),
                SliceAxis::Y => IVec3::new(a, self.index, b),
                SliceAxis::Z => IVec3::new(a, b, self.index),
            })
        })
    }

    /// Coordinate a quarter turn sends `coord` to.
    ///
    /// Works in doubled centre-relative space so odd and even grids share
    /// one integer formula.
    pub fn turn_coord(&self, coord: IVec3, turn: Turn) -> IVec3 {
        let span = IVec3::splat(self.size - 1);
        let doubled = coord * 2 - span;
        (self.axis.quarter_turn(doubled, turn) + span) / 2
    }
}

impl Grid {
    /// Cells whose stored coordinate along `axis` equals `index`
    ///
    /// Selection is based on stored coordinates only, so floating point drift
    /// in world transforms never changes slice membership.
    pub fn select_slice(&self, axis: SliceAxis, index: i32) -> Result<Vec<&Cell>> {
        let slice = Slice::new(axis, index, self.size())?;
        let mut cells = Vec::with_capacity(slice.len());
        for coord in slice.coords() {
            if let Some(cell) = self.cell_at(coord)? {
                cells.push(cell);
            }
        }
        Ok(cells)
    }
}

/// Request to turn one slice by a quarter turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationCommand {
    pub axis: SliceAxis,
    pub index: i32,
    pub turn: Turn,
}

impl RotationCommand {
    pub fn new(axis: SliceAxis, index: i32, turn: Turn) -> Self {
        Self { axis, index, turn }
    }

    /// Same slice turned the other way
    pub fn inverse(&self) -> Self {
        Self {
            turn: self.turn.inverse(),
            ..*self
        }
    }

    /// Resolve the slice this command addresses on a grid of `size`
    pub fn slice(&self, size: i32) -> Result<Slice> {
        Slice::new(self.axis, self.index, size)
    }
}

impl fmt::Display for RotationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.turn {
            Turn::Clockwise => '+',
            Turn::CounterClockwise => '-',
        };
        write!(f, "{}{}{}", self.axis.to_char(), self.index, sign)
    }
}

/// Parses the compact form `<axis><index><+|->`, e.g. `Y2+` or `x0-`
impl FromStr for RotationCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidCommand(s.to_string());

        let mut chars = s.chars();
        let axis = chars.next().and_then(SliceAxis::from_char).ok_or_else(invalid)?;
        let turn = match chars.next_back() {
            Some('+') => Turn::Clockwise,
            Some('-') => Turn::CounterClockwise,
            _ => return Err(invalid()),
        };
        let index = chars.as_str().parse::<i32>().map_err(|_| invalid())?;
        Ok(Self { axis, index, turn })
    }
}
