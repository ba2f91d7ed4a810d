//! Spatial axes of the 3D plot cube.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GridscopeError, Result};

/// One of the three chart axes.
///
/// X and Y are the grid axes (table rows and columns), Z carries the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Axis along the grid rows.
    X,
    /// Axis along the grid columns.
    Y,
    /// Value axis.
    Z,
}

impl Axis {
    /// All axes in slot order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the vector slot of this axis (0, 1 or 2).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Converts a raw slot index, as sent by interactive clients, into an axis.
    pub fn from_index(index: u32) -> Result<Self> {
        match index {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            _ => Err(GridscopeError::InvalidAxisIndex(index)),
        }
    }

    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
