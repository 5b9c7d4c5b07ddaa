//! Room bounds - inner walkable volume and outer wall lattice.

use serde::{Deserialize, Serialize};

use crate::components::{BoundingBox, Vec3};

/// Inner bounds in world units plus the outer lattice extent in cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub cell_size: Vec3,
    /// Walkable interior: `min = cell_size`, `max = cell_size * (length, height, width)`
    pub inner: BoundingBox,
    /// Wall lattice size along x (inner length + 2)
    pub outer_length: u32,
    /// Wall lattice size along y (inner height + 1, no ceiling)
    pub outer_height: u32,
    /// Wall lattice size along z (inner width + 2)
    pub outer_width: u32,
}

impl RoomBounds {
    pub fn new(cell_size: Vec3, length: u32, width: u32, height: u32) -> Self {
        let inner = BoundingBox::new(
            cell_size,
            cell_size.scale(Vec3::new(length as f32, height as f32, width as f32)),
        );
        Self {
            cell_size,
            inner,
            outer_length: length + 2,
            outer_height: height + 1,
            outer_width: width + 2,
        }
    }

    /// Platforms can only be generated when `min < max` on every axis.
    pub fn is_valid(&self) -> bool {
        self.inner.min.all_lt(&self.inner.max)
    }

    /// Total lattice coordinates scanned by the room builder.
    pub fn lattice_size(&self) -> usize {
        self.outer_length as usize * self.outer_height as usize * self.outer_width as usize
    }

    /// Shell membership: any border face except the top.
    pub fn is_shell(&self, x: u32, y: u32, z: u32) -> bool {
        x == 0 || y == 0 || z == 0 || x == self.outer_length - 1 || z == self.outer_width - 1
    }

    /// World position of a lattice coordinate.
    pub fn cell_position(&self, x: u32, y: u32, z: u32) -> Vec3 {
        Vec3::new(x as f32, y as f32, z as f32).scale(self.cell_size)
    }

    /// Height below which the exit door may not be placed (top third of the room).
    pub fn door_threshold(&self) -> f32 {
        self.inner.max.y - self.inner.max.y / 3.0
    }
}

/// Clamp with inverted-range tolerance: below `min` gives `min`, otherwise above
/// `max` gives `max`. Never panics, unlike `f32::clamp`.
pub(crate) fn clamp_span(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
