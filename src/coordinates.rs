//! Cube/axial hex coordinates.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::metrics::HexMetrics;

/// Axial coordinate; the cube `y` component is derived so `x + y + z == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HexCoordinates {
    x: i32,
    z: i32,
}

impl HexCoordinates {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Convert offset (column, row) coordinates; odd rows are shifted right.
    pub fn from_offset(column: i32, row: i32) -> Self {
        Self::new(column - row.div_euclid(2), row)
    }

    /// Hex containing a grid-local world position.
    pub fn from_position(position: Vec3, metrics: &HexMetrics) -> Self {
        let mut x = position.x / (metrics.inner_radius() * 2.0);
        let mut y = -x;
        let offset = position.z / (metrics.outer_radius() * 3.0);
        x -= offset;
        y -= offset;

        let mut ix = x.round() as i32;
        let iy = y.round() as i32;
        let mut iz = (-x - y).round() as i32;

        if ix + iy + iz != 0 {
            let dx = (x - ix as f32).abs();
            let dy = (y - iy as f32).abs();
            let dz = (-x - y - iz as f32).abs();
            if dx > dy && dx > dz {
                ix = -iy - iz;
            } else if dz > dy {
                iz = -ix - iy;
            }
        }

        Self::new(ix, iz)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        -self.x - self.z
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    /// Column/row offset coordinates of this hex.
    pub fn to_offset(&self) -> (i32, i32) {
        (self.x + self.z.div_euclid(2), self.z)
    }

    pub fn distance_to(&self, other: &HexCoordinates) -> i32 {
        ((self.x - other.x).abs() + (self.y() - other.y()).abs() + (self.z - other.z).abs()) / 2
    }
}

impl std::fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y(), self.z)
    }
}
