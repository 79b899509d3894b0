//! Edge subdivision and elevation-delta classification.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Five points along a hex edge at parametric steps `0, e, 0.5, 1 - e, 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeVertices {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
    pub v4: Vec3,
    pub v5: Vec3,
}

impl EdgeVertices {
    pub fn new(corner1: Vec3, corner2: Vec3, outer_step: f32) -> Self {
        Self {
            v1: corner1,
            v2: corner1.lerp(corner2, outer_step),
            v3: corner1.lerp(corner2, 0.5),
            v4: corner1.lerp(corner2, 1.0 - outer_step),
            v5: corner2,
        }
    }

    /// Same edge shifted by `offset`, subdivided again from its end points.
    pub fn offset(&self, offset: Vec3, outer_step: f32) -> Self {
        Self::new(self.v1 + offset, self.v5 + offset, outer_step)
    }
}

/// Relation between the elevations of two adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    Flat,
    Slope,
    Cliff,
}

impl EdgeType {
    pub fn between(elevation1: i32, elevation2: i32) -> Self {
        match (elevation1 - elevation2).abs() {
            0 => EdgeType::Flat,
            1 => EdgeType::Slope,
            _ => EdgeType::Cliff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_subdivision() {
        let e = EdgeVertices::new(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), 1.0 / 6.0);
        assert_eq!(e.v1, Vec3::ZERO);
        assert!((e.v2.x - 1.0).abs() < 1e-5);
        assert!((e.v3.x - 3.0).abs() < 1e-5);
        assert!((e.v4.x - 5.0).abs() < 1e-5);
        assert_eq!(e.v5, Vec3::new(6.0, 0.0, 0.0));
    }

    #[test]
    fn test_offset_keeps_spacing() {
        let e = EdgeVertices::new(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), 1.0 / 6.0);
        let moved = e.offset(Vec3::new(0.0, 2.0, 1.0), 1.0 / 6.0);
        let pairs = [(e.v1, moved.v1), (e.v2, moved.v2), (e.v3, moved.v3), (e.v4, moved.v4), (e.v5, moved.v5)];
        for (a, b) in pairs {
            assert!((b - a - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-5);
        }
    }

    #[test]
    fn test_edge_type_classification() {
        assert_eq!(EdgeType::between(3, 3), EdgeType::Flat);
        assert_eq!(EdgeType::between(3, 4), EdgeType::Slope);
        assert_eq!(EdgeType::between(4, 3), EdgeType::Slope);
        assert_eq!(EdgeType::between(1, 3), EdgeType::Cliff);
        assert_eq!(EdgeType::between(7, 0), EdgeType::Cliff);
    }
}
