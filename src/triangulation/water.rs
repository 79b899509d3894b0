//! Water surfaces: open water, shorelines and river estuaries.

use glam::{Vec2, Vec3};

use super::Triangulator;
use crate::cell::HexCell;
use crate::direction::HexDirection;
use crate::edge::EdgeVertices;

impl<'a> Triangulator<'a> {
    pub(super) fn triangulate_water(&mut self, direction: HexDirection, cell: &HexCell, center: Vec3) {
        let mut center = center;
        center.y = cell.water_surface_y(self.metrics);

        match self.neighbor(cell, direction) {
            Some(neighbor) if !neighbor.is_underwater() => {
                self.triangulate_water_shore(direction, cell, neighbor, center)
            }
            neighbor => self.triangulate_open_water(direction, cell, neighbor, center),
        }
    }

    fn triangulate_open_water(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        neighbor: Option<&HexCell>,
        center: Vec3,
    ) {
        let m = self.metrics;
        let c1 = center + m.first_water_corner(direction);
        let c2 = center + m.second_water_corner(direction);
        self.meshes.water.add_triangle(m, center, c1, c2);

        if direction > HexDirection::SE || neighbor.is_none() {
            return;
        }

        let bridge = m.water_bridge(direction);
        let e1 = c1 + bridge;
        let e2 = c2 + bridge;
        self.meshes.water.add_quad(m, c1, c2, e1, e2);

        if direction <= HexDirection::E {
            if let Some(next) = self.neighbor(cell, direction.next()) {
                if next.is_underwater() {
                    self.meshes
                        .water
                        .add_triangle(m, c2, e2, c2 + m.water_bridge(direction.next()));
                }
            }
        }
    }

    fn triangulate_water_shore(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        neighbor: &HexCell,
        center: Vec3,
    ) {
        let m = self.metrics;
        let step = m.edge_outer_step();
        let edge = EdgeVertices::new(
            center + m.first_water_corner(direction),
            center + m.second_water_corner(direction),
            step,
        );
        {
            let water = &mut self.meshes.water;
            water.add_triangle(m, center, edge.v1, edge.v2);
            water.add_triangle(m, center, edge.v2, edge.v3);
            water.add_triangle(m, center, edge.v3, edge.v4);
            water.add_triangle(m, center, edge.v4, edge.v5);
        }

        let mut center2 = neighbor.position();
        center2.y = center.y;
        let opposite = direction.opposite();
        let edge2 = EdgeVertices::new(
            center2 + m.second_solid_corner(opposite),
            center2 + m.first_solid_corner(opposite),
            step,
        );

        if cell.has_river_through_edge(direction) {
            self.triangulate_estuary(&edge, &edge2, cell.has_incoming_river_through(direction));
        } else {
            let shore = &mut self.meshes.water_shore;
            shore.add_quad(m, edge.v1, edge.v2, edge2.v1, edge2.v2);
            shore.add_quad(m, edge.v2, edge.v3, edge2.v2, edge2.v3);
            shore.add_quad(m, edge.v3, edge.v4, edge2.v3, edge2.v4);
            shore.add_quad(m, edge.v4, edge.v5, edge2.v4, edge2.v5);
            for _ in 0..4 {
                shore.add_quad_uv_rect(0.0, 0.0, 0.0, 1.0);
            }
        }

        if let Some(next) = self.neighbor(cell, direction.next()) {
            let corner = if next.is_underwater() {
                m.first_water_corner(direction.previous())
            } else {
                m.first_solid_corner(direction.previous())
            };
            let mut v3 = next.position() + corner;
            v3.y = center.y;

            let shore = &mut self.meshes.water_shore;
            shore.add_triangle(m, edge.v5, edge2.v5, v3);
            let far = if next.is_underwater() { 0.0 } else { 1.0 };
            shore.add_triangle_uv(Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(0.0, far));
        }
    }

    /// Widening river mouth where a river meets open water.
    fn triangulate_estuary(&mut self, edge1: &EdgeVertices, edge2: &EdgeVertices, incoming_river: bool) {
        let m = self.metrics;
        {
            let shore = &mut self.meshes.water_shore;
            shore.add_triangle(m, edge2.v1, edge1.v2, edge1.v1);
            shore.add_triangle(m, edge2.v5, edge1.v5, edge1.v4);
            shore.add_triangle_uv(Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));
            shore.add_triangle_uv(Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));
        }

        let estuaries = &mut self.meshes.estuaries;
        estuaries.add_quad(m, edge2.v1, edge1.v2, edge2.v2, edge1.v3);
        estuaries.add_triangle(m, edge1.v3, edge2.v2, edge2.v4);
        estuaries.add_quad(m, edge1.v3, edge1.v4, edge2.v4, edge2.v5);

        estuaries.add_quad_uv(
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 0.0),
        );
        estuaries.add_triangle_uv(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        estuaries.add_quad_uv(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        );

        if incoming_river {
            estuaries.add_quad_uv2(
                Vec2::new(1.5, 1.0),
                Vec2::new(0.7, 1.15),
                Vec2::new(1.0, 0.8),
                Vec2::new(0.5, 1.1),
            );
            estuaries.add_triangle_uv2(Vec2::new(0.5, 1.1), Vec2::new(1.0, 0.8), Vec2::new(0.0, 0.8));
            estuaries.add_quad_uv2(
                Vec2::new(0.5, 1.0),
                Vec2::new(0.3, 1.15),
                Vec2::new(0.0, 0.8),
                Vec2::new(-0.5, 1.0),
            );
        } else {
            estuaries.add_quad_uv2(
                Vec2::new(-0.5, -0.2),
                Vec2::new(0.3, -0.35),
                Vec2::new(0.0, 0.0),
                Vec2::new(0.5, -0.3),
            );
            estuaries.add_triangle_uv2(Vec2::new(0.5, -0.3), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
            estuaries.add_quad_uv2(
                Vec2::new(0.5, -0.3),
                Vec2::new(0.7, -0.35),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.5, -0.2),
            );
        }
    }
}
