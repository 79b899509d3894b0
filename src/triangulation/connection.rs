//! Edge connections between a cell and the neighbors it owns: flat and
//! cliff strips, terraced slopes, and river quads or waterfalls crossing them.

use glam::Vec3;

use super::corner::CornerVertex;
use super::{Triangulator, COLOR1, COLOR2};
use crate::cell::HexCell;
use crate::direction::HexDirection;
use crate::edge::{EdgeType, EdgeVertices};

/// How a river crossing an edge connection is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiverCrossing {
    /// Both cells are dry: a sloped river quad.
    Channel,
    /// The cell is dry and pours down into the neighbor's water.
    WaterfallFromCell,
    /// The neighbor is dry and pours down into this cell's water.
    WaterfallFromNeighbor,
    /// Nothing visible above the water surface.
    Submerged,
}

impl RiverCrossing {
    pub fn classify(cell: &HexCell, neighbor: &HexCell) -> Self {
        match (cell.is_underwater(), neighbor.is_underwater()) {
            (false, false) => RiverCrossing::Channel,
            (false, true) if cell.elevation() > neighbor.water_level() => RiverCrossing::WaterfallFromCell,
            (true, false) if neighbor.elevation() > cell.water_level() => {
                RiverCrossing::WaterfallFromNeighbor
            }
            _ => RiverCrossing::Submerged,
        }
    }
}

impl<'a> Triangulator<'a> {
    pub(super) fn triangulate_connection(
        &mut self,
        direction: HexDirection,
        cell: &'a HexCell,
        edge: &EdgeVertices,
    ) {
        let m = self.metrics;
        let Some(neighbor) = self.neighbor(cell, direction) else {
            return;
        };

        let mut bridge = m.bridge(direction);
        bridge.y = neighbor.position().y - cell.position().y;
        let mut neighbor_edge = edge.offset(bridge, m.edge_outer_step());

        let has_road = cell.has_road_through_edge(direction);

        if cell.has_river_through_edge(direction) {
            neighbor_edge.v3.y = neighbor.stream_bed_y(m);
            self.triangulate_river_crossing(direction, cell, neighbor, edge, &neighbor_edge);
        }

        match cell.edge_type_to(neighbor) {
            EdgeType::Slope => self.triangulate_edge_terraces(edge, cell, &neighbor_edge, neighbor, has_road),
            EdgeType::Flat | EdgeType::Cliff => self.triangulate_edge_strip(
                edge,
                COLOR1,
                cell.terrain_type(),
                &neighbor_edge,
                COLOR2,
                neighbor.terrain_type(),
                has_road,
            ),
        }

        if direction > HexDirection::E {
            return;
        }
        let Some(next_neighbor) = self.neighbor(cell, direction.next()) else {
            return;
        };

        let mut v5 = edge.v5 + m.bridge(direction.next());
        v5.y = next_neighbor.position().y;

        let own = CornerVertex::new(edge.v5, cell);
        let across = CornerVertex::new(neighbor_edge.v5, neighbor);
        let next = CornerVertex::new(v5, next_neighbor);

        // Rotate so the lowest cell comes first, keeping clockwise order.
        if cell.elevation() <= neighbor.elevation() {
            if cell.elevation() <= next_neighbor.elevation() {
                self.triangulate_corner(own, across, next);
            } else {
                self.triangulate_corner(next, own, across);
            }
        } else if neighbor.elevation() <= next_neighbor.elevation() {
            self.triangulate_corner(across, next, own);
        } else {
            self.triangulate_corner(next, own, across);
        }
    }

    fn triangulate_river_crossing(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        neighbor: &HexCell,
        edge: &EdgeVertices,
        neighbor_edge: &EdgeVertices,
    ) {
        let m = self.metrics;
        match RiverCrossing::classify(cell, neighbor) {
            RiverCrossing::Channel => self.triangulate_river_quad(
                edge.v2,
                edge.v4,
                neighbor_edge.v2,
                neighbor_edge.v4,
                cell.river_surface_y(m),
                neighbor.river_surface_y(m),
                0.8,
                cell.has_incoming_river_through(direction),
            ),
            RiverCrossing::WaterfallFromCell => self.triangulate_waterfall(
                edge.v2,
                edge.v4,
                neighbor_edge.v2,
                neighbor_edge.v4,
                cell.river_surface_y(m),
                neighbor.river_surface_y(m),
                neighbor.water_surface_y(m),
            ),
            RiverCrossing::WaterfallFromNeighbor => self.triangulate_waterfall(
                neighbor_edge.v4,
                neighbor_edge.v2,
                edge.v4,
                edge.v2,
                neighbor.river_surface_y(m),
                cell.river_surface_y(m),
                cell.water_surface_y(m),
            ),
            RiverCrossing::Submerged => {}
        }
    }

    /// River quad falling from `y1` to `y2`, clipped where it enters water at `water_y`.
    #[allow(clippy::too_many_arguments)]
    fn triangulate_waterfall(
        &mut self,
        v1: Vec3,
        v2: Vec3,
        v3: Vec3,
        v4: Vec3,
        y1: f32,
        y2: f32,
        water_y: f32,
    ) {
        let m = self.metrics;
        let v1 = m.perturb(Vec3::new(v1.x, y1, v1.z));
        let v2 = m.perturb(Vec3::new(v2.x, y1, v2.z));
        let v3 = m.perturb(Vec3::new(v3.x, y2, v3.z));
        let v4 = m.perturb(Vec3::new(v4.x, y2, v4.z));

        let t = if (y1 - y2).abs() > f32::EPSILON {
            (water_y - y2) / (y1 - y2)
        } else {
            0.0
        };
        let v3 = v3.lerp(v1, t);
        let v4 = v4.lerp(v2, t);

        let rivers = &mut self.meshes.rivers;
        rivers.add_quad_unperturbed(v1, v2, v3, v4);
        rivers.add_quad_uv_rect(0.0, 1.0, 0.8, 1.0);
    }

    /// Stepped strips between two edges one elevation level apart.
    fn triangulate_edge_terraces(
        &mut self,
        begin: &EdgeVertices,
        begin_cell: &HexCell,
        end: &EdgeVertices,
        end_cell: &HexCell,
        has_road: bool,
    ) {
        let m = self.metrics;
        let t1 = begin_cell.terrain_type();
        let t2 = end_cell.terrain_type();

        let mut e2 = m.terrace_edge(begin, end, 1);
        let mut c2 = m.terrace_color(COLOR1, COLOR2, 1);
        self.triangulate_edge_strip(begin, COLOR1, t1, &e2, c2, t2, has_road);

        for step in 2..m.terrace_steps() {
            let e1 = e2;
            let c1 = c2;
            e2 = m.terrace_edge(begin, end, step);
            c2 = m.terrace_color(COLOR1, COLOR2, step);
            self.triangulate_edge_strip(&e1, c1, t1, &e2, c2, t2, has_road);
        }

        self.triangulate_edge_strip(&e2, c2, t1, end, COLOR2, t2, has_road);
    }
}
