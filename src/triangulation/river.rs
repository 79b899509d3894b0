//! River channels: sources and sinks, channels through a cell, and the
//! banks of cells whose river runs along other edges.

use glam::{Vec2, Vec3};

use super::{Triangulator, COLOR1};
use crate::cell::HexCell;
use crate::direction::HexDirection;
use crate::edge::EdgeVertices;
use crate::metrics::INNER_TO_OUTER;

/// Shape of a river passing through a cell, seen from one of its edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiverChannel {
    /// The river leaves through the opposite edge.
    Straight,
    /// The river turns sharply through the next edge.
    SharpTurnNext,
    /// The river turns sharply through the previous edge.
    SharpTurnPrevious,
    /// The river bends gently through the edge after next.
    SmoothTurnNext,
    /// The river bends gently through the edge before previous.
    SmoothTurnPrevious,
    /// No second river edge was found.
    Isolated,
}

impl RiverChannel {
    pub fn classify(cell: &HexCell, direction: HexDirection) -> Self {
        if cell.has_river_through_edge(direction.opposite()) {
            RiverChannel::Straight
        } else if cell.has_river_through_edge(direction.next()) {
            RiverChannel::SharpTurnNext
        } else if cell.has_river_through_edge(direction.previous()) {
            RiverChannel::SharpTurnPrevious
        } else if cell.has_river_through_edge(direction.next2()) {
            RiverChannel::SmoothTurnNext
        } else if cell.has_river_through_edge(direction.previous2()) {
            RiverChannel::SmoothTurnPrevious
        } else {
            RiverChannel::Isolated
        }
    }
}

/// Where the center of a river-free wedge moves to leave room for the channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiverBankNudge {
    Stay,
    /// The river curves around this edge through both neighbors.
    InsideCurve,
    TowardFirstCorner,
    TowardSecondCorner,
}

impl RiverBankNudge {
    pub fn classify(cell: &HexCell, direction: HexDirection) -> Self {
        let next = cell.has_river_through_edge(direction.next());
        let previous = cell.has_river_through_edge(direction.previous());
        if next {
            if previous {
                RiverBankNudge::InsideCurve
            } else if cell.has_river_through_edge(direction.previous2()) {
                RiverBankNudge::TowardFirstCorner
            } else {
                RiverBankNudge::Stay
            }
        } else if previous && cell.has_river_through_edge(direction.next2()) {
            RiverBankNudge::TowardSecondCorner
        } else {
            RiverBankNudge::Stay
        }
    }
}

impl<'a> Triangulator<'a> {
    pub(super) fn triangulate_with_river_begin_or_end(
        &mut self,
        cell: &HexCell,
        center: Vec3,
        edge: &EdgeVertices,
    ) {
        let m = self.metrics;
        let terrain_type = cell.terrain_type();
        let mut m_edge = EdgeVertices::new(
            center.lerp(edge.v1, 0.5),
            center.lerp(edge.v5, 0.5),
            m.edge_outer_step(),
        );
        m_edge.v3.y = edge.v3.y;

        self.triangulate_edge_strip(&m_edge, COLOR1, terrain_type, edge, COLOR1, terrain_type, false);
        self.triangulate_edge_fan(center, &m_edge, terrain_type);

        if cell.is_underwater() {
            return;
        }

        let reversed = cell.has_incoming_river();
        let surface = cell.river_surface_y(m);
        self.triangulate_river_quad(m_edge.v2, m_edge.v4, edge.v2, edge.v4, surface, surface, 0.6, reversed);

        let mut tip = center;
        let mut left = m_edge.v2;
        let mut right = m_edge.v4;
        tip.y = surface;
        left.y = surface;
        right.y = surface;

        let rivers = &mut self.meshes.rivers;
        rivers.add_triangle(m, tip, left, right);
        if reversed {
            rivers.add_triangle_uv(Vec2::new(0.5, 0.4), Vec2::new(1.0, 0.2), Vec2::new(0.0, 0.2));
        } else {
            rivers.add_triangle_uv(Vec2::new(0.5, 0.4), Vec2::new(0.0, 0.6), Vec2::new(1.0, 0.6));
        }
    }

    pub(super) fn triangulate_with_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        edge: &EdgeVertices,
    ) {
        let m = self.metrics;
        let (center_l, center_r) = match RiverChannel::classify(cell, direction) {
            RiverChannel::Straight => (
                center + m.first_solid_corner(direction.previous()) * 0.25,
                center + m.second_solid_corner(direction.next()) * 0.25,
            ),
            RiverChannel::SharpTurnNext => (center, center.lerp(edge.v5, 2.0 / 3.0)),
            RiverChannel::SharpTurnPrevious => (center.lerp(edge.v1, 2.0 / 3.0), center),
            RiverChannel::SmoothTurnNext => (
                center,
                center + m.solid_edge_middle(direction.next()) * (0.5 * INNER_TO_OUTER),
            ),
            RiverChannel::SmoothTurnPrevious => (
                center + m.solid_edge_middle(direction.previous()) * (0.5 * INNER_TO_OUTER),
                center,
            ),
            RiverChannel::Isolated => (center, center),
        };

        let stream_bed = cell.stream_bed_y(m);
        let mut center = center;
        center.y = stream_bed;
        let mut m_edge = EdgeVertices::new(
            center_l.lerp(edge.v1, 0.5),
            center_r.lerp(edge.v5, 0.5),
            m.edge_outer_step(),
        );
        m_edge.v3.y = stream_bed;

        let terrain_type = cell.terrain_type();
        self.triangulate_edge_strip(&m_edge, COLOR1, terrain_type, edge, COLOR1, terrain_type, false);

        let types = Vec3::splat(terrain_type);
        let terrain = &mut self.meshes.terrain;
        terrain.add_triangle(m, center_l, m_edge.v1, m_edge.v2);
        terrain.add_triangle_color(COLOR1);
        terrain.add_triangle_terrain_types(types);
        terrain.add_quad(m, center_l, center, m_edge.v2, m_edge.v3);
        terrain.add_quad_color(COLOR1);
        terrain.add_quad_terrain_types(types);
        terrain.add_quad(m, center, center_r, m_edge.v3, m_edge.v4);
        terrain.add_quad_color(COLOR1);
        terrain.add_quad_terrain_types(types);
        terrain.add_triangle(m, center_r, m_edge.v4, m_edge.v5);
        terrain.add_triangle_color(COLOR1);
        terrain.add_triangle_terrain_types(types);

        if !cell.is_underwater() {
            let reversed = cell.has_incoming_river_through(direction);
            let surface = cell.river_surface_y(m);
            self.triangulate_river_quad(center_l, center_r, m_edge.v2, m_edge.v4, surface, surface, 0.4, reversed);
            self.triangulate_river_quad(m_edge.v2, m_edge.v4, edge.v2, edge.v4, surface, surface, 0.6, reversed);
        }
    }

    pub(super) fn triangulate_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        edge: &EdgeVertices,
    ) {
        let m = self.metrics;
        if cell.has_roads() {
            self.triangulate_road_adjacent_to_river(direction, cell, center, edge);
        }

        let center = center
            + match RiverBankNudge::classify(cell, direction) {
                RiverBankNudge::Stay => Vec3::ZERO,
                RiverBankNudge::InsideCurve => m.solid_edge_middle(direction) * (0.5 * INNER_TO_OUTER),
                RiverBankNudge::TowardFirstCorner => m.first_solid_corner(direction) * 0.25,
                RiverBankNudge::TowardSecondCorner => m.second_solid_corner(direction) * 0.25,
            };

        let m_edge = EdgeVertices::new(
            center.lerp(edge.v1, 0.5),
            center.lerp(edge.v5, 0.5),
            m.edge_outer_step(),
        );
        let terrain_type = cell.terrain_type();
        self.triangulate_edge_strip(&m_edge, COLOR1, terrain_type, edge, COLOR1, terrain_type, false);
        self.triangulate_edge_fan(center, &m_edge, terrain_type);
    }

    /// A perturbed river surface quad; `v` is the flow coordinate of the
    /// near side, the far side sits 0.2 further downstream.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn triangulate_river_quad(
        &mut self,
        mut v1: Vec3,
        mut v2: Vec3,
        mut v3: Vec3,
        mut v4: Vec3,
        y1: f32,
        y2: f32,
        v: f32,
        reversed: bool,
    ) {
        v1.y = y1;
        v2.y = y1;
        v3.y = y2;
        v4.y = y2;
        let rivers = &mut self.meshes.rivers;
        rivers.add_quad(self.metrics, v1, v2, v3, v4);
        if reversed {
            rivers.add_quad_uv_rect(1.0, 0.0, 0.8 - v, 0.6 - v);
        } else {
            rivers.add_quad_uv_rect(0.0, 1.0, v, v + 0.2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::HexCoordinates;
    use HexDirection::*;

    fn river_cell(incoming: Option<HexDirection>, outgoing: Option<HexDirection>) -> HexCell {
        let mut cell = HexCell::new(0, HexCoordinates::new(0, 0), 0, Vec3::ZERO);
        cell.incoming_river = incoming;
        cell.outgoing_river = outgoing;
        cell
    }

    #[test]
    fn test_channel_shapes() {
        let straight = river_cell(Some(W), Some(E));
        assert_eq!(RiverChannel::classify(&straight, E), RiverChannel::Straight);
        assert_eq!(RiverChannel::classify(&straight, W), RiverChannel::Straight);

        let sharp = river_cell(Some(E), Some(SE));
        assert_eq!(RiverChannel::classify(&sharp, E), RiverChannel::SharpTurnNext);
        assert_eq!(RiverChannel::classify(&sharp, SE), RiverChannel::SharpTurnPrevious);

        let smooth = river_cell(Some(NE), Some(SE));
        assert_eq!(RiverChannel::classify(&smooth, NE), RiverChannel::SmoothTurnNext);
        assert_eq!(RiverChannel::classify(&smooth, SE), RiverChannel::SmoothTurnPrevious);

        let source = river_cell(None, Some(NE));
        assert_eq!(RiverChannel::classify(&source, NE), RiverChannel::Isolated);
    }

    #[test]
    fn test_bank_nudges() {
        // River bends around E through NE and SE.
        let curve = river_cell(Some(NE), Some(SE));
        assert_eq!(RiverBankNudge::classify(&curve, E), RiverBankNudge::InsideCurve);
        assert_eq!(RiverBankNudge::classify(&curve, W), RiverBankNudge::Stay);

        // Straight river: the wedges beside it are pushed off the channel.
        let straight = river_cell(Some(W), Some(E));
        assert_eq!(RiverBankNudge::classify(&straight, NE), RiverBankNudge::TowardFirstCorner);
        assert_eq!(RiverBankNudge::classify(&straight, SW), RiverBankNudge::TowardFirstCorner);
        assert_eq!(RiverBankNudge::classify(&straight, NW), RiverBankNudge::TowardSecondCorner);
        assert_eq!(RiverBankNudge::classify(&straight, SE), RiverBankNudge::TowardSecondCorner);
    }
}
