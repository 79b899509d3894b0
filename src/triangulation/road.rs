//! Roads: segments across edges, center pieces, and the detours roads take
//! around a river running through the same cell.

use glam::{Vec2, Vec3};

use super::Triangulator;
use crate::cell::HexCell;
use crate::direction::HexDirection;
use crate::edge::EdgeVertices;
use crate::metrics::INNER_TO_OUTER;

/// Interpolators pulling the road's edge-side vertices toward the cell center.
///
/// A road through `direction` uses the half-way points. Otherwise each side
/// only widens to half when the road continues through that neighboring edge.
pub fn road_interpolators(direction: HexDirection, cell: &HexCell) -> Vec2 {
    if cell.has_road_through_edge(direction) {
        Vec2::splat(0.5)
    } else {
        let x = if cell.has_road_through_edge(direction.previous()) { 0.5 } else { 0.25 };
        let y = if cell.has_road_through_edge(direction.next()) { 0.5 } else { 0.25 };
        Vec2::new(x, y)
    }
}

/// Relation of a cell's river to one of its river-free edges, as seen by a road.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoadRiverLayout {
    /// Source or sink; the road center is pushed away from the river edge.
    BeginOrEnd { river: HexDirection },
    /// The river splits the cell in two halves.
    Straight,
    /// Sharp turn with the incoming edge just before the outgoing one.
    ZigZagPrevious { incoming: HexDirection },
    /// Sharp turn with the incoming edge just after the outgoing one.
    ZigZagNext { incoming: HexDirection },
    /// River on both neighboring edges of this one.
    InsideCurve,
    /// Gentle turn seen from its outer side; `middle` is the edge the road bulges toward.
    OutsideCurve { middle: HexDirection },
}

impl RoadRiverLayout {
    pub fn classify(cell: &HexCell, direction: HexDirection) -> Self {
        let previous = cell.has_river_through_edge(direction.previous());
        let next = cell.has_river_through_edge(direction.next());
        let (Some(incoming), Some(outgoing)) = (cell.incoming_river(), cell.outgoing_river()) else {
            return RoadRiverLayout::BeginOrEnd {
                river: cell.river_begin_or_end_direction().unwrap_or(direction.opposite()),
            };
        };

        if incoming == outgoing.opposite() {
            RoadRiverLayout::Straight
        } else if incoming == outgoing.previous() {
            RoadRiverLayout::ZigZagPrevious { incoming }
        } else if incoming == outgoing.next() {
            RoadRiverLayout::ZigZagNext { incoming }
        } else if previous && next {
            RoadRiverLayout::InsideCurve
        } else {
            let middle = if previous {
                direction.next()
            } else if next {
                direction.previous()
            } else {
                direction
            };
            RoadRiverLayout::OutsideCurve { middle }
        }
    }
}

impl<'a> Triangulator<'a> {
    /// Two quads across an edge connection; the road center line is v2..v5.
    pub(super) fn triangulate_road_segment(
        &mut self,
        v1: Vec3,
        v2: Vec3,
        v3: Vec3,
        v4: Vec3,
        v5: Vec3,
        v6: Vec3,
    ) {
        let m = self.metrics;
        let roads = &mut self.meshes.roads;
        roads.add_quad(m, v1, v2, v4, v5);
        roads.add_quad(m, v2, v3, v5, v6);
        roads.add_quad_uv_rect(0.0, 1.0, 0.0, 0.0);
        roads.add_quad_uv_rect(1.0, 0.0, 0.0, 0.0);
    }

    pub(super) fn triangulate_road(
        &mut self,
        center: Vec3,
        m_l: Vec3,
        m_r: Vec3,
        edge: &EdgeVertices,
        has_road_through_edge: bool,
    ) {
        if has_road_through_edge {
            let m = self.metrics;
            let m_c = m_l.lerp(m_r, 0.5);
            self.triangulate_road_segment(m_l, m_c, m_r, edge.v2, edge.v3, edge.v4);

            let roads = &mut self.meshes.roads;
            roads.add_triangle(m, center, m_l, m_c);
            roads.add_triangle(m, center, m_c, m_r);
            roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
            roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0));
        } else {
            self.triangulate_road_edge(center, m_l, m_r);
        }
    }

    /// Fades the road out toward an edge it doesn't cross.
    pub(super) fn triangulate_road_edge(&mut self, center: Vec3, m_l: Vec3, m_r: Vec3) {
        let roads = &mut self.meshes.roads;
        roads.add_triangle(self.metrics, center, m_l, m_r);
        roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));
    }

    pub(super) fn triangulate_road_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        edge: &EdgeVertices,
    ) {
        let m = self.metrics;
        let has_road_through_edge = cell.has_road_through_edge(direction);
        let previous_has_river = cell.has_river_through_edge(direction.previous());
        let next_has_river = cell.has_river_through_edge(direction.next());
        let interpolators = road_interpolators(direction, cell);

        let mut road_center = center;
        let mut center = center;

        match RoadRiverLayout::classify(cell, direction) {
            RoadRiverLayout::BeginOrEnd { river } => {
                road_center += m.solid_edge_middle(river.opposite()) * (1.0 / 3.0);
            }
            RoadRiverLayout::Straight => {
                let corner = if previous_has_river {
                    if !has_road_through_edge && !cell.has_road_through_edge(direction.next()) {
                        return;
                    }
                    m.second_solid_corner(direction)
                } else {
                    if !has_road_through_edge && !cell.has_road_through_edge(direction.previous()) {
                        return;
                    }
                    m.first_solid_corner(direction)
                };
                road_center += corner * 0.5;
                center += corner * 0.25;
            }
            RoadRiverLayout::ZigZagPrevious { incoming } => {
                road_center -= m.second_corner(incoming) * 0.2;
            }
            RoadRiverLayout::ZigZagNext { incoming } => {
                road_center -= m.first_corner(incoming) * 0.2;
            }
            RoadRiverLayout::InsideCurve => {
                if !has_road_through_edge {
                    return;
                }
                let offset = m.solid_edge_middle(direction) * INNER_TO_OUTER;
                road_center += offset * 0.7;
                center += offset * 0.5;
            }
            RoadRiverLayout::OutsideCurve { middle } => {
                if !cell.has_road_through_edge(middle)
                    && !cell.has_road_through_edge(middle.previous())
                    && !cell.has_road_through_edge(middle.next())
                {
                    return;
                }
                road_center += m.solid_edge_middle(middle) * 0.25;
            }
        }

        let m_l = road_center.lerp(edge.v1, interpolators.x);
        let m_r = road_center.lerp(edge.v5, interpolators.y);
        self.triangulate_road(road_center, m_l, m_r, edge, has_road_through_edge);
        if previous_has_river {
            self.triangulate_road_edge(road_center, center, m_l);
        }
        if next_has_river {
            self.triangulate_road_edge(road_center, m_r, center);
        }
    }
}
