//! Triangulation engine.
//!
//! For every cell and each of its six directions the engine picks an edge
//! interior treatment, stitches the cell to the neighbors it owns (NE, E, SE)
//! and fills the corners it owns (NE, E). Each decision is made by a small
//! classifier returning a tagged variant; the emit routines then match on it.
//!
//! Terrain vertices carry splat colors (`COLOR1..3`) selecting which of the
//! up-to-three terrain types in their `terrain_types` vector to show.

mod connection;
mod corner;
mod river;
mod road;
mod water;

use glam::{Vec3, Vec4};

use crate::cell::{CellIndex, HexCell};
use crate::chunk::ChunkMeshes;
use crate::direction::HexDirection;
use crate::edge::EdgeVertices;
use crate::metrics::HexMetrics;

pub use connection::RiverCrossing;
pub use corner::{classify_corner, CornerKind};
pub use river::{RiverBankNudge, RiverChannel};
pub use road::{road_interpolators, RoadRiverLayout};

pub const COLOR1: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
pub const COLOR2: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);
pub const COLOR3: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

/// How the wedge between a cell center and one of its edges is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeInterior {
    /// No river anywhere in the cell: plain fan, optionally with a road.
    Plain,
    /// River source or sink through this edge.
    RiverBeginOrEnd,
    /// River passes through this edge and another one.
    RiverThrough,
    /// The cell has a river, but not through this edge.
    AdjacentToRiver,
}

impl EdgeInterior {
    pub fn classify(cell: &HexCell, direction: HexDirection) -> Self {
        if !cell.has_river() {
            EdgeInterior::Plain
        } else if cell.has_river_through_edge(direction) {
            if cell.has_river_begin_or_end() {
                EdgeInterior::RiverBeginOrEnd
            } else {
                EdgeInterior::RiverThrough
            }
        } else {
            EdgeInterior::AdjacentToRiver
        }
    }
}

/// Writes the geometry of individual cells into one chunk's meshes.
pub struct Triangulator<'a> {
    cells: &'a [HexCell],
    metrics: &'a HexMetrics,
    meshes: &'a mut ChunkMeshes,
}

impl<'a> Triangulator<'a> {
    pub fn new(cells: &'a [HexCell], metrics: &'a HexMetrics, meshes: &'a mut ChunkMeshes) -> Self {
        Self {
            cells,
            metrics,
            meshes,
        }
    }

    fn neighbor(&self, cell: &HexCell, direction: HexDirection) -> Option<&'a HexCell> {
        let cells = self.cells;
        cell.neighbor(direction).map(|index| &cells[index])
    }

    /// Append all geometry of one cell. The meshes are not cleared or applied.
    pub fn triangulate_cell(&mut self, index: CellIndex) {
        let cells = self.cells;
        let cell = &cells[index];
        for direction in HexDirection::ALL {
            self.triangulate_direction(direction, cell);
        }
    }

    fn triangulate_direction(&mut self, direction: HexDirection, cell: &'a HexCell) {
        let m = self.metrics;
        let center = cell.position();
        let mut edge = EdgeVertices::new(
            center + m.first_solid_corner(direction),
            center + m.second_solid_corner(direction),
            m.edge_outer_step(),
        );

        match EdgeInterior::classify(cell, direction) {
            EdgeInterior::Plain => self.triangulate_without_river(direction, cell, center, &edge),
            EdgeInterior::RiverBeginOrEnd => {
                edge.v3.y = cell.stream_bed_y(m);
                self.triangulate_with_river_begin_or_end(cell, center, &edge);
            }
            EdgeInterior::RiverThrough => {
                edge.v3.y = cell.stream_bed_y(m);
                self.triangulate_with_river(direction, cell, center, &edge);
            }
            EdgeInterior::AdjacentToRiver => {
                self.triangulate_adjacent_to_river(direction, cell, center, &edge)
            }
        }

        if direction <= HexDirection::SE {
            self.triangulate_connection(direction, cell, &edge);
        }

        if cell.is_underwater() {
            self.triangulate_water(direction, cell, center);
        }
    }

    fn triangulate_without_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        edge: &EdgeVertices,
    ) {
        self.triangulate_edge_fan(center, edge, cell.terrain_type());

        if cell.has_roads() {
            let interpolators = road_interpolators(direction, cell);
            self.triangulate_road(
                center,
                center.lerp(edge.v1, interpolators.x),
                center.lerp(edge.v5, interpolators.y),
                edge,
                cell.has_road_through_edge(direction),
            );
        }
    }

    /// Four triangles from `center` to the edge points.
    fn triangulate_edge_fan(&mut self, center: Vec3, edge: &EdgeVertices, terrain_type: f32) {
        let m = self.metrics;
        let terrain = &mut self.meshes.terrain;
        let types = Vec3::splat(terrain_type);
        for (a, b) in [(edge.v1, edge.v2), (edge.v2, edge.v3), (edge.v3, edge.v4), (edge.v4, edge.v5)] {
            terrain.add_triangle(m, center, a, b);
            terrain.add_triangle_color(COLOR1);
            terrain.add_triangle_terrain_types(types);
        }
    }

    /// Four quads bridging two parallel edges, plus a road segment on top.
    #[allow(clippy::too_many_arguments)]
    fn triangulate_edge_strip(
        &mut self,
        edge1: &EdgeVertices,
        color1: Vec4,
        type1: f32,
        edge2: &EdgeVertices,
        color2: Vec4,
        type2: f32,
        has_road: bool,
    ) {
        let m = self.metrics;
        let terrain = &mut self.meshes.terrain;
        let types = Vec3::new(type1, type2, type1);
        let pairs = [
            (edge1.v1, edge1.v2, edge2.v1, edge2.v2),
            (edge1.v2, edge1.v3, edge2.v2, edge2.v3),
            (edge1.v3, edge1.v4, edge2.v3, edge2.v4),
            (edge1.v4, edge1.v5, edge2.v4, edge2.v5),
        ];
        for (a, b, c, d) in pairs {
            terrain.add_quad(m, a, b, c, d);
            terrain.add_quad_colors2(color1, color2);
            terrain.add_quad_terrain_types(types);
        }

        if has_road {
            self.triangulate_road_segment(edge1.v2, edge1.v3, edge1.v4, edge2.v2, edge2.v3, edge2.v4);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::HexGrid;
    use crate::metrics::MetricsConfig;
    use glam::Vec2;

    /// Grid with one cell per chunk so each cell's output can be inspected alone.
    fn grid(cells_x: usize, cells_z: usize) -> HexGrid {
        let config = MetricsConfig {
            chunk_size_x: 1,
            chunk_size_z: 1,
            ..Default::default()
        };
        HexGrid::with_cell_counts(cells_x, cells_z, HexMetrics::new(config)).unwrap()
    }

    fn meshes(grid: &mut HexGrid, cell: CellIndex) -> ChunkMeshes {
        grid.refresh();
        let chunk = grid.cells()[cell].chunk();
        grid.chunk(chunk).unwrap().meshes().clone()
    }

    fn assert_only_terrain(meshes: &ChunkMeshes) {
        assert!(meshes.rivers.is_empty());
        assert!(meshes.roads.is_empty());
        assert!(meshes.water.is_empty());
        assert!(meshes.water_shore.is_empty());
        assert!(meshes.estuaries.is_empty());
    }

    #[test]
    fn test_edge_interior_classification() {
        let mut grid = grid(3, 3);
        let center = grid.cell_at_offset(1, 1).unwrap();
        let c = &grid.cells()[center];
        assert_eq!(EdgeInterior::classify(c, HexDirection::E), EdgeInterior::Plain);

        grid.set_outgoing_river(center, HexDirection::E).unwrap();
        let c = &grid.cells()[center];
        assert_eq!(EdgeInterior::classify(c, HexDirection::E), EdgeInterior::RiverBeginOrEnd);
        assert_eq!(EdgeInterior::classify(c, HexDirection::W), EdgeInterior::AdjacentToRiver);

        let west = grid.neighbor(center, HexDirection::W).unwrap();
        grid.set_outgoing_river(west, HexDirection::E).unwrap();
        let c = &grid.cells()[center];
        assert_eq!(EdgeInterior::classify(c, HexDirection::E), EdgeInterior::RiverThrough);
        assert_eq!(EdgeInterior::classify(c, HexDirection::W), EdgeInterior::RiverThrough);
        assert_eq!(EdgeInterior::classify(c, HexDirection::NE), EdgeInterior::AdjacentToRiver);
    }

    #[test]
    fn test_flat_connection_is_single_strip() {
        let mut grid = grid(2, 1);
        let m = meshes(&mut grid, 0);
        // Six fans of four triangles plus one strip of four quads.
        assert_eq!(m.terrain.triangle_count(), 24 + 8);
        assert_only_terrain(&m);

        let east = meshes(&mut grid, 1);
        assert_eq!(east.terrain.triangle_count(), 24);
    }

    #[test]
    fn test_slope_connection_is_terraced() {
        let mut grid = grid(2, 1);
        grid.set_elevation(1, 1).unwrap();
        let m = meshes(&mut grid, 0);
        let steps = grid.metrics().terrace_steps();
        assert_eq!(steps, 5);
        assert_eq!(m.terrain.triangle_count(), 24 + steps * 8);
        assert_only_terrain(&m);
        assert_eq!(m.terrain.colors().len(), m.terrain.vertex_count());
        assert_eq!(m.terrain.terrain_types().len(), m.terrain.vertex_count());
        assert!(m.terrain.is_applied());
    }

    #[test]
    fn test_cliff_connection_is_single_strip() {
        let mut grid = grid(2, 1);
        grid.set_elevation(1, 3).unwrap();
        let m = meshes(&mut grid, 0);
        assert_eq!(m.terrain.triangle_count(), 24 + 8);
    }

    #[test]
    fn test_shared_edges_and_corners_emitted_once() {
        let mut grid = grid(3, 3);
        grid.refresh();
        let total: usize = grid.chunks().iter().map(|c| c.meshes().terrain.triangle_count()).sum();
        // 9 fans, 16 shared edges, 8 three-cell corners.
        assert_eq!(total, 9 * 24 + 16 * 8 + 8);
    }

    #[test]
    fn test_terraced_corner() {
        let mut grid = grid(2, 2);
        // Cell 0 owns the corner with its NE (2) and E (1) neighbors.
        grid.set_elevation(1, 1).unwrap();
        grid.set_elevation(2, 1).unwrap();
        let m = meshes(&mut grid, 0);
        let steps = grid.metrics().terrace_steps();
        // Fans, two terraced edges, one corner triangle plus its quads.
        let corner = 1 + (steps - 1) * 2;
        assert_eq!(m.terrain.triangle_count(), 24 + 2 * steps * 8 + corner);
    }

    #[test]
    fn test_cliff_slope_corner() {
        let mut grid = grid(2, 2);
        grid.set_elevation(1, 1).unwrap();
        grid.set_elevation(2, 2).unwrap();
        let m = meshes(&mut grid, 0);
        let steps = grid.metrics().terrace_steps();
        // Cliff strip to NE, terraces to E; two terraced fans meet at the cliff.
        assert_eq!(m.terrain.triangle_count(), 24 + 8 + steps * 8 + 2 * steps);

        // Every corner triangle shares the boundary point halfway up the cliff.
        let y0 = grid.cells()[0].position().y;
        let y2 = grid.cells()[2].position().y;
        let corner_start = 12 + 16;
        for k in 0..2 * steps {
            let boundary = m.terrain.vertices()[corner_start + 3 * k + 2];
            assert!((boundary.y - (y0 + y2) * 0.5).abs() < 1e-3);
        }
    }

    #[test]
    fn test_slope_cliff_corner() {
        let mut grid = grid(2, 2);
        grid.set_elevation(1, 2).unwrap();
        grid.set_elevation(2, 1).unwrap();
        let m = meshes(&mut grid, 0);
        let steps = grid.metrics().terrace_steps();
        assert_eq!(m.terrain.triangle_count(), 24 + steps * 8 + 8 + 2 * steps);
    }

    #[test]
    fn test_cliff_corner_with_single_triangle_top() {
        let mut grid = grid(2, 2);
        grid.set_elevation(1, 1).unwrap();
        grid.set_elevation(2, 3).unwrap();
        let m = meshes(&mut grid, 0);
        let steps = grid.metrics().terrace_steps();
        // The top cells are a cliff apart, so the fan is closed by one triangle.
        assert_eq!(m.terrain.triangle_count(), 24 + 8 + steps * 8 + steps + 1);
    }

    #[test]
    fn test_double_cliff_corner() {
        let steps = grid(1, 1).metrics().terrace_steps();
        for (east, north_east) in [(2, 3), (3, 2)] {
            let mut grid = grid(2, 2);
            grid.set_elevation(1, east).unwrap();
            grid.set_elevation(2, north_east).unwrap();
            let m = meshes(&mut grid, 0);
            assert_eq!(m.terrain.triangle_count(), 24 + 8 + 8 + steps + 1);
        }

        // The terraces hang from the higher top cell, a third of the way down.
        let mut grid = grid(2, 2);
        grid.set_elevation(1, 2).unwrap();
        grid.set_elevation(2, 3).unwrap();
        let m = meshes(&mut grid, 0);
        let y0 = grid.cells()[0].position().y;
        let y2 = grid.cells()[2].position().y;
        let expected = y2 + (y0 - y2) / 3.0;
        let corner_start = 12 + 16;
        for k in 0..steps + 1 {
            let boundary = m.terrain.vertices()[corner_start + 3 * k + 2];
            assert!((boundary.y - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_river_source_uses_forward_uv() {
        let mut grid = grid(2, 2);
        grid.set_outgoing_river(0, HexDirection::NE).unwrap();
        assert!(grid.cells()[0].has_river_begin_or_end());
        assert!(!grid.cells()[0].has_incoming_river());

        let m = meshes(&mut grid, 0);
        // Interior quad and center triangle, then the quad across the edge.
        assert_eq!(m.rivers.triangle_count(), 2 + 1 + 2);
        let uvs = m.rivers.uvs();
        assert_eq!(
            &uvs[4..7],
            &[Vec2::new(0.5, 0.4), Vec2::new(0.0, 0.6), Vec2::new(1.0, 0.6)]
        );
        assert!(m.roads.is_empty());
        assert!(m.water.is_empty());
    }

    #[test]
    fn test_river_sink_uses_reversed_uv() {
        let mut grid = grid(2, 2);
        grid.set_outgoing_river(0, HexDirection::NE).unwrap();
        let m = meshes(&mut grid, 2);
        // The sink owns no river connection (SW > SE).
        assert_eq!(m.rivers.triangle_count(), 3);
        assert_eq!(
            &m.rivers.uvs()[4..7],
            &[Vec2::new(0.5, 0.4), Vec2::new(1.0, 0.2), Vec2::new(0.0, 0.2)]
        );
    }

    #[test]
    fn test_river_through_cell() {
        let mut grid = grid(3, 1);
        grid.set_outgoing_river(0, HexDirection::E).unwrap();
        grid.set_outgoing_river(1, HexDirection::E).unwrap();
        let m = meshes(&mut grid, 1);
        // Two river quads on each of the W and E edges plus the E connection.
        assert_eq!(m.rivers.triangle_count(), 2 * 4 + 2);
        let bed = grid.cells()[1].stream_bed_y(grid.metrics());
        assert!(m.terrain.vertices().iter().any(|v| (v.y - bed).abs() < 1e-4));
    }

    #[test]
    fn test_waterfall_meets_water_surface() {
        let mut grid = grid(2, 1);
        grid.set_elevation(0, 2).unwrap();
        grid.set_water_level(1, 1).unwrap();
        grid.set_outgoing_river(0, HexDirection::E).unwrap();
        assert_eq!(
            RiverCrossing::classify(&grid.cells()[0], &grid.cells()[1]),
            RiverCrossing::WaterfallFromCell
        );

        let m = meshes(&mut grid, 0);
        assert_eq!(m.rivers.triangle_count(), 3 + 2);
        let water_y = grid.cells()[1].water_surface_y(grid.metrics());
        let vertices = m.rivers.vertices();
        for v in &vertices[vertices.len() - 2..] {
            assert!((v.y - water_y).abs() < 1e-3);
        }
        assert_eq!(&m.rivers.uvs()[m.rivers.uvs().len() - 2..], &[Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)]);
    }

    #[test]
    fn test_river_crossing_classification() {
        let mut grid = grid(2, 1);
        let crossing = |g: &HexGrid| RiverCrossing::classify(&g.cells()[0], &g.cells()[1]);
        assert_eq!(crossing(&grid), RiverCrossing::Channel);

        grid.set_water_level(1, 1).unwrap();
        assert_eq!(crossing(&grid), RiverCrossing::Submerged);

        grid.set_water_level(1, 0).unwrap();
        grid.set_water_level(0, 2).unwrap();
        grid.set_elevation(1, 3).unwrap();
        assert_eq!(crossing(&grid), RiverCrossing::WaterfallFromNeighbor);
    }

    #[test]
    fn test_water_shore_ring() {
        let mut grid = grid(2, 1);
        grid.set_water_level(0, 1).unwrap();
        assert!(grid.cells()[0].is_underwater());

        let m = meshes(&mut grid, 0);
        assert_eq!(m.water_shore.triangle_count(), 8);
        let expected = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(0.0, 1.0)];
        for quad in m.water_shore.uvs().chunks_exact(4) {
            assert_eq!(quad, &expected);
        }
        assert!(m.estuaries.is_empty());
        // Shore fan toward E, plain triangles elsewhere.
        assert_eq!(m.water.triangle_count(), 4 + 5);

        // The dry neighbor emits no water at all.
        let dry = meshes(&mut grid, 1);
        assert!(dry.water.is_empty());
        assert!(dry.water_shore.is_empty());
    }

    #[test]
    fn test_open_water_bridges_and_corner() {
        let mut grid = grid(2, 2);
        for cell in 0..4 {
            grid.set_water_level(cell, 1).unwrap();
        }
        let m = meshes(&mut grid, 0);
        // Six fan triangles, NE and E bridges, and the corner between them.
        assert_eq!(m.water.triangle_count(), 6 + 2 * 2 + 1);
        assert!(m.water_shore.is_empty());
        let y = grid.cells()[0].water_surface_y(grid.metrics());
        assert!(m.water.vertices().iter().all(|v| (v.y - y).abs() < 1e-5));
    }

    #[test]
    fn test_estuary_replaces_shore_quads() {
        let mut grid = grid(2, 1);
        grid.set_elevation(1, 1).unwrap();
        grid.set_water_level(0, 1).unwrap();
        grid.set_outgoing_river(1, HexDirection::W).unwrap();

        let m = meshes(&mut grid, 0);
        assert_eq!(m.water_shore.triangle_count(), 2);
        assert_eq!(m.estuaries.triangle_count(), 5);
        assert_eq!(m.estuaries.uv2s().len(), m.estuaries.vertex_count());
        // Incoming river layout.
        assert_eq!(m.estuaries.uv2s()[0], Vec2::new(1.5, 1.0));
    }

    #[test]
    fn test_road_through_edge() {
        let mut grid = grid(2, 1);
        grid.add_road(0, HexDirection::E).unwrap();
        let m = meshes(&mut grid, 0);
        // Segment and center pair toward E, fading edges elsewhere, strip segment.
        assert_eq!(m.roads.triangle_count(), (4 + 2) + 5 + 4);
        assert_eq!(m.roads.uvs().len(), m.roads.vertex_count());

        let east = meshes(&mut grid, 1);
        assert_eq!(east.roads.triangle_count(), (4 + 2) + 5);
    }

    #[test]
    fn test_road_next_to_river_source() {
        let config = MetricsConfig {
            chunk_size_x: 1,
            chunk_size_z: 1,
            cell_perturb_strength: 0.0,
            ..Default::default()
        };
        let mut grid = HexGrid::with_cell_counts(3, 1, HexMetrics::new(config)).unwrap();
        grid.set_outgoing_river(1, HexDirection::E).unwrap();
        grid.add_road(1, HexDirection::W).unwrap();
        let cell = &grid.cells()[1];
        assert_eq!(
            RoadRiverLayout::classify(cell, HexDirection::W),
            RoadRiverLayout::BeginOrEnd { river: HexDirection::E }
        );

        let m = meshes(&mut grid, 1);
        assert!(!m.roads.is_empty());
        // The road center is pushed away from the river edge.
        let center = grid.cells()[1].position();
        assert!(m.roads.vertices().iter().all(|v| v.x <= center.x + 1e-3));
        assert!(m.roads.vertices().iter().any(|v| v.x < center.x - 2.0));
    }

    fn unperturbed_grid(cells_x: usize, cells_z: usize) -> HexGrid {
        let config = MetricsConfig {
            chunk_size_x: 1,
            chunk_size_z: 1,
            cell_perturb_strength: 0.0,
            elevation_perturb_strength: 0.0,
            ..Default::default()
        };
        HexGrid::with_cell_counts(cells_x, cells_z, HexMetrics::new(config)).unwrap()
    }

    /// Center cell of a 3x3 grid with a river entering through `incoming`
    /// and leaving through `outgoing`.
    fn river_cell(incoming: HexDirection, outgoing: HexDirection) -> (HexGrid, CellIndex) {
        let mut grid = unperturbed_grid(3, 3);
        let cell = grid.cell_at_offset(1, 1).unwrap();
        let upstream = grid.neighbor(cell, incoming).unwrap();
        grid.set_outgoing_river(upstream, incoming.opposite()).unwrap();
        grid.set_outgoing_river(cell, outgoing).unwrap();
        (grid, cell)
    }

    #[test]
    fn test_road_beside_straight_river_stays_on_its_side() {
        use HexDirection::*;
        let (mut grid, cell) = river_cell(W, E);
        grid.add_road(cell, NE).unwrap();
        assert_eq!(RoadRiverLayout::classify(&grid.cells()[cell], NE), RoadRiverLayout::Straight);

        let m = meshes(&mut grid, cell);
        // NE: segment, center pair, side triangle. NW: fading edge and side
        // triangle. The southern half has no road and stays empty.
        assert_eq!(m.roads.triangle_count(), 7 + 2 + 4);
        let center = grid.cells()[cell].position();
        assert!(m.roads.vertices().iter().all(|v| v.z > center.z + 1.0));
    }

    #[test]
    fn test_road_inside_river_curve() {
        use HexDirection::*;
        let (mut grid, cell) = river_cell(NE, SE);
        grid.add_road(cell, W).unwrap();
        assert_eq!(RoadRiverLayout::classify(&grid.cells()[cell], E), RoadRiverLayout::InsideCurve);
        // No road through E: the inside of the curve is skipped.
        assert_eq!(meshes(&mut grid, cell).roads.triangle_count(), 6 + 2 + 2);

        grid.add_road(cell, E).unwrap();
        assert_eq!(meshes(&mut grid, cell).roads.triangle_count(), 6 + 2 + 2 + 8 + 4);
    }

    #[test]
    fn test_road_outside_river_curve_skipped_without_nearby_roads() {
        use HexDirection::*;
        let (mut grid, cell) = river_cell(NE, SE);
        grid.add_road(cell, E).unwrap();
        let c = &grid.cells()[cell];
        for d in [W, NW, SW] {
            assert_eq!(RoadRiverLayout::classify(c, d), RoadRiverLayout::OutsideCurve { middle: W });
        }
        // Only the inside of the curve and the segment across E.
        assert_eq!(meshes(&mut grid, cell).roads.triangle_count(), 8 + 4);
    }

    #[test]
    fn test_road_center_moves_away_from_zig_zag() {
        use HexDirection::*;
        let (mut grid, cell) = river_cell(NE, E);
        grid.add_road(cell, W).unwrap();
        assert_eq!(
            RoadRiverLayout::classify(&grid.cells()[cell], W),
            RoadRiverLayout::ZigZagPrevious { incoming: NE }
        );
        let m = meshes(&mut grid, cell);
        assert_eq!(m.roads.triangle_count(), 2 + 1 + 6 + 2);
        let road_center = grid.cells()[cell].position() - grid.metrics().second_corner(NE) * 0.2;
        assert!(m.roads.vertices().iter().any(|v| (*v - road_center).length() < 1e-3));

        let (mut grid, cell) = river_cell(SE, E);
        grid.add_road(cell, W).unwrap();
        assert_eq!(
            RoadRiverLayout::classify(&grid.cells()[cell], W),
            RoadRiverLayout::ZigZagNext { incoming: SE }
        );
        let m = meshes(&mut grid, cell);
        assert_eq!(m.roads.triangle_count(), 2 + 1 + 6 + 2);
        let road_center = grid.cells()[cell].position() - grid.metrics().first_corner(SE) * 0.2;
        assert!(m.roads.vertices().iter().any(|v| (*v - road_center).length() < 1e-3));
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let mut grid = grid(2, 2);
        grid.set_elevation(3, 1).unwrap();
        grid.add_road(0, HexDirection::E).unwrap();
        let first = meshes(&mut grid, 0);
        grid.triangulate_chunk(grid.cells()[0].chunk());
        let second = grid.chunk(0).unwrap().meshes().clone();
        assert_eq!(first.terrain.vertices(), second.terrain.vertices());
        assert_eq!(first.roads.triangles(), second.roads.triangles());
    }
}
