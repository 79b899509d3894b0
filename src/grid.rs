//! Hex grid arena.
//!
//! All cells of a map live in one `Vec`, indexed row-major by offset
//! coordinates. Neighbors and owning chunks are referred to by index, so
//! the grid is the only owner of cell state and the single entry point for
//! edits. Edits keep river and road flags mirrored across shared edges and
//! mark the affected chunks dirty; [`HexGrid::refresh`] then rebuilds them.

use glam::Vec3;
use log::{debug, trace};
use rayon::prelude::*;

use crate::cell::{CellIndex, HexCell};
use crate::chunk::HexGridChunk;
use crate::coordinates::HexCoordinates;
use crate::direction::HexDirection;
use crate::edge::EdgeType;
use crate::error::{EditError, GridError};
use crate::metrics::HexMetrics;

pub struct HexGrid {
    metrics: HexMetrics,
    cell_count_x: usize,
    cell_count_z: usize,
    chunk_count_x: usize,
    chunk_count_z: usize,
    cells: Vec<HexCell>,
    chunks: Vec<HexGridChunk>,
}

impl HexGrid {
    /// Create a flat, dry grid of `chunk_count_x * chunk_count_z` chunks.
    pub fn new(chunk_count_x: usize, chunk_count_z: usize, metrics: HexMetrics) -> Result<Self, GridError> {
        let cells_x = chunk_count_x * metrics.chunk_size_x();
        let cells_z = chunk_count_z * metrics.chunk_size_z();
        Self::with_cell_counts(cells_x, cells_z, metrics)
    }

    /// Create a grid from cell counts, which must be positive multiples of the chunk size.
    pub fn with_cell_counts(cells_x: usize, cells_z: usize, metrics: HexMetrics) -> Result<Self, GridError> {
        let chunk_x = metrics.chunk_size_x();
        let chunk_z = metrics.chunk_size_z();
        if cells_x == 0 || cells_z == 0 || cells_x % chunk_x != 0 || cells_z % chunk_z != 0 {
            return Err(GridError::UnsupportedMapSize {
                cells_x,
                cells_z,
                chunk_x,
                chunk_z,
            });
        }

        let chunk_count_x = cells_x / chunk_x;
        let chunk_count_z = cells_z / chunk_z;
        let mut grid = Self {
            metrics,
            cell_count_x: cells_x,
            cell_count_z: cells_z,
            chunk_count_x,
            chunk_count_z,
            cells: Vec::with_capacity(cells_x * cells_z),
            chunks: (0..chunk_count_x * chunk_count_z).map(HexGridChunk::new).collect(),
        };

        for z in 0..cells_z {
            for x in 0..cells_x {
                grid.create_cell(x, z);
            }
        }

        debug!(
            "Created hex grid: {}x{} cells in {}x{} chunks",
            cells_x, cells_z, chunk_count_x, chunk_count_z
        );
        Ok(grid)
    }

    fn create_cell(&mut self, x: usize, z: usize) {
        let index = self.cells.len();
        let width = self.cell_count_x;
        let inner = self.metrics.inner_radius();
        let outer = self.metrics.outer_radius();

        let mut position = Vec3::new(
            (x * 2 + z % 2) as f32 * inner,
            0.0,
            z as f32 * 1.5 * outer,
        );
        position.y = self.metrics.elevation_jitter(position);

        let chunk_x = x / self.metrics.chunk_size_x();
        let chunk_z = z / self.metrics.chunk_size_z();
        let chunk = chunk_x + chunk_z * self.chunk_count_x;
        let local = (x - chunk_x * self.metrics.chunk_size_x())
            + (z - chunk_z * self.metrics.chunk_size_z()) * self.metrics.chunk_size_x();

        let coordinates = HexCoordinates::from_offset(x as i32, z as i32);
        self.cells.push(HexCell::new(index, coordinates, chunk, position));
        self.chunks[chunk].add_cell(local, index);

        if x > 0 {
            self.link(index, HexDirection::W, index - 1);
        }
        if z > 0 {
            if z % 2 == 0 {
                self.link(index, HexDirection::SE, index - width);
                if x > 0 {
                    self.link(index, HexDirection::SW, index - width - 1);
                }
            } else {
                self.link(index, HexDirection::SW, index - width);
                if x < width - 1 {
                    self.link(index, HexDirection::SE, index - width + 1);
                }
            }
        }
    }

    fn link(&mut self, cell: CellIndex, direction: HexDirection, other: CellIndex) {
        self.cells[cell].neighbors[direction.index()] = Some(other);
        self.cells[other].neighbors[direction.opposite().index()] = Some(cell);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn metrics(&self) -> &HexMetrics {
        &self.metrics
    }

    pub fn cell_count_x(&self) -> usize {
        self.cell_count_x
    }

    pub fn cell_count_z(&self) -> usize {
        self.cell_count_z
    }

    pub fn chunk_count_x(&self) -> usize {
        self.chunk_count_x
    }

    pub fn chunk_count_z(&self) -> usize {
        self.chunk_count_z
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    pub fn cell(&self, index: CellIndex) -> Option<&HexCell> {
        self.cells.get(index)
    }

    pub fn chunks(&self) -> &[HexGridChunk] {
        &self.chunks
    }

    pub fn chunk(&self, index: usize) -> Option<&HexGridChunk> {
        self.chunks.get(index)
    }

    pub fn cell_at_offset(&self, column: usize, row: usize) -> Option<CellIndex> {
        (column < self.cell_count_x && row < self.cell_count_z).then(|| column + row * self.cell_count_x)
    }

    pub fn cell_at(&self, coordinates: HexCoordinates) -> Option<CellIndex> {
        let (column, row) = coordinates.to_offset();
        if column < 0 || row < 0 {
            return None;
        }
        self.cell_at_offset(column as usize, row as usize)
    }

    /// Cell under a grid-local position, ignoring height.
    pub fn cell_at_position(&self, position: Vec3) -> Option<CellIndex> {
        self.cell_at(HexCoordinates::from_position(position, &self.metrics))
    }

    /// Neighbor of `cell` towards `direction`, if both exist.
    pub fn neighbor(&self, cell: CellIndex, direction: HexDirection) -> Option<CellIndex> {
        self.cells.get(cell).and_then(|c| c.neighbor(direction))
    }

    fn check(&self, index: CellIndex) -> Result<(), GridError> {
        if index < self.cells.len() {
            Ok(())
        } else {
            Err(GridError::CellOutOfRange {
                index,
                count: self.cells.len(),
            })
        }
    }

    // =========================================================================
    // Cell properties
    // =========================================================================

    pub fn set_elevation(&mut self, index: CellIndex, elevation: i32) -> Result<(), EditError> {
        self.check(index)?;
        if elevation < 0 {
            return Err(EditError::NegativeTier {
                cell: index,
                tier: elevation,
            });
        }
        if self.cells[index].elevation == elevation {
            return Ok(());
        }

        self.cells[index].elevation = elevation;
        self.refresh_position(index);
        self.validate_rivers(index);

        for direction in HexDirection::ALL {
            if self.cells[index].has_road_through_edge(direction)
                && self.edge_type(index, direction) == Some(EdgeType::Cliff)
            {
                debug!("Removing road {} of cell {}: edge became a cliff", direction, index);
                self.set_road(index, direction, false);
            }
        }

        self.mark_dirty_with_neighbors(index);
        Ok(())
    }

    pub fn set_water_level(&mut self, index: CellIndex, water_level: i32) -> Result<(), EditError> {
        self.check(index)?;
        if water_level < 0 {
            return Err(EditError::NegativeTier {
                cell: index,
                tier: water_level,
            });
        }
        if self.cells[index].water_level == water_level {
            return Ok(());
        }
        self.cells[index].water_level = water_level;
        self.validate_rivers(index);
        self.mark_dirty_with_neighbors(index);
        Ok(())
    }

    pub fn set_terrain_type_index(&mut self, index: CellIndex, terrain_type: u8) -> Result<(), EditError> {
        self.check(index)?;
        if self.cells[index].terrain_type_index != terrain_type {
            self.cells[index].terrain_type_index = terrain_type;
            self.mark_dirty_with_neighbors(index);
        }
        Ok(())
    }

    fn refresh_position(&mut self, index: CellIndex) {
        let metrics = &self.metrics;
        let cell = &mut self.cells[index];
        let mut position = cell.position;
        position.y = metrics.elevation_y(cell.elevation) + metrics.elevation_jitter(position);
        cell.position = position;
    }

    fn edge_type(&self, index: CellIndex, direction: HexDirection) -> Option<EdgeType> {
        let cell = &self.cells[index];
        cell.neighbor(direction).map(|n| cell.edge_type_to(&self.cells[n]))
    }

    // =========================================================================
    // Rivers
    // =========================================================================

    /// A river may flow downhill, along flat ground, or out of a lake whose
    /// surface sits at the neighbor's elevation.
    pub fn is_valid_river_destination(&self, from: CellIndex, to: CellIndex) -> bool {
        match (self.cells.get(from), self.cells.get(to)) {
            (Some(from), Some(to)) => {
                from.elevation >= to.elevation || from.water_level == to.elevation
            }
            _ => false,
        }
    }

    fn validate_rivers(&mut self, index: CellIndex) {
        let cell = &self.cells[index];
        if let Some(out) = cell.outgoing_river {
            let valid = cell
                .neighbor(out)
                .is_some_and(|n| self.is_valid_river_destination(index, n));
            if !valid {
                debug!("Removing outgoing river {} of cell {}", out, index);
                self.remove_outgoing_river(index);
            }
        }

        let cell = &self.cells[index];
        if let Some(incoming) = cell.incoming_river {
            let valid = cell
                .neighbor(incoming)
                .is_some_and(|n| self.is_valid_river_destination(n, index));
            if !valid {
                debug!("Removing incoming river {} of cell {}", incoming, index);
                self.remove_incoming_river(index);
            }
        }
    }

    /// Start or redirect the river leaving `index` through `direction`.
    pub fn set_outgoing_river(&mut self, index: CellIndex, direction: HexDirection) -> Result<(), EditError> {
        self.check(index)?;
        if self.cells[index].outgoing_river == Some(direction) {
            return Ok(());
        }

        let neighbor = self.cells[index]
            .neighbor(direction)
            .ok_or(EditError::MissingNeighbor {
                cell: index,
                direction,
            })?;
        if !self.is_valid_river_destination(index, neighbor) {
            debug!("Rejected river from cell {} to cell {}", index, neighbor);
            return Err(EditError::InvalidRiverDestination {
                from: index,
                to: neighbor,
            });
        }

        self.remove_outgoing_river(index);
        if self.cells[index].incoming_river == Some(direction) {
            self.remove_incoming_river(index);
        }
        self.cells[index].outgoing_river = Some(direction);

        self.remove_incoming_river(neighbor);
        self.cells[neighbor].incoming_river = Some(direction.opposite());

        self.set_road(index, direction, false);
        self.mark_dirty(index);
        self.mark_dirty(neighbor);
        Ok(())
    }

    pub fn remove_outgoing_river(&mut self, index: CellIndex) {
        let Some(direction) = self.cells.get(index).and_then(|c| c.outgoing_river) else {
            return;
        };
        self.cells[index].outgoing_river = None;
        self.mark_dirty(index);

        if let Some(neighbor) = self.cells[index].neighbor(direction) {
            self.cells[neighbor].incoming_river = None;
            self.mark_dirty(neighbor);
        }
    }

    pub fn remove_incoming_river(&mut self, index: CellIndex) {
        let Some(direction) = self.cells.get(index).and_then(|c| c.incoming_river) else {
            return;
        };
        self.cells[index].incoming_river = None;
        self.mark_dirty(index);

        if let Some(neighbor) = self.cells[index].neighbor(direction) {
            self.cells[neighbor].outgoing_river = None;
            self.mark_dirty(neighbor);
        }
    }

    pub fn remove_river(&mut self, index: CellIndex) {
        self.remove_outgoing_river(index);
        self.remove_incoming_river(index);
    }

    // =========================================================================
    // Roads
    // =========================================================================

    pub fn add_road(&mut self, index: CellIndex, direction: HexDirection) -> Result<(), EditError> {
        self.check(index)?;
        let cell = &self.cells[index];
        if cell.neighbor(direction).is_none() {
            return Err(EditError::MissingNeighbor {
                cell: index,
                direction,
            });
        }
        if cell.has_river_through_edge(direction) {
            return Err(EditError::RoadOverRiver {
                cell: index,
                direction,
            });
        }
        if self.edge_type(index, direction) == Some(EdgeType::Cliff) {
            return Err(EditError::RoadOverCliff {
                cell: index,
                direction,
            });
        }
        if !cell.has_road_through_edge(direction) {
            self.set_road(index, direction, true);
        }
        Ok(())
    }

    pub fn remove_roads(&mut self, index: CellIndex) {
        let Some(cell) = self.cells.get(index) else {
            return;
        };
        let directions: Vec<_> = cell.roads.directions().collect();
        for direction in directions {
            self.set_road(index, direction, false);
        }
    }

    fn set_road(&mut self, index: CellIndex, direction: HexDirection, state: bool) {
        if self.cells[index].has_road_through_edge(direction) == state {
            return;
        }
        self.cells[index].roads.set(direction, state);
        self.mark_dirty(index);
        if let Some(neighbor) = self.cells[index].neighbor(direction) {
            self.cells[neighbor].roads.set(direction.opposite(), state);
            self.mark_dirty(neighbor);
        }
    }

    // =========================================================================
    // Dirty tracking and refresh
    // =========================================================================

    fn mark_dirty(&mut self, index: CellIndex) {
        let chunk = self.cells[index].chunk;
        self.chunks[chunk].mark_dirty();
    }

    fn mark_dirty_with_neighbors(&mut self, index: CellIndex) {
        let chunk = self.cells[index].chunk;
        self.chunks[chunk].mark_dirty();
        for neighbor in self.cells[index].neighbors.into_iter().flatten() {
            let other = self.cells[neighbor].chunk;
            if other != chunk {
                self.chunks[other].mark_dirty();
            }
        }
    }

    pub fn dirty_chunks(&self) -> impl Iterator<Item = usize> + '_ {
        self.chunks.iter().filter(|c| c.is_dirty()).map(|c| c.index())
    }

    /// Retriangulate every dirty chunk and return their indices in order.
    ///
    /// Chunks only write their own meshes and read shared cell state, so they
    /// are rebuilt in parallel.
    pub fn refresh(&mut self) -> Vec<usize> {
        let cells = &self.cells;
        let metrics = &self.metrics;
        let refreshed: Vec<usize> = self
            .chunks
            .par_iter_mut()
            .filter(|chunk| chunk.is_dirty())
            .map(|chunk| {
                chunk.triangulate(cells, metrics);
                chunk.index()
            })
            .collect();

        debug!("Refreshed {} of {} chunks", refreshed.len(), self.chunks.len());
        refreshed
    }

    /// Retriangulate a single chunk regardless of its dirty flag.
    pub fn triangulate_chunk(&mut self, index: usize) -> Option<&HexGridChunk> {
        let chunk = self.chunks.get_mut(index)?;
        chunk.triangulate(&self.cells, &self.metrics);
        trace!("Triangulated chunk {} on demand", index);
        Some(&*chunk)
    }
}
