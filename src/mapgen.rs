//! Procedural demo map.
//!
//! Fills a grid with noise-driven elevation, a global sea level, rivers traced
//! downhill from high ground and a few random roads, so every triangulation
//! branch shows up on a generated map. All edits go through the grid's
//! policies, so the result always satisfies the cell invariants.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use log::{debug, info};
use noise::{NoiseFn, Perlin, Seedable};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cell::CellIndex;
use crate::direction::HexDirection;
use crate::edge::EdgeType;
use crate::error::{ConfigError, EditError};
use crate::grid::HexGrid;

/// Parameters of the demo map generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapGenParams {
    /// Master seed; each stage derives its own seed from it
    pub seed: u64,
    pub chunk_count_x: usize,
    pub chunk_count_z: usize,
    pub elevation_min: i32,
    pub elevation_max: i32,
    /// Sea level applied to every cell
    pub water_level: i32,
    /// Noise frequency per cell
    pub noise_scale: f64,
    pub octaves: u32,
    pub river_count: usize,
    /// Maximum cells a river may cross
    pub max_river_length: usize,
    pub road_count: usize,
    pub max_road_length: usize,
    /// Number of distinct terrain textures
    pub terrain_types: u8,
}

impl Default for MapGenParams {
    fn default() -> Self {
        Self {
            seed: 42,
            chunk_count_x: 4,
            chunk_count_z: 3,
            elevation_min: 0,
            elevation_max: 6,
            water_level: 2,
            noise_scale: 0.08,
            octaves: 4,
            river_count: 8,
            max_river_length: 40,
            road_count: 10,
            max_road_length: 12,
            terrain_types: 5,
        }
    }
}

impl MapGenParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_count_x == 0 || self.chunk_count_z == 0 {
            return Err(ConfigError::invalid("chunk_count", "map needs at least one chunk"));
        }
        if self.elevation_max < self.elevation_min {
            return Err(ConfigError::invalid(
                "elevation_max",
                format!("{} is below elevation_min {}", self.elevation_max, self.elevation_min),
            ));
        }
        if self.elevation_min < 0 || self.water_level < 0 {
            return Err(ConfigError::invalid("elevation_min", "tiers cannot be negative"));
        }
        if self.octaves == 0 {
            return Err(ConfigError::invalid("octaves", "must be at least 1"));
        }
        if self.terrain_types == 0 {
            return Err(ConfigError::invalid("terrain_types", "must be at least 1"));
        }
        Ok(())
    }
}

/// Per-stage seeds derived from the master seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapSeeds {
    pub elevation: u64,
    pub rivers: u64,
    pub roads: u64,
}

impl MapSeeds {
    pub fn from_master(master: u64) -> Self {
        Self {
            elevation: derive_seed(master, "elevation"),
            rivers: derive_seed(master, "rivers"),
            roads: derive_seed(master, "roads"),
        }
    }
}

fn derive_seed(master: u64, stage: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    stage.hash(&mut hasher);
    hasher.finish()
}

/// Summary of a generated map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapStats {
    pub underwater_cells: usize,
    pub rivers: usize,
    pub river_edges: usize,
    pub road_edges: usize,
}

/// Generate elevation, water, rivers and roads on `grid`.
pub fn generate(grid: &mut HexGrid, params: &MapGenParams) -> Result<MapStats, EditError> {
    let seeds = MapSeeds::from_master(params.seed);
    let mut stats = MapStats::default();

    shape_terrain(grid, params, seeds.elevation)?;
    stats.underwater_cells = grid.cells().iter().filter(|c| c.is_underwater()).count();

    let mut rng = ChaCha8Rng::seed_from_u64(seeds.rivers);
    let (rivers, river_edges) = carve_rivers(grid, params, &mut rng)?;
    stats.rivers = rivers;
    stats.river_edges = river_edges;

    let mut rng = ChaCha8Rng::seed_from_u64(seeds.roads);
    stats.road_edges = lay_roads(grid, params, &mut rng)?;

    info!(
        "Generated map: {} underwater cells, {} rivers ({} edges), {} road edges",
        stats.underwater_cells, stats.rivers, stats.river_edges, stats.road_edges
    );
    Ok(stats)
}

// =============================================================================
// TERRAIN
// =============================================================================

fn shape_terrain(grid: &mut HexGrid, params: &MapGenParams, seed: u64) -> Result<(), EditError> {
    let noise = Perlin::new(1).set_seed(seed as u32);
    let range = (params.elevation_max - params.elevation_min) as f64;
    let tiers = (params.elevation_max - params.elevation_min + 1).max(1);

    for z in 0..grid.cell_count_z() {
        for x in 0..grid.cell_count_x() {
            let Some(index) = grid.cell_at_offset(x, z) else {
                continue;
            };
            // Odd rows sit half a cell to the right.
            let nx = (x as f64 + (z % 2) as f64 * 0.5) * params.noise_scale;
            let nz = z as f64 * 0.866 * params.noise_scale;
            let t = (fbm(&noise, nx, nz, params.octaves, 0.5, 2.0) * 0.5 + 0.5).clamp(0.0, 1.0);
            let elevation = params.elevation_min + (t * range).round() as i32;

            let band = (elevation - params.elevation_min) * params.terrain_types as i32 / tiers;
            grid.set_elevation(index, elevation)?;
            grid.set_water_level(index, params.water_level)?;
            grid.set_terrain_type_index(index, band.clamp(0, params.terrain_types as i32 - 1) as u8)?;
        }
    }
    Ok(())
}

/// Fractional Brownian motion normalized to [-1, 1].
fn fbm(noise: &Perlin, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_value
}

// =============================================================================
// RIVERS
// =============================================================================

fn carve_rivers(
    grid: &mut HexGrid,
    params: &MapGenParams,
    rng: &mut ChaCha8Rng,
) -> Result<(usize, usize), EditError> {
    let mut sources: Vec<CellIndex> = grid
        .cells()
        .iter()
        .filter(|c| !c.is_underwater() && c.elevation() >= params.water_level + 2)
        .map(|c| c.index())
        .collect();
    sources.shuffle(rng);

    let mut rivers = 0;
    let mut edges = 0;
    for source in sources {
        if rivers >= params.river_count {
            break;
        }
        if grid.cells()[source].has_river() {
            continue;
        }
        let length = trace_river(grid, source, params.max_river_length, rng)?;
        if length > 0 {
            rivers += 1;
            edges += length;
        }
    }

    debug!("Carved {} rivers over {} edges", rivers, edges);
    Ok((rivers, edges))
}

/// Follow the steepest valid descent until the river reaches water, a dead
/// end, or its maximum length. Returns the number of edges carved.
fn trace_river(
    grid: &mut HexGrid,
    source: CellIndex,
    max_length: usize,
    rng: &mut ChaCha8Rng,
) -> Result<usize, EditError> {
    let mut current = source;
    let mut length = 0;

    while length < max_length {
        let cell = &grid.cells()[current];
        if cell.is_underwater() {
            break;
        }

        let mut best: Vec<(HexDirection, i32)> = Vec::new();
        for direction in HexDirection::ALL {
            let Some(neighbor) = cell.neighbor(direction) else {
                continue;
            };
            let target = &grid.cells()[neighbor];
            if target.has_river() || !grid.is_valid_river_destination(current, neighbor) {
                continue;
            }
            best.push((direction, target.elevation()));
        }
        let Some(lowest) = best.iter().map(|(_, e)| *e).min() else {
            break;
        };
        best.retain(|(_, e)| *e == lowest);
        let (direction, _) = best[rng.gen_range(0..best.len())];

        grid.set_outgoing_river(current, direction)?;
        length += 1;
        match grid.neighbor(current, direction) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(length)
}

// =============================================================================
// ROADS
// =============================================================================

fn lay_roads(grid: &mut HexGrid, params: &MapGenParams, rng: &mut ChaCha8Rng) -> Result<usize, EditError> {
    let land: Vec<CellIndex> = grid
        .cells()
        .iter()
        .filter(|c| !c.is_underwater())
        .map(|c| c.index())
        .collect();
    if land.is_empty() {
        return Ok(0);
    }

    let mut edges = 0;
    for _ in 0..params.road_count {
        let mut current = land[rng.gen_range(0..land.len())];
        for _ in 0..params.max_road_length {
            let options: Vec<HexDirection> = HexDirection::ALL
                .into_iter()
                .filter(|&d| can_build_road(grid, current, d))
                .collect();
            let Some(&direction) = options.choose(rng) else {
                break;
            };
            if !grid.cells()[current].has_road_through_edge(direction) {
                grid.add_road(current, direction)?;
                edges += 1;
            }
            match grid.neighbor(current, direction) {
                Some(next) => current = next,
                None => break,
            }
        }
    }

    debug!("Laid {} road edges", edges);
    Ok(edges)
}

fn can_build_road(grid: &HexGrid, cell: CellIndex, direction: HexDirection) -> bool {
    let cells = grid.cells();
    let from = &cells[cell];
    let Some(to) = from.neighbor(direction).map(|n| &cells[n]) else {
        return false;
    };
    !to.is_underwater()
        && !from.has_river_through_edge(direction)
        && from.edge_type_to(to) != EdgeType::Cliff
}
