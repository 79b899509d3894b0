//! Profiling tool for full and incremental triangulation passes

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use hex_terrain::mapgen::{self, MapGenParams};
use hex_terrain::{HexGrid, HexMetrics};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let params = MapGenParams {
        seed: 1337,
        chunk_count_x: 8,
        chunk_count_z: 6,
        ..Default::default()
    };
    let edits_per_pass = 16;
    let passes = 20;

    println!("=== Triangulation Profiling ===");

    let start = Instant::now();
    let mut grid = HexGrid::new(params.chunk_count_x, params.chunk_count_z, HexMetrics::default())?;
    println!(
        "Grid creation: {:?} ({} cells, {} chunks)",
        start.elapsed(),
        grid.cells().len(),
        grid.chunks().len()
    );

    let start = Instant::now();
    let stats = mapgen::generate(&mut grid, &params)?;
    println!("Map generation: {:?} ({} rivers, {} road edges)", start.elapsed(), stats.rivers, stats.road_edges);

    let start = Instant::now();
    grid.refresh();
    let total: usize = grid.chunks().iter().map(|c| c.meshes().total_triangles()).sum();
    println!("Full pass: {:?} ({} triangles)", start.elapsed(), total);

    // Repaint random cells and retriangulate only the chunks they touch.
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let cell_count = grid.cells().len();
    let mut chunk_total = 0;
    let start = Instant::now();
    for _ in 0..passes {
        for _ in 0..edits_per_pass {
            let cell = rng.gen_range(0..cell_count);
            let terrain = rng.gen_range(0..params.terrain_types);
            grid.set_terrain_type_index(cell, terrain)?;
        }
        chunk_total += grid.refresh().len();
    }
    let elapsed = start.elapsed();
    println!(
        "Incremental passes: {:?} total, {:?} per pass ({:.1} chunks per pass)",
        elapsed,
        elapsed / passes,
        chunk_total as f64 / passes as f64
    );

    Ok(())
}
