use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::info;

use hex_terrain::mapgen;
use hex_terrain::mesh::export::export_obj;
use hex_terrain::{HexGrid, HexMetrics, MeshLayer, TerrainConfig};

#[derive(Parser, Debug)]
#[command(name = "hex_terrain")]
#[command(about = "Generate a hex map and triangulate it into chunk meshes")]
struct Args {
    /// JSON config file (metrics and map parameters)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (overrides the config; random if neither sets it)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of chunks along X
    #[arg(long)]
    chunks_x: Option<usize>,

    /// Number of chunks along Z
    #[arg(long)]
    chunks_z: Option<usize>,

    /// Write one OBJ file per chunk into this directory
    #[arg(long)]
    export: Option<PathBuf>,

    /// Worker threads for triangulation (default: all cores)
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    }

    let mut config = match &args.config {
        Some(path) => TerrainConfig::load(path)?,
        None => TerrainConfig::default(),
    };
    config.map.seed = match (args.seed, &args.config) {
        (Some(seed), _) => seed,
        (None, Some(_)) => config.map.seed,
        (None, None) => rand::random(),
    };
    if let Some(x) = args.chunks_x {
        config.map.chunk_count_x = x;
    }
    if let Some(z) = args.chunks_z {
        config.map.chunk_count_z = z;
    }
    config.validate()?;

    println!("Generating hex map with seed: {}", config.map.seed);
    let metrics = HexMetrics::new(config.metrics.clone());
    let mut grid = HexGrid::new(config.map.chunk_count_x, config.map.chunk_count_z, metrics)?;
    println!(
        "Map size: {}x{} cells in {}x{} chunks",
        grid.cell_count_x(),
        grid.cell_count_z(),
        grid.chunk_count_x(),
        grid.chunk_count_z()
    );

    let stats = mapgen::generate(&mut grid, &config.map)?;
    println!(
        "Terrain: {} underwater cells, {} rivers ({} edges), {} road edges",
        stats.underwater_cells, stats.rivers, stats.river_edges, stats.road_edges
    );

    let start = Instant::now();
    let refreshed = grid.refresh();
    println!("Triangulated {} chunks in {:?}", refreshed.len(), start.elapsed());

    for layer in MeshLayer::ALL {
        let (vertices, triangles) = grid.chunks().iter().fold((0, 0), |(v, t), chunk| {
            let mesh = chunk.meshes().get(layer);
            (v + mesh.vertex_count(), t + mesh.triangle_count())
        });
        println!("  {:<12} {:>8} vertices {:>8} triangles", layer.name(), vertices, triangles);
    }

    if let Some(dir) = &args.export {
        fs::create_dir_all(dir)?;
        for chunk in grid.chunks() {
            let path = dir.join(format!("chunk_{:03}.obj", chunk.index()));
            export_obj(&path, chunk.meshes().iter().map(|(layer, mesh)| (layer.name(), mesh)))?;
        }
        info!("Exported {} chunks to {}", grid.chunks().len(), dir.display());
        println!("Exported OBJ files to {}", dir.display());
    }

    Ok(())
}
