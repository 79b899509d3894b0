//! Hex terrain triangulation library
//!
//! Builds chunked terrain, river, road and water meshes from a grid of
//! hexagonal cells. Re-exports modules for use by binaries and tools.

pub mod cell;
pub mod chunk;
pub mod config;
pub mod coordinates;
pub mod direction;
pub mod edge;
pub mod error;
pub mod grid;
pub mod mapgen;
pub mod mesh;
pub mod metrics;
pub mod triangulation;

pub use cell::{CellIndex, HexCell};
pub use chunk::{ChunkMeshes, HexGridChunk, MeshLayer};
pub use config::TerrainConfig;
pub use coordinates::HexCoordinates;
pub use direction::HexDirection;
pub use edge::{EdgeType, EdgeVertices};
pub use error::{ConfigError, EditError, GridError};
pub use grid::HexGrid;
pub use mesh::HexMesh;
pub use metrics::{HexMetrics, MetricsConfig};
