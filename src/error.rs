//! Error types for configuration, grid construction and cell editing.
//!
//! Triangulation itself never fails; everything here is rejected before a
//! pass starts.

use thiserror::Error;

use crate::cell::CellIndex;
use crate::direction::HexDirection;

/// Errors raised while loading or validating a [`crate::config::TerrainConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while building a [`crate::grid::HexGrid`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// Cell counts must be positive multiples of the chunk size.
    #[error("Unsupported map size {cells_x}x{cells_z} (chunk size {chunk_x}x{chunk_z})")]
    UnsupportedMapSize {
        cells_x: usize,
        cells_z: usize,
        chunk_x: usize,
        chunk_z: usize,
    },
    #[error("Cell index {index} out of range (grid has {count} cells)")]
    CellOutOfRange { index: CellIndex, count: usize },
}

/// Edits rejected by the cell model's river and road policies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("Cell {cell} has no neighbor towards {direction}")]
    MissingNeighbor {
        cell: CellIndex,
        direction: HexDirection,
    },
    #[error("Cell {cell} cannot take negative tier {tier}")]
    NegativeTier { cell: CellIndex, tier: i32 },
    #[error("River cannot flow from cell {from} into cell {to}")]
    InvalidRiverDestination { from: CellIndex, to: CellIndex },
    #[error("Cell {cell} already has a river through {direction}")]
    RoadOverRiver {
        cell: CellIndex,
        direction: HexDirection,
    },
    #[error("Edge {direction} of cell {cell} is a cliff")]
    RoadOverCliff {
        cell: CellIndex,
        direction: HexDirection,
    },
}
