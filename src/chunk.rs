//! Chunks: fixed blocks of cells sharing one set of output meshes.

use log::trace;

use crate::cell::{CellIndex, HexCell};
use crate::mesh::{HexMesh, MeshAttributes};
use crate::metrics::HexMetrics;
use crate::triangulation::Triangulator;

/// The six independent output streams of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshLayer {
    Terrain,
    Rivers,
    Roads,
    Water,
    WaterShore,
    Estuaries,
}

impl MeshLayer {
    pub const ALL: [MeshLayer; 6] = [
        MeshLayer::Terrain,
        MeshLayer::Rivers,
        MeshLayer::Roads,
        MeshLayer::Water,
        MeshLayer::WaterShore,
        MeshLayer::Estuaries,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MeshLayer::Terrain => "terrain",
            MeshLayer::Rivers => "rivers",
            MeshLayer::Roads => "roads",
            MeshLayer::Water => "water",
            MeshLayer::WaterShore => "water_shore",
            MeshLayer::Estuaries => "estuaries",
        }
    }

    /// Vertex streams each layer's shader consumes.
    pub fn attributes(self) -> MeshAttributes {
        match self {
            MeshLayer::Terrain => MeshAttributes {
                colors: true,
                terrain_types: true,
                ..Default::default()
            },
            MeshLayer::Rivers | MeshLayer::Roads | MeshLayer::WaterShore => MeshAttributes {
                uvs: true,
                ..Default::default()
            },
            MeshLayer::Water => MeshAttributes::default(),
            MeshLayer::Estuaries => MeshAttributes {
                uvs: true,
                uv2s: true,
                ..Default::default()
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChunkMeshes {
    pub terrain: HexMesh,
    pub rivers: HexMesh,
    pub roads: HexMesh,
    pub water: HexMesh,
    pub water_shore: HexMesh,
    pub estuaries: HexMesh,
}

impl Default for ChunkMeshes {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkMeshes {
    pub fn new() -> Self {
        Self {
            terrain: HexMesh::new(MeshLayer::Terrain.attributes()),
            rivers: HexMesh::new(MeshLayer::Rivers.attributes()),
            roads: HexMesh::new(MeshLayer::Roads.attributes()),
            water: HexMesh::new(MeshLayer::Water.attributes()),
            water_shore: HexMesh::new(MeshLayer::WaterShore.attributes()),
            estuaries: HexMesh::new(MeshLayer::Estuaries.attributes()),
        }
    }

    pub fn get(&self, layer: MeshLayer) -> &HexMesh {
        match layer {
            MeshLayer::Terrain => &self.terrain,
            MeshLayer::Rivers => &self.rivers,
            MeshLayer::Roads => &self.roads,
            MeshLayer::Water => &self.water,
            MeshLayer::WaterShore => &self.water_shore,
            MeshLayer::Estuaries => &self.estuaries,
        }
    }

    pub fn get_mut(&mut self, layer: MeshLayer) -> &mut HexMesh {
        match layer {
            MeshLayer::Terrain => &mut self.terrain,
            MeshLayer::Rivers => &mut self.rivers,
            MeshLayer::Roads => &mut self.roads,
            MeshLayer::Water => &mut self.water,
            MeshLayer::WaterShore => &mut self.water_shore,
            MeshLayer::Estuaries => &mut self.estuaries,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshLayer, &HexMesh)> {
        MeshLayer::ALL.into_iter().map(move |layer| (layer, self.get(layer)))
    }

    pub fn clear(&mut self) {
        for layer in MeshLayer::ALL {
            self.get_mut(layer).clear();
        }
    }

    pub fn apply(&mut self) {
        for layer in MeshLayer::ALL {
            self.get_mut(layer).apply();
        }
    }

    pub fn total_triangles(&self) -> usize {
        self.iter().map(|(_, mesh)| mesh.triangle_count()).sum()
    }
}

#[derive(Clone, Debug)]
pub struct HexGridChunk {
    index: usize,
    cells: Vec<CellIndex>,
    meshes: ChunkMeshes,
    dirty: bool,
}

impl HexGridChunk {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            cells: Vec::new(),
            meshes: ChunkMeshes::new(),
            dirty: true,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn add_cell(&mut self, local_index: usize, cell: CellIndex) {
        if self.cells.len() <= local_index {
            self.cells.resize(local_index + 1, cell);
        }
        self.cells[local_index] = cell;
    }

    pub fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    pub fn meshes(&self) -> &ChunkMeshes {
        &self.meshes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebuild all six meshes from scratch and clear the dirty flag.
    ///
    /// Reads neighbor cells outside the chunk but only writes this chunk's
    /// buffers, so distinct chunks can be triangulated concurrently.
    pub fn triangulate(&mut self, cells: &[HexCell], metrics: &HexMetrics) {
        self.meshes.clear();
        {
            let mut triangulator = Triangulator::new(cells, metrics, &mut self.meshes);
            for &cell in &self.cells {
                triangulator.triangulate_cell(cell);
            }
        }
        self.meshes.apply();
        self.dirty = false;

        trace!(
            "chunk {}: {} cells, {} triangles",
            self.index,
            self.cells.len(),
            self.meshes.total_triangles()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_attributes() {
        assert!(MeshLayer::Terrain.attributes().colors);
        assert!(MeshLayer::Terrain.attributes().terrain_types);
        assert!(!MeshLayer::Terrain.attributes().uvs);
        assert!(MeshLayer::Estuaries.attributes().uv2s);
        assert_eq!(MeshLayer::Water.attributes(), MeshAttributes::default());
    }

    #[test]
    fn test_add_cell_places_by_local_index() {
        let mut chunk = HexGridChunk::new(0);
        chunk.add_cell(2, 12);
        chunk.add_cell(0, 10);
        chunk.add_cell(1, 11);
        assert_eq!(chunk.cells(), &[10, 11, 12]);
        assert!(chunk.is_dirty());
    }

    #[test]
    fn test_layer_names_unique() {
        let mut names: Vec<_> = MeshLayer::ALL.iter().map(|l| l.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
    }
}
