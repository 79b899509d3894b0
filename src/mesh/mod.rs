//! Append-only mesh buffers filled by the triangulation engine.
//!
//! A [`HexMesh`] accumulates positions and triangle indices plus whichever
//! per-vertex attributes its [`MeshAttributes`] enable. `clear` keeps the
//! allocations so a chunk reuses its buffers across passes; `apply` freezes
//! the mesh and recomputes normals.

pub mod export;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

use crate::metrics::HexMetrics;

/// Optional per-vertex streams.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshAttributes {
    pub colors: bool,
    pub uvs: bool,
    pub uv2s: bool,
    pub terrain_types: bool,
}

/// Interleaved vertex ready for GPU upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub uv2: [f32; 2],
    pub terrain_types: [f32; 3],
}

#[derive(Clone, Debug, Default)]
pub struct HexMesh {
    attributes: MeshAttributes,
    vertices: Vec<Vec3>,
    triangles: Vec<u32>,
    colors: Vec<Vec4>,
    uvs: Vec<Vec2>,
    uv2s: Vec<Vec2>,
    terrain_types: Vec<Vec3>,
    normals: Vec<Vec3>,
    applied: bool,
}

impl HexMesh {
    pub fn new(attributes: MeshAttributes) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    pub fn attributes(&self) -> MeshAttributes {
        self.attributes
    }

    /// Drop all geometry, keeping buffer capacity for the next pass.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
        self.colors.clear();
        self.uvs.clear();
        self.uv2s.clear();
        self.terrain_types.clear();
        self.normals.clear();
        self.applied = false;
    }

    /// Finish a pass: check attribute streams line up and rebuild normals.
    pub fn apply(&mut self) {
        let count = self.vertices.len();
        debug_assert!(!self.attributes.colors || self.colors.len() == count);
        debug_assert!(!self.attributes.uvs || self.uvs.len() == count);
        debug_assert!(!self.attributes.uv2s || self.uv2s.len() == count);
        debug_assert!(!self.attributes.terrain_types || self.terrain_types.len() == count);

        self.normals.clear();
        self.normals.resize(count, Vec3::ZERO);
        for tri in self.triangles.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
        self.applied = true;
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn uv2s(&self) -> &[Vec2] {
        &self.uv2s
    }

    pub fn terrain_types(&self) -> &[Vec3] {
        &self.terrain_types
    }

    /// Empty until [`HexMesh::apply`] has run.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Interleave every stream; disabled attributes are filled with defaults.
    pub fn vertex_buffer(&self) -> Vec<MeshVertex> {
        (0..self.vertices.len())
            .map(|i| MeshVertex {
                position: self.vertices[i].to_array(),
                normal: self.normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
                color: self.colors.get(i).copied().unwrap_or(Vec4::ONE).to_array(),
                uv: self.uvs.get(i).copied().unwrap_or_default().to_array(),
                uv2: self.uv2s.get(i).copied().unwrap_or_default().to_array(),
                terrain_types: self.terrain_types.get(i).copied().unwrap_or_default().to_array(),
            })
            .collect()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    pub fn add_triangle(&mut self, metrics: &HexMetrics, v1: Vec3, v2: Vec3, v3: Vec3) {
        self.add_triangle_unperturbed(metrics.perturb(v1), metrics.perturb(v2), metrics.perturb(v3));
    }

    /// Append a triangle whose vertices were already perturbed.
    pub fn add_triangle_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let index = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[v1, v2, v3]);
        self.triangles.extend_from_slice(&[index, index + 1, index + 2]);
    }

    pub fn add_quad(&mut self, metrics: &HexMetrics, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        self.add_quad_unperturbed(
            metrics.perturb(v1),
            metrics.perturb(v2),
            metrics.perturb(v3),
            metrics.perturb(v4),
        );
    }

    /// Quad as two triangles `(v1, v3, v2)` and `(v2, v3, v4)`.
    pub fn add_quad_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let index = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[v1, v2, v3, v4]);
        self.triangles.extend_from_slice(&[
            index,
            index + 2,
            index + 1,
            index + 1,
            index + 2,
            index + 3,
        ]);
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn add_triangle_color(&mut self, color: Vec4) {
        self.push_colors(&[color, color, color]);
    }

    pub fn add_triangle_colors(&mut self, c1: Vec4, c2: Vec4, c3: Vec4) {
        self.push_colors(&[c1, c2, c3]);
    }

    pub fn add_quad_color(&mut self, color: Vec4) {
        self.push_colors(&[color, color, color, color]);
    }

    /// First two vertices take `c1`, the far two take `c2`.
    pub fn add_quad_colors2(&mut self, c1: Vec4, c2: Vec4) {
        self.push_colors(&[c1, c1, c2, c2]);
    }

    pub fn add_quad_colors(&mut self, c1: Vec4, c2: Vec4, c3: Vec4, c4: Vec4) {
        self.push_colors(&[c1, c2, c3, c4]);
    }

    pub fn add_triangle_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        debug_assert!(self.attributes.uvs);
        self.uvs.extend_from_slice(&[uv1, uv2, uv3]);
    }

    pub fn add_quad_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2, uv4: Vec2) {
        debug_assert!(self.attributes.uvs);
        self.uvs.extend_from_slice(&[uv1, uv2, uv3, uv4]);
    }

    pub fn add_quad_uv_rect(&mut self, u_min: f32, u_max: f32, v_min: f32, v_max: f32) {
        self.add_quad_uv(
            Vec2::new(u_min, v_min),
            Vec2::new(u_max, v_min),
            Vec2::new(u_min, v_max),
            Vec2::new(u_max, v_max),
        );
    }

    pub fn add_triangle_uv2(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        debug_assert!(self.attributes.uv2s);
        self.uv2s.extend_from_slice(&[uv1, uv2, uv3]);
    }

    pub fn add_quad_uv2(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2, uv4: Vec2) {
        debug_assert!(self.attributes.uv2s);
        self.uv2s.extend_from_slice(&[uv1, uv2, uv3, uv4]);
    }

    pub fn add_triangle_terrain_types(&mut self, types: Vec3) {
        debug_assert!(self.attributes.terrain_types);
        self.terrain_types.extend_from_slice(&[types, types, types]);
    }

    pub fn add_quad_terrain_types(&mut self, types: Vec3) {
        debug_assert!(self.attributes.terrain_types);
        self.terrain_types.extend_from_slice(&[types, types, types, types]);
    }

    fn push_colors(&mut self, colors: &[Vec4]) {
        debug_assert!(self.attributes.colors);
        self.colors.extend_from_slice(colors);
    }
}
