//! Triangular gaps where three cells meet.
//!
//! Corners are always passed with the lowest cell first (`bottom`), followed
//! by the other two in clockwise order.

use glam::{Vec3, Vec4};

use super::{Triangulator, COLOR1, COLOR2, COLOR3};
use crate::cell::HexCell;
use crate::edge::EdgeType;

/// One vertex of a corner triangle and the cell it belongs to.
#[derive(Clone, Copy)]
pub(super) struct CornerVertex<'c> {
    pub position: Vec3,
    pub cell: &'c HexCell,
}

impl<'c> CornerVertex<'c> {
    pub fn new(position: Vec3, cell: &'c HexCell) -> Self {
        Self { position, cell }
    }

    fn elevation(&self) -> i32 {
        self.cell.elevation()
    }
}

/// Which corner routine fills a gap, keyed on the edge types around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerKind {
    /// Slopes toward both the left and the right cell.
    SlopeSlope,
    /// Slope to the left, flat to the right: terraces run from the left cell.
    SlopeFlat,
    /// Flat to the left, slope to the right: terraces run from the right cell.
    FlatSlope,
    SlopeCliff,
    CliffSlope,
    /// Cliffs on both bottom edges with a slope between the top two cells.
    CliffCliffSlope { left_lower: bool },
    /// Anything without terraces: a single triangle.
    Flat,
}

/// Pick the corner routine for edges bottom→left, bottom→right and left→right.
pub fn classify_corner(left: EdgeType, right: EdgeType, top: EdgeType, left_lower: bool) -> CornerKind {
    match (left, right) {
        (EdgeType::Slope, EdgeType::Slope) => CornerKind::SlopeSlope,
        (EdgeType::Slope, EdgeType::Flat) => CornerKind::SlopeFlat,
        (EdgeType::Slope, EdgeType::Cliff) => CornerKind::SlopeCliff,
        (EdgeType::Flat, EdgeType::Slope) => CornerKind::FlatSlope,
        (EdgeType::Cliff, EdgeType::Slope) => CornerKind::CliffSlope,
        _ if top == EdgeType::Slope => CornerKind::CliffCliffSlope { left_lower },
        _ => CornerKind::Flat,
    }
}

/// Fraction along a cliff where the terrace boundary meets it.
fn boundary_fraction(low: i32, high: i32) -> f32 {
    1.0 / (high - low).abs().max(1) as f32
}

impl<'a> Triangulator<'a> {
    pub(super) fn triangulate_corner(
        &mut self,
        bottom: CornerVertex<'_>,
        left: CornerVertex<'_>,
        right: CornerVertex<'_>,
    ) {
        debug_assert!(bottom.elevation() <= left.elevation() && bottom.elevation() <= right.elevation());

        let kind = classify_corner(
            bottom.cell.edge_type_to(left.cell),
            bottom.cell.edge_type_to(right.cell),
            left.cell.edge_type_to(right.cell),
            left.elevation() < right.elevation(),
        );

        match kind {
            CornerKind::SlopeSlope => self.triangulate_corner_terraces(bottom, left, right),
            CornerKind::SlopeFlat => self.triangulate_corner_terraces(left, right, bottom),
            CornerKind::FlatSlope => self.triangulate_corner_terraces(right, bottom, left),
            CornerKind::SlopeCliff => self.triangulate_corner_terraces_cliff(bottom, left, right),
            CornerKind::CliffSlope => self.triangulate_corner_cliff_terraces(bottom, left, right),
            CornerKind::CliffCliffSlope { left_lower: true } => {
                self.triangulate_corner_cliff_terraces(right, bottom, left)
            }
            CornerKind::CliffCliffSlope { left_lower: false } => {
                self.triangulate_corner_terraces_cliff(left, right, bottom)
            }
            CornerKind::Flat => {
                let terrain = &mut self.meshes.terrain;
                terrain.add_triangle(self.metrics, bottom.position, left.position, right.position);
                terrain.add_triangle_colors(COLOR1, COLOR2, COLOR3);
                terrain.add_triangle_terrain_types(corner_types(&bottom, &left, &right));
            }
        }
    }

    fn triangulate_corner_terraces(
        &mut self,
        begin: CornerVertex<'_>,
        left: CornerVertex<'_>,
        right: CornerVertex<'_>,
    ) {
        let m = self.metrics;
        let types = corner_types(&begin, &left, &right);
        let terrain = &mut self.meshes.terrain;

        let mut v3 = m.terrace_position(begin.position, left.position, 1);
        let mut v4 = m.terrace_position(begin.position, right.position, 1);
        let mut c3 = m.terrace_color(COLOR1, COLOR2, 1);
        let mut c4 = m.terrace_color(COLOR1, COLOR3, 1);

        terrain.add_triangle(m, begin.position, v3, v4);
        terrain.add_triangle_colors(COLOR1, c3, c4);
        terrain.add_triangle_terrain_types(types);

        for step in 2..m.terrace_steps() {
            let (v1, v2, c1, c2) = (v3, v4, c3, c4);
            v3 = m.terrace_position(begin.position, left.position, step);
            v4 = m.terrace_position(begin.position, right.position, step);
            c3 = m.terrace_color(COLOR1, COLOR2, step);
            c4 = m.terrace_color(COLOR1, COLOR3, step);
            terrain.add_quad(m, v1, v2, v3, v4);
            terrain.add_quad_colors(c1, c2, c3, c4);
            terrain.add_quad_terrain_types(types);
        }

        terrain.add_quad(m, v3, v4, left.position, right.position);
        terrain.add_quad_colors(c3, c4, COLOR2, COLOR3);
        terrain.add_quad_terrain_types(types);
    }

    /// Terraces toward `left`, cliff toward `right`.
    fn triangulate_corner_terraces_cliff(
        &mut self,
        begin: CornerVertex<'_>,
        left: CornerVertex<'_>,
        right: CornerVertex<'_>,
    ) {
        let m = self.metrics;
        let b = boundary_fraction(begin.elevation(), right.elevation());
        let boundary = m.perturb(begin.position).lerp(m.perturb(right.position), b);
        let boundary_color = COLOR1.lerp(COLOR3, b);
        let types = corner_types(&begin, &left, &right);

        self.triangulate_boundary_triangle(begin.position, COLOR1, left.position, COLOR2, boundary, boundary_color, types);
        self.close_corner_top(left, right, boundary, boundary_color, types);
    }

    /// Cliff toward `left`, terraces toward `right`.
    fn triangulate_corner_cliff_terraces(
        &mut self,
        begin: CornerVertex<'_>,
        left: CornerVertex<'_>,
        right: CornerVertex<'_>,
    ) {
        let m = self.metrics;
        let b = boundary_fraction(begin.elevation(), left.elevation());
        let boundary = m.perturb(begin.position).lerp(m.perturb(left.position), b);
        let boundary_color = COLOR1.lerp(COLOR2, b);
        let types = corner_types(&begin, &left, &right);

        self.triangulate_boundary_triangle(right.position, COLOR3, begin.position, COLOR1, boundary, boundary_color, types);
        self.close_corner_top(left, right, boundary, boundary_color, types);
    }

    /// Remaining part between the top two cells and the boundary point.
    fn close_corner_top(
        &mut self,
        left: CornerVertex<'_>,
        right: CornerVertex<'_>,
        boundary: Vec3,
        boundary_color: Vec4,
        types: Vec3,
    ) {
        if left.cell.edge_type_to(right.cell) == EdgeType::Slope {
            self.triangulate_boundary_triangle(
                left.position,
                COLOR2,
                right.position,
                COLOR3,
                boundary,
                boundary_color,
                types,
            );
        } else {
            let m = self.metrics;
            let terrain = &mut self.meshes.terrain;
            terrain.add_triangle_unperturbed(m.perturb(left.position), m.perturb(right.position), boundary);
            terrain.add_triangle_colors(COLOR2, COLOR3, boundary_color);
            terrain.add_triangle_terrain_types(types);
        }
    }

    /// Terraced fan from the `begin`→`left` slope collapsing onto `boundary`.
    ///
    /// `boundary` is already perturbed; the terrace points are perturbed here
    /// so the fan stays attached to the cliff.
    #[allow(clippy::too_many_arguments)]
    fn triangulate_boundary_triangle(
        &mut self,
        begin: Vec3,
        begin_color: Vec4,
        left: Vec3,
        left_color: Vec4,
        boundary: Vec3,
        boundary_color: Vec4,
        types: Vec3,
    ) {
        let m = self.metrics;
        let terrain = &mut self.meshes.terrain;

        let mut v2 = m.perturb(m.terrace_position(begin, left, 1));
        let mut c2 = m.terrace_color(begin_color, left_color, 1);
        terrain.add_triangle_unperturbed(m.perturb(begin), v2, boundary);
        terrain.add_triangle_colors(begin_color, c2, boundary_color);
        terrain.add_triangle_terrain_types(types);

        for step in 2..m.terrace_steps() {
            let (v1, c1) = (v2, c2);
            v2 = m.perturb(m.terrace_position(begin, left, step));
            c2 = m.terrace_color(begin_color, left_color, step);
            terrain.add_triangle_unperturbed(v1, v2, boundary);
            terrain.add_triangle_colors(c1, c2, boundary_color);
            terrain.add_triangle_terrain_types(types);
        }

        terrain.add_triangle_unperturbed(v2, m.perturb(left), boundary);
        terrain.add_triangle_colors(c2, left_color, boundary_color);
        terrain.add_triangle_terrain_types(types);
    }
}

fn corner_types(a: &CornerVertex<'_>, b: &CornerVertex<'_>, c: &CornerVertex<'_>) -> Vec3 {
    Vec3::new(a.cell.terrain_type(), b.cell.terrain_type(), c.cell.terrain_type())
}
