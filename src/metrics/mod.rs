//! Hex geometry metrics.
//!
//! Everything the triangulation needs to place vertices: corner tables,
//! solid/water/blend scaling, terrace interpolation, derived surface heights
//! and the noise-driven perturbation. All functions are pure given a
//! [`MetricsConfig`].

pub mod noise;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::direction::HexDirection;
use crate::edge::EdgeVertices;
use crate::error::ConfigError;

pub use self::noise::NoiseSource;

pub const OUTER_TO_INNER: f32 = 0.866_025_4;
pub const INNER_TO_OUTER: f32 = 1.0 / OUTER_TO_INNER;

/// Tunable constants. Defaults reproduce the reference map look.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Distance from a cell center to its corners
    pub outer_radius: f32,
    /// Fraction of the hexagon owned exclusively by a cell
    pub solid_factor: f32,
    /// Fraction of the hexagon covered by the open water fan
    pub water_factor: f32,
    /// World height of one elevation tier
    pub elevation_step: f32,
    /// Flat terraces per one-tier slope
    pub terraces_per_slope: u32,
    /// Maximum horizontal jitter applied to vertices
    pub cell_perturb_strength: f32,
    /// Maximum vertical jitter applied to cell centers
    pub elevation_perturb_strength: f32,
    /// World-to-noise frequency
    pub noise_scale: f32,
    pub noise_seed: u32,
    pub chunk_size_x: usize,
    pub chunk_size_z: usize,
    /// Parametric position of the inner edge subdivision points
    pub edge_outer_step: f32,
    /// Stream bed depth in elevation tiers
    pub stream_bed_elevation_offset: f32,
    /// River and water surface offset in elevation tiers
    pub water_surface_elevation_offset: f32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            outer_radius: 10.0,
            solid_factor: 0.75,
            water_factor: 0.5,
            elevation_step: 6.0,
            terraces_per_slope: 2,
            cell_perturb_strength: 1.5,
            elevation_perturb_strength: 1.0,
            noise_scale: 0.12,
            noise_seed: 0,
            chunk_size_x: 5,
            chunk_size_z: 5,
            edge_outer_step: 1.0 / 6.0,
            stream_bed_elevation_offset: -1.0,
            water_surface_elevation_offset: -0.3,
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.outer_radius > 0.0) {
            return Err(ConfigError::invalid("outer_radius", "must be positive"));
        }
        for (field, value) in [
            ("solid_factor", self.solid_factor),
            ("water_factor", self.water_factor),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::invalid(field, format!("{} is outside (0, 1]", value)));
            }
        }
        if !(self.edge_outer_step > 0.0 && self.edge_outer_step < 0.5) {
            return Err(ConfigError::invalid("edge_outer_step", "must lie in (0, 0.5)"));
        }
        if self.terraces_per_slope == 0 {
            return Err(ConfigError::invalid("terraces_per_slope", "must be at least 1"));
        }
        if self.chunk_size_x == 0 || self.chunk_size_z == 0 {
            return Err(ConfigError::invalid("chunk_size", "chunk dimensions must be non-zero"));
        }
        if self.elevation_step < 0.0 || self.cell_perturb_strength < 0.0 {
            return Err(ConfigError::invalid("elevation_step", "steps and strengths cannot be negative"));
        }
        Ok(())
    }
}

/// Runtime metrics: a validated config plus precomputed corner table and noise.
#[derive(Clone, Debug)]
pub struct HexMetrics {
    config: MetricsConfig,
    corners: [Vec3; 7],
    noise: NoiseSource,
}

impl Default for HexMetrics {
    fn default() -> Self {
        Self::new(MetricsConfig::default())
    }
}

impl HexMetrics {
    pub fn new(config: MetricsConfig) -> Self {
        let outer = config.outer_radius;
        let inner = outer * OUTER_TO_INNER;
        // Index 6 repeats index 0 so `second_corner(NW)` needs no wraparound.
        let corners = [
            Vec3::new(0.0, 0.0, outer),
            Vec3::new(inner, 0.0, 0.5 * outer),
            Vec3::new(inner, 0.0, -0.5 * outer),
            Vec3::new(0.0, 0.0, -outer),
            Vec3::new(-inner, 0.0, -0.5 * outer),
            Vec3::new(-inner, 0.0, 0.5 * outer),
            Vec3::new(0.0, 0.0, outer),
        ];
        let noise = NoiseSource::new(config.noise_seed, config.noise_scale);
        Self {
            config,
            corners,
            noise,
        }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    pub fn outer_radius(&self) -> f32 {
        self.config.outer_radius
    }

    pub fn inner_radius(&self) -> f32 {
        self.config.outer_radius * OUTER_TO_INNER
    }

    pub fn solid_factor(&self) -> f32 {
        self.config.solid_factor
    }

    pub fn blend_factor(&self) -> f32 {
        1.0 - self.config.solid_factor
    }

    pub fn water_factor(&self) -> f32 {
        self.config.water_factor
    }

    pub fn water_blend_factor(&self) -> f32 {
        1.0 - self.config.water_factor
    }

    pub fn elevation_step(&self) -> f32 {
        self.config.elevation_step
    }

    pub fn edge_outer_step(&self) -> f32 {
        self.config.edge_outer_step
    }

    pub fn chunk_size_x(&self) -> usize {
        self.config.chunk_size_x
    }

    pub fn chunk_size_z(&self) -> usize {
        self.config.chunk_size_z
    }

    /// Interpolation steps across one slope: two per terrace plus the final rise.
    pub fn terrace_steps(&self) -> usize {
        self.config.terraces_per_slope as usize * 2 + 1
    }

    // =========================================================================
    // Corners and bridges
    // =========================================================================

    pub fn first_corner(&self, direction: HexDirection) -> Vec3 {
        self.corners[direction.index()]
    }

    pub fn second_corner(&self, direction: HexDirection) -> Vec3 {
        self.corners[direction.index() + 1]
    }

    pub fn first_solid_corner(&self, direction: HexDirection) -> Vec3 {
        self.first_corner(direction) * self.config.solid_factor
    }

    pub fn second_solid_corner(&self, direction: HexDirection) -> Vec3 {
        self.second_corner(direction) * self.config.solid_factor
    }

    /// Water corners are asymmetric: the second one uses the solid factor.
    pub fn first_water_corner(&self, direction: HexDirection) -> Vec3 {
        self.first_corner(direction) * self.config.water_factor
    }

    pub fn second_water_corner(&self, direction: HexDirection) -> Vec3 {
        self.second_corner(direction) * self.config.solid_factor
    }

    pub fn solid_edge_middle(&self, direction: HexDirection) -> Vec3 {
        (self.first_corner(direction) + self.second_corner(direction))
            * (0.5 * self.config.solid_factor)
    }

    /// Offset from a cell's solid edge to the facing solid edge of its neighbor.
    pub fn bridge(&self, direction: HexDirection) -> Vec3 {
        (self.first_corner(direction) + self.second_corner(direction)) * self.blend_factor()
    }

    pub fn water_bridge(&self, direction: HexDirection) -> Vec3 {
        (self.first_corner(direction) + self.second_corner(direction)) * self.water_blend_factor()
    }

    // =========================================================================
    // Terraces
    // =========================================================================

    /// Horizontal fraction covered after `step` terrace steps.
    pub fn terrace_horizontal_fraction(&self, step: usize) -> f32 {
        step as f32 / self.terrace_steps() as f32
    }

    /// Vertical fraction after `step` steps; rises only on odd steps.
    pub fn terrace_vertical_fraction(&self, step: usize) -> f32 {
        ((step + 1) / 2) as f32 / (self.config.terraces_per_slope + 1) as f32
    }

    /// Position `step` of the staircase between `start` and `end`.
    ///
    /// Step 0 returns `start` and step [`Self::terrace_steps`] returns `end` exactly.
    pub fn terrace_position(&self, start: Vec3, end: Vec3, step: usize) -> Vec3 {
        let h = self.terrace_horizontal_fraction(step);
        let v = self.terrace_vertical_fraction(step);
        Vec3::new(
            lerp_exact(start.x, end.x, h),
            lerp_exact(start.y, end.y, v),
            lerp_exact(start.z, end.z, h),
        )
    }

    pub fn terrace_edge(&self, start: &EdgeVertices, end: &EdgeVertices, step: usize) -> EdgeVertices {
        EdgeVertices {
            v1: self.terrace_position(start.v1, end.v1, step),
            v2: self.terrace_position(start.v2, end.v2, step),
            v3: self.terrace_position(start.v3, end.v3, step),
            v4: self.terrace_position(start.v4, end.v4, step),
            v5: self.terrace_position(start.v5, end.v5, step),
        }
    }

    pub fn terrace_color(&self, start: Vec4, end: Vec4, step: usize) -> Vec4 {
        let h = self.terrace_horizontal_fraction(step);
        start * (1.0 - h) + end * h
    }

    // =========================================================================
    // Heights
    // =========================================================================

    pub fn elevation_y(&self, elevation: i32) -> f32 {
        elevation as f32 * self.config.elevation_step
    }

    pub fn stream_bed_y(&self, elevation: i32) -> f32 {
        (elevation as f32 + self.config.stream_bed_elevation_offset) * self.config.elevation_step
    }

    pub fn river_surface_y(&self, elevation: i32) -> f32 {
        (elevation as f32 + self.config.water_surface_elevation_offset) * self.config.elevation_step
    }

    pub fn water_surface_y(&self, water_level: i32) -> f32 {
        (water_level as f32 + self.config.water_surface_elevation_offset) * self.config.elevation_step
    }

    // =========================================================================
    // Perturbation
    // =========================================================================

    pub fn sample_noise(&self, position: Vec3) -> Vec4 {
        self.noise.sample(position)
    }

    /// Horizontal jitter; `y` is left untouched so terraces stay level.
    pub fn perturb(&self, position: Vec3) -> Vec3 {
        let sample = self.sample_noise(position);
        let strength = self.config.cell_perturb_strength;
        Vec3::new(
            position.x + (sample.x * 2.0 - 1.0) * strength,
            position.y,
            position.z + (sample.z * 2.0 - 1.0) * strength,
        )
    }

    /// Vertical jitter for a cell center at `elevation`.
    pub fn elevation_jitter(&self, position: Vec3) -> f32 {
        (self.sample_noise(position).y * 2.0 - 1.0) * self.config.elevation_perturb_strength
    }
}

/// Lerp that returns `a` at `t == 0` and `b` at `t == 1` bit for bit.
fn lerp_exact(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> HexMetrics {
        HexMetrics::default()
    }

    #[test]
    fn test_corner_table_wraps() {
        let m = metrics();
        assert_eq!(m.second_corner(HexDirection::NW), m.first_corner(HexDirection::NE));
        assert_eq!(m.second_corner(HexDirection::NE), m.first_corner(HexDirection::E));
        assert!((m.first_corner(HexDirection::NE).length() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_solid_and_water_corners() {
        let m = metrics();
        let d = HexDirection::E;
        assert_eq!(m.first_solid_corner(d), m.first_corner(d) * 0.75);
        assert_eq!(m.second_solid_corner(d), m.second_corner(d) * 0.75);
        assert_eq!(m.first_water_corner(d), m.first_corner(d) * 0.5);
        assert_eq!(m.second_water_corner(d), m.second_corner(d) * 0.75);
    }

    #[test]
    fn test_bridge_spans_gap_between_solid_edges() {
        let m = metrics();
        // Two cells sit 2 * inner radius apart; solid edges are shrunk on both sides.
        let d = HexDirection::E;
        let bridge = m.bridge(d);
        let solid_middle = m.solid_edge_middle(d);
        let neighbor_center = Vec3::new(2.0 * m.inner_radius(), 0.0, 0.0);
        let neighbor_solid_middle = neighbor_center + m.solid_edge_middle(d.opposite());
        let reached = solid_middle + bridge;
        assert!((reached - neighbor_solid_middle).length() < 1e-4);
    }

    #[test]
    fn test_terrace_position_endpoints_exact() {
        let m = metrics();
        let a = Vec3::new(1.3, 6.0, -2.7);
        let b = Vec3::new(8.9, 12.0, 4.1);
        assert_eq!(m.terrace_position(a, b, 0), a);
        assert_eq!(m.terrace_position(a, b, m.terrace_steps()), b);
    }

    #[test]
    fn test_terrace_vertical_staircase() {
        let m = metrics();
        let a = Vec3::ZERO;
        let b = Vec3::new(5.0, 3.0, 0.0);
        let ys: Vec<f32> = (0..=5).map(|s| m.terrace_position(a, b, s).y).collect();
        // flat, rise, flat, rise, flat, rise
        assert_eq!(ys[0], 0.0);
        assert!((ys[1] - 1.0).abs() < 1e-5);
        assert!((ys[2] - 1.0).abs() < 1e-5);
        assert!((ys[3] - 2.0).abs() < 1e-5);
        assert!((ys[4] - 2.0).abs() < 1e-5);
        assert_eq!(ys[5], 3.0);
        let xs: Vec<f32> = (0..=5).map(|s| m.terrace_position(a, b, s).x).collect();
        for s in 1..=5 {
            assert!((xs[s] - xs[s - 1] - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_terrace_color_uses_horizontal_fraction() {
        let m = metrics();
        let c = m.terrace_color(Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::new(0.0, 1.0, 0.0, 1.0), 1);
        assert!((c.x - 0.8).abs() < 1e-5);
        assert!((c.y - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_derived_heights() {
        let m = metrics();
        assert_eq!(m.stream_bed_y(2), 6.0);
        assert!((m.river_surface_y(2) - 10.2).abs() < 1e-4);
        assert!((m.water_surface_y(3) - 16.2).abs() < 1e-4);
    }

    #[test]
    fn test_perturb_keeps_height_and_bounds() {
        let m = metrics();
        for i in 0..50 {
            let p = Vec3::new(i as f32 * 7.1, 4.0, i as f32 * 3.3);
            let q = m.perturb(p);
            assert_eq!(q.y, p.y);
            assert!((q.x - p.x).abs() <= 1.5 + 1e-5);
            assert!((q.z - p.z).abs() <= 1.5 + 1e-5);
            assert_eq!(m.perturb(p), q);
        }
    }

    #[test]
    fn test_perturb_varies_within_a_cell() {
        let m = metrics();
        let offset = |p: Vec3| m.perturb(p) - p;
        let mut max_difference = 0.0f32;
        for i in 0..20 {
            for j in 0..20 {
                let p = Vec3::new(i as f32 * 5.3 + 0.4, 0.0, j as f32 * 5.3 + 0.9);
                let q = p + Vec3::new(1.25, 0.0, 0.0);
                max_difference = max_difference.max((offset(p) - offset(q)).length());
            }
        }
        assert!(max_difference > 0.15, "max difference {}", max_difference);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = MetricsConfig::default();
        assert!(config.validate().is_ok());
        config.solid_factor = 1.5;
        assert!(config.validate().is_err());
        config = MetricsConfig::default();
        config.terraces_per_slope = 0;
        assert!(config.validate().is_err());
        config = MetricsConfig::default();
        config.chunk_size_z = 0;
        assert!(config.validate().is_err());
    }
}
