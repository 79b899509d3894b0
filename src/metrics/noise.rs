//! Four-channel noise field used for vertex perturbation.
//!
//! Each channel is an independently seeded Perlin fbm field sampled on the
//! world-space XZ plane. Samples are remapped to 0.0..1.0 so callers can
//! treat them like texels of a noise texture.

use glam::{Vec3, Vec4};
use noise::{NoiseFn, Perlin, Seedable};

const OCTAVES: u32 = 3;
const PERSISTENCE: f64 = 0.5;
const LACUNARITY: f64 = 2.0;

#[derive(Clone, Debug)]
pub struct NoiseSource {
    channels: [Perlin; 4],
    scale: f64,
}

impl NoiseSource {
    pub fn new(seed: u32, scale: f32) -> Self {
        let channels = [
            Perlin::new(1).set_seed(seed),
            Perlin::new(1).set_seed(seed.wrapping_add(1111)),
            Perlin::new(1).set_seed(seed.wrapping_add(2222)),
            Perlin::new(1).set_seed(seed.wrapping_add(3333)),
        ];
        Self {
            channels,
            scale: scale as f64,
        }
    }

    /// Sample all four channels at the XZ footprint of `position`.
    pub fn sample(&self, position: Vec3) -> Vec4 {
        let x = position.x as f64 * self.scale;
        let z = position.z as f64 * self.scale;
        let channel = |i: usize| -> f32 {
            let v = fbm(&self.channels[i], x, z) as f32;
            (v * 0.5 + 0.5).clamp(0.0, 1.0)
        };
        Vec4::new(channel(0), channel(1), channel(2), channel(3))
    }
}

/// Fractional Brownian motion normalized to [-1, 1].
fn fbm(noise: &Perlin, x: f64, y: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..OCTAVES {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= PERSISTENCE;
        frequency *= LACUNARITY;
    }

    total / max_value
}
