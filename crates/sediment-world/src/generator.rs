use std::sync::atomic::{AtomicUsize, Ordering};

use glam::{DVec3, IVec3};
use noise::{NoiseFn, Simplex};
use sediment_core::config::GeneratorParams;
use sediment_core::constants::*;
use sediment_core::math::{clamp_channel, color_channels, mix_colors};

use crate::dispatch::Dispatcher;
use crate::grid::Grid;

/// Terrain synthesis kernel: layered simplex height field, a 4-stop color ramp
/// and a flat water level.
///
/// Output depends only on the parameters and world position, so any schedule
/// of workers writes the same world.
pub struct Generator {
    noise: Simplex,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        // Fixed noise seed; variety comes from the seed offset in the params.
        Self {
            noise: Simplex::new(0),
        }
    }

    /// Overwrite every voxel of every chunk. Returns the number of
    /// non-empty voxels written.
    pub fn generate(&self, grid: &Grid, dispatcher: &Dispatcher, params: &GeneratorParams) -> usize {
        let height = grid.world_size().y;
        let seed = params.seed_offset();
        let filled = AtomicUsize::new(0);
        dispatcher.run_voxels(grid, |chunk, local| {
            let c = grid.chunk(chunk);
            let value = self.sample(c.origin + local + seed, local.y, height, params);
            c.set(local, grid.chunk_size(), value);
            if value != EMPTY {
                filled.fetch_add(1, Ordering::Relaxed);
            }
        });
        let filled = filled.into_inner();
        log::info!(
            "Generator: seed {:?}, water level {}, {} voxels filled",
            params.seed,
            params.water_level,
            filled
        );
        filled
    }

    /// Value of one voxel. `seeded` is the world position plus the seed
    /// offset; `y` is the layer inside a world of `height` layers.
    pub fn sample(&self, seeded: IVec3, y: i32, height: u32, params: &GeneratorParams) -> u32 {
        let p = seeded.as_dvec3();
        if y == 0 || y as f64 <= (self.fbm(p * TERRAIN_FREQUENCY) + 0.3).abs() * height as f64 * 1.2 {
            let c = y as f64 / (height as f64 + 1.0) * 4.0;
            let lo = (c.floor() as usize).min(3);
            let hi = (lo + 1).min(3);
            let color = mix_colors(params.palette[lo], params.palette[hi], c.fract());
            pack(color, self.color_noise(p) * TERRAIN_COLOR_NOISE, MATERIAL_GRANULAR)
        } else if (y as u32) < params.water_level {
            let color = color_channels(params.water_color);
            pack(color, self.color_noise(p) * WATER_COLOR_NOISE, MATERIAL_LIQUID)
        } else {
            EMPTY
        }
    }

    fn fbm(&self, p: DVec3) -> f64 {
        let mut value = 0.0;
        let mut amplitude = TERRAIN_GAIN;
        let mut q = p;
        for _ in 0..TERRAIN_OCTAVES {
            value += self.noise.get(q.to_array()) * amplitude;
            q *= TERRAIN_LACUNARITY;
            amplitude *= TERRAIN_GAIN;
        }
        value
    }

    fn color_noise(&self, p: DVec3) -> f64 {
        self.noise.get((p * COLOR_NOISE_FREQUENCY).to_array()).abs()
    }
}

/// Darken each channel by `noise`, clamp to a byte and attach the material tag.
fn pack(color: [f64; 3], noise: f64, material: u32) -> u32 {
    (clamp_channel(color[0] - noise) << 24)
        | (clamp_channel(color[1] - noise) << 16)
        | (clamp_channel(color[2] - noise) << 8)
        | material
}
