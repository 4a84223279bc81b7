//! Spherical paint/erase kernel.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use glam::{I64Vec3, IVec3};
use sediment_core::constants::{BRUSH_NOISE_TABLE_SIZE, EMPTY, MATERIAL_MASK};
use sediment_core::types::{Material, Voxel};
use sediment_world::{Dispatcher, Grid};

use crate::rng::noise_table;

/// One brush stroke in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushCommand {
    /// Center voxel.
    pub position: IVec3,
    /// `Empty` erases.
    pub material: Material,
    /// `0xRRGGBB`, ignored when erasing.
    pub color: u32,
    pub radius: u32,
    /// Per-channel color jitter magnitude. 0 paints a flat color.
    pub noise: u32,
}

impl BrushCommand {
    pub fn paint(position: IVec3, material: Material, color: u32, radius: u32, noise: u32) -> Self {
        Self {
            position,
            material,
            color,
            radius,
            noise,
        }
    }

    pub fn erase(position: IVec3, radius: u32) -> Self {
        Self::paint(position, Material::Empty, 0, radius, 0)
    }

    /// The voxel word written before noise.
    pub fn value(&self) -> u32 {
        Voxel::new(self.color, self.material).0
    }
}

/// Paints voxels inside a sphere, optionally jittering each color channel
/// from a fixed noise table indexed by a shared rotating cursor.
pub struct Brush {
    table: [f32; BRUSH_NOISE_TABLE_SIZE],
    cursor: AtomicU32,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Brush {
    pub fn new(seed: u32) -> Self {
        Self {
            table: noise_table(seed),
            cursor: AtomicU32::new(0),
        }
    }

    /// Dispatch over the part of the `(2r+1)^3` cube around the command
    /// position that lies inside the world. Writes voxels with
    /// `|offset|^2 <= r^2`. Returns the number of voxels written.
    pub fn apply(&self, grid: &Grid, dispatcher: &Dispatcher, command: &BrushCommand) -> usize {
        let r = command.radius as i64;
        let center = command.position.as_i64vec3();
        let top = grid.world_size().as_i64vec3() - I64Vec3::ONE;
        let lo = (center - I64Vec3::splat(r)).max(I64Vec3::ZERO);
        let hi = (center + I64Vec3::splat(r)).min(top);
        if lo.cmpgt(hi).any() {
            log::debug!("Brush: stroke at {:?} misses the world", command.position);
            return 0;
        }

        let r2 = r.saturating_mul(r);
        let value = command.value();
        let jitter = command.noise != 0 && value != EMPTY;
        let written = AtomicUsize::new(0);
        let origin = lo.as_ivec3();

        dispatcher.run_3d((hi - lo + I64Vec3::ONE).as_uvec3(), |id| {
            let world = origin + id;
            if (world.as_i64vec3() - center).length_squared() > r2 {
                return;
            }
            let v = if jitter {
                self.jitter(value, command.noise)
            } else {
                value
            };
            if grid.set_world(world, v) {
                written.fetch_add(1, Ordering::Relaxed);
            }
        });

        let written = written.into_inner();
        log::debug!(
            "Brush: {:?} r={} at {:?}, {} voxels written",
            command.material,
            command.radius,
            command.position,
            written
        );
        written
    }

    fn jitter(&self, value: u32, noise: u32) -> u32 {
        let r = self.channel((value >> 24) & 0xFF, noise);
        let g = self.channel((value >> 16) & 0xFF, noise);
        let b = self.channel((value >> 8) & 0xFF, noise);
        (r << 24) | (g << 16) | (b << 8) | (value & MATERIAL_MASK)
    }

    fn channel(&self, channel: u32, noise: u32) -> u32 {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) as usize % BRUSH_NOISE_TABLE_SIZE;
        (channel as f32 + self.table[i] * noise as f32).clamp(0.0, 255.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use sediment_core::config::{DispatchMode, VolumeConfig};

    use super::*;

    fn empty_world() -> Grid {
        Grid::new(&VolumeConfig::new([32, 16, 32], [16, 16, 16])).expect("grid")
    }

    #[test]
    fn test_radius_zero_paints_one_voxel() {
        let grid = empty_world();
        let cmd = BrushCommand::paint(IVec3::new(5, 5, 5), Material::Granular, 0xAA_BB_CC, 0, 0);
        assert_eq!(Brush::default().apply(&grid, &Dispatcher::default(), &cmd), 1);
        assert_eq!(grid.get_world(IVec3::new(5, 5, 5)), 0xAABB_CC01);
    }

    #[test]
    fn test_sphere_volume() {
        let grid = empty_world();
        let cmd = BrushCommand::paint(IVec3::new(16, 8, 16), Material::Liquid, 0x11_22_33, 2, 0);
        let written = Brush::default().apply(&grid, &Dispatcher::default(), &cmd);
        // Lattice points with |p|^2 <= 4: 1 + 6 + 12 + 8 + 6 = 33.
        assert_eq!(written, 33);
        assert_eq!(grid.occupied(), 33);
        assert_eq!(grid.get_world(IVec3::new(18, 8, 16)), 0x1122_3302);
        assert_eq!(grid.get_world(IVec3::new(18, 9, 16)), EMPTY);
    }

    #[test]
    fn test_brush_clipped_to_world_and_crosses_chunks() {
        let grid = empty_world();
        let cmd = BrushCommand::paint(IVec3::new(0, 0, 16), Material::Granular, 0xFF_FF_FF, 1, 0);
        let written = Brush::default().apply(&grid, &Dispatcher::default(), &cmd);
        // Half-space x >= 0 and y >= 0 of a 7-voxel cross: center, +x, +y, +z, -z.
        assert_eq!(written, 5);
        assert_ne!(grid.get_world(IVec3::new(0, 0, 15)), EMPTY, "south chunk painted");
        assert_ne!(grid.get_world(IVec3::new(0, 0, 16)), EMPTY, "north chunk painted");
    }

    #[test]
    fn test_erase_larger_than_world_clears_everything() {
        let grid = Grid::new(&VolumeConfig::new([16, 8, 16], [8, 8, 8])).expect("grid");
        let dispatcher = Dispatcher::default();
        let brush = Brush::default();
        let fill = BrushCommand::paint(IVec3::new(8, 4, 8), Material::Granular, 0x80_80_80, 1000, 0);
        assert_eq!(brush.apply(&grid, &dispatcher, &fill), 16 * 8 * 16);
        let erase = BrushCommand::erase(IVec3::new(8, 4, 8), 1000);
        assert_eq!(brush.apply(&grid, &dispatcher, &erase), 16 * 8 * 16);
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_max_radius_and_far_center() {
        let grid = Grid::new(&VolumeConfig::new([16, 8, 16], [8, 8, 8])).expect("grid");
        let dispatcher = Dispatcher::default();
        let brush = Brush::default();
        let huge = BrushCommand::paint(IVec3::new(-5, 100, 3), Material::Liquid, 0x33_66_CC, u32::MAX, 0);
        assert_eq!(brush.apply(&grid, &dispatcher, &huge), 16 * 8 * 16);
        grid.reset();
        let far = BrushCommand::paint(IVec3::new(100, 4, 8), Material::Granular, 0xFF_FF_FF, 10, 0);
        assert_eq!(brush.apply(&grid, &dispatcher, &far), 0);
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_erase_writes_zero_even_with_noise() {
        let grid = empty_world();
        let brush = Brush::default();
        let dispatcher = Dispatcher::default();
        let paint = BrushCommand::paint(IVec3::new(8, 8, 8), Material::Granular, 0x80_80_80, 3, 24);
        brush.apply(&grid, &dispatcher, &paint);
        assert!(grid.occupied() > 0);
        let mut erase = BrushCommand::erase(IVec3::new(8, 8, 8), 3);
        erase.noise = 24;
        brush.apply(&grid, &dispatcher, &erase);
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_noise_perturbs_within_magnitude() {
        let grid = empty_world();
        let cmd = BrushCommand::paint(IVec3::new(8, 8, 8), Material::Granular, 0x80_80_80, 3, 24);
        Brush::new(3).apply(&grid, &Dispatcher::new(DispatchMode::Serial), &cmd);
        let mut distinct = std::collections::HashSet::new();
        for v in grid.snapshot().into_iter().filter(|v| *v != EMPTY) {
            let voxel = Voxel(v);
            assert!(voxel.is_granular(), "material byte must survive the jitter");
            for channel in voxel.rgb() {
                assert!((0x80 - 24..=0x80 + 24).contains(&(channel as i32)), "channel {channel}");
            }
            distinct.insert(v);
        }
        assert!(distinct.len() > 1, "noise should vary the color");
    }

    #[test]
    fn test_noise_clamps_to_byte() {
        let brush = Brush::new(1);
        for _ in 0..BRUSH_NOISE_TABLE_SIZE {
            let v = brush.jitter(0xFF_00_FF_01, 200);
            assert_eq!(v & MATERIAL_MASK, 1);
        }
        assert_eq!(brush.channel(255, 0), 255);
    }
}
