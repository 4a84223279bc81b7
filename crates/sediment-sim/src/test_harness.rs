//! Small deterministic worlds for automaton tests.

use glam::IVec3;
use sediment_core::config::VolumeConfig;
use sediment_core::types::{Material, Voxel};
use sediment_world::Grid;

pub(crate) fn sand() -> u32 {
    Voxel::new(0xC2_B2_80, Material::Granular).0
}

pub(crate) fn water() -> u32 {
    Voxel::new(0x33_66_CC, Material::Liquid).0
}

/// Empty world.
pub(crate) fn world(size: [u32; 3], chunk: [u32; 3]) -> Grid {
    Grid::new(&VolumeConfig::new(size, chunk)).expect("test world config")
}

/// World whose floor layer is solid sand.
pub(crate) fn flat_world(size: [u32; 3], chunk: [u32; 3]) -> Grid {
    let grid = world(size, chunk);
    for z in 0..size[2] as i32 {
        for x in 0..size[0] as i32 {
            grid.set_world(IVec3::new(x, 0, z), sand());
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_world_floor_only() {
        let grid = flat_world([8, 4, 16], [8, 4, 8]);
        assert_eq!(grid.occupied(), 8 * 16);
        assert_eq!(grid.get_world(IVec3::new(3, 1, 3)), 0);
        assert!(Voxel(grid.get_world(IVec3::new(7, 0, 15))).is_granular());
    }

    #[test]
    fn test_fixture_materials() {
        assert!(Voxel(sand()).is_granular());
        assert!(Voxel(water()).is_liquid());
    }
}
