use glam::{IVec2, IVec3, UVec3};

use crate::types::ChunkCoord;

/// Linear index of a local position in a chunk array: x fastest, then y, then z.
///
/// The caller guarantees `local` lies inside `size`.
#[inline]
pub fn voxel_index(local: IVec3, size: UVec3) -> usize {
    (local.z as usize * size.y as usize + local.y as usize) * size.x as usize + local.x as usize
}

/// Inverse of [`voxel_index`].
pub fn index_to_local(index: usize, size: UVec3) -> IVec3 {
    let sx = size.x as usize;
    let sy = size.y as usize;
    IVec3::new(
        (index % sx) as i32,
        ((index / sx) % sy) as i32,
        (index / (sx * sy)) as i32,
    )
}

/// Whether a local position lies inside a box of `size` anchored at the origin.
#[inline]
pub fn in_bounds(pos: IVec3, size: UVec3) -> bool {
    pos.cmpge(IVec3::ZERO).all() && pos.cmplt(size.as_ivec3()).all()
}

/// Chunk lattice coordinate containing a world-space voxel (x/z only).
pub fn world_to_chunk(world: IVec3, chunk_size: UVec3) -> ChunkCoord {
    IVec2::new(
        world.x.div_euclid(chunk_size.x as i32),
        world.z.div_euclid(chunk_size.z as i32),
    )
}

/// Local position of a world-space voxel inside its chunk.
pub fn world_to_local(world: IVec3, chunk_size: UVec3) -> IVec3 {
    IVec3::new(
        world.x.rem_euclid(chunk_size.x as i32),
        world.y,
        world.z.rem_euclid(chunk_size.z as i32),
    )
}

/// World-space origin of a chunk (y is always 0: no vertical chunking).
pub fn chunk_origin(coord: ChunkCoord, chunk_size: UVec3) -> IVec3 {
    IVec3::new(
        coord.x * chunk_size.x as i32,
        0,
        coord.y * chunk_size.z as i32,
    )
}

/// Split a `0xRRGGBB` color into float channels.
pub fn color_channels(color: u32) -> [f64; 3] {
    [
        ((color >> 16) & 0xFF) as f64,
        ((color >> 8) & 0xFF) as f64,
        (color & 0xFF) as f64,
    ]
}

/// Linear blend of two `0xRRGGBB` colors as float channels.
pub fn mix_colors(a: u32, b: u32, t: f64) -> [f64; 3] {
    let a = color_channels(a);
    let b = color_channels(b);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Clamp a float channel into a byte.
#[inline]
pub fn clamp_channel(value: f64) -> u32 {
    value.clamp(0.0, 255.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voxel_index_x_fastest() {
        let size = UVec3::new(4, 3, 2);
        assert_eq!(voxel_index(IVec3::new(0, 0, 0), size), 0);
        assert_eq!(voxel_index(IVec3::new(1, 0, 0), size), 1);
        assert_eq!(voxel_index(IVec3::new(0, 1, 0), size), 4);
        assert_eq!(voxel_index(IVec3::new(0, 0, 1), size), 12);
        assert_eq!(voxel_index(IVec3::new(3, 2, 1), size), 23);
    }

    #[test]
    fn test_index_roundtrip() {
        let size = UVec3::new(5, 7, 3);
        for i in 0..(5 * 7 * 3) {
            assert_eq!(voxel_index(index_to_local(i, size), size), i);
        }
    }

    #[test]
    fn test_world_to_chunk_and_local() {
        let cs = UVec3::new(16, 8, 16);
        let world = IVec3::new(33, 5, 15);
        assert_eq!(world_to_chunk(world, cs), IVec2::new(2, 0));
        assert_eq!(world_to_local(world, cs), IVec3::new(1, 5, 15));
        assert_eq!(
            chunk_origin(world_to_chunk(world, cs), cs) + world_to_local(world, cs),
            world
        );
    }

    #[test]
    fn test_world_to_chunk_negative() {
        let cs = UVec3::new(16, 8, 16);
        assert_eq!(world_to_chunk(IVec3::new(-1, 0, -17), cs), IVec2::new(-1, -2));
        assert_eq!(world_to_local(IVec3::new(-1, 0, 0), cs), IVec3::new(15, 0, 0));
    }

    #[test]
    fn test_in_bounds() {
        let size = UVec3::new(2, 2, 2);
        assert!(in_bounds(IVec3::new(1, 1, 1), size));
        assert!(!in_bounds(IVec3::new(2, 0, 0), size));
        assert!(!in_bounds(IVec3::new(0, -1, 0), size));
    }

    #[test]
    fn test_mix_and_clamp() {
        let mid = mix_colors(0x000000, 0xFF_80_00, 0.5);
        assert_eq!(mid, [127.5, 64.0, 0.0]);
        assert_eq!(clamp_channel(-4.0), 0);
        assert_eq!(clamp_channel(300.0), 255);
        assert_eq!(clamp_channel(127.9), 127);
    }
}
