use glam::{IVec3, UVec3};
use sediment_core::direction::Lateral;
use sediment_core::math::{chunk_origin, voxel_index};
use sediment_core::types::ChunkCoord;

use crate::voxel::VoxelBuffer;

/// Target of one of a chunk's lateral neighbor links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    /// Index of a sibling chunk in the grid.
    Chunk(usize),
    /// Outside the world: the grid's shared read-only zero buffer.
    Edge,
}

/// A fixed-size column of the world with its own dense storage.
///
/// Neighbor links are set once by the grid and never change.
#[derive(Debug)]
pub struct Chunk {
    /// Position on the chunk lattice (x, z).
    pub coord: ChunkCoord,
    /// World-space voxel position of local (0, 0, 0).
    pub origin: IVec3,
    pub voxels: VoxelBuffer,
    /// Links in `Lateral` slot order: east, west, north, south.
    pub neighbors: [Neighbor; 4],
}

impl Chunk {
    pub fn new(coord: ChunkCoord, size: UVec3) -> Self {
        Self {
            coord,
            origin: chunk_origin(coord, size),
            voxels: VoxelBuffer::new(size.element_product() as usize),
            neighbors: [Neighbor::Edge; 4],
        }
    }

    pub fn neighbor(&self, dir: Lateral) -> Neighbor {
        self.neighbors[dir.slot()]
    }

    /// Read a local voxel. The caller guarantees `local` is inside the chunk.
    #[inline]
    pub fn get(&self, local: IVec3, size: UVec3) -> u32 {
        self.voxels.load(voxel_index(local, size))
    }

    /// Overwrite a local voxel. The caller guarantees `local` is inside the chunk.
    #[inline]
    pub fn set(&self, local: IVec3, size: UVec3, value: u32) {
        self.voxels.store(voxel_index(local, size), value);
    }
}
