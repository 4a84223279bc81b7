use glam::{IVec2, IVec3, UVec3};
use sediment_core::config::VolumeConfig;
use sediment_core::constants::EMPTY;
use sediment_core::direction::{Lateral, ALL_LATERALS};
use sediment_core::error::SedimentError;
use sediment_core::math::{in_bounds, voxel_index, world_to_chunk, world_to_local};
use sediment_core::types::ChunkCoord;

use crate::chunk::{Chunk, Neighbor};
use crate::voxel::VoxelBuffer;

/// A resolved voxel cell: the buffer that holds it and the index inside it.
///
/// Cells that resolve into the edge buffer read as empty and refuse writes.
#[derive(Clone, Copy)]
pub struct CellRef<'a> {
    buffer: &'a VoxelBuffer,
    index: usize,
    writable: bool,
}

impl CellRef<'_> {
    #[inline]
    pub fn load(&self) -> u32 {
        self.buffer.load(self.index)
    }

    /// Claim the cell: replace it with `value` only if it is empty.
    #[inline]
    pub fn claim(&self, value: u32) -> bool {
        self.writable && self.buffer.compare_exchange(self.index, EMPTY, value)
    }

    #[inline]
    pub fn store(&self, value: u32) -> bool {
        if self.writable {
            self.buffer.store(self.index, value);
        }
        self.writable
    }
}

/// Chunk lattice over the x/z plane with fixed neighbor links.
///
/// Owns every chunk plus one zero-filled edge buffer shared by all links that
/// point outside the world.
pub struct Grid {
    size: UVec3,
    chunk_size: UVec3,
    /// Number of chunks along x and z.
    extent: IVec2,
    chunks: Vec<Chunk>,
    edge: VoxelBuffer,
}

impl Grid {
    /// Build the lattice. Fails if the chunk height differs from the world
    /// height or the world x/z extents are not multiples of the chunk extents.
    pub fn new(config: &VolumeConfig) -> Result<Self, SedimentError> {
        config.validate()?;
        let size = config.world_size();
        let chunk_size = config.chunk_extent();
        let extent = IVec2::new(
            (size.x / chunk_size.x) as i32,
            (size.z / chunk_size.z) as i32,
        );

        let mut chunks = Vec::with_capacity((extent.x * extent.y) as usize);
        for cz in 0..extent.y {
            for cx in 0..extent.x {
                chunks.push(Chunk::new(IVec2::new(cx, cz), chunk_size));
            }
        }

        let mut grid = Self {
            size,
            chunk_size,
            extent,
            chunks,
            edge: VoxelBuffer::new(chunk_size.element_product() as usize),
        };
        grid.link_neighbors();

        log::info!(
            "Grid: {}x{}x{} voxels in {} chunks of {}x{}x{}",
            size.x,
            size.y,
            size.z,
            grid.chunks.len(),
            chunk_size.x,
            chunk_size.y,
            chunk_size.z
        );
        Ok(grid)
    }

    fn link_neighbors(&mut self) {
        for i in 0..self.chunks.len() {
            let coord = self.chunks[i].coord;
            for dir in ALL_LATERALS {
                self.chunks[i].neighbors[dir.slot()] =
                    match self.chunk_index(coord + dir.chunk_offset()) {
                        Some(n) => Neighbor::Chunk(n),
                        None => Neighbor::Edge,
                    };
            }
        }
    }

    pub fn world_size(&self) -> UVec3 {
        self.size
    }

    pub fn chunk_size(&self) -> UVec3 {
        self.chunk_size
    }

    /// Number of chunks along x (`.x`) and z (`.y`).
    pub fn extent(&self) -> IVec2 {
        self.extent
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, index: usize) -> &Chunk {
        &self.chunks[index]
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Voxels per chunk.
    pub fn chunk_volume(&self) -> usize {
        self.chunk_size.element_product() as usize
    }

    /// Index of the chunk at a lattice coordinate, if it is inside the world.
    pub fn chunk_index(&self, coord: ChunkCoord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 || coord.x >= self.extent.x || coord.y >= self.extent.y {
            return None;
        }
        Some((coord.y * self.extent.x + coord.x) as usize)
    }

    /// Resolve a chunk-relative position, following one neighbor link when it
    /// leaves the chunk through a single lateral side.
    ///
    /// Returns `None` above the top or below the floor.
    pub fn resolve(&self, chunk: usize, local: IVec3) -> Option<CellRef<'_>> {
        if local.y < 0 || local.y >= self.size.y as i32 {
            return None;
        }
        let cs = self.chunk_size.as_ivec3();
        if in_bounds(local, self.chunk_size) {
            return Some(CellRef {
                buffer: &self.chunks[chunk].voxels,
                index: voxel_index(local, self.chunk_size),
                writable: true,
            });
        }

        let dir = if local.z >= 0 && local.z < cs.z {
            if local.x < 0 && local.x >= -cs.x {
                Some(Lateral::West)
            } else if local.x >= cs.x && local.x < 2 * cs.x {
                Some(Lateral::East)
            } else {
                None
            }
        } else if local.x >= 0 && local.x < cs.x {
            if local.z < 0 && local.z >= -cs.z {
                Some(Lateral::South)
            } else if local.z >= cs.z && local.z < 2 * cs.z {
                Some(Lateral::North)
            } else {
                None
            }
        } else {
            None
        };

        let Some(dir) = dir else {
            // More than one hop away: resolve through world space.
            return self.cell(self.chunks[chunk].origin + local);
        };

        let wrapped = local - dir.offset() * cs;
        let index = voxel_index(wrapped, self.chunk_size);
        Some(match self.chunks[chunk].neighbor(dir) {
            Neighbor::Chunk(n) => CellRef {
                buffer: &self.chunks[n].voxels,
                index,
                writable: true,
            },
            Neighbor::Edge => CellRef {
                buffer: &self.edge,
                index,
                writable: false,
            },
        })
    }

    /// Resolve a world-space position. Positions beyond the lateral extents
    /// land in the edge buffer.
    pub fn cell(&self, world: IVec3) -> Option<CellRef<'_>> {
        if world.y < 0 || world.y >= self.size.y as i32 {
            return None;
        }
        let local = world_to_local(world, self.chunk_size);
        let index = voxel_index(local, self.chunk_size);
        Some(match self.chunk_index(world_to_chunk(world, self.chunk_size)) {
            Some(c) => CellRef {
                buffer: &self.chunks[c].voxels,
                index,
                writable: true,
            },
            None => CellRef {
                buffer: &self.edge,
                index,
                writable: false,
            },
        })
    }

    /// Chunk-relative read. Outside the world reads as empty.
    #[inline]
    pub fn get(&self, chunk: usize, local: IVec3) -> u32 {
        self.resolve(chunk, local).map_or(EMPTY, |c| c.load())
    }

    /// Chunk-relative claim of an empty cell. Outside the world always fails.
    #[inline]
    pub fn claim(&self, chunk: usize, local: IVec3, value: u32) -> bool {
        self.resolve(chunk, local).is_some_and(|c| c.claim(value))
    }

    /// World-space read. Outside the world reads as empty.
    pub fn get_world(&self, world: IVec3) -> u32 {
        self.cell(world).map_or(EMPTY, |c| c.load())
    }

    /// World-space overwrite. Returns false outside the world.
    pub fn set_world(&self, world: IVec3, value: u32) -> bool {
        self.cell(world).is_some_and(|c| c.store(value))
    }

    /// Whether a world-space position lies inside the world.
    pub fn contains(&self, world: IVec3) -> bool {
        in_bounds(world, self.size)
    }

    /// Zero every voxel of every chunk.
    pub fn reset(&self) {
        for chunk in &self.chunks {
            chunk.voxels.fill(EMPTY);
        }
    }

    /// Total non-empty voxels in the world.
    pub fn occupied(&self) -> usize {
        self.chunks.iter().map(|c| c.voxels.occupied()).sum()
    }

    /// The whole world as one array in world-space index order.
    pub fn snapshot(&self) -> Vec<u32> {
        let mut out = vec![EMPTY; self.size.element_product() as usize];
        for z in 0..self.size.z as i32 {
            for y in 0..self.size.y as i32 {
                for x in 0..self.size.x as i32 {
                    let pos = IVec3::new(x, y, z);
                    out[voxel_index(pos, self.size)] = self.get_world(pos);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: [u32; 3], chunk: [u32; 3]) -> Grid {
        Grid::new(&VolumeConfig::new(size, chunk)).expect("valid grid")
    }

    #[test]
    fn test_lattice_shape() {
        let g = grid([48, 8, 32], [16, 8, 16]);
        assert_eq!(g.extent(), IVec2::new(3, 2));
        assert_eq!(g.chunk_count(), 6);
        assert_eq!(g.chunk(4).origin, IVec3::new(16, 0, 16));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        assert!(Grid::new(&VolumeConfig::new([48, 8, 32], [16, 4, 16])).is_err());
        assert!(Grid::new(&VolumeConfig::new([40, 8, 32], [16, 8, 16])).is_err());
    }

    #[test]
    fn test_neighbor_links() {
        let g = grid([48, 8, 32], [16, 8, 16]);
        // Chunk (1, 0) sits on the south edge between two siblings.
        let i = g.chunk_index(IVec2::new(1, 0)).expect("in world");
        let c = g.chunk(i);
        assert_eq!(c.neighbor(Lateral::East), Neighbor::Chunk(2));
        assert_eq!(c.neighbor(Lateral::West), Neighbor::Chunk(0));
        assert_eq!(c.neighbor(Lateral::North), Neighbor::Chunk(4));
        assert_eq!(c.neighbor(Lateral::South), Neighbor::Edge);
    }

    #[test]
    fn test_no_chunk_is_its_own_neighbor() {
        let g = grid([16, 4, 16], [16, 4, 16]);
        for c in g.chunks() {
            for n in c.neighbors {
                assert_eq!(n, Neighbor::Edge, "single chunk must only see the edge");
            }
        }
        let g = grid([64, 4, 64], [16, 4, 16]);
        for (i, c) in g.chunks().iter().enumerate() {
            assert!(!c.neighbors.contains(&Neighbor::Chunk(i)));
        }
    }

    #[test]
    fn test_resolve_crosses_into_sibling() {
        let g = grid([32, 4, 16], [16, 4, 16]);
        let v = 0xAA00_0001;
        assert!(g.claim(0, IVec3::new(16, 2, 3), v));
        assert_eq!(g.chunk(1).get(IVec3::new(0, 2, 3), g.chunk_size()), v);
        assert_eq!(g.get_world(IVec3::new(16, 2, 3)), v);
        assert_eq!(g.get(1, IVec3::new(0, 2, 3)), v);
    }

    #[test]
    fn test_edge_reads_empty_and_refuses_writes() {
        let g = grid([16, 4, 16], [16, 4, 16]);
        assert!(!g.claim(0, IVec3::new(-1, 0, 0), 1));
        assert!(!g.claim(0, IVec3::new(0, 0, 16), 1));
        assert_eq!(g.get(0, IVec3::new(-1, 0, 0)), 0);
        assert!(!g.set_world(IVec3::new(0, 4, 0), 1));
        assert!(!g.set_world(IVec3::new(0, -1, 0), 1));
        assert_eq!(g.occupied(), 0);
    }

    #[test]
    fn test_resolve_far_offset_goes_through_world() {
        let g = grid([48, 4, 48], [16, 4, 16]);
        g.set_world(IVec3::new(40, 1, 40), 5);
        assert_eq!(g.get(0, IVec3::new(40, 1, 40)), 5);
    }

    #[test]
    fn test_reset_and_snapshot() {
        let g = grid([32, 4, 16], [16, 4, 16]);
        g.set_world(IVec3::new(20, 1, 2), 9);
        let snap = g.snapshot();
        assert_eq!(snap[voxel_index(IVec3::new(20, 1, 2), g.world_size())], 9);
        assert_eq!(g.occupied(), 1);
        g.reset();
        assert_eq!(g.occupied(), 0);
    }
}
