use glam::IVec3;
use sediment_core::constants::{EMPTY, FLOOR_SENTINEL, MATERIAL_LIQUID, MATERIAL_MASK};
use sediment_core::direction::ALL_FACES;
use sediment_world::{Dispatcher, Grid};

use crate::instances::{ChunkInstances, Instance, InstanceList};

/// Totals from one rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub opaque: usize,
    pub transparent: usize,
    /// Some list ran out of capacity and dropped faces.
    pub overflowed: bool,
}

/// Surface extraction: one worker per voxel appends every visible face of
/// its voxel to the chunk's opaque or transparent list.
pub struct Mesher {
    dispatcher: Dispatcher,
    lists: Vec<ChunkInstances>,
}

#[inline]
fn is_liquid(value: u32) -> bool {
    value & MATERIAL_MASK == MATERIAL_LIQUID
}

impl Mesher {
    pub fn new(grid: &Grid, dispatcher: Dispatcher) -> Self {
        let lists = (0..grid.chunk_count())
            .map(|_| ChunkInstances::for_chunk(grid.chunk_volume()))
            .collect();
        Self { dispatcher, lists }
    }

    pub fn chunk_lists(&self, chunk: usize) -> &ChunkInstances {
        &self.lists[chunk]
    }

    pub fn chunks(&self) -> &[ChunkInstances] {
        &self.lists
    }

    /// Every list: opaque then transparent, chunk by chunk.
    pub fn all_lists(&self) -> impl Iterator<Item = &InstanceList> + '_ {
        self.lists.iter().flat_map(|c| [&c.opaque, &c.transparent])
    }

    /// Reset every header and re-emit all faces.
    pub fn rebuild(&self, grid: &Grid) -> MeshStats {
        let lists = &self.lists;
        self.dispatcher.run(lists.len(), |i| lists[i].reset());
        self.dispatcher.run_voxels(grid, |chunk, pos| {
            mesh_voxel(grid, &lists[chunk], chunk, pos);
        });

        let stats = MeshStats {
            opaque: lists.iter().map(|c| c.opaque.len()).sum(),
            transparent: lists.iter().map(|c| c.transparent.len()).sum(),
            overflowed: self.all_lists().any(InstanceList::overflowed),
        };
        if stats.overflowed {
            log::warn!("Mesher: instance list overflow, faces were dropped");
        }
        stats
    }

    /// Zero every header without emitting anything.
    pub fn clear(&self) {
        for c in &self.lists {
            c.reset();
        }
    }
}

/// Neighbor lookup for visibility: below the floor is solid, everything
/// else outside the world is empty.
fn neighbor_value(grid: &Grid, chunk: usize, pos: IVec3) -> u32 {
    if pos.y < 0 {
        return FLOOR_SENTINEL;
    }
    grid.get(chunk, pos)
}

fn mesh_voxel(grid: &Grid, out: &ChunkInstances, chunk: usize, pos: IVec3) {
    let value = grid.chunk(chunk).get(pos, grid.chunk_size());
    if value == EMPTY {
        return;
    }
    let origin = (grid.chunk(chunk).origin + pos).as_vec3();
    let liquid = is_liquid(value);
    for face in ALL_FACES {
        let neighbor = neighbor_value(grid, chunk, pos + face.offset());
        if !liquid {
            if neighbor == EMPTY || is_liquid(neighbor) {
                out.opaque.push(Instance::new(origin, value, face));
            }
        } else if neighbor == EMPTY {
            out.transparent.push(Instance::new(origin, value, face));
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use sediment_core::config::{DispatchMode, VolumeConfig};
    use sediment_core::direction::Face;
    use sediment_core::types::{Material, Voxel};

    use super::*;

    fn grid(size: [u32; 3], chunk: [u32; 3]) -> Grid {
        Grid::new(&VolumeConfig::new(size, chunk)).expect("grid")
    }

    fn sand() -> u32 {
        Voxel::new(0x80_40_20, Material::Granular).0
    }

    fn water() -> u32 {
        Voxel::new(0x20_40_80, Material::Liquid).0
    }

    #[test]
    fn test_isolated_voxel_has_six_faces() {
        let g = grid([8, 8, 8], [8, 8, 8]);
        g.set_world(IVec3::new(3, 3, 3), sand());
        let mesher = Mesher::new(&g, Dispatcher::default());
        let stats = mesher.rebuild(&g);
        assert_eq!(stats.opaque, 6);
        assert_eq!(stats.transparent, 0);
        let mut faces: Vec<u32> = mesher.chunk_lists(0).opaque.iter().map(|i| i.packed & 0xFF).collect();
        faces.sort_unstable();
        assert_eq!(faces, vec![0, 1, 2, 3, 4, 5]);
        for inst in mesher.chunk_lists(0).opaque.iter() {
            assert_eq!(inst.origin(), Vec3::new(3.0, 3.0, 3.0));
            assert_eq!(inst.color(), 0x80_40_20);
        }
    }

    #[test]
    fn test_floor_hides_bottom_face() {
        let g = grid([8, 8, 8], [8, 8, 8]);
        g.set_world(IVec3::new(3, 0, 3), sand());
        let mesher = Mesher::new(&g, Dispatcher::default());
        assert_eq!(mesher.rebuild(&g).opaque, 5);
        assert!(mesher
            .chunk_lists(0)
            .opaque
            .iter()
            .all(|i| i.face() != Face::Down));
    }

    #[test]
    fn test_enclosed_voxel_emits_nothing() {
        let g = grid([8, 8, 8], [8, 8, 8]);
        let center = IVec3::new(4, 4, 4);
        for face in ALL_FACES {
            g.set_world(center + face.offset(), sand());
        }
        g.set_world(center, sand());
        let mesher = Mesher::new(&g, Dispatcher::default());
        mesher.rebuild(&g);
        assert!(mesher
            .chunk_lists(0)
            .opaque
            .iter()
            .all(|i| i.origin() != center.as_vec3()));
        // Six arms with five faces each.
        assert_eq!(mesher.chunk_lists(0).opaque.len(), 30);
    }

    #[test]
    fn test_liquid_faces_go_to_transparent_list() {
        let g = grid([8, 8, 8], [8, 8, 8]);
        g.set_world(IVec3::new(2, 2, 2), water());
        g.set_world(IVec3::new(3, 2, 2), sand());
        let mesher = Mesher::new(&g, Dispatcher::default());
        let stats = mesher.rebuild(&g);
        // Water hides only the face touching sand; sand shows all six.
        assert_eq!(stats.transparent, 5);
        assert_eq!(stats.opaque, 6);
    }

    #[test]
    fn test_adjacent_liquids_hide_shared_faces() {
        let g = grid([8, 8, 8], [8, 8, 8]);
        g.set_world(IVec3::new(2, 2, 2), water());
        g.set_world(IVec3::new(2, 3, 2), water());
        let mesher = Mesher::new(&g, Dispatcher::default());
        assert_eq!(mesher.rebuild(&g).transparent, 10);
    }

    #[test]
    fn test_faces_hidden_across_chunk_seam() {
        let g = grid([16, 4, 8], [8, 4, 8]);
        g.set_world(IVec3::new(7, 1, 3), sand());
        g.set_world(IVec3::new(8, 1, 3), sand());
        let mesher = Mesher::new(&g, Dispatcher::new(DispatchMode::Parallel));
        let stats = mesher.rebuild(&g);
        assert_eq!(stats.opaque, 10);
        assert!(mesher.chunk_lists(0).opaque.iter().all(|i| i.face() != Face::East));
        assert!(mesher.chunk_lists(1).opaque.iter().all(|i| i.face() != Face::West));
    }

    #[test]
    fn test_world_edge_faces_are_emitted() {
        let g = grid([8, 4, 8], [8, 4, 8]);
        g.set_world(IVec3::new(0, 3, 0), sand());
        let mesher = Mesher::new(&g, Dispatcher::default());
        assert_eq!(mesher.rebuild(&g).opaque, 6);
    }

    #[test]
    fn test_reset_then_mesh_is_empty() {
        let g = grid([16, 4, 16], [8, 4, 8]);
        for x in 0..16 {
            g.set_world(IVec3::new(x, 1, x), water());
            g.set_world(IVec3::new(x, 2, 3), sand());
        }
        let mesher = Mesher::new(&g, Dispatcher::default());
        assert!(mesher.rebuild(&g).opaque > 0);
        g.reset();
        mesher.rebuild(&g);
        for list in mesher.all_lists() {
            assert_eq!(list.header().instance_count, 0);
        }
    }

    #[test]
    fn test_checkerboard_overflow_is_clamped() {
        // Every other voxel filled: 3 faces per voxel on average exceeds half the volume.
        let g = grid([4, 4, 4], [4, 4, 4]);
        for z in 0..4 {
            for y in 0..4 {
                for x in 0..4 {
                    if (x + y + z) % 2 == 0 {
                        g.set_world(IVec3::new(x, y, z), sand());
                    }
                }
            }
        }
        let mesher = Mesher::new(&g, Dispatcher::default());
        let stats = mesher.rebuild(&g);
        assert!(stats.overflowed);
        let list = &mesher.chunk_lists(0).opaque;
        assert_eq!(list.len(), list.capacity());
        assert!(list.header().instance_count as usize <= list.capacity());
    }
}
