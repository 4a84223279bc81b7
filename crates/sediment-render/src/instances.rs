//! Fixed-capacity face instance lists with a lock-free append.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use glam::Vec3;
use sediment_core::constants::{COLOR_MASK, MATERIAL_MASK, VERTICES_PER_FACE};
use sediment_core::direction::Face;

/// Indirect-draw header at the start of every list. Layout matches
/// `wgpu::util::DrawIndirectArgs`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawHeader {
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

/// One drawable face: voxel center and `color << 8 | face`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    pub origin: [f32; 3],
    pub packed: u32,
}

impl Instance {
    /// Keeps the color bytes of a voxel word and replaces its low byte with
    /// the face index.
    pub fn new(origin: Vec3, value: u32, face: Face) -> Self {
        Self {
            origin: origin.to_array(),
            packed: (value & COLOR_MASK) | face.index(),
        }
    }

    pub fn face(&self) -> Face {
        Face::from_index(self.packed & MATERIAL_MASK)
    }

    /// Color as `0xRRGGBB`.
    pub fn color(&self) -> u32 {
        self.packed >> 8
    }

    pub fn origin(&self) -> Vec3 {
        Vec3::from_array(self.origin)
    }
}

/// Instance storage written concurrently at distinct indices.
struct Slot([AtomicU32; 4]);

impl Slot {
    fn empty() -> Self {
        Slot([
            AtomicU32::new(0),
            AtomicU32::new(0),
            AtomicU32::new(0),
            AtomicU32::new(0),
        ])
    }

    fn write(&self, instance: &Instance) {
        for (cell, v) in self.0[..3].iter().zip(instance.origin) {
            cell.store(v.to_bits(), Ordering::Relaxed);
        }
        self.0[3].store(instance.packed, Ordering::Relaxed);
    }

    fn read(&self) -> Instance {
        Instance {
            origin: [
                f32::from_bits(self.0[0].load(Ordering::Relaxed)),
                f32::from_bits(self.0[1].load(Ordering::Relaxed)),
                f32::from_bits(self.0[2].load(Ordering::Relaxed)),
            ],
            packed: self.0[3].load(Ordering::Relaxed),
        }
    }
}

/// Header plus a bounded instance array. `push` takes an index with one
/// atomic fetch-add, so no index is ever handed out twice.
pub struct InstanceList {
    count: AtomicU32,
    overflowed: AtomicBool,
    slots: Box<[Slot]>,
}

impl InstanceList {
    pub fn new(capacity: usize) -> Self {
        Self {
            count: AtomicU32::new(0),
            overflowed: AtomicBool::new(false),
            slots: (0..capacity).map(|_| Slot::empty()).collect(),
        }
    }

    /// Capacity for a chunk of `voxels` voxels: `ceil(voxels / 2)`.
    pub fn for_chunk(voxels: usize) -> Self {
        Self::new(voxels.div_ceil(2))
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Zero the count. Slot contents are left stale.
    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
        self.overflowed.store(false, Ordering::Relaxed);
    }

    /// Append one instance. Returns its index, or `None` when the list is
    /// full (the instance is dropped and the overflow flag set).
    pub fn push(&self, instance: Instance) -> Option<u32> {
        let index = self.count.fetch_add(1, Ordering::Relaxed);
        match self.slots.get(index as usize) {
            Some(slot) => {
                slot.write(&instance);
                Some(index)
            }
            None => {
                self.overflowed.store(true, Ordering::Relaxed);
                None
            }
        }
    }

    /// Live instances, never more than the capacity.
    pub fn len(&self) -> usize {
        (self.count.load(Ordering::Relaxed) as usize).min(self.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed.load(Ordering::Relaxed)
    }

    pub fn get(&self, index: usize) -> Option<Instance> {
        (index < self.len()).then(|| self.slots[index].read())
    }

    pub fn iter(&self) -> impl Iterator<Item = Instance> + '_ {
        self.slots[..self.len()].iter().map(Slot::read)
    }

    pub fn header(&self) -> DrawHeader {
        DrawHeader {
            vertex_count: VERTICES_PER_FACE,
            instance_count: self.len() as u32,
            first_vertex: 0,
            first_instance: 0,
        }
    }

    /// Header followed by the live instances, ready for upload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let instances: Vec<Instance> = self.iter().collect();
        let mut bytes = Vec::with_capacity(
            std::mem::size_of::<DrawHeader>() + std::mem::size_of_val(instances.as_slice()),
        );
        bytes.extend_from_slice(bytemuck::bytes_of(&self.header()));
        bytes.extend_from_slice(bytemuck::cast_slice(&instances));
        bytes
    }

    /// Buffer size for header plus full capacity.
    pub fn byte_capacity(&self) -> u64 {
        (std::mem::size_of::<DrawHeader>() + self.capacity() * std::mem::size_of::<Instance>()) as u64
    }
}

/// The two lists built for one chunk.
pub struct ChunkInstances {
    pub opaque: InstanceList,
    pub transparent: InstanceList,
}

impl ChunkInstances {
    pub fn for_chunk(voxels: usize) -> Self {
        Self {
            opaque: InstanceList::for_chunk(voxels),
            transparent: InstanceList::for_chunk(voxels),
        }
    }

    pub fn reset(&self) {
        self.opaque.reset();
        self.transparent.reset();
    }
}
