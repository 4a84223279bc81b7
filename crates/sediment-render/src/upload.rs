//! GPU buffers holding the instance lists for an external renderer.
//!
//! Each list gets one buffer: the indirect-draw header at offset 0 followed by
//! the instance array, so a renderer can bind it as vertex data and issue
//! `draw_indirect` straight from it.

use crate::instances::{DrawHeader, InstanceList};
use crate::mesher::Mesher;

/// Byte offset of the instance array inside a list buffer.
pub const INSTANCES_OFFSET: u64 = std::mem::size_of::<DrawHeader>() as u64;

pub fn instance_buffer_usage() -> wgpu::BufferUsages {
    wgpu::BufferUsages::INDIRECT
        | wgpu::BufferUsages::VERTEX
        | wgpu::BufferUsages::STORAGE
        | wgpu::BufferUsages::COPY_DST
}

/// Opaque and transparent buffers of one chunk.
pub struct ChunkBuffers {
    pub opaque: wgpu::Buffer,
    pub transparent: wgpu::Buffer,
}

/// One buffer pair per chunk, created once at full capacity.
pub struct InstanceUpload {
    chunks: Vec<ChunkBuffers>,
}

fn create_list_buffer(device: &wgpu::Device, list: &InstanceList, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: list.byte_capacity(),
        usage: instance_buffer_usage(),
        mapped_at_creation: false,
    })
}

impl InstanceUpload {
    pub fn new(device: &wgpu::Device, mesher: &Mesher) -> Self {
        let chunks = mesher
            .chunks()
            .iter()
            .enumerate()
            .map(|(i, c)| ChunkBuffers {
                opaque: create_list_buffer(device, &c.opaque, &format!("instances-opaque-{i}")),
                transparent: create_list_buffer(
                    device,
                    &c.transparent,
                    &format!("instances-transparent-{i}"),
                ),
            })
            .collect();
        Self { chunks }
    }

    pub fn chunk(&self, index: usize) -> &ChunkBuffers {
        &self.chunks[index]
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Copy every header and its live instances. Returns the bytes queued.
    pub fn write(&self, queue: &wgpu::Queue, mesher: &Mesher) -> u64 {
        let mut written = 0u64;
        for (buffers, lists) in self.chunks.iter().zip(mesher.chunks()) {
            for (buffer, list) in [
                (&buffers.opaque, &lists.opaque),
                (&buffers.transparent, &lists.transparent),
            ] {
                let bytes = list.to_bytes();
                queue.write_buffer(buffer, 0, &bytes);
                written += bytes.len() as u64;
            }
        }
        log::trace!("InstanceUpload: {written} bytes queued");
        written
    }
}
