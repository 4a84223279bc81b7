//! Asynchronous readback of raycast results.
//!
//! The query kernels leave two words behind: the fixed-point distance and the
//! face index. Decoding happens off the calling thread and is delivered
//! through a channel, so a caller can poll once per frame or drop a stale
//! request.

use std::sync::mpsc;

use glam::{IVec3, Vec3};
use sediment_core::constants::NO_HIT_DISTANCE;
use sediment_core::direction::Face;

use crate::raycast::Ray;

/// A decoded hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub position: Vec3,
    pub normal: Vec3,
    pub face: Face,
}

impl RayHit {
    pub fn new(ray: &Ray, distance: f32, face: Face) -> Self {
        Self {
            distance,
            position: ray.at(distance),
            normal: face.normal(),
            face,
        }
    }

    /// The empty cell in front of the hit face, where a tool acts.
    pub fn cursor_voxel(&self) -> IVec3 {
        (self.position + self.normal * 0.5).round().as_ivec3()
    }
}

/// Decode the raw `[distance, face]` words. The sentinel distance means no hit.
pub fn decode_readback(ray: &Ray, words: [u32; 2], precision: f32) -> Option<RayHit> {
    let [distance, face] = words;
    if distance == NO_HIT_DISTANCE {
        return None;
    }
    Some(RayHit::new(ray, distance as f32 * precision, Face::from_index(face)))
}

/// A raycast result in flight.
pub struct PendingHit {
    rx: mpsc::Receiver<Option<RayHit>>,
    result: Option<Option<RayHit>>,
}

impl PendingHit {
    /// Start decoding on the rayon pool.
    pub(crate) fn spawn(ray: Ray, words: [u32; 2], precision: f32) -> Self {
        let (tx, rx) = mpsc::channel();
        rayon::spawn(move || {
            let _ = tx.send(decode_readback(&ray, words, precision));
        });
        Self { rx, result: None }
    }

    /// Non-blocking. `None` while the readback is still in flight;
    /// `Some(None)` for a miss.
    pub fn poll(&mut self) -> Option<Option<RayHit>> {
        if self.result.is_none() {
            if let Ok(hit) = self.rx.try_recv() {
                self.result = Some(hit);
            }
        }
        self.result
    }

    /// Block until the result arrives.
    pub fn wait(mut self) -> Option<RayHit> {
        if let Some(hit) = self.result {
            return hit;
        }
        self.rx.recv().ok().flatten()
    }
}
