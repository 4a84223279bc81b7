use std::sync::atomic::{AtomicU32, Ordering};

use sediment_core::direction::{Lateral, SCAN_ORDER};

/// Shared rotating counter that decides where each voxel starts its
/// neighbor scan.
///
/// Every attempting voxel takes one ticket per probe phase, so contending
/// movers start from different directions.
#[derive(Debug, Default)]
pub struct ScanCounter {
    offset: AtomicU32,
}

impl ScanCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next ticket. Wraps on overflow.
    #[inline]
    pub fn next(&self) -> u32 {
        self.offset.fetch_add(1, Ordering::Relaxed)
    }

    pub fn current(&self) -> u32 {
        self.offset.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.offset.store(0, Ordering::Relaxed);
    }
}

/// Base scan order rotated by a ticket: entry `n` is `SCAN_ORDER[(n + o) % 4]`.
#[inline]
pub fn rotated_scan(ticket: u32) -> [Lateral; 4] {
    let o = (ticket % 4) as usize;
    [
        SCAN_ORDER[o],
        SCAN_ORDER[(o + 1) % 4],
        SCAN_ORDER[(o + 2) % 4],
        SCAN_ORDER[(o + 3) % 4],
    ]
}
