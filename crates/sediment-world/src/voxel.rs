use std::sync::atomic::{AtomicU32, Ordering};

use sediment_core::constants::EMPTY;

/// Dense array of atomic voxel words.
///
/// All kernel mutation goes through load/store/compare-exchange on single
/// cells. Ordering between workers is only established by a dispatch
/// completing, so every access is relaxed.
pub struct VoxelBuffer {
    cells: Box<[AtomicU32]>,
}

impl VoxelBuffer {
    /// Zero-filled buffer of `len` voxels.
    pub fn new(len: usize) -> Self {
        let cells = (0..len).map(|_| AtomicU32::new(EMPTY)).collect();
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn load(&self, index: usize) -> u32 {
        self.cells[index].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn store(&self, index: usize, value: u32) {
        self.cells[index].store(value, Ordering::Relaxed);
    }

    /// Replace the cell with `new` only if it currently holds `current`.
    /// Returns whether the exchange happened.
    #[inline]
    pub fn compare_exchange(&self, index: usize, current: u32, new: u32) -> bool {
        self.cells[index]
            .compare_exchange(current, new, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }

    /// Overwrite every cell.
    pub fn fill(&self, value: u32) {
        for cell in self.cells.iter() {
            cell.store(value, Ordering::Relaxed);
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<u32> {
        self.cells.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }

    /// Number of non-empty cells.
    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.load(Ordering::Relaxed) != EMPTY)
            .count()
    }
}

impl std::fmt::Debug for VoxelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelBuffer")
            .field("len", &self.len())
            .field("occupied", &self.occupied())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_zeroed() {
        let buf = VoxelBuffer::new(8);
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.snapshot(), vec![0; 8]);
        assert_eq!(buf.occupied(), 0);
    }

    #[test]
    fn test_compare_exchange_only_once() {
        let buf = VoxelBuffer::new(1);
        assert!(buf.compare_exchange(0, EMPTY, 0x1234_5601));
        assert!(
            !buf.compare_exchange(0, EMPTY, 0x6543_2101),
            "second claim of an occupied cell must fail"
        );
        assert_eq!(buf.load(0), 0x1234_5601);
    }

    #[test]
    fn test_fill_and_store() {
        let buf = VoxelBuffer::new(4);
        buf.fill(7);
        buf.store(2, 0);
        assert_eq!(buf.snapshot(), vec![7, 7, 0, 7]);
        assert_eq!(buf.occupied(), 3);
    }
}
