use glam::{IVec3, UVec3};
use rayon::prelude::*;
use sediment_core::config::DispatchMode;
use sediment_core::math::index_to_local;

use crate::grid::Grid;

/// Launches kernels: one closure call per logical worker.
///
/// Returning from any `run*` method is the barrier between dispatches;
/// within one dispatch workers only coordinate through atomics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    mode: DispatchMode,
}

impl Dispatcher {
    pub fn new(mode: DispatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Run `kernel(i)` for every `i` in `0..workers`.
    pub fn run<F>(&self, workers: usize, kernel: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        match self.mode {
            DispatchMode::Parallel => (0..workers).into_par_iter().for_each(kernel),
            DispatchMode::Serial => (0..workers).for_each(kernel),
        }
    }

    /// Run `kernel(id)` over a 3D box of workers, x fastest.
    pub fn run_3d<F>(&self, extent: UVec3, kernel: F)
    where
        F: Fn(IVec3) + Sync + Send,
    {
        let workers = extent.element_product() as usize;
        self.run(workers, |i| kernel(index_to_local(i, extent)));
    }

    /// One worker per voxel of every chunk: `kernel(chunk, local)`.
    pub fn run_voxels<F>(&self, grid: &Grid, kernel: F)
    where
        F: Fn(usize, IVec3) + Sync + Send,
    {
        let cs = grid.chunk_size();
        let per_chunk = grid.chunk_volume();
        self.run(grid.chunk_count() * per_chunk, |i| {
            kernel(i / per_chunk, index_to_local(i % per_chunk, cs));
        });
    }

    /// One worker per column of every chunk at layer `y`: `kernel(chunk, local)`.
    pub fn run_layer<F>(&self, grid: &Grid, y: i32, kernel: F)
    where
        F: Fn(usize, IVec3) + Sync + Send,
    {
        let cs = grid.chunk_size();
        let per_chunk = (cs.x * cs.z) as usize;
        let sx = cs.x as usize;
        self.run(grid.chunk_count() * per_chunk, |i| {
            let column = i % per_chunk;
            let local = IVec3::new((column % sx) as i32, y, (column / sx) as i32);
            kernel(i / per_chunk, local);
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sediment_core::config::VolumeConfig;

    use super::*;

    #[test]
    fn test_run_visits_every_worker_once() {
        for mode in [DispatchMode::Parallel, DispatchMode::Serial] {
            let hits: Vec<AtomicUsize> = (0..100).map(|_| AtomicUsize::new(0)).collect();
            Dispatcher::new(mode).run(100, |i| {
                hits[i].fetch_add(1, Ordering::Relaxed);
            });
            assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1), "{mode:?}");
        }
    }

    #[test]
    fn test_serial_runs_in_index_order() {
        let next = AtomicUsize::new(0);
        Dispatcher::new(DispatchMode::Serial).run(50, |i| {
            assert_eq!(next.fetch_add(1, Ordering::Relaxed), i);
        });
    }

    #[test]
    fn test_run_layer_covers_all_columns() {
        let grid = Grid::new(&VolumeConfig::new([8, 4, 4], [4, 4, 4])).expect("grid");
        let count = AtomicUsize::new(0);
        Dispatcher::new(DispatchMode::Parallel).run_layer(&grid, 2, |chunk, local| {
            assert!(chunk < 2);
            assert_eq!(local.y, 2);
            assert!(local.x < 4 && local.z < 4);
            count.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(count.load(Ordering::Relaxed), 32);
    }

    #[test]
    fn test_run_voxels_covers_all_cells() {
        let grid = Grid::new(&VolumeConfig::new([8, 4, 4], [4, 4, 4])).expect("grid");
        Dispatcher::new(DispatchMode::Parallel).run_voxels(&grid, |chunk, local| {
            let world = grid.chunk(chunk).origin + local;
            grid.set_world(world, 1);
        });
        assert_eq!(grid.occupied(), 8 * 4 * 4);
    }

    #[test]
    fn test_run_3d_ids() {
        let sum = AtomicUsize::new(0);
        Dispatcher::new(DispatchMode::Serial).run_3d(UVec3::new(2, 2, 2), |id| {
            sum.fetch_add((id.x + id.y + id.z) as usize, Ordering::Relaxed);
        });
        assert_eq!(sum.load(Ordering::Relaxed), 12);
    }
}
