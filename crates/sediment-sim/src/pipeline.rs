use std::sync::atomic::{AtomicU32, Ordering};

use sediment_world::{Dispatcher, Grid};

use crate::conflict::ScanCounter;
use crate::passes::movement;

/// Per-frame automaton state shared by every worker: the scan-order counter
/// and the active layer.
#[derive(Debug)]
pub struct SimUniforms {
    pub counter: ScanCounter,
    layer: AtomicU32,
}

impl SimUniforms {
    /// The layer starts at the top so the first setup advances it to 0.
    fn new(height: u32) -> Self {
        Self {
            counter: ScanCounter::new(),
            layer: AtomicU32::new(height.saturating_sub(1)),
        }
    }

    pub fn layer(&self) -> u32 {
        self.layer.load(Ordering::Relaxed)
    }
}

/// Runs the automaton: every frame visits each layer once, bottom to top,
/// with all chunks of a layer in one dispatch.
pub struct Simulation {
    dispatcher: Dispatcher,
    uniforms: SimUniforms,
    height: u32,
    frame: u64,
}

impl Simulation {
    pub fn new(grid: &Grid, dispatcher: Dispatcher) -> Self {
        let height = grid.world_size().y;
        Self {
            dispatcher,
            uniforms: SimUniforms::new(height),
            height,
            frame: 0,
        }
    }

    /// Single-worker setup kernel: advance the active layer, wrapping at the top.
    fn setup(&self) {
        let height = self.height;
        let layer = &self.uniforms.layer;
        self.dispatcher.run(1, |_| {
            let next = (layer.load(Ordering::Relaxed) + 1) % height;
            layer.store(next, Ordering::Relaxed);
        });
    }

    /// Advance one layer and run the movement kernel on it. Returns the layer.
    pub fn step_layer(&self, grid: &Grid) -> u32 {
        self.setup();
        let y = self.uniforms.layer();
        let counter = &self.uniforms.counter;
        self.dispatcher.run_layer(grid, y as i32, |chunk, pos| {
            movement::step_voxel(grid, counter, chunk, pos);
        });
        y
    }

    /// One full frame: `height` layers, each fenced by its dispatch.
    pub fn step(&mut self, grid: &Grid) {
        for _ in 0..self.height {
            self.step_layer(grid);
        }
        self.frame += 1;
        log::trace!(
            "Simulation: frame {} done, scan counter at {}",
            self.frame,
            self.uniforms.counter.current()
        );
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn uniforms(&self) -> &SimUniforms {
        &self.uniforms
    }

    /// Restart the layer cycle and the scan counter.
    pub fn reset(&mut self) {
        self.uniforms = SimUniforms::new(self.height);
        self.frame = 0;
    }
}
