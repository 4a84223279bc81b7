//! Chunked falling-sand voxel volume.
//!
//! [`Volume`] owns the world and the kernels that act on it and runs them in
//! frame order: brush strokes as they arrive, then the per-layer simulation,
//! then a full mesh rebuild. Raycasts read the instance lists of the last
//! rebuild.

pub mod backend;

use glam::{IVec3, UVec3};
use sediment_core::direction::Face;
use sediment_render::raycast::ground_plane;
use sediment_world::Generator;

pub use sediment_core::{
    BrushDefaults, DispatchMode, GeneratorParams, Material, SedimentError, ToolDefaults,
    VolumeConfig, Voxel,
};
pub use sediment_render::{
    ChunkInstances, InstanceList, InstanceUpload, MeshStats, Mesher, PendingHit, Ray, RayHit,
    Raycaster,
};
pub use sediment_sim::{Brush, BrushCommand, Simulation, Tool};
pub use sediment_world::{Dispatcher, Grid};

/// Counters for one finished frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub opaque: usize,
    pub transparent: usize,
    pub overflowed: bool,
}

pub struct Volume {
    grid: Grid,
    dispatcher: Dispatcher,
    generator: Generator,
    brush: Brush,
    brush_defaults: BrushDefaults,
    simulation: Simulation,
    mesher: Mesher,
    raycaster: Raycaster,
}

impl Volume {
    /// Build an empty world. Fails on an invalid chunk layout; nothing is
    /// allocated in that case.
    pub fn new(config: &VolumeConfig) -> Result<Self, SedimentError> {
        let grid = Grid::new(config)?;
        let dispatcher = Dispatcher::new(config.dispatch);
        let simulation = Simulation::new(&grid, dispatcher);
        let mesher = Mesher::new(&grid, dispatcher);
        let raycaster = Raycaster::new(dispatcher, config.ray_precision);
        Ok(Self {
            grid,
            dispatcher,
            generator: Generator::new(),
            brush: Brush::default(),
            brush_defaults: BrushDefaults::default(),
            simulation,
            mesher,
            raycaster,
        })
    }

    pub fn with_brush_defaults(mut self, defaults: BrushDefaults) -> Self {
        self.brush_defaults = defaults;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn world_size(&self) -> UVec3 {
        self.grid.world_size()
    }

    pub fn mesher(&self) -> &Mesher {
        &self.mesher
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn brush_defaults(&self) -> &BrushDefaults {
        &self.brush_defaults
    }

    /// Instance lists of one chunk from the last rebuild.
    pub fn instances(&self, chunk: usize) -> &ChunkInstances {
        self.mesher.chunk_lists(chunk)
    }

    /// Overwrite the whole world with generated terrain and rebuild the mesh.
    pub fn generate(&mut self, params: &GeneratorParams) -> MeshStats {
        self.generator.generate(&self.grid, &self.dispatcher, params);
        self.mesher.rebuild(&self.grid)
    }

    /// Apply one stroke. Returns the number of voxels written.
    pub fn brush(&self, command: &BrushCommand) -> usize {
        self.brush.apply(&self.grid, &self.dispatcher, command)
    }

    /// Apply `tool` at a resolved cursor voxel using the configured presets.
    pub fn apply_tool(&self, tool: Tool, cursor: IVec3) -> usize {
        let command = tool.command(cursor, &self.brush_defaults, self.grid.world_size().y);
        self.brush(&command)
    }

    /// Run every layer of the automaton once.
    pub fn simulate(&mut self) {
        self.simulation.step(&self.grid);
    }

    /// Simulate every layer once, then rebuild the mesh.
    pub fn frame(&mut self) -> FrameStats {
        self.simulate();
        let mesh = self.remesh();
        let stats = FrameStats {
            frame: self.simulation.frame(),
            opaque: mesh.opaque,
            transparent: mesh.transparent,
            overflowed: mesh.overflowed,
        };
        log::debug!(
            "Frame {}: {} opaque, {} transparent instances",
            stats.frame,
            stats.opaque,
            stats.transparent
        );
        stats
    }

    /// Rebuild the mesh without simulating.
    pub fn remesh(&self) -> MeshStats {
        self.mesher.rebuild(&self.grid)
    }

    /// Zero every voxel and restart the layer cycle. Instance lists keep
    /// their contents until the next rebuild.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.simulation.reset();
        log::info!("Volume reset");
    }

    /// Cast against every opaque and transparent list of the last rebuild.
    pub fn submit(&mut self, ray: Ray) -> PendingHit {
        self.raycaster.submit(ray, self.mesher.all_lists())
    }

    /// Host-side hit against the ground plane under the world.
    pub fn pick_cpu(&self, ray: &Ray) -> Option<RayHit> {
        Raycaster::compute_cpu(ray, &ground_plane(self.grid.world_size()), Face::Up)
    }

    /// Blocking pick: the voxel hit, else the ground plane.
    pub fn pick(&mut self, ray: Ray) -> Option<RayHit> {
        self.submit(ray).wait().or_else(|| self.pick_cpu(&ray))
    }
}
