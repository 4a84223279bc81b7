//! RON-loadable configuration for world construction, terrain generation and
//! brush tools.

use glam::{IVec3, UVec3};
use serde::{Deserialize, Serialize};

use crate::constants::{
    BRUSH_DROP_HEIGHT, DEFAULT_CHUNK_SIZE, DEFAULT_RAY_PRECISION, DEFAULT_WORLD_SIZE,
};
use crate::error::SedimentError;

/// How kernel workers are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DispatchMode {
    /// One task per worker on the rayon pool; no ordering between workers.
    #[default]
    Parallel,
    /// Workers run in index order on the calling thread. One valid schedule
    /// of the parallel model, reproducible run to run.
    Serial,
}

/// World construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// World extents in voxels (x, y, z).
    pub size: [u32; 3],
    /// Chunk extents in voxels. Height must equal the world height.
    pub chunk_size: [u32; 3],
    pub dispatch: DispatchMode,
    /// Raycast distance quantum in world units.
    pub ray_precision: f32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WORLD_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            dispatch: DispatchMode::Parallel,
            ray_precision: DEFAULT_RAY_PRECISION,
        }
    }
}

impl VolumeConfig {
    pub fn new(size: [u32; 3], chunk_size: [u32; 3]) -> Self {
        Self {
            size,
            chunk_size,
            ..Default::default()
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn world_size(&self) -> UVec3 {
        UVec3::from_array(self.size)
    }

    pub fn chunk_extent(&self) -> UVec3 {
        UVec3::from_array(self.chunk_size)
    }

    /// Check the topology constraints (non-zero extents, chunk height equal to
    /// world height, x/z extents divisible by the chunk extents) and that the
    /// ray precision is a usable fixed-point step.
    pub fn validate(&self) -> Result<(), SedimentError> {
        if self.size.contains(&0) || self.chunk_size.contains(&0) {
            return Err(SedimentError::ZeroExtent {
                world: self.size,
                chunk: self.chunk_size,
            });
        }
        if self.chunk_size[1] != self.size[1] {
            return Err(SedimentError::ChunkHeightMismatch {
                chunk: self.chunk_size[1],
                world: self.size[1],
            });
        }
        if !self.ray_precision.is_finite() || self.ray_precision <= 0.0 {
            return Err(SedimentError::InvalidPrecision(self.ray_precision));
        }
        for (axis, i) in [('x', 0usize), ('z', 2usize)] {
            if self.size[i] % self.chunk_size[i] != 0 {
                return Err(SedimentError::NotDivisible {
                    axis,
                    world: self.size[i],
                    chunk: self.chunk_size[i],
                });
            }
        }
        Ok(())
    }

    /// Parse from a RON string. Missing fields take their defaults.
    pub fn from_ron(ron_str: &str) -> Result<Self, SedimentError> {
        let options = ron::Options::default();
        options
            .from_str(ron_str)
            .map_err(|e| SedimentError::ConfigParse(e.to_string()))
    }
}

/// Terrain generator parameters. Colors are `0xRRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    /// Four color stops from the floor upward.
    pub palette: [u32; 4],
    /// Offset added to every sampled world position.
    pub seed: [i32; 3],
    pub water_color: u32,
    /// Layers strictly below this height fill with liquid above the terrain.
    pub water_level: u32,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            palette: [0x5B_4A_3A, 0x9C_7A_4B, 0xC2_B2_80, 0xE8_E0_C8],
            seed: [0, 0, 0],
            water_color: 0x33_66_CC,
            water_level: 24,
        }
    }
}

impl GeneratorParams {
    pub fn seed_offset(&self) -> IVec3 {
        IVec3::from_array(self.seed)
    }

    pub fn from_ron(ron_str: &str) -> Result<Self, SedimentError> {
        let options = ron::Options::default();
        options
            .from_str(ron_str)
            .map_err(|e| SedimentError::ConfigParse(e.to_string()))
    }
}

/// Color, radius and noise preset of one brush tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefaults {
    pub color: u32,
    pub radius: u32,
    pub noise: u32,
}

/// Presets for the three brush tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushDefaults {
    pub sand: ToolDefaults,
    pub water: ToolDefaults,
    pub erase: ToolDefaults,
    /// Layers above the cursor at which sand and water are dropped.
    pub drop_height: i32,
}

impl Default for BrushDefaults {
    fn default() -> Self {
        Self {
            sand: ToolDefaults {
                color: 0xC2_B2_80,
                radius: 12,
                noise: 24,
            },
            water: ToolDefaults {
                color: 0x33_66_CC,
                radius: 12,
                noise: 0,
            },
            erase: ToolDefaults {
                color: 0,
                radius: 12,
                noise: 0,
            },
            drop_height: BRUSH_DROP_HEIGHT,
        }
    }
}

impl BrushDefaults {
    pub fn from_ron(ron_str: &str) -> Result<Self, SedimentError> {
        let options = ron::Options::default();
        options
            .from_str(ron_str)
            .map_err(|e| SedimentError::ConfigParse(e.to_string()))
    }
}
