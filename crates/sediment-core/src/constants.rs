//! Single source of truth for shared constants.

/// Empty voxel sentinel. Every claim in the automaton is a CAS against this value.
pub const EMPTY: u32 = 0;

/// Material tag for empty space (low byte of a voxel word).
pub const MATERIAL_EMPTY: u32 = 0;

/// Material tag for granular matter (sand-like).
pub const MATERIAL_GRANULAR: u32 = 1;

/// Material tag for liquid.
pub const MATERIAL_LIQUID: u32 = 2;

/// Mask selecting the material byte of a voxel word.
pub const MATERIAL_MASK: u32 = 0xFF;

/// Mask selecting the `[R][G][B]` bytes of a voxel word.
pub const COLOR_MASK: u32 = 0xFFFF_FF00;

/// Value returned for reads one layer below the world floor. Any non-empty
/// granular value works; the floor must look occupied.
pub const FLOOR_SENTINEL: u32 = MATERIAL_GRANULAR;

/// Vertices drawn per face instance (two triangles).
pub const VERTICES_PER_FACE: u32 = 6;

/// Workers per group in the raycast intersection kernel.
pub const RAYCAST_WORKGROUP_SIZE: u32 = 256;

/// Default fixed-point precision for raycast distances (distance units per step).
pub const DEFAULT_RAY_PRECISION: f32 = 0.0001;

/// Sentinel distance meaning "no hit".
pub const NO_HIT_DISTANCE: u32 = u32::MAX;

/// Size of the precomputed brush color-noise table.
pub const BRUSH_NOISE_TABLE_SIZE: usize = 256;

/// Number of octaves in the terrain FBM.
pub const TERRAIN_OCTAVES: u32 = 3;

/// Amplitude multiplier per octave.
pub const TERRAIN_GAIN: f64 = 0.5;

/// Frequency multiplier per octave.
pub const TERRAIN_LACUNARITY: f64 = 2.0;

/// Spatial frequency of the terrain height field.
pub const TERRAIN_FREQUENCY: f64 = 0.005;

/// Spatial frequency of the color perturbation field.
pub const COLOR_NOISE_FREQUENCY: f64 = 0.1;

/// Maximum darkening applied to terrain colors by the color field.
pub const TERRAIN_COLOR_NOISE: f64 = 48.0;

/// Maximum darkening applied to water colors by the color field.
pub const WATER_COLOR_NOISE: f64 = 32.0;

/// Default world extents in voxels (x, y, z).
pub const DEFAULT_WORLD_SIZE: [u32; 3] = [320, 64, 320];

/// Default chunk extents in voxels (x, y, z). Height must match the world.
pub const DEFAULT_CHUNK_SIZE: [u32; 3] = [64, 64, 64];

/// How far above the cursor painted material is dropped.
pub const BRUSH_DROP_HEIGHT: i32 = 32;
