use thiserror::Error;

/// Errors raised while building a world or loading its configuration.
///
/// Kernels never produce errors: a failed voxel move is an expected outcome.
#[derive(Debug, Error, PartialEq)]
pub enum SedimentError {
    #[error("world and chunk extents must be non-zero (world {world:?}, chunk {chunk:?})")]
    ZeroExtent { world: [u32; 3], chunk: [u32; 3] },

    #[error("chunk height {chunk} must equal world height {world}")]
    ChunkHeightMismatch { chunk: u32, world: u32 },

    #[error("world {axis} extent {world} is not a multiple of chunk extent {chunk}")]
    NotDivisible { axis: char, world: u32, chunk: u32 },

    #[error("ray precision must be finite and positive, got {0}")]
    InvalidPrecision(f32),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("parallel compute backend unavailable: {0}")]
    BackendUnavailable(String),
}
