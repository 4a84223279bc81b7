pub mod config;
pub mod constants;
pub mod direction;
pub mod error;
pub mod math;
pub mod types;

pub use config::{BrushDefaults, DispatchMode, GeneratorParams, ToolDefaults, VolumeConfig};
pub use direction::{Face, Lateral};
pub use error::SedimentError;
pub use types::{Material, Voxel};
