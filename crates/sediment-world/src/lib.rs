pub mod chunk;
pub mod dispatch;
pub mod generator;
pub mod grid;
pub mod voxel;

pub use chunk::{Chunk, Neighbor};
pub use dispatch::Dispatcher;
pub use generator::Generator;
pub use grid::{CellRef, Grid};
pub use sediment_core::config::DispatchMode;
pub use voxel::VoxelBuffer;
