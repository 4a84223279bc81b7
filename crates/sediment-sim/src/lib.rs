pub mod conflict;
pub mod passes;
pub mod pipeline;
pub mod tools;

mod rng;

#[cfg(test)]
mod test_harness;

pub use conflict::ScanCounter;
pub use passes::brush::{Brush, BrushCommand};
pub use pipeline::{SimUniforms, Simulation};
pub use tools::Tool;
