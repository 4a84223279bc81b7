pub mod brush;
pub mod movement;
