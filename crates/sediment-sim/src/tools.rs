use glam::IVec3;
use sediment_core::config::{BrushDefaults, ToolDefaults};
use sediment_core::types::Material;

use crate::passes::brush::BrushCommand;

/// The three user tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Sand,
    Water,
    Erase,
}

impl Tool {
    pub fn material(self) -> Material {
        match self {
            Tool::Sand => Material::Granular,
            Tool::Water => Material::Liquid,
            Tool::Erase => Material::Empty,
        }
    }

    pub fn defaults(self, presets: &BrushDefaults) -> ToolDefaults {
        match self {
            Tool::Sand => presets.sand,
            Tool::Water => presets.water,
            Tool::Erase => presets.erase,
        }
    }

    /// Build the stroke for a click on `cursor`. Sand and water are dropped
    /// `drop_height` layers above the cursor, clamped to the top layer;
    /// erasing happens at the cursor itself.
    pub fn command(self, cursor: IVec3, presets: &BrushDefaults, world_height: u32) -> BrushCommand {
        let d = self.defaults(presets);
        match self {
            Tool::Erase => BrushCommand::erase(cursor, d.radius),
            Tool::Sand | Tool::Water => {
                let top = world_height as i32 - 1;
                let position = IVec3::new(cursor.x, (cursor.y + presets.drop_height).min(top), cursor.z);
                BrushCommand::paint(position, self.material(), d.color, d.radius, d.noise)
            }
        }
    }
}
