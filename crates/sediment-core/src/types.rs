use glam::IVec2;

use crate::constants::{COLOR_MASK, MATERIAL_EMPTY, MATERIAL_GRANULAR, MATERIAL_LIQUID, MATERIAL_MASK};

/// Chunk coordinate on the x/z chunk lattice.
pub type ChunkCoord = IVec2;

/// Kind of matter held by a voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Material {
    #[default]
    Empty = 0,
    /// Falls and piles.
    Granular = 1,
    /// Falls, spreads over supported columns, and evaporates when buried.
    Liquid = 2,
}

impl Material {
    /// Decode the material byte of a voxel word. Unknown tags fall back to
    /// granular, which is how the automaton treats them.
    pub fn from_tag(tag: u32) -> Self {
        match tag & MATERIAL_MASK {
            MATERIAL_EMPTY => Material::Empty,
            MATERIAL_LIQUID => Material::Liquid,
            _ => Material::Granular,
        }
    }

    pub fn tag(self) -> u32 {
        match self {
            Material::Empty => MATERIAL_EMPTY,
            Material::Granular => MATERIAL_GRANULAR,
            Material::Liquid => MATERIAL_LIQUID,
        }
    }
}

/// One voxel word: `[R][G][B][material]`, red in the high byte.
///
/// The word `0` is the only empty value; color bytes of an empty voxel are
/// always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Voxel(pub u32);

impl Voxel {
    pub const EMPTY: Voxel = Voxel(0);

    /// Pack a `0xRRGGBB` color with a material. Empty material always yields
    /// the empty word regardless of color.
    pub fn new(color: u32, material: Material) -> Self {
        if material == Material::Empty {
            return Self::EMPTY;
        }
        Voxel(((color << 8) & COLOR_MASK) | material.tag())
    }

    pub fn material(self) -> Material {
        if self.0 == 0 {
            Material::Empty
        } else if self.is_liquid() {
            Material::Liquid
        } else {
            Material::Granular
        }
    }

    /// Color as `0xRRGGBB`.
    pub fn color(self) -> u32 {
        self.0 >> 8
    }

    pub fn rgb(self) -> [u8; 3] {
        [(self.0 >> 24) as u8, (self.0 >> 16) as u8, (self.0 >> 8) as u8]
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_liquid(self) -> bool {
        self.0 & MATERIAL_MASK == MATERIAL_LIQUID
    }

    pub fn is_granular(self) -> bool {
        self.0 != 0 && !self.is_liquid()
    }
}

impl From<u32> for Voxel {
    fn from(raw: u32) -> Self {
        Voxel(raw)
    }
}

impl From<Voxel> for u32 {
    fn from(voxel: Voxel) -> Self {
        voxel.0
    }
}
