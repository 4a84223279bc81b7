use glam::{IVec2, IVec3, Vec3};

/// One of the six voxel faces, in mesher face-index order.
///
/// The discriminant is the face index packed into the low byte of every
/// emitted instance, so the order is part of the instance format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// +z
    North = 0,
    /// +y
    Up = 1,
    /// -y
    Down = 2,
    /// -x
    West = 3,
    /// +x
    East = 4,
    /// -z
    South = 5,
}

/// All faces in index order.
pub const ALL_FACES: [Face; 6] = [
    Face::North,
    Face::Up,
    Face::Down,
    Face::West,
    Face::East,
    Face::South,
];

impl Face {
    /// Decode a face index. Indices above 5 wrap, matching the low-byte
    /// decoding of an instance.
    pub fn from_index(index: u32) -> Self {
        ALL_FACES[(index % 6) as usize]
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    /// Outward normal as an integer offset. Y-up convention.
    pub fn offset(self) -> IVec3 {
        match self {
            Face::North => IVec3::new(0, 0, 1),
            Face::Up => IVec3::new(0, 1, 0),
            Face::Down => IVec3::new(0, -1, 0),
            Face::West => IVec3::new(-1, 0, 0),
            Face::East => IVec3::new(1, 0, 0),
            Face::South => IVec3::new(0, 0, -1),
        }
    }

    pub fn normal(self) -> Vec3 {
        self.offset().as_vec3()
    }
}

/// One of the four lateral directions on the x/z plane. Also names a
/// chunk's neighbor links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Lateral {
    East = 0,
    West = 1,
    North = 2,
    South = 3,
}

/// Neighbor-link order of a chunk.
pub const ALL_LATERALS: [Lateral; 4] = [Lateral::East, Lateral::West, Lateral::North, Lateral::South];

/// Base scan order for the automaton's lateral and diagonal probes:
/// south, west, north, east. The simulation rotates it per voxel.
pub const SCAN_ORDER: [Lateral; 4] = [Lateral::South, Lateral::West, Lateral::North, Lateral::East];

impl Lateral {
    /// Offset in voxel space (y = 0).
    pub fn offset(self) -> IVec3 {
        let o = self.chunk_offset();
        IVec3::new(o.x, 0, o.y)
    }

    /// Offset on the chunk lattice (x, z).
    pub fn chunk_offset(self) -> IVec2 {
        match self {
            Lateral::East => IVec2::new(1, 0),
            Lateral::West => IVec2::new(-1, 0),
            Lateral::North => IVec2::new(0, 1),
            Lateral::South => IVec2::new(0, -1),
        }
    }

    /// Index into a chunk's neighbor array.
    pub fn slot(self) -> usize {
        self as usize
    }
}
