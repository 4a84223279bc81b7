//! The falling-sand automaton kernel. One worker per voxel of the active layer.

use glam::IVec3;
use sediment_core::constants::{EMPTY, MATERIAL_GRANULAR, MATERIAL_LIQUID, MATERIAL_MASK};
use sediment_world::Grid;

use crate::conflict::{rotated_scan, ScanCounter};

const DOWN: IVec3 = IVec3::new(0, -1, 0);
const UP: IVec3 = IVec3::new(0, 1, 0);

/// Kernel body for one cell. Moves its voxel at most once; a successful move
/// claims the target with a CAS against empty and then clears the source.
pub fn step_voxel(grid: &Grid, counter: &ScanCounter, chunk: usize, pos: IVec3) {
    let c = grid.chunk(chunk);
    let size = grid.chunk_size();
    let value = c.get(pos, size);
    if value == EMPTY {
        return;
    }
    let moved = match value & MATERIAL_MASK {
        MATERIAL_LIQUID => step_water(grid, counter, chunk, pos, value),
        _ => step_sand(grid, counter, chunk, pos, value),
    };
    if moved {
        c.set(pos, size, EMPTY);
    }
}

/// Granular rule: straight down, then the four diagonal-down cells in rotated
/// order. Never moves on the floor layer.
pub fn step_sand(grid: &Grid, counter: &ScanCounter, chunk: usize, pos: IVec3, value: u32) -> bool {
    if pos.y == 0 {
        return false;
    }
    if grid.claim(chunk, pos + DOWN, value) {
        return true;
    }
    let ticket = counter.next();
    rotated_scan(ticket)
        .iter()
        .any(|dir| grid.claim(chunk, pos + dir.offset() + DOWN, value))
}

/// Liquid rule: the granular rule, then a lateral spread onto supported
/// cells. A liquid that cannot move and is buried under granular matter is
/// removed (reported as moved so the source is cleared).
pub fn step_water(grid: &Grid, counter: &ScanCounter, chunk: usize, pos: IVec3, value: u32) -> bool {
    if step_sand(grid, counter, chunk, pos, value) {
        return true;
    }
    let ticket = counter.next();
    for dir in rotated_scan(ticket) {
        let target = pos + dir.offset();
        if (pos.y == 0 || grid.get(chunk, target + DOWN) != EMPTY) && grid.claim(chunk, target, value) {
            return true;
        }
    }
    grid.get(chunk, pos + UP) & MATERIAL_MASK == MATERIAL_GRANULAR
}
