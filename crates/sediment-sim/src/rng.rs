//! Deterministic hashing for the brush noise table.
//!
//! Pure function: `sim_hash(x, y, z, seed) -> u32`. No state, no atomics.

use sediment_core::constants::BRUSH_NOISE_TABLE_SIZE;

/// Hash a lattice position and seed into a well-mixed u32 (PCG-style rounds).
pub(crate) fn sim_hash(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let mut state = (x as u32)
        .wrapping_mul(0x9E3779B9)
        .wrapping_add((y as u32).wrapping_mul(0x517CC1B7))
        .wrapping_add((z as u32).wrapping_mul(0x6C62272E))
        .wrapping_add(seed.wrapping_mul(0x2545F491));

    state ^= state >> 16;
    state = state.wrapping_mul(0x45D9F3B);
    state ^= state >> 16;
    state = state.wrapping_mul(0x45D9F3B);
    state ^= state >> 16;

    state
}

/// Map a hash to a float in [0, 1).
pub(crate) fn hash_to_float(hash: u32) -> f32 {
    (hash >> 8) as f32 / 16_777_216.0 // 2^24
}

/// The brush color-noise table: one value in [-1, 1) per entry.
pub(crate) fn noise_table(seed: u32) -> [f32; BRUSH_NOISE_TABLE_SIZE] {
    let mut table = [0.0; BRUSH_NOISE_TABLE_SIZE];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = hash_to_float(sim_hash(i as i32, 0, 0, seed)) * 2.0 - 1.0;
    }
    table
}
