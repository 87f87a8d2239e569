//! Deterministic hash used for agent seeding.
//!
//! Pure function: `agent_hash(index, seed, stream) -> u32`.
//! Uses PCG-style mixing to produce well-distributed u32 values.

/// Hash an agent index, scene seed and stream id into a pseudo-random u32.
pub(crate) fn agent_hash(index: u32, seed: u32, stream: u32) -> u32 {
    let mut state = index
        .wrapping_mul(0x9E3779B9)
        .wrapping_add(seed.wrapping_mul(0x517CC1B7))
        .wrapping_add(stream.wrapping_mul(0x2545F491));

    state = state ^ (state >> 16);
    state = state.wrapping_mul(0x45D9F3B);
    state = state ^ (state >> 16);
    state = state.wrapping_mul(0x45D9F3B);
    state = state ^ (state >> 16);

    state
}

/// Convert a hash value to a float in [0, 1).
pub(crate) fn hash_to_float(hash: u32) -> f32 {
    (hash >> 8) as f32 / 16_777_216.0 // 2^24
}

/// Map a hash to [-range, range).
pub(crate) fn hash_to_signed(hash: u32, range: f32) -> f32 {
    (hash_to_float(hash) * 2.0 - 1.0) * range
}
