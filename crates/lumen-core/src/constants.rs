//! Single source of truth for shared constants.
//! Values used by WGSL are injected into every program through the
//! generated preamble in `programs.rs`.

/// Number of simulated agents in the default scene.
pub const AGENT_COUNT: u32 = 10;

/// Threads per workgroup for the 1-D agent simulation dispatch.
pub const WORKGROUP_SIZE: u32 = 64;

/// Side length of the square workgroup tile for 2-D field dispatches.
pub const TILE_SIZE: u32 = 8;

/// Pointer attraction strength (NDC units per second squared).
pub const ACCEL_STRENGTH: f32 = 1.5;

/// Maximum agent speed (NDC units per second).
pub const MAX_SPEED: f32 = 1.8;

/// Number of cascade levels in the radiance pyramid (full, half, quarter).
pub const CASCADE_LEVELS: u32 = 3;

/// Seed for deterministic agent placement.
pub const AGENT_SEED: u32 = 0x5EED;

/// Half-width of the initial random velocity range.
pub const INITIAL_SPEED_RANGE: f32 = 0.01;

/// Below this pointer distance an agent receives no steering.
pub const STEER_EPSILON: f32 = 0.0001;

/// Fraction of the approaching velocity kept when bouncing off an obstacle.
pub const OBSTACLE_RESTITUTION: f32 = 0.5;

/// Distance, in obstacle texels, of the probes used to estimate the free-space normal.
pub const OBSTACLE_PROBE_TEXELS: f32 = 2.0;

/// Peak light written by one agent into the emission field.
pub const EMISSION_INTENSITY: f32 = 24.0;

/// Angular rate (radians per second) of the emission pulse.
pub const EMISSION_PULSE_RATE: f32 = 3.0;

/// Gather radius of the diffusion kernel in source texels (5x5 taps).
pub const DIFFUSE_RADIUS: i32 = 2;

/// Gaussian sigma of the diffusion kernel in tap units.
pub const DIFFUSE_SIGMA: f32 = 1.25;

/// Per-level energy multiplier; level `i` output is scaled by `LEVEL_ENERGY^i`.
pub const LEVEL_ENERGY: f32 = 2.0;

/// Weight of the upsampled coarse level when merged into the finer level.
pub const MERGE_WEIGHT: f32 = 0.5;

/// Exposure applied by the composite tone curve `1 - exp(-light * exposure)`.
pub const COMPOSITE_EXPOSURE: f32 = 1.5;

/// Surface clear color (linear RGBA).
pub const BACKGROUND_COLOR: [f64; 4] = [0.02, 0.02, 0.035, 1.0];

/// Mask value for a free cell.
pub const CELL_FREE: u8 = 255;

/// Mask value for a blocked cell.
pub const CELL_BLOCKED: u8 = 0;

/// Row pitch alignment required for texture <-> buffer copies.
pub const COPY_ROW_ALIGNMENT: u32 = 256;

/// Upper bound on a single frame's delta time in seconds (backgrounded tabs).
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Bytes per texel of the radiance field format (Rgba16Float).
pub const RADIANCE_TEXEL_BYTES: u32 = 8;
