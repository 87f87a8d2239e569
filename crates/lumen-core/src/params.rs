//! Uniform blocks uploaded every tick. Field order and padding must match the
//! WGSL structs of the same name; every block is a multiple of 16 bytes.

use crate::types::Resolution;

/// Agent simulation parameters. Must match SimParams in sim/agents.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SimParams {
    /// Pointer target in NDC.
    pub pointer: [f32; 2],
    pub dt: f32,
    pub agent_count: u32,
    pub accel_strength: f32,
    pub max_speed: f32,
    pub _pad0: u32,
    pub _pad1: u32,
}

impl SimParams {
    pub fn new(
        pointer: [f32; 2],
        dt: f32,
        agent_count: u32,
        accel_strength: f32,
        max_speed: f32,
    ) -> Self {
        Self {
            pointer,
            dt,
            agent_count,
            accel_strength,
            max_speed,
            _pad0: 0,
            _pad1: 0,
        }
    }
}

/// Emission parameters. Must match EmitParams in radiance/emit.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EmitParams {
    pub resolution: [f32; 2],
    /// Seconds since setup.
    pub time: f32,
    pub agent_count: u32,
}

impl EmitParams {
    pub fn new(resolution: Resolution, time: f32, agent_count: u32) -> Self {
        Self {
            resolution: resolution.as_vec2(),
            time,
            agent_count,
        }
    }
}

/// Per-level diffusion parameters. Must match DiffuseParams in radiance/diffuse.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DiffuseParams {
    /// Resolution of the level being written.
    pub resolution: [f32; 2],
    pub level: u32,
    pub _pad: u32,
}

impl DiffuseParams {
    pub fn new(resolution: Resolution, level: u32) -> Self {
        Self {
            resolution: resolution.as_vec2(),
            level,
            _pad: 0,
        }
    }
}

/// Per-pair merge parameters. Must match UpsampleParams in radiance/upsample.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UpsampleParams {
    /// Resolution of the coarser (source) level.
    pub source_resolution: [f32; 2],
    pub _pad0: u32,
    pub _pad1: u32,
}

impl UpsampleParams {
    pub fn new(source_resolution: Resolution) -> Self {
        Self {
            source_resolution: source_resolution.as_vec2(),
            _pad0: 0,
            _pad1: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<SimParams>(), 32);
        assert_eq!(std::mem::size_of::<EmitParams>(), 16);
        assert_eq!(std::mem::size_of::<DiffuseParams>(), 16);
        assert_eq!(std::mem::size_of::<UpsampleParams>(), 16);
    }

    #[test]
    fn test_uniform_sizes_are_16_byte_multiples() {
        for size in [
            std::mem::size_of::<SimParams>(),
            std::mem::size_of::<EmitParams>(),
            std::mem::size_of::<DiffuseParams>(),
            std::mem::size_of::<UpsampleParams>(),
        ] {
            assert_eq!(size % 16, 0, "uniform block of {size} bytes is not 16-byte aligned");
        }
    }

    #[test]
    fn test_sim_params_byte_layout() {
        let params = SimParams::new([0.25, -0.5], 0.016, 7, 1.5, 1.8);
        let bytes = bytemuck::bytes_of(&params);
        assert_eq!(&bytes[0..4], &0.25f32.to_le_bytes());
        assert_eq!(&bytes[8..12], &0.016f32.to_le_bytes());
        assert_eq!(&bytes[12..16], &7u32.to_le_bytes());
        assert_eq!(&bytes[20..24], &1.8f32.to_le_bytes());
    }

    #[test]
    fn test_emit_params_from_resolution() {
        let params = EmitParams::new(Resolution::new(640, 480), 2.5, 3);
        assert_eq!(params.resolution, [640.0, 480.0]);
        assert_eq!(params.time, 2.5);
        assert_eq!(params.agent_count, 3);
    }
}
