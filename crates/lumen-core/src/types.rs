use serde::{Deserialize, Serialize};

/// One simulated agent. Must match `Agent` in shaders/common/types.wgsl.
///
/// Both fields are in normalized device coordinates: position in [-1, 1],
/// velocity in NDC units per second.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Agent {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
}

impl Agent {
    pub fn new(position: [f32; 2], velocity: [f32; 2]) -> Self {
        Self { position, velocity }
    }

    pub fn speed(&self) -> f32 {
        glam::Vec2::from(self.velocity).length()
    }
}

/// Pixel dimensions of a 2-D field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Resolution of cascade level `level` below this one (floor halving per level).
    pub const fn at_level(self, level: u32) -> Self {
        Self {
            width: self.width >> level,
            height: self.height >> level,
        }
    }

    pub const fn texel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_vec2(self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

/// Host input for one tick.
///
/// `pointer` is the latest normalized pointer position ([0, 1], y down);
/// `timestamp_ms` is a monotonic timestamp such as the rAF timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub pointer: [f32; 2],
    pub timestamp_ms: f64,
}

impl FrameInput {
    pub fn new(pointer: [f32; 2], timestamp_ms: f64) -> Self {
        Self {
            pointer,
            timestamp_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_record_size() {
        assert_eq!(std::mem::size_of::<Agent>(), 16);
    }

    #[test]
    fn test_resolution_levels_floor_halve() {
        let base = Resolution::new(1023, 767);
        assert_eq!(base.at_level(0), base);
        assert_eq!(base.at_level(1), Resolution::new(511, 383));
        assert_eq!(base.at_level(2), Resolution::new(255, 191));
    }

    #[test]
    fn test_resolution_empty() {
        assert!(Resolution::new(3, 3).at_level(2).is_empty());
        assert!(!Resolution::new(4, 4).at_level(2).is_empty());
    }
}
