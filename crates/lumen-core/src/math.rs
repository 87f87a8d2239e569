use glam::Vec2;

use crate::constants::COPY_ROW_ALIGNMENT;
use crate::types::Resolution;

/// Convert a normalized pointer position ([0, 1], y down) to NDC ([-1, 1], y up).
pub fn pointer_to_ndc(pointer: [f32; 2]) -> [f32; 2] {
    [pointer[0] * 2.0 - 1.0, 1.0 - pointer[1] * 2.0]
}

/// Map an NDC position to continuous field coordinates (row 0 at the top).
/// Identical to `ndc_to_field` in shaders/common/coords.wgsl.
pub fn ndc_to_field(ndc: Vec2, resolution: Resolution) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * resolution.width as f32,
        (0.5 - ndc.y * 0.5) * resolution.height as f32,
    )
}

/// Integer texel containing an NDC position, or `None` if it falls outside
/// the closed range [-1, 1]. The right and bottom edges (x = 1, y = -1) fold
/// into the last column and row.
pub fn ndc_to_texel(ndc: Vec2, resolution: Resolution) -> Option<(u32, u32)> {
    if resolution.is_empty() {
        return None;
    }
    let p = ndc_to_field(ndc, resolution);
    let size = Vec2::new(resolution.width as f32, resolution.height as f32);
    if p.x < 0.0 || p.y < 0.0 || p.x > size.x || p.y > size.y {
        return None;
    }
    let x = (p.x.floor() as u32).min(resolution.width - 1);
    let y = (p.y.floor() as u32).min(resolution.height - 1);
    Some((x, y))
}

/// Scale a velocity down so its magnitude does not exceed `max_speed`.
pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    let speed = velocity.length();
    if speed > max_speed && speed > 0.0 {
        velocity * (max_speed / speed)
    } else {
        velocity
    }
}

/// Number of workgroups needed to cover `extent` items with groups of `group_size`.
pub fn workgroup_count(extent: u32, group_size: u32) -> u32 {
    extent.div_ceil(group_size)
}

/// Row pitch in bytes padded to the texture copy alignment.
pub fn padded_bytes_per_row(unpadded: u32) -> u32 {
    unpadded.div_ceil(COPY_ROW_ALIGNMENT) * COPY_ROW_ALIGNMENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_corners() {
        assert_eq!(pointer_to_ndc([0.0, 0.0]), [-1.0, 1.0]);
        assert_eq!(pointer_to_ndc([1.0, 1.0]), [1.0, -1.0]);
        assert_eq!(pointer_to_ndc([0.5, 0.5]), [0.0, 0.0]);
    }

    #[test]
    fn test_ndc_origin_maps_to_centre() {
        let res = Resolution::new(64, 48);
        let p = ndc_to_field(Vec2::ZERO, res);
        assert_eq!(p, Vec2::new(32.0, 24.0));
        assert_eq!(ndc_to_texel(Vec2::ZERO, res), Some((32, 24)));
    }

    #[test]
    fn test_ndc_top_left_is_row_zero() {
        let res = Resolution::new(64, 48);
        assert_eq!(ndc_to_texel(Vec2::new(-1.0, 1.0), res), Some((0, 0)));
        assert_eq!(ndc_to_texel(Vec2::new(1.0, 0.0), res), Some((63, 24)));
    }

    #[test]
    fn test_bottom_right_corner_is_last_texel() {
        let res = Resolution::new(64, 48);
        assert_eq!(ndc_to_texel(Vec2::new(1.0, -1.0), res), Some((63, 47)));
        assert_eq!(ndc_to_texel(Vec2::new(1.001, 0.0), res), None);
        assert_eq!(ndc_to_texel(Vec2::new(0.0, -1.001), res), None);
        assert_eq!(ndc_to_texel(Vec2::ZERO, Resolution::new(0, 8)), None);
    }

    #[test]
    fn test_clamp_speed() {
        let v = clamp_speed(Vec2::new(30.0, 40.0), 5.0);
        assert!((v.length() - 5.0).abs() < 1e-5);
        assert_eq!(clamp_speed(Vec2::new(0.3, 0.4), 5.0), Vec2::new(0.3, 0.4));
        assert_eq!(clamp_speed(Vec2::ZERO, 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_workgroup_count() {
        assert_eq!(workgroup_count(0, 64), 0);
        assert_eq!(workgroup_count(10, 64), 1);
        assert_eq!(workgroup_count(129, 64), 3);
        assert_eq!(workgroup_count(1920, 8), 240);
    }

    #[test]
    fn test_padded_row() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(256), 256);
        assert_eq!(padded_bytes_per_row(800), 1024);
    }
}
