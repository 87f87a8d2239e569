use serde::{Deserialize, Serialize};

use crate::constants::{CELL_BLOCKED, CELL_FREE};
use crate::error::LumenError;
use crate::math::padded_bytes_per_row;
use crate::types::Resolution;

/// Axis-aligned obstacle rectangle in normalized [0, 1] coordinates (y down).
///
/// Stored in f64 so cell spans floor exactly at boundaries like `0.13 * 900`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ObstacleRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn validate(&self) -> Result<(), LumenError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if in_unit(self.x) && in_unit(self.y) && in_unit(self.width) && in_unit(self.height) {
            Ok(())
        } else {
            Err(LumenError::InvalidConfig(format!(
                "obstacle rectangle {self:?} is outside [0, 1]"
            )))
        }
    }

    /// Half-open cell span `[start, end)` covered on one axis of length `extent`, clipped.
    fn span(origin: f64, size: f64, extent: u32) -> (u32, u32) {
        let start = ((origin * extent as f64).floor() as u32).min(extent);
        let len = (size * extent as f64).floor() as u32;
        (start, start.saturating_add(len).min(extent))
    }

    /// Column and row spans this rectangle blocks on a field of `resolution`.
    pub fn cell_bounds(&self, resolution: Resolution) -> ((u32, u32), (u32, u32)) {
        (
            Self::span(self.x, self.width, resolution.width),
            Self::span(self.y, self.height, resolution.height),
        )
    }
}

/// Obstacles used when no scene file is given.
pub const DEFAULT_OBSTACLES: [ObstacleRect; 3] = [
    ObstacleRect::new(0.45, 0.3, 0.05, 0.4),
    ObstacleRect::new(0.2, 0.5, 0.4, 0.05),
    ObstacleRect::new(0.7, 0.3, 0.05, 0.3),
];

/// Rasterized free/blocked mask, one byte per cell.
///
/// Rows are stored with `bytes_per_row` padded to the texture copy alignment
/// so the buffer can be handed to `write_texture` directly.
#[derive(Debug, Clone)]
pub struct ObstacleMask {
    resolution: Resolution,
    bytes_per_row: u32,
    data: Vec<u8>,
}

impl ObstacleMask {
    /// Rasterize `rects` onto a `resolution`-sized field. Every cell starts free;
    /// each rectangle only ever adds blocked cells.
    pub fn rasterize(resolution: Resolution, rects: &[ObstacleRect]) -> Self {
        let bytes_per_row = padded_bytes_per_row(resolution.width.max(1));
        let mut data = vec![CELL_FREE; bytes_per_row as usize * resolution.height as usize];

        for rect in rects {
            let ((x0, x1), (y0, y1)) = rect.cell_bounds(resolution);
            for y in y0..y1 {
                let row = (y * bytes_per_row) as usize;
                data[row + x0 as usize..row + x1 as usize].fill(CELL_BLOCKED);
            }
        }

        Self {
            resolution,
            bytes_per_row,
            data,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.bytes_per_row
    }

    /// Padded row data, ready for upload.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.resolution.width || y >= self.resolution.height {
            return None;
        }
        Some(self.data[(y * self.bytes_per_row + x) as usize])
    }

    /// Out-of-bounds cells are treated as free.
    pub fn is_free(&self, x: u32, y: u32) -> bool {
        self.cell(x, y).map_or(true, |c| c != CELL_BLOCKED)
    }

    /// Whether an NDC position lies on a blocked cell. Mirrors `ndc_blocked`
    /// in shaders/common/mask.wgsl: the closed range [-1, 1] maps onto the
    /// field with the far edges folded into the last row and column, and
    /// anything outside it counts as free.
    pub fn is_blocked_ndc(&self, ndc: [f32; 2]) -> bool {
        let u = ndc[0] * 0.5 + 0.5;
        let v = 0.5 - ndc[1] * 0.5;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return false;
        }
        let res = self.resolution;
        let x = ((u * res.width as f32).floor() as u32).min(res.width.saturating_sub(1));
        let y = ((v * res.height as f32).floor() as u32).min(res.height.saturating_sub(1));
        !self.is_free(x, y)
    }

    pub fn blocked_count(&self) -> u64 {
        (0..self.resolution.height)
            .map(|y| {
                let row = (y * self.bytes_per_row) as usize;
                self.data[row..row + self.resolution.width as usize]
                    .iter()
                    .filter(|&&c| c == CELL_BLOCKED)
                    .count() as u64
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_blocked(rect: ObstacleRect, res: Resolution) -> u64 {
        let fx = (rect.x * res.width as f64).floor() as u32;
        let fy = (rect.y * res.height as f64).floor() as u32;
        let fw = (rect.width * res.width as f64).floor() as u32;
        let fh = (rect.height * res.height as f64).floor() as u32;
        let w = fw.min(res.width.saturating_sub(fx)) as u64;
        let h = fh.min(res.height.saturating_sub(fy)) as u64;
        w * h
    }

    #[test]
    fn test_empty_list_is_all_free() {
        let mask = ObstacleMask::rasterize(Resolution::new(37, 19), &[]);
        assert_eq!(mask.blocked_count(), 0);
        assert!(mask.is_free(0, 0));
        assert!(mask.is_free(36, 18));
    }

    #[test]
    fn test_single_rect_count() {
        let res = Resolution::new(100, 50);
        let rect = ObstacleRect::new(0.1, 0.2, 0.3, 0.4);
        let mask = ObstacleMask::rasterize(res, &[rect]);
        assert_eq!(mask.blocked_count(), expected_blocked(rect, res));
        assert_eq!(mask.blocked_count(), 30 * 20);
        assert!(!mask.is_free(10, 10));
        assert!(mask.is_free(9, 10));
        assert!(mask.is_free(40, 10));
        assert!(!mask.is_free(39, 29));
        assert!(mask.is_free(39, 30));
    }

    #[test]
    fn test_edge_clipped_counts() {
        let res = Resolution::new(64, 48);
        let rects = [
            ObstacleRect::new(0.9, 0.9, 0.5, 0.5),
            ObstacleRect::new(0.0, 0.0, 1.0, 1.0),
            ObstacleRect::new(1.0, 0.5, 0.5, 0.5),
            ObstacleRect::new(0.45, 0.3, 0.05, 0.4),
            ObstacleRect::new(0.7, 0.3, 0.05, 0.3),
            ObstacleRect::new(0.5, 0.5, 0.0, 0.3),
        ];
        for rect in rects {
            let mask = ObstacleMask::rasterize(res, &[rect]);
            assert_eq!(
                mask.blocked_count(),
                expected_blocked(rect, res),
                "rect {rect:?}"
            );
        }
    }

    #[test]
    fn test_span_floors_in_double_precision() {
        // 0.13 * 900 is 116.99999 in single precision.
        let res = Resolution::new(900, 10);
        let mask = ObstacleMask::rasterize(res, &[ObstacleRect::new(0.13, 0.0, 0.1, 1.0)]);
        assert!(mask.is_free(116, 0));
        assert!(!mask.is_free(117, 0));
        assert!(!mask.is_free(206, 0));
        assert!(mask.is_free(207, 0));
        assert_eq!(mask.blocked_count(), 90 * 10);
    }

    #[test]
    fn test_ndc_lookup_covers_closed_range() {
        let res = Resolution::new(64, 48);
        // Bottom-right quarter blocked.
        let mask = ObstacleMask::rasterize(res, &[ObstacleRect::new(0.5, 0.5, 0.5, 0.5)]);
        assert!(mask.is_blocked_ndc([1.0, -1.0]));
        assert!(mask.is_blocked_ndc([0.5, -0.5]));
        assert!(!mask.is_blocked_ndc([-1.0, 1.0]));
        assert!(!mask.is_blocked_ndc([1.01, -1.0]));
    }

    #[test]
    fn test_overlap_only_adds() {
        let res = Resolution::new(32, 32);
        let a = ObstacleRect::new(0.0, 0.0, 0.5, 0.5);
        let b = ObstacleRect::new(0.25, 0.25, 0.5, 0.5);
        let mask = ObstacleMask::rasterize(res, &[a, b]);
        // Two 16x16 squares overlapping in an 8x8 corner.
        assert_eq!(mask.blocked_count(), 256 + 256 - 64);
        assert!(!mask.is_free(20, 20));
        assert!(!mask.is_free(2, 2));
    }

    #[test]
    fn test_rows_are_padded() {
        let mask = ObstacleMask::rasterize(Resolution::new(300, 4), &DEFAULT_OBSTACLES);
        assert_eq!(mask.bytes_per_row(), 512);
        assert_eq!(mask.bytes().len(), 512 * 4);
        assert_eq!(mask.cell(300, 0), None);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(ObstacleRect::new(0.1, 0.1, 0.2, 0.2).validate().is_ok());
        assert!(ObstacleRect::new(-0.1, 0.1, 0.2, 0.2).validate().is_err());
        assert!(ObstacleRect::new(0.1, 1.5, 0.2, 0.2).validate().is_err());
        assert!(ObstacleRect::new(0.1, 0.1, f64::NAN, 0.2).validate().is_err());
    }
}
