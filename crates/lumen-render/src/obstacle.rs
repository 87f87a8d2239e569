use lumen_core::obstacle::ObstacleMask;

use crate::fields::{FieldHandle, FieldRegistry, OBSTACLE_FORMAT};

/// Device copy of the obstacle mask. Written once at setup, read-only afterwards.
pub struct ObstacleField {
    handle: FieldHandle,
    blocked_cells: u64,
}

impl ObstacleField {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        registry: &mut FieldRegistry,
        mask: &ObstacleMask,
    ) -> Self {
        let resolution = mask.resolution();
        let handle = registry.create(
            device,
            "obstacle-field",
            resolution,
            OBSTACLE_FORMAT,
            wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
        );

        queue.write_texture(
            registry.texture(handle).as_image_copy(),
            mask.bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(mask.bytes_per_row()),
                rows_per_image: Some(resolution.height),
            },
            wgpu::Extent3d {
                width: resolution.width,
                height: resolution.height,
                depth_or_array_layers: 1,
            },
        );

        let blocked_cells = mask.blocked_count();
        log::info!(
            "ObstacleField: {}x{}, {} blocked cells",
            resolution.width,
            resolution.height,
            blocked_cells
        );

        Self {
            handle,
            blocked_cells,
        }
    }

    pub fn handle(&self) -> FieldHandle {
        self.handle
    }

    pub fn blocked_cells(&self) -> u64 {
        self.blocked_cells
    }
}
