use lumen_core::types::Resolution;

/// Format of emission, cascade and scratch fields: storage-writable and filterable.
pub const RADIANCE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Format of the obstacle mask.
pub const OBSTACLE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;

/// Opaque reference to a field owned by a [`FieldRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldHandle(usize);

impl FieldHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

struct Field {
    label: String,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    resolution: Resolution,
}

/// Owns every 2-D field. Fields are created during setup and released
/// together when the registry is dropped; nothing is freed mid-run.
#[derive(Default)]
pub struct FieldRegistry {
    fields: Vec<Field>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        resolution: Resolution,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> FieldHandle {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: resolution.width,
                height: resolution.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.fields.push(Field {
            label: label.to_string(),
            texture,
            view,
            resolution,
        });
        FieldHandle(self.fields.len() - 1)
    }

    /// A radiance field usable as storage target, sampled input and copy source/destination.
    pub fn create_radiance(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        resolution: Resolution,
    ) -> FieldHandle {
        self.create(
            device,
            label,
            resolution,
            RADIANCE_FORMAT,
            wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
        )
    }

    pub fn texture(&self, handle: FieldHandle) -> &wgpu::Texture {
        &self.fields[handle.0].texture
    }

    pub fn view(&self, handle: FieldHandle) -> &wgpu::TextureView {
        &self.fields[handle.0].view
    }

    pub fn resolution(&self, handle: FieldHandle) -> Resolution {
        self.fields[handle.0].resolution
    }

    pub fn label(&self, handle: FieldHandle) -> &str {
        &self.fields[handle.0].label
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total texel count across all fields, for setup logging.
    pub fn texel_count(&self) -> u64 {
        self.fields.iter().map(|f| f.resolution.texel_count()).sum()
    }
}
