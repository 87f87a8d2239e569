use lumen_core::params::DiffuseParams;
use lumen_core::programs::{ProgramId, ProgramTable};
use lumen_core::types::Resolution;

use crate::bindings;
use crate::fields::{FieldHandle, FieldRegistry};
use crate::passes;

/// One level of the pyramid.
pub struct CascadeLevel {
    pub resolution: Resolution,
    /// Persistent field: written by diffusion, updated by merge copy-back,
    /// read by the next level's diffusion, by merge and (level 0) by composite.
    pub field: FieldHandle,
    /// Same-size merge target. Only levels that receive a merge have one.
    pub scratch: Option<FieldHandle>,
    params_buffer: wgpu::Buffer,
    diffuse_bind_group: wgpu::BindGroup,
}

/// N radiance levels at `(W >> i, H >> i)`, each diffused from the one before.
pub struct CascadePyramid {
    levels: Vec<CascadeLevel>,
    diffuse_pipeline: wgpu::ComputePipeline,
}

impl CascadePyramid {
    /// `resolutions` must come from `cascade_resolutions`, finest first.
    pub fn new(
        device: &wgpu::Device,
        programs: &ProgramTable,
        registry: &mut FieldRegistry,
        emission: FieldHandle,
        obstacle: FieldHandle,
        resolutions: &[Resolution],
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("diffuse-bgl"),
            entries: &[
                bindings::uniform(0, wgpu::ShaderStages::COMPUTE),
                // binding 1: source level (or emission)
                bindings::texture(1, wgpu::ShaderStages::COMPUTE, false),
                // binding 2: destination level
                bindings::storage_texture(2),
                // binding 3: obstacle mask
                bindings::texture(3, wgpu::ShaderStages::COMPUTE, false),
            ],
        });
        let diffuse_pipeline = passes::create_compute_pipeline(
            device,
            programs,
            ProgramId::Diffuse,
            &bind_group_layout,
        );

        let last = resolutions.len().saturating_sub(1);
        let mut levels: Vec<CascadeLevel> = Vec::with_capacity(resolutions.len());
        for (i, &resolution) in resolutions.iter().enumerate() {
            let field = registry.create_radiance(device, &format!("cascade-{i}"), resolution);
            let scratch = (i < last).then(|| {
                registry.create_radiance(device, &format!("cascade-{i}-scratch"), resolution)
            });

            let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("diffuse-params-{i}")),
                size: std::mem::size_of::<DiffuseParams>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let source = match levels.last() {
                Some(previous) => previous.field,
                None => emission,
            };
            let diffuse_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("diffuse-bg-{i}")),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(registry.view(source)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(registry.view(field)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(registry.view(obstacle)),
                    },
                ],
            });

            log::info!(
                "CascadePyramid: level {} {}x{}{}",
                i,
                resolution.width,
                resolution.height,
                if scratch.is_some() { " (+scratch)" } else { "" }
            );

            levels.push(CascadeLevel {
                resolution,
                field,
                scratch,
                params_buffer,
                diffuse_bind_group,
            });
        }

        Self {
            levels,
            diffuse_pipeline,
        }
    }

    pub fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn level(&self, level: u32) -> &CascadeLevel {
        &self.levels[level as usize]
    }

    pub fn levels(&self) -> &[CascadeLevel] {
        &self.levels
    }

    pub fn resolutions(&self) -> Vec<Resolution> {
        self.levels.iter().map(|l| l.resolution).collect()
    }

    /// Overwrite every level's DiffuseParams in place.
    pub fn update_params(&self, queue: &wgpu::Queue) {
        for (i, level) in self.levels.iter().enumerate() {
            let params = DiffuseParams::new(level.resolution, i as u32);
            queue.write_buffer(&level.params_buffer, 0, bytemuck::bytes_of(&params));
        }
    }

    /// Record diffusion for one level. Callers record levels in increasing
    /// order so level `i` reads level `i - 1` as written this frame.
    pub fn encode_diffuse(&self, encoder: &mut wgpu::CommandEncoder, level: u32) {
        let target = &self.levels[level as usize];
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("diffuse-pass"),
            timestamp_writes: None,
        });
        passes::dispatch_tiles(
            &mut pass,
            &self.diffuse_pipeline,
            &target.diffuse_bind_group,
            target.resolution,
        );
    }
}
