use lumen_core::params::UpsampleParams;
use lumen_core::programs::{ProgramId, ProgramTable};
use lumen_core::types::Resolution;

use crate::bindings;
use crate::cascade::CascadePyramid;
use crate::fields::{FieldHandle, FieldRegistry};
use crate::passes;

struct MergePair {
    fine_resolution: Resolution,
    coarse_resolution: Resolution,
    field: FieldHandle,
    scratch: FieldHandle,
    params_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Folds level `i + 1` back into level `i` through `i`'s scratch field.
///
/// The merge kernel reads the fine level, so it never writes it; the result
/// goes to scratch and a texture copy moves it back afterwards.
pub struct MergeStage {
    pairs: Vec<MergePair>,
    pipeline: wgpu::ComputePipeline,
}

impl MergeStage {
    pub fn new(
        device: &wgpu::Device,
        programs: &ProgramTable,
        registry: &FieldRegistry,
        pyramid: &CascadePyramid,
        obstacle: FieldHandle,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("upsample-bgl"),
            entries: &[
                bindings::uniform(0, wgpu::ShaderStages::COMPUTE),
                // binding 1: coarse level, sampled bilinearly
                bindings::texture(1, wgpu::ShaderStages::COMPUTE, true),
                // binding 2: fine level
                bindings::texture(2, wgpu::ShaderStages::COMPUTE, false),
                // binding 3: fine level's scratch
                bindings::storage_texture(3),
                // binding 4: obstacle mask
                bindings::texture(4, wgpu::ShaderStages::COMPUTE, false),
                bindings::filtering_sampler(5, wgpu::ShaderStages::COMPUTE),
            ],
        });
        let pipeline = passes::create_compute_pipeline(
            device,
            programs,
            ProgramId::Upsample,
            &bind_group_layout,
        );
        let sampler = bindings::linear_clamp_sampler(device, "upsample-sampler");

        let mut pairs = Vec::new();
        for pair in pyramid.levels().windows(2) {
            let (fine, coarse) = (&pair[0], &pair[1]);
            let Some(scratch) = fine.scratch else {
                continue;
            };
            let i = pairs.len();

            let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("upsample-params-{i}")),
                size: std::mem::size_of::<UpsampleParams>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("upsample-bg-{i}")),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(registry.view(coarse.field)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(registry.view(fine.field)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(registry.view(scratch)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: wgpu::BindingResource::TextureView(registry.view(obstacle)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 5,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });

            pairs.push(MergePair {
                fine_resolution: fine.resolution,
                coarse_resolution: coarse.resolution,
                field: fine.field,
                scratch,
                params_buffer,
                bind_group,
            });
        }

        Self { pairs, pipeline }
    }

    pub fn pair_count(&self) -> u32 {
        self.pairs.len() as u32
    }

    /// Overwrite every pair's UpsampleParams in place.
    pub fn update_params(&self, queue: &wgpu::Queue) {
        for pair in &self.pairs {
            let params = UpsampleParams::new(pair.coarse_resolution);
            queue.write_buffer(&pair.params_buffer, 0, bytemuck::bytes_of(&params));
        }
    }

    /// Record `scratch[fine] = fine + upsample(coarse)`.
    pub fn encode_merge(&self, encoder: &mut wgpu::CommandEncoder, fine: u32) {
        let pair = &self.pairs[fine as usize];
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("merge-pass"),
            timestamp_writes: None,
        });
        passes::dispatch_tiles(
            &mut pass,
            &self.pipeline,
            &pair.bind_group,
            pair.fine_resolution,
        );
    }

    /// Record the lossless copy of `scratch[level]` back into `level`'s persistent field.
    pub fn encode_copy_back(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        registry: &FieldRegistry,
        level: u32,
    ) {
        let pair = &self.pairs[level as usize];
        encoder.copy_texture_to_texture(
            registry.texture(pair.scratch).as_image_copy(),
            registry.texture(pair.field).as_image_copy(),
            wgpu::Extent3d {
                width: pair.fine_resolution.width,
                height: pair.fine_resolution.height,
                depth_or_array_layers: 1,
            },
        );
    }
}
