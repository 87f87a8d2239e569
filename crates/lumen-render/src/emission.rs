use lumen_core::params::EmitParams;
use lumen_core::programs::{ProgramId, ProgramTable};
use lumen_core::types::Resolution;

use crate::bindings;
use crate::fields::{FieldHandle, FieldRegistry};
use crate::passes;

/// Clear + Emit. The emission field is zeroed and rewritten every frame,
/// so its content only ever reflects the current agents.
pub struct EmissionStage {
    field: FieldHandle,
    resolution: Resolution,
    params_buffer: wgpu::Buffer,
    clear_pipeline: wgpu::ComputePipeline,
    clear_bind_group: wgpu::BindGroup,
    emit_pipeline: wgpu::ComputePipeline,
    emit_bind_group: wgpu::BindGroup,
}

impl EmissionStage {
    pub fn new(
        device: &wgpu::Device,
        programs: &ProgramTable,
        registry: &mut FieldRegistry,
        resolution: Resolution,
        agent_buffer: &wgpu::Buffer,
    ) -> Self {
        let field = registry.create_radiance(device, "emission-field", resolution);

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("emit-params-buffer"),
            size: std::mem::size_of::<EmitParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let clear_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("clear-bgl"),
            entries: &[bindings::storage_texture(0)],
        });
        let clear_pipeline =
            passes::create_compute_pipeline(device, programs, ProgramId::Clear, &clear_bgl);
        let clear_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("clear-bg"),
            layout: &clear_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(registry.view(field)),
            }],
        });

        let emit_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("emit-bgl"),
            entries: &[
                bindings::uniform(0, wgpu::ShaderStages::COMPUTE),
                bindings::storage_buffer(1, true),
                bindings::storage_texture(2),
            ],
        });
        let emit_pipeline =
            passes::create_compute_pipeline(device, programs, ProgramId::Emit, &emit_bgl);
        let emit_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("emit-bg"),
            layout: &emit_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: agent_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(registry.view(field)),
                },
            ],
        });

        Self {
            field,
            resolution,
            params_buffer,
            clear_pipeline,
            clear_bind_group,
            emit_pipeline,
            emit_bind_group,
        }
    }

    pub fn field(&self) -> FieldHandle {
        self.field
    }

    pub fn update_params(&self, queue: &wgpu::Queue, time: f32, agent_count: u32) {
        let params = EmitParams::new(self.resolution, time, agent_count);
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));
    }

    pub fn encode_clear(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("clear-emission-pass"),
            timestamp_writes: None,
        });
        passes::dispatch_tiles(
            &mut pass,
            &self.clear_pipeline,
            &self.clear_bind_group,
            self.resolution,
        );
    }

    pub fn encode_emit(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("emit-pass"),
            timestamp_writes: None,
        });
        passes::dispatch_tiles(
            &mut pass,
            &self.emit_pipeline,
            &self.emit_bind_group,
            self.resolution,
        );
    }
}
