use lumen_core::params::SimParams;
use lumen_core::programs::{ProgramId, ProgramTable};

use crate::agents::AgentStore;
use crate::passes;

/// Owns the agent update pipeline and its per-frame uniform.
///
/// All GPU resources are created at setup; `update_params` overwrites the
/// uniform in place every tick.
pub struct SimPipeline {
    params_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::ComputePipeline,
}

impl SimPipeline {
    pub fn new(
        device: &wgpu::Device,
        programs: &ProgramTable,
        store: &AgentStore,
        obstacle_view: &wgpu::TextureView,
    ) -> Self {
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sim-params-buffer"),
            size: std::mem::size_of::<SimParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sim-bind-group-layout"),
            entries: &[
                // binding 0: SimParams
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // binding 1: agent records (read_write)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // binding 2: obstacle mask
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        let pipeline = passes::create_agents_pipeline(
            device,
            &bind_group_layout,
            programs.source(ProgramId::Agents),
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sim-bind-group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: store.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(obstacle_view),
                },
            ],
        });

        Self {
            params_buffer,
            bind_group,
            pipeline,
        }
    }

    /// Overwrite the uniform for the next submission.
    pub fn update_params(&self, queue: &wgpu::Queue, params: &SimParams) {
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(params));
    }

    /// Record the agent update. Records nothing when there are no agents.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, agent_count: u32) {
        if agent_count == 0 {
            return;
        }
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("agents-pass"),
            timestamp_writes: None,
        });
        passes::dispatch_agents(&mut pass, &self.pipeline, &self.bind_group, agent_count);
    }
}
