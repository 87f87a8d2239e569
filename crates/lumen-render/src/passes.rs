use lumen_core::constants::TILE_SIZE;
use lumen_core::math::workgroup_count;
use lumen_core::programs::{ProgramId, ProgramTable};
use lumen_core::types::Resolution;

/// Compile `id` from the program table into a compute pipeline with an explicit layout.
pub fn create_compute_pipeline(
    device: &wgpu::Device,
    programs: &ProgramTable,
    id: ProgramId,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::ComputePipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(id.label()),
        source: wgpu::ShaderSource::Wgsl(programs.source(id).into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{}-layout", id.label())),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(&format!("{}-pipeline", id.label())),
        layout: Some(&layout),
        module: &module,
        entry_point: id.compute_entry(),
        compilation_options: Default::default(),
        cache: None,
    })
}

/// Dispatch one TILE_SIZE x TILE_SIZE workgroup per tile covering `resolution`.
pub fn dispatch_tiles(
    pass: &mut wgpu::ComputePass,
    pipeline: &wgpu::ComputePipeline,
    bind_group: &wgpu::BindGroup,
    resolution: Resolution,
) {
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.dispatch_workgroups(
        workgroup_count(resolution.width, TILE_SIZE),
        workgroup_count(resolution.height, TILE_SIZE),
        1,
    );
}
