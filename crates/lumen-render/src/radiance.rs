use lumen_core::obstacle::ObstacleMask;
use lumen_core::programs::ProgramTable;
use lumen_core::schedule::FramePass;
use lumen_core::types::Resolution;

use crate::cascade::CascadePyramid;
use crate::composite::CompositeStage;
use crate::emission::EmissionStage;
use crate::fields::{FieldHandle, FieldRegistry};
use crate::merge::MergeStage;
use crate::obstacle::ObstacleField;

/// Everything after the agent update: obstacle field, emission, cascade
/// pyramid, merge and composite, plus the registry that owns their fields.
pub struct RadiancePipeline {
    registry: FieldRegistry,
    obstacle: ObstacleField,
    emission: EmissionStage,
    pyramid: CascadePyramid,
    merge: MergeStage,
    composite: CompositeStage,
}

impl RadiancePipeline {
    /// Allocate every field and pipeline. The obstacle mask is uploaded here,
    /// once; `resolutions` is the validated pyramid, finest first.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        programs: &ProgramTable,
        mask: &ObstacleMask,
        resolutions: &[Resolution],
        agent_buffer: &wgpu::Buffer,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        let mut registry = FieldRegistry::new();
        let obstacle = ObstacleField::upload(device, queue, &mut registry, mask);
        let emission =
            EmissionStage::new(device, programs, &mut registry, resolutions[0], agent_buffer);
        let pyramid = CascadePyramid::new(
            device,
            programs,
            &mut registry,
            emission.field(),
            obstacle.handle(),
            resolutions,
        );
        let merge = MergeStage::new(device, programs, &registry, &pyramid, obstacle.handle());
        let composite = CompositeStage::new(
            device,
            programs,
            &registry,
            pyramid.level(0).field,
            target_format,
        );

        log::info!(
            "RadiancePipeline: {} fields, {} texels, {} merge pairs",
            registry.len(),
            registry.texel_count(),
            merge.pair_count()
        );

        Self {
            registry,
            obstacle,
            emission,
            pyramid,
            merge,
            composite,
        }
    }

    /// Overwrite emission, diffusion and merge uniforms for the next submission.
    pub fn update_params(&self, queue: &wgpu::Queue, time: f32, agent_count: u32) {
        self.emission.update_params(queue, time, agent_count);
        self.pyramid.update_params(queue);
        self.merge.update_params(queue);
    }

    /// Record one pass of the frame schedule. `Simulate` belongs to the agent
    /// pipeline and records nothing here.
    pub fn encode_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        pass: FramePass,
        target: &wgpu::TextureView,
    ) {
        match pass {
            FramePass::Simulate => {}
            FramePass::Clear => self.emission.encode_clear(encoder),
            FramePass::Emit => self.emission.encode_emit(encoder),
            FramePass::Diffuse { level } => self.pyramid.encode_diffuse(encoder, level),
            FramePass::Merge { fine } => self.merge.encode_merge(encoder, fine),
            FramePass::CopyBack { level } => {
                self.merge.encode_copy_back(encoder, &self.registry, level)
            }
            FramePass::Composite => self.composite.encode(encoder, target),
        }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn obstacle_view(&self) -> &wgpu::TextureView {
        self.registry.view(self.obstacle.handle())
    }

    pub fn obstacle_field(&self) -> FieldHandle {
        self.obstacle.handle()
    }

    pub fn emission_field(&self) -> FieldHandle {
        self.emission.field()
    }

    pub fn level_field(&self, level: u32) -> FieldHandle {
        self.pyramid.level(level).field
    }

    pub fn scratch_field(&self, level: u32) -> Option<FieldHandle> {
        self.pyramid.level(level).scratch
    }

    pub fn level_count(&self) -> u32 {
        self.pyramid.level_count()
    }

    pub fn resolutions(&self) -> Vec<Resolution> {
        self.pyramid.resolutions()
    }

    pub fn blocked_cells(&self) -> u64 {
        self.obstacle.blocked_cells()
    }
}
