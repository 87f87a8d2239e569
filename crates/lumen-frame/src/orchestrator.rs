use lumen_core::config::SceneConfig;
use lumen_core::error::LumenError;
use lumen_core::math::pointer_to_ndc;
use lumen_core::obstacle::ObstacleMask;
use lumen_core::params::SimParams;
use lumen_core::programs::ProgramTable;
use lumen_core::schedule::{build_frame_schedule, cascade_resolutions, FramePass};
use lumen_core::types::{FrameInput, Resolution};
use lumen_render::RadiancePipeline;
use lumen_sim::{seed_agents, AgentStore, SimPipeline};

use crate::clock::{FrameClock, FrameState};
use crate::context::DeviceContext;

/// What one tick did, for overlays and reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub dt: f32,
    pub elapsed: f32,
    pub agent_count: u32,
    pub passes: u32,
}

/// Owns the whole per-frame pipeline and drives it one tick at a time.
///
/// Setup builds the obstacle field, agents, every field and every pipeline
/// (Idle -> Armed). Each `tick` overwrites the uniforms, records the fixed
/// pass schedule into one encoder and submits it once, so the agent update
/// and the rendering passes are ordered by in-batch hazard tracking.
pub struct FrameOrchestrator {
    config: SceneConfig,
    resolution: Resolution,
    agents: AgentStore,
    sim: SimPipeline,
    radiance: RadiancePipeline,
    schedule: Vec<FramePass>,
    clock: FrameClock,
}

impl FrameOrchestrator {
    /// `setup_ms` is the host timestamp the first tick's delta is measured from.
    pub async fn new(
        ctx: &DeviceContext,
        config: SceneConfig,
        resolution: Resolution,
        target_format: wgpu::TextureFormat,
        setup_ms: f64,
    ) -> Result<Self, LumenError> {
        config.validate_for(resolution)?;
        let resolutions = cascade_resolutions(resolution, config.cascade_levels)?;

        let programs = ProgramTable::load();
        ctx.check_programs(&programs).await?;

        let mask = ObstacleMask::rasterize(resolution, &config.obstacles);
        let initial_agents = seed_agents(config.agent_count, config.agent_seed, &mask);

        let (agents, radiance, sim) = ctx
            .create_scoped(|ctx| {
                let agents = AgentStore::new(&ctx.device, &initial_agents);
                let radiance = RadiancePipeline::new(
                    &ctx.device,
                    &ctx.queue,
                    &programs,
                    &mask,
                    &resolutions,
                    agents.buffer(),
                    target_format,
                );
                let sim = SimPipeline::new(&ctx.device, &programs, &agents, radiance.obstacle_view());
                (agents, radiance, sim)
            })
            .await?;

        let schedule = build_frame_schedule(config.cascade_levels);
        let mut clock = FrameClock::new();
        clock.arm(setup_ms);

        log::info!(
            "FrameOrchestrator: {}x{}, {} agents, {} levels, {} passes per frame",
            resolution.width,
            resolution.height,
            agents.count(),
            resolutions.len(),
            schedule.len()
        );

        Ok(Self {
            config,
            resolution,
            agents,
            sim,
            radiance,
            schedule,
            clock,
        })
    }

    /// Run one frame: update every uniform, record the schedule, submit once.
    /// The host presents `target` afterwards.
    pub fn tick(
        &mut self,
        ctx: &DeviceContext,
        input: FrameInput,
        target: &wgpu::TextureView,
    ) -> FrameStats {
        let timing = self.clock.tick(input.timestamp_ms);
        let agent_count = self.agents.count();

        let sim_params = SimParams::new(
            pointer_to_ndc(input.pointer),
            timing.dt,
            agent_count,
            self.config.accel_strength,
            self.config.max_speed,
        );
        self.sim.update_params(&ctx.queue, &sim_params);
        self.radiance
            .update_params(&ctx.queue, timing.elapsed, agent_count);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        for &pass in &self.schedule {
            match pass {
                FramePass::Simulate => self.sim.encode(&mut encoder, agent_count),
                other => self.radiance.encode_pass(&mut encoder, other, target),
            }
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));

        FrameStats {
            frame: timing.frame,
            dt: timing.dt,
            elapsed: timing.elapsed,
            agent_count,
            passes: self.schedule.len() as u32,
        }
    }

    pub fn state(&self) -> FrameState {
        self.clock.state()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn schedule(&self) -> &[FramePass] {
        &self.schedule
    }

    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    /// For hosts and tests that reposition agents or change the active count.
    pub fn agents_mut(&mut self) -> &mut AgentStore {
        &mut self.agents
    }

    pub fn radiance(&self) -> &RadiancePipeline {
        &self.radiance
    }
}
