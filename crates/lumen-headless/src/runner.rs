use std::time::Instant;

use lumen_core::config::SceneConfig;
use lumen_core::constants::RADIANCE_TEXEL_BYTES;
use lumen_core::error::LumenError;
use lumen_core::types::{FrameInput, Resolution};
use lumen_frame::{DeviceContext, FrameOrchestrator};
use lumen_render::readback;

use crate::device::request_native_context;

/// Nominal host frame interval used for synthetic timestamps.
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Format of the offscreen stand-in for the display surface.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Timing data for a single run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of running one scene.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RunResult {
    pub scene_name: String,
    pub width: u32,
    pub height: u32,
    pub agent_count: u32,
    pub cascade_levels: u32,
    pub frame_count: u32,
    pub blocked_cells: u64,
    pub lit_emission_texels: usize,
    pub lit_level0_texels: usize,
    pub timings: TimingSeries,
}

/// Offscreen render target the composite pass draws into.
pub struct OffscreenTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub resolution: Resolution,
}

impl OffscreenTarget {
    pub fn new(device: &wgpu::Device, resolution: Resolution) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen-target"),
            size: wgpu::Extent3d {
                width: resolution.width,
                height: resolution.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            resolution,
        }
    }

    /// Read the target back as RGBA8 pixels.
    pub fn read_pixels(&self, ctx: &DeviceContext) -> Result<Vec<[u8; 4]>, LumenError> {
        let bytes = readback::read_texture(
            &ctx.device,
            &ctx.queue,
            &self.texture,
            self.resolution,
            4,
        )?;
        Ok(bytes
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect())
    }
}

/// Read one radiance field (emission, cascade level or scratch) as RGBA floats.
pub fn read_field(
    ctx: &DeviceContext,
    orchestrator: &FrameOrchestrator,
    handle: lumen_render::FieldHandle,
) -> Result<Vec<[f32; 4]>, LumenError> {
    let registry = orchestrator.radiance().registry();
    let bytes = readback::read_texture(
        &ctx.device,
        &ctx.queue,
        registry.texture(handle),
        registry.resolution(handle),
        RADIANCE_TEXEL_BYTES,
    )?;
    Ok(readback::decode_rgba16f(&bytes))
}

/// Synthetic pointer: a slow circle around the surface centre.
pub fn orbit_pointer(frame: u32) -> [f32; 2] {
    let t = frame as f32 * 0.02;
    [0.5 + 0.3 * t.cos(), 0.5 + 0.3 * t.sin()]
}

/// Runs scenes on a native GPU without a window.
pub struct HeadlessRunner {
    ctx: DeviceContext,
    resolution: Resolution,
    frame_count: u32,
}

impl HeadlessRunner {
    pub fn new(resolution: Resolution, frame_count: u32) -> Result<Self, LumenError> {
        let ctx = request_native_context("headless-device")?;
        Ok(Self {
            ctx,
            resolution,
            frame_count,
        })
    }

    /// Run `frame_count` frames of one scene and collect timings.
    pub fn run_scene(&self, name: &str, config: &SceneConfig) -> Result<RunResult, LumenError> {
        log::info!(
            "Running scene '{}' ({} agents, {}x{})...",
            name,
            config.agent_count,
            self.resolution.width,
            self.resolution.height
        );

        let mut orchestrator = pollster::block_on(FrameOrchestrator::new(
            &self.ctx,
            config.clone(),
            self.resolution,
            OFFSCREEN_FORMAT,
            0.0,
        ))?;
        let target = OffscreenTarget::new(&self.ctx.device, self.resolution);

        let mut frame_times = Vec::with_capacity(self.frame_count as usize);
        for frame in 0..self.frame_count {
            let input = FrameInput::new(orbit_pointer(frame), (frame + 1) as f64 * FRAME_INTERVAL_MS);

            let frame_start = Instant::now();
            orchestrator.tick(&self.ctx, input, &target.view);
            self.ctx.device.poll(wgpu::Maintain::Wait);
            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);
        }

        let radiance = orchestrator.radiance();
        let emission = read_field(&self.ctx, &orchestrator, radiance.emission_field())?;
        let level0 = read_field(&self.ctx, &orchestrator, radiance.level_field(0))?;

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.2}ms, p95={:.2}ms, p99={:.2}ms",
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms
        );

        Ok(RunResult {
            scene_name: name.to_string(),
            width: self.resolution.width,
            height: self.resolution.height,
            agent_count: orchestrator.agents().count(),
            cascade_levels: radiance.level_count(),
            frame_count: self.frame_count,
            blocked_cells: radiance.blocked_cells(),
            lit_emission_texels: readback::lit_texel_count(&emission),
            lit_level0_texels: readback::lit_texel_count(&level0),
            timings,
        })
    }
}

/// Compute timing statistics from a list of frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timings_empty() {
        let t = compute_timings(&[]);
        assert_eq!(t.mean_ms, 0.0);
        assert_eq!(t.max_ms, 0.0);
    }

    #[test]
    fn test_timings_stats() {
        let t = compute_timings(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(t.mean_ms, 2.5);
        assert_eq!(t.median_ms, 2.5);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, 4.0);
        assert_eq!(t.p99_ms, 4.0);
    }

    #[test]
    fn test_orbit_pointer_stays_normalized() {
        for frame in 0..1000 {
            let [x, y] = orbit_pointer(frame);
            assert!((0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y));
        }
    }
}
