use std::cell::RefCell;
use std::rc::Rc;

use lumen_core::config::SceneConfig;
use lumen_core::error::LumenError;
use lumen_core::types::{FrameInput, Resolution};
use lumen_frame::{FrameOrchestrator, LoopControl};
use wasm_bindgen::prelude::*;

use crate::gpu::GpuContext;
use crate::input::InputState;
use crate::ui::debug::DebugPanel;
use crate::ui::UiState;

type RafClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Main application struct. Owns the device, the orchestrator and the
/// optional debug overlay.
pub struct Application {
    gpu: GpuContext,
    orchestrator: FrameOrchestrator,
    ui_state: Option<UiState>,
    debug_panel: DebugPanel,
    input: Rc<RefCell<InputState>>,
    control: LoopControl,
    last_frame_time: f64,
}

impl Application {
    pub async fn new(
        gpu: GpuContext,
        config: SceneConfig,
        dpi_scale: f32,
        input: Rc<RefCell<InputState>>,
        setup_ms: f64,
        show_overlay: bool,
    ) -> Result<Self, LumenError> {
        let resolution = Resolution::new(gpu.surface_config.width, gpu.surface_config.height);
        let orchestrator =
            FrameOrchestrator::new(&gpu.ctx, config, resolution, gpu.surface_format, setup_ms)
                .await?;
        let ui_state = show_overlay
            .then(|| UiState::new(&gpu.ctx.device, gpu.surface_format, dpi_scale));
        log::info!("Debug overlay: {}", if show_overlay { "on" } else { "off" });
        let debug_panel = DebugPanel::new(
            gpu.adapter_name.clone(),
            gpu.backend.clone(),
            &orchestrator.radiance().resolutions(),
        );

        Ok(Self {
            gpu,
            orchestrator,
            ui_state,
            debug_panel,
            input,
            control: LoopControl::new(),
            last_frame_time: setup_ms,
        })
    }

    /// Start the requestAnimationFrame loop. The closure is created once and
    /// re-registered each frame while the loop control is running.
    pub fn start_loop(app: Rc<RefCell<Self>>) {
        let closure: RafClosure = Rc::new(RefCell::new(None));
        let closure_clone = closure.clone();
        let control = app.borrow().control.clone();

        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            if !control.is_running() {
                return;
            }
            {
                let mut app_ref = app.borrow_mut();
                let delta = timestamp - app_ref.last_frame_time;
                app_ref.last_frame_time = timestamp;
                app_ref.debug_panel.update(delta);
                app_ref.render_frame(timestamp);
            }
            if control.is_running() {
                request_frame(&closure_clone);
            }
        }) as Box<dyn FnMut(f64)>));

        request_frame(&closure);
    }

    /// Tick the orchestrator into the next surface image. With the overlay
    /// enabled it is drawn in a second submission on top of the composite.
    fn render_frame(&mut self, timestamp: f64) {
        let Application {
            gpu,
            orchestrator,
            ui_state,
            debug_panel,
            input,
            control,
            ..
        } = self;

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                control.stop();
                return;
            }
            Err(e) => {
                log::warn!("Surface error: {e:?}, skipping frame");
                return;
            }
        };

        let view = output.texture.create_view(&Default::default());
        let pointer = input.borrow().pointer;
        let stats = orchestrator.tick(&gpu.ctx, FrameInput::new(pointer, timestamp), &view);
        debug_panel.set_frame_info(&stats, pointer);

        if let Some(ui_state) = ui_state {
            let overlay = ui_state.build(
                gpu.surface_config.width,
                gpu.surface_config.height,
                |ctx| debug_panel.show(ctx),
            );

            let device = &gpu.ctx.device;
            let queue = &gpu.ctx.queue;
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay-encoder"),
            });
            ui_state.draw(device, queue, &mut encoder, &view, &overlay);
            queue.submit(std::iter::once(encoder.finish()));
        }

        output.present();
    }
}

fn request_frame(closure: &RafClosure) {
    let Some(window) = web_sys::window() else {
        log::error!("no global window, frame loop cannot continue");
        return;
    };
    let registered = closure
        .borrow()
        .as_ref()
        .map(|c| window.request_animation_frame(c.as_ref().unchecked_ref()));
    match registered {
        Some(Ok(_)) => {}
        Some(Err(e)) => log::error!("rAF registration failed: {e:?}"),
        None => log::error!("rAF closure missing"),
    }
}
