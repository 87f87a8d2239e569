//! WebGPU host. Expects a page with a `<canvas id="lumen-canvas">` and an
//! element `id="lumen-info"` for the pointer readout.

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod gpu;
pub mod input;
pub mod ui;

use lumen_core::error::LumenError;

/// DOM id of the canvas the surface is created on.
pub const CANVAS_ID: &str = "lumen-canvas";

/// DOM id of the element showing the pointer status string.
pub const INFO_ID: &str = "lumen-info";

/// Reject a zero-sized canvas before the surface is configured with it.
pub fn check_surface_size(width: u32, height: u32) -> Result<(), LumenError> {
    if width == 0 || height == 0 {
        return Err(LumenError::SurfaceConfigFailed(format!(
            "canvas '{CANVAS_ID}' has zero size ({width}x{height})"
        )));
    }
    Ok(())
}


#[cfg(target_arch = "wasm32")]
mod wasm_entry {
    use std::cell::RefCell;
    use std::rc::Rc;

    use lumen_core::config::SceneConfig;
    use lumen_core::error::LumenError;
    use wasm_bindgen::prelude::*;

    use crate::{app, gpu, input, ui, CANVAS_ID};

    /// WASM entry point. Sets the panic hook and initializes logging.
    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }
        log::info!("Lumen starting...");

        wasm_bindgen_futures::spawn_local(async {
            if let Err(e) = run().await {
                show_error_to_user(&format!("{e}"));
            }
        });
    }

    /// Async initialization: canvas, physical size, device, orchestrator, loop.
    async fn run() -> Result<(), LumenError> {
        let window = web_sys::window()
            .ok_or_else(|| LumenError::SurfaceConfigFailed("no global window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| LumenError::SurfaceConfigFailed("no document".into()))?;

        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            .ok_or_else(|| {
                LumenError::SurfaceConfigFailed(format!("canvas element '{CANVAS_ID}' not found"))
            })?;

        let dpi_scale = window.device_pixel_ratio() as f32;
        let css_width = canvas.client_width() as f32;
        let css_height = canvas.client_height() as f32;
        let physical_width = (css_width * dpi_scale) as u32;
        let physical_height = (css_height * dpi_scale) as u32;

        canvas.set_width(physical_width);
        canvas.set_height(physical_height);

        log::info!(
            "Canvas: {}x{} CSS, {}x{} physical (DPI: {:.2})",
            css_width,
            css_height,
            physical_width,
            physical_height,
            dpi_scale
        );

        let input_state = Rc::new(RefCell::new(input::InputState::new()));
        input::register_input_listeners(&canvas, input_state.clone());

        let gpu_ctx = gpu::init_gpu(canvas, physical_width, physical_height).await?;
        let setup_ms = window.performance().map_or(0.0, |p| p.now());
        let show_overlay = window
            .location()
            .search()
            .map(|query| ui::overlay_requested(&query))
            .unwrap_or(false);
        let application = app::Application::new(
            gpu_ctx,
            SceneConfig::default(),
            dpi_scale,
            input_state,
            setup_ms,
            show_overlay,
        )
        .await?;

        app::Application::start_loop(Rc::new(RefCell::new(application)));
        Ok(())
    }

    /// Fatal setup errors go to an alert as well as the console.
    fn show_error_to_user(msg: &str) {
        log::error!("{msg}");
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&format!("Lumen Error: {msg}"));
        }
    }
}
