pub mod debug;

use egui_wgpu::ScreenDescriptor;

/// The debug overlay is opt-in: a `debug` key in the page query (`?debug`,
/// `?debug=1`, `?x=2&debug`) turns it on. Without it only the composite
/// touches the surface.
pub fn overlay_requested(query: &str) -> bool {
    query
        .trim_start_matches('?')
        .split('&')
        .any(|pair| pair.split('=').next() == Some("debug"))
}

/// Tessellated overlay for one frame, ready to draw over the composite.
pub struct OverlayFrame {
    screen: ScreenDescriptor,
    primitives: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
}

/// egui context plus its wgpu renderer. Drawn after the composite pass.
pub struct UiState {
    ctx: egui::Context,
    renderer: egui_wgpu::Renderer,
}

impl UiState {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, dpi_scale: f32) -> Self {
        let ctx = egui::Context::default();
        ctx.set_pixels_per_point(dpi_scale);
        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);
        Self { ctx, renderer }
    }

    /// Run the UI closure for a `width` x `height` surface and tessellate it.
    pub fn build(
        &self,
        width: u32,
        height: u32,
        ui: impl FnMut(&egui::Context),
    ) -> OverlayFrame {
        let screen = ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: self.ctx.pixels_per_point(),
        };
        let raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(
                    width as f32 / screen.pixels_per_point,
                    height as f32 / screen.pixels_per_point,
                ),
            )),
            ..Default::default()
        };
        let output = self.ctx.run(raw_input, ui);
        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        OverlayFrame {
            screen,
            primitives,
            textures: output.textures_delta,
        }
    }

    /// Upload the frame's textures and draw it onto `view` without clearing.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: &OverlayFrame,
    ) {
        for (id, delta) in &frame.textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &frame.primitives, &frame.screen);

        {
            // forget_lifetime() lets the pass outlive the encoder borrow for the renderer.
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("overlay-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.renderer
                .render(&mut pass, &frame.primitives, &frame.screen);
        }

        for id in &frame.textures.free {
            self.renderer.free_texture(id);
        }
    }
}
