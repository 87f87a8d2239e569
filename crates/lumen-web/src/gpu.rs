use lumen_core::error::LumenError;
use lumen_frame::DeviceContext;
use wgpu::{
    DeviceDescriptor, Instance, InstanceDescriptor, InstanceFlags, PowerPreference,
    RequestAdapterOptions, Surface, SurfaceConfiguration, TextureFormat, TextureUsages,
};

/// WebGPU resources acquired at startup. The core only sees `ctx`.
pub struct GpuContext {
    pub ctx: DeviceContext,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub surface_format: TextureFormat,
    pub adapter_name: String,
    pub backend: String,
}

impl GpuContext {
    /// Re-apply the current configuration after the surface was lost or outdated.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.ctx.device, &self.surface_config);
    }
}

/// Initialize WebGPU. Requests the `BROWSER_WEBGPU` backend only, no WebGL fallback.
pub async fn init_gpu(
    canvas: web_sys::HtmlCanvasElement,
    width: u32,
    height: u32,
) -> Result<GpuContext, LumenError> {
    crate::check_surface_size(width, height)?;

    let instance = Instance::new(&InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        flags: InstanceFlags::default(),
        ..Default::default()
    });

    // Canvas is owned by the DOM and lives for 'static in the web backend.
    let surface: Surface<'static> = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
        .map_err(|e| LumenError::SurfaceConfigFailed(format!("{e}")))?;

    let adapter = instance
        .request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| {
            LumenError::AdapterNotFound(
                "No WebGPU adapter found. Your browser may not support WebGPU.".into(),
            )
        })?;

    let adapter_info = adapter.get_info();
    let adapter_name = adapter_info.name.clone();
    let backend = format!("{:?}", adapter_info.backend);

    log::info!("Adapter: {} ({})", adapter_name, backend);
    log::info!("Adapter limits: {:?}", adapter.limits());

    let (device, queue) = adapter
        .request_device(
            &DeviceDescriptor {
                label: Some("lumen-device"),
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
                ..Default::default()
            },
            None,
        )
        .await
        .map_err(|e| LumenError::DeviceRequestFailed(format!("{e}")))?;

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| surface_caps.formats.first())
        .copied()
        .ok_or_else(|| LumenError::SurfaceConfigFailed("surface reports no formats".into()))?;
    let alpha_mode = surface_caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    let surface_config = SurfaceConfiguration {
        usage: TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width,
        height,
        present_mode: wgpu::PresentMode::AutoVsync,
        desired_maximum_frame_latency: 2,
        alpha_mode,
        view_formats: vec![],
    };
    surface.configure(&device, &surface_config);

    log::info!(
        "Surface format: {:?}, size: {}x{}",
        surface_format,
        width,
        height
    );

    Ok(GpuContext {
        ctx: DeviceContext::new(device, queue),
        surface,
        surface_config,
        surface_format,
        adapter_name,
        backend,
    })
}
