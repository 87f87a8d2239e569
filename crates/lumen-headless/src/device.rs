use lumen_core::error::LumenError;
use lumen_frame::DeviceContext;

/// Acquire a native adapter and device without a surface. Blocks on the async requests.
pub fn request_native_context(label: &str) -> Result<DeviceContext, LumenError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .ok_or_else(|| LumenError::AdapterNotFound("no native GPU adapter available".into()))?;

    let info = adapter.get_info();
    log::info!("Headless adapter: {} ({:?})", info.name, info.backend);

    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some(label),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
        },
        None,
    ))
    .map_err(|e| LumenError::DeviceRequestFailed(e.to_string()))?;

    Ok(DeviceContext::new(device, queue))
}
