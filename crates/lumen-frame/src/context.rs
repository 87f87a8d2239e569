use lumen_core::error::LumenError;
use lumen_core::programs::ProgramTable;

/// The device handle every component is built from and ticked with.
///
/// Hosts acquire the adapter, device and surface; the core only ever sees
/// this value.
pub struct DeviceContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl DeviceContext {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }

    /// Compile every program once inside a validation scope so a bad
    /// program fails setup with `ShaderCompilationFailed`.
    pub async fn check_programs(&self, programs: &ProgramTable) -> Result<(), LumenError> {
        for (id, source) in programs.iter() {
            self.device.push_error_scope(wgpu::ErrorFilter::Validation);
            let _module = self
                .device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(id.label()),
                    source: wgpu::ShaderSource::Wgsl(source.into()),
                });
            if let Some(error) = self.device.pop_error_scope().await {
                return Err(LumenError::ShaderCompilationFailed(format!(
                    "{}: {error}",
                    id.label()
                )));
            }
        }
        Ok(())
    }

    /// Run resource creation inside validation and out-of-memory scopes,
    /// turning any captured error into `ResourceCreationFailed`.
    pub async fn create_scoped<T>(
        &self,
        create: impl FnOnce(&DeviceContext) -> T,
    ) -> Result<T, LumenError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let value = create(self);
        let out_of_memory = self.device.pop_error_scope().await;
        let validation = self.device.pop_error_scope().await;
        match out_of_memory.or(validation) {
            Some(error) => Err(LumenError::ResourceCreationFailed(error.to_string())),
            None => Ok(value),
        }
    }
}
