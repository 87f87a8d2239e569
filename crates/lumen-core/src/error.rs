use thiserror::Error;

/// Errors that can occur during Lumen setup and readback.
///
/// The steady-state frame loop never returns these; transient surface
/// problems are logged and the frame is skipped instead.
#[derive(Debug, Error)]
pub enum LumenError {
    #[error("GPU adapter not found: {0}")]
    AdapterNotFound(String),

    #[error("Failed to request GPU device: {0}")]
    DeviceRequestFailed(String),

    #[error("Surface configuration failed: {0}")]
    SurfaceConfigFailed(String),

    #[error("Surface texture error: {0}")]
    SurfaceTextureError(String),

    #[error("Shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    #[error("GPU resource creation failed: {0}")]
    ResourceCreationFailed(String),

    #[error("Invalid scene configuration: {0}")]
    InvalidConfig(String),

    #[error("GPU readback failed: {0}")]
    ReadbackFailed(String),
}
