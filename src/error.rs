use thiserror::Error;

/// Failures while acquiring the adapter, device and surface.
///
/// `Unsupported` and `NoAdapter` carry the exact text shown on the
/// diagnostic output.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("WebGPU not supported.")]
    Unsupported,
    #[error("Couldn't request WebGPU adapter.")]
    NoAdapter,
    #[error("Failed to create presentation surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("Adapter cannot present to this surface")]
    IncompatibleSurface,
    #[error("Failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Failures once a device exists: building or running a pass.
#[derive(Debug, Error)]
pub enum PassError {
    #[error("Validation failed while {stage}: {message}")]
    Validation { stage: &'static str, message: String },
    #[error("Render target {width}x{height} is outside the supported range 1..={max}")]
    InvalidTargetSize { width: u32, height: u32, max: u32 },
    #[error("Failed to acquire surface frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),
    #[error("Failed to map staging buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("Mapping callback dropped before the device signalled completion")]
    MapAbandoned(#[from] futures::channel::oneshot::Canceled),
    #[error("Kernel output mismatch at index {index}: expected {expected}, got {actual}")]
    KernelMismatch { index: usize, expected: f32, actual: f32 },
}
