use serde::Serialize;
use wgpu::{Adapter, Device, Instance, Queue};

use crate::error::{InitError, PassError};

/// Adapter negotiation settings.
#[derive(Debug, Clone, Copy)]
pub struct GpuConfig {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
        }
    }
}

/// Adapter metadata as written to the diagnostic output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterReport {
    pub architecture: String,
    pub description: String,
    pub device: String,
    pub vendor: String,
}

impl From<&wgpu::AdapterInfo> for AdapterReport {
    fn from(info: &wgpu::AdapterInfo) -> Self {
        Self {
            architecture: format!("{:?}", info.device_type),
            description: info.name.clone(),
            device: format!("{:#06x}", info.device),
            vendor: format!("{:#06x}", info.vendor),
        }
    }
}

/// Creates the instance, refusing when no backend is enabled.
///
/// Nothing is allocated on the error path.
pub fn create_instance(backends: wgpu::Backends) -> Result<Instance, InitError> {
    if backends.is_empty() {
        return Err(InitError::Unsupported);
    }
    Ok(Instance::new(wgpu::InstanceDescriptor {
        backends,
        ..Default::default()
    }))
}

pub fn require_adapter<A>(adapter: Option<A>) -> Result<A, InitError> {
    adapter.ok_or(InitError::NoAdapter)
}

pub struct GpuContext {
    /// Not read after construction; held so the instance outlives its adapter and device.
    pub instance: Instance,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    pub async fn new(
        instance: Instance,
        config: &GpuConfig,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, InitError> {
        let adapter = require_adapter(
            instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: config.power_preference,
                    compatible_surface,
                    force_fallback_adapter: false,
                })
                .await,
        )?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?}, {:?})", info.name, info.backend, info.device_type);
        log::debug!("Driver: {} {}", info.driver, info.driver_info);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Primary Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await?;

        device.on_uncaptured_error(Box::new(|error| {
            log::error!("Uncaptured GPU error: {error}");
        }));

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    pub fn adapter_report(&self) -> AdapterReport {
        AdapterReport::from(&self.adapter.get_info())
    }

    /// Runs `build` inside out-of-memory and validation error scopes.
    ///
    /// Resource creation, pipeline construction and submission report
    /// their failures here instead of reaching the uncaptured handler.
    pub async fn validated<T>(
        &self,
        stage: &'static str,
        build: impl FnOnce(&Device) -> T,
    ) -> Result<T, PassError> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = build(&self.device);
        let validation = self.device.pop_error_scope().await;
        let out_of_memory = self.device.pop_error_scope().await;
        match validation.or(out_of_memory) {
            Some(error) => Err(PassError::Validation {
                stage,
                message: error.to_string(),
            }),
            None => Ok(value),
        }
    }
}
