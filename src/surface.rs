use crate::error::{InitError, PassError};
use crate::gpu::GpuContext;

/// The format the adapter lists first is the one it prefers.
pub fn preferred_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats.first().copied()
}

/// Premultiplied compositing, or `Auto` where the surface cannot do it.
pub fn select_alpha_mode(supported: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if supported.contains(&wgpu::CompositeAlphaMode::PreMultiplied) {
        wgpu::CompositeAlphaMode::PreMultiplied
    } else {
        log::warn!(
            "Surface does not support premultiplied alpha (supports {:?}), using Auto",
            supported
        );
        wgpu::CompositeAlphaMode::Auto
    }
}

/// What the event loop does after a failed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRecovery {
    /// The surface went stale; configure it again and redraw.
    Reconfigure,
    /// Transient; try the next frame.
    Retry,
    /// Report and exit with the error.
    Fatal,
}

pub fn frame_recovery(error: &PassError) -> FrameRecovery {
    match error {
        PassError::Frame(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => FrameRecovery::Reconfigure,
        PassError::Frame(wgpu::SurfaceError::Timeout) => FrameRecovery::Retry,
        _ => FrameRecovery::Fatal,
    }
}

pub struct PresentationSurface {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl PresentationSurface {
    pub fn configure(
        surface: wgpu::Surface<'static>,
        gpu: &GpuContext,
        width: u32,
        height: u32,
    ) -> Result<Self, InitError> {
        let caps = surface.get_capabilities(&gpu.adapter);
        let format = preferred_format(&caps.formats).ok_or(InitError::IncompatibleSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: select_alpha_mode(&caps.alpha_modes),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &config);
        log::info!(
            "Configured surface {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.alpha_mode
        );

        Ok(Self { surface, config })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Zero-sized requests (minimised windows) are ignored.
    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.reconfigure(gpu);
        }
    }

    pub fn reconfigure(&self, gpu: &GpuContext) {
        self.surface.configure(&gpu.device, &self.config);
    }

    pub fn current_frame(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_format_is_first() {
        let formats = [wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Rgba8UnormSrgb];
        assert_eq!(preferred_format(&formats), Some(wgpu::TextureFormat::Bgra8Unorm));
        assert_eq!(preferred_format(&[]), None);
    }

    #[test]
    fn test_frame_recovery() {
        assert_eq!(
            frame_recovery(&PassError::Frame(wgpu::SurfaceError::Lost)),
            FrameRecovery::Reconfigure
        );
        assert_eq!(
            frame_recovery(&PassError::Frame(wgpu::SurfaceError::Outdated)),
            FrameRecovery::Reconfigure
        );
        assert_eq!(
            frame_recovery(&PassError::Frame(wgpu::SurfaceError::Timeout)),
            FrameRecovery::Retry
        );
        assert_eq!(
            frame_recovery(&PassError::Frame(wgpu::SurfaceError::OutOfMemory)),
            FrameRecovery::Fatal
        );
        let validation = PassError::Validation {
            stage: "drawing the triangle",
            message: "Command encoder is invalid".to_string(),
        };
        assert_eq!(frame_recovery(&validation), FrameRecovery::Fatal);
    }

    #[test]
    fn test_alpha_mode() {
        let supported = [wgpu::CompositeAlphaMode::Opaque, wgpu::CompositeAlphaMode::PreMultiplied];
        assert_eq!(select_alpha_mode(&supported), wgpu::CompositeAlphaMode::PreMultiplied);
        assert_eq!(
            select_alpha_mode(&[wgpu::CompositeAlphaMode::Opaque]),
            wgpu::CompositeAlphaMode::Auto
        );
    }
}
