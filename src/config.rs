//! Command-line configuration.
//!
//! Backend selection follows the usual wgpu convention: an explicit
//! `--backend` list wins, then the `WGPU_BACKEND` environment variable,
//! then every backend the build supports.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::gpu::GpuConfig;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

#[derive(Parser, Debug, Clone)]
#[command(name = "hello_webgpu")]
#[command(about = "Draws a triangle and runs a compute kernel on the GPU")]
pub struct Args {
    /// Comma separated backend list, e.g. "vulkan,gl"
    #[arg(long)]
    pub backend: Option<String>,

    /// Adapter power preference
    #[arg(long, value_enum, default_value_t = Power::High)]
    pub power_preference: Power,

    /// Render into an offscreen texture instead of a window
    #[arg(long)]
    pub headless: bool,

    /// Save the rendered frame as PNG (implies --headless)
    #[arg(long)]
    pub save_frame: Option<PathBuf>,

    /// Surface width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    Low,
    High,
}

impl From<Power> for wgpu::PowerPreference {
    fn from(power: Power) -> Self {
        match power {
            Power::Low => wgpu::PowerPreference::LowPower,
            Power::High => wgpu::PowerPreference::HighPerformance,
        }
    }
}

impl Args {
    pub fn backends(&self) -> wgpu::Backends {
        match &self.backend {
            Some(list) => wgpu::util::parse_backends_from_comma_list(list),
            None => wgpu::util::backend_bits_from_env().unwrap_or(wgpu::Backends::all()),
        }
    }

    pub fn power_preference(&self) -> wgpu::PowerPreference {
        self.power_preference.into()
    }

    pub fn is_headless(&self) -> bool {
        self.headless || self.save_frame.is_some()
    }

    pub fn gpu_config(&self) -> GpuConfig {
        GpuConfig {
            backends: self.backends(),
            power_preference: self.power_preference(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["hello_webgpu"]).unwrap();
        assert_eq!(args.width, DEFAULT_WIDTH);
        assert_eq!(args.height, DEFAULT_HEIGHT);
        assert_eq!(args.power_preference(), wgpu::PowerPreference::HighPerformance);
        assert!(!args.is_headless());
    }

    #[test]
    fn test_save_frame_implies_headless() {
        let args = Args::try_parse_from(["hello_webgpu", "--save-frame", "out.png"]).unwrap();
        assert!(args.is_headless());
    }

    #[test]
    fn test_explicit_backend_list() {
        let args = Args::try_parse_from(["hello_webgpu", "--backend", "vulkan,gl"]).unwrap();
        assert_eq!(args.backends(), wgpu::Backends::VULKAN | wgpu::Backends::GL);
    }

    #[test]
    fn test_low_power() {
        let args = Args::try_parse_from(["hello_webgpu", "--power-preference", "low"]).unwrap();
        assert_eq!(args.power_preference(), wgpu::PowerPreference::LowPower);
    }
}
