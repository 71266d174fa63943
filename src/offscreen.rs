//! Headless render target.
//!
//! Stands in for the presentation surface when no window exists. The
//! rendered frame can be copied back to the host and saved as PNG.

use std::path::Path;

use crate::error::PassError;
use crate::gpu::GpuContext;
use crate::readback::StagingBuffer;

pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const BYTES_PER_PIXEL: u32 = 4;

/// Row pitch for texture-to-buffer copies, padded to the copy alignment.
///
/// `None` when the pitch does not fit in a `u32`.
pub fn padded_bytes_per_row(width: u32) -> Option<u32> {
    let unpadded = width.checked_mul(BYTES_PER_PIXEL)?;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align).checked_mul(align)
}

/// Drops the row padding added for the copy.
pub fn strip_row_padding(data: &[u8], width: u32, height: u32, bytes_per_row: u32) -> Vec<u8> {
    let row_len = (width as usize).saturating_mul(BYTES_PER_PIXEL as usize);
    let mut pixels = Vec::with_capacity(row_len.saturating_mul(height as usize).min(data.len()));
    for row in data.chunks(bytes_per_row as usize).take(height as usize) {
        pixels.extend_from_slice(&row[..row_len.min(row.len())]);
    }
    pixels
}

/// Rejects zero sizes and sizes past the device's 2D texture limit.
pub fn check_target_size(width: u32, height: u32, max: u32) -> Result<(), PassError> {
    if width == 0 || height == 0 || width > max || height > max {
        return Err(PassError::InvalidTargetSize { width, height, max });
    }
    Ok(())
}

pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl OffscreenTarget {
    pub async fn new(gpu: &GpuContext, width: u32, height: u32) -> Result<Self, PassError> {
        check_target_size(width, height, gpu.device.limits().max_texture_dimension_2d)?;

        let (texture, view) = gpu
            .validated("creating the offscreen target", |device| {
                let texture = device.create_texture(&wgpu::TextureDescriptor {
                    label: Some("Offscreen Texture"),
                    size: wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: OFFSCREEN_FORMAT,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
                    view_formats: &[],
                });
                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
                (texture, view)
            })
            .await?;
        Ok(Self { texture, view })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        OFFSCREEN_FORMAT
    }

    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Copies the current contents back as tightly packed RGBA8 rows.
    pub async fn capture(&self, gpu: &GpuContext) -> Result<Vec<u8>, PassError> {
        let (width, height) = self.size();
        let max = gpu.device.limits().max_texture_dimension_2d;
        let bytes_per_row = padded_bytes_per_row(width)
            .ok_or(PassError::InvalidTargetSize { width, height, max })?;

        let staging = gpu
            .validated("capturing the offscreen target", |device| {
                let staging = StagingBuffer::new(
                    device,
                    "Capture Staging Buffer",
                    bytes_per_row as u64 * height as u64,
                );
                let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Capture Encoder"),
                });
                staging.encode_copy_from_texture(&mut encoder, &self.texture, bytes_per_row);
                gpu.queue.submit(Some(encoder.finish()));
                staging
            })
            .await?;

        let mapped = staging.map_read(&gpu.device).await?;
        let data = mapped.copy_out();
        mapped.unmap();

        Ok(strip_row_padding(&data, width, height, bytes_per_row))
    }
}

pub fn save_png(path: &Path, rgba: &[u8], width: u32, height: u32) -> image::ImageResult<()> {
    image::save_buffer(path, rgba, width, height, image::ColorType::Rgba8)
}
