//! Host readback through a mappable staging buffer.
//!
//! The mapping protocol is encoded in the types. A [`StagingBuffer`] can
//! only be a copy destination; its bytes are reachable only through the
//! [`MappedStaging`] returned once the device signals that the map
//! request completed. Unmapping hands the [`StagingBuffer`] back, so a
//! mapped buffer can never be targeted by a new copy.
//!
//! Reading before the map resolves does not compile:
//!
//! ```compile_fail
//! # fn check(staging: hello_webgpu::readback::StagingBuffer) {
//! let bytes = staging.copy_out();
//! # }
//! ```

use crate::error::PassError;

pub struct StagingBuffer {
    buffer: wgpu::Buffer,
}

impl StagingBuffer {
    pub fn new(device: &wgpu::Device, label: &str, size: u64) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer }
    }

    pub fn size(&self) -> u64 {
        self.buffer.size()
    }

    /// Records a full-extent copy from `source` into this buffer.
    pub fn encode_copy_from(&self, encoder: &mut wgpu::CommandEncoder, source: &wgpu::Buffer) {
        encoder.copy_buffer_to_buffer(source, 0, &self.buffer, 0, self.size());
    }

    pub fn encode_copy_from_texture(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        texture: &wgpu::Texture,
        bytes_per_row: u32,
    ) {
        let size = texture.size();
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &self.buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(size.height),
                },
            },
            size,
        );
    }

    /// Requests host read access over the whole buffer and waits for it.
    ///
    /// This is the only point where the calling sequence suspends. There
    /// is no timeout.
    pub async fn map_read(self, device: &wgpu::Device) -> Result<MappedStaging, PassError> {
        let (tx, rx) = futures::channel::oneshot::channel();
        self.buffer
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |result| {
                let _ = tx.send(result);
            });

        device.poll(wgpu::Maintain::Wait);
        rx.await??;

        Ok(MappedStaging {
            buffer: self.buffer,
        })
    }
}

/// A staging buffer whose read mapping has completed.
pub struct MappedStaging {
    buffer: wgpu::Buffer,
}

impl MappedStaging {
    pub fn copy_out(&self) -> Vec<u8> {
        let view = self.buffer.slice(..).get_mapped_range();
        view.to_vec()
    }

    /// Releases the mapping so the buffer can receive another copy.
    pub fn unmap(self) -> StagingBuffer {
        self.buffer.unmap();
        StagingBuffer {
            buffer: self.buffer,
        }
    }
}

/// Interprets little-endian bytes as `f32` values.
///
/// Trailing bytes that do not fill a whole value are ignored.
pub fn decode_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
