//! Compute pass: a single kernel filling a storage buffer, copied into a
//! staging buffer and read back on the host.

use crate::error::PassError;
use crate::gpu::GpuContext;
use crate::readback::{decode_f32, StagingBuffer};

/// Byte size of both the storage and the staging buffer.
pub const BUFFER_SIZE: u64 = 1000;
/// Must match `@workgroup_size` in `shaders/compute.wgsl`.
pub const WORKGROUP_SIZE: u32 = 64;

const COMPUTE_SHADER: &str = include_str!("shaders/compute.wgsl");

/// Number of workgroups covering `buffer_size` along one dimension.
pub fn workgroup_count(buffer_size: u64, workgroup_size: u32) -> u32 {
    buffer_size.div_ceil(workgroup_size as u64) as u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputeOutput {
    pub bytes: Vec<u8>,
    pub values: Vec<f32>,
}

pub struct ComputeKernel {
    storage_buffer: wgpu::Buffer,
    staging_buffer: StagingBuffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::ComputePipeline,
}

impl ComputeKernel {
    pub async fn new(gpu: &GpuContext) -> Result<Self, PassError> {
        let (storage_buffer, staging_buffer, bind_group_layout, bind_group) = gpu
            .validated("allocating compute buffers", |device| {
                let storage_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Compute Storage Buffer"),
                    size: BUFFER_SIZE,
                    usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
                    mapped_at_creation: false,
                });
                let staging_buffer = StagingBuffer::new(device, "Compute Staging Buffer", BUFFER_SIZE);

                let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Compute Bind Group Layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: false },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Compute Bind Group"),
                    layout: &bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: storage_buffer.as_entire_binding(),
                    }],
                });

                (storage_buffer, staging_buffer, bind_group_layout, bind_group)
            })
            .await?;

        let shader = gpu
            .validated("compiling the compute shader", |device| {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some("Compute Shader"),
                    source: wgpu::ShaderSource::Wgsl(COMPUTE_SHADER.into()),
                })
            })
            .await?;

        let pipeline = gpu
            .validated("building the compute pipeline", |device| {
                let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Compute Pipeline Layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    push_constant_ranges: &[],
                });

                device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                    label: Some("Compute Pipeline"),
                    layout: Some(&pipeline_layout),
                    module: &shader,
                    entry_point: "main",
                })
            })
            .await?;

        log::debug!("Compute kernel ready ({} byte buffers)", BUFFER_SIZE);

        Ok(Self {
            storage_buffer,
            staging_buffer,
            bind_group,
            pipeline,
        })
    }

    /// Dispatches the kernel, copies the result to the staging buffer in
    /// the same submission and reads it back.
    pub async fn run(self, gpu: &GpuContext) -> Result<ComputeOutput, PassError> {
        gpu.validated("dispatching the compute pass", |device| {
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Compute Encoder"),
            });

            {
                let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("Compute Pass"),
                    timestamp_writes: None,
                });
                compute_pass.set_pipeline(&self.pipeline);
                compute_pass.set_bind_group(0, &self.bind_group, &[]);
                compute_pass.dispatch_workgroups(workgroup_count(BUFFER_SIZE, WORKGROUP_SIZE), 1, 1);
            }

            self.staging_buffer.encode_copy_from(&mut encoder, &self.storage_buffer);
            gpu.queue.submit(Some(encoder.finish()));
        })
        .await?;

        let mapped = self.staging_buffer.map_read(&gpu.device).await?;
        let bytes = mapped.copy_out();
        mapped.unmap();

        let values = decode_f32(&bytes);
        Ok(ComputeOutput { bytes, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workgroup_count_covers_buffer() {
        assert_eq!(workgroup_count(BUFFER_SIZE, WORKGROUP_SIZE), 16);
        assert_eq!(workgroup_count(64, 64), 1);
        assert_eq!(workgroup_count(65, 64), 2);
        assert_eq!(workgroup_count(0, 64), 0);
    }
}
