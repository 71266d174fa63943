use bytemuck::{Pod, Zeroable};

use crate::error::PassError;
use crate::gpu::GpuContext;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.5,
    b: 1.0,
    a: 1.0,
};

const TRIANGLE_SHADER: &str = include_str!("shaders/triangle.wgsl");

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<Vertex>() == 32);

pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex {
        position: [0.0, 0.6, 0.0, 1.0],
        color: [1.0, 0.0, 0.0, 1.0],
    },
    Vertex {
        position: [-0.5, -0.6, 0.0, 1.0],
        color: [0.0, 1.0, 0.0, 1.0],
    },
    Vertex {
        position: [0.5, -0.6, 0.0, 1.0],
        color: [0.0, 0.0, 1.0, 1.0],
    },
];

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x4,
        },
        wgpu::VertexAttribute {
            offset: 4 * 4,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x4,
        },
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// The vertex buffer and pipeline for the fixed triangle, built once.
pub struct TrianglePass {
    vertex_buffer: wgpu::Buffer,
    pipeline: wgpu::RenderPipeline,
}

impl TrianglePass {
    pub async fn new(gpu: &GpuContext, target_format: wgpu::TextureFormat) -> Result<Self, PassError> {
        let payload: &[u8] = bytemuck::cast_slice(&TRIANGLE_VERTICES);
        let vertex_buffer = gpu
            .validated("uploading the vertex buffer", |device| {
                let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Triangle Vertex Buffer"),
                    size: payload.len() as wgpu::BufferAddress,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                gpu.queue.write_buffer(&vertex_buffer, 0, payload);
                vertex_buffer
            })
            .await?;

        let shader = gpu
            .validated("compiling the triangle shader", |device| {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some("Triangle Shader"),
                    source: wgpu::ShaderSource::Wgsl(TRIANGLE_SHADER.into()),
                })
            })
            .await?;

        let pipeline = gpu
            .validated("building the render pipeline", |device| {
                Self::create_render_pipeline(device, &shader, target_format)
            })
            .await?;

        log::debug!("Triangle pipeline ready for {:?}", target_format);

        Ok(Self {
            vertex_buffer,
            pipeline,
        })
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        target_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Triangle Pipeline"),
            // Inferred from the shader.
            layout: None,
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vertex_main",
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fragment_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }

    /// Records a render pass that clears `view` and draws the triangle.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Triangle Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..TRIANGLE_VERTICES.len() as u32, 0..1);
    }

    /// Encodes and submits one frame into `view`.
    pub async fn draw(
        &self,
        gpu: &GpuContext,
        view: &wgpu::TextureView,
    ) -> Result<wgpu::SubmissionIndex, PassError> {
        gpu.validated("drawing the triangle", |device| {
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
            self.encode(&mut encoder, view);
            gpu.queue.submit(Some(encoder.finish()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_size() {
        let payload: &[u8] = bytemuck::cast_slice(&TRIANGLE_VERTICES);
        assert_eq!(payload.len(), 96);

        let floats: &[f32] = bytemuck::cast_slice(&TRIANGLE_VERTICES);
        assert_eq!(floats.len(), 24);
    }

    #[test]
    fn test_layout_matches_vertex() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].offset, 16);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }
}
