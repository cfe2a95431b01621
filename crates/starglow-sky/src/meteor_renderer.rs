//! Meteor streak renderer: a small line-list with additive blending.
//!
//! The vertex buffer holds at most `capacity` head/tail pairs and is
//! rewritten from the active meteor list every frame, so meteors appear and
//! vanish without any pipeline or buffer churn.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use starglow_render::{BufferAllocator, VertexPositionColor};

use crate::meteor::Meteor;

/// GPU uniform for the meteor pass.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct MeteorUniforms {
    view_proj: [[f32; 4]; 4],
}

/// WGSL shader source for the meteor pass.
const METEOR_SHADER_SOURCE: &str = r#"
struct MeteorUniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> sky: MeteorUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_meteor(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = sky.view_proj * vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_meteor(in: VertexOutput) -> @location(0) vec4<f32> {
    // Color arrives premultiplied for additive compositing.
    return in.color;
}
"#;

/// Renders active meteors as line segments.
pub struct MeteorRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    capacity: usize,
    vertex_count: u32,
}

impl MeteorRenderer {
    /// Create the renderer with room for `capacity` concurrent meteors.
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, capacity: usize) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("meteor-shader"),
            source: wgpu::ShaderSource::Wgsl(METEOR_SHADER_SOURCE.into()),
        });

        let uniforms = MeteorUniforms {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("meteor-uniforms"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let vertex_buffer = BufferAllocator::new(device).create_dynamic_vertex_buffer(
            "meteor-vertices",
            (capacity * 2 * std::mem::size_of::<VertexPositionColor>()) as u64,
        );

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("meteor-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("meteor-bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("meteor-pipeline-layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("meteor-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_meteor"),
                buffers: &[VertexPositionColor::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_meteor"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent::OVER,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            capacity,
            vertex_count: 0,
        }
    }

    /// Rewrite the vertex buffer from the active meteor list and upload this
    /// frame's view-projection matrix.
    pub fn update(&mut self, queue: &wgpu::Queue, meteors: &[Meteor], view_proj: Mat4) {
        let uniforms = MeteorUniforms {
            view_proj: view_proj.to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let vertices = build_vertices(meteors, self.capacity);
        self.vertex_count = vertices.len() as u32;
        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
    }

    /// Draw the active meteors.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.vertex_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Build head/tail line vertices, premultiplied for additive blending.
fn build_vertices(meteors: &[Meteor], capacity: usize) -> Vec<VertexPositionColor> {
    let mut vertices = Vec::with_capacity(meteors.len().min(capacity) * 2);
    for meteor in meteors.iter().take(capacity) {
        let a = meteor.opacity;
        let color = [
            meteor.color[0] * a,
            meteor.color[1] * a,
            meteor.color[2] * a,
            a,
        ];
        vertices.push(VertexPositionColor {
            position: meteor.head.to_array(),
            color,
        });
        vertices.push(VertexPositionColor {
            position: meteor.tail.to_array(),
            color,
        });
    }
    vertices
}
