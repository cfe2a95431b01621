//! Starfield renderer: instanced soft-disc billboards with additive blending.
//!
//! Star positions and colors are uploaded once into a storage buffer at
//! construction; per frame only a small uniform (projection, rotated
//! model-view, point size) is rewritten. Each star expands to a camera-facing
//! quad in view space, shaded as a soft disc in the fragment stage.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::starfield::StarPoint;

/// GPU instance data for a single star.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct StarInstance {
    position: [f32; 3],
    _pad0: f32,
    color: [f32; 3],
    _pad1: f32,
}

/// GPU uniforms for the star pass.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct StarUniforms {
    /// Projection matrix.
    proj: [[f32; 4]; 4],
    /// View × model (aggregate rotation) matrix.
    view_model: [[f32; 4]; 4],
    /// Billboard half-extent in view-space units.
    point_size: f32,
    /// Global star layer opacity.
    opacity: f32,
    _pad: [f32; 2],
}

/// WGSL shader source for the star pass.
const STAR_SHADER_SOURCE: &str = r#"
struct StarUniforms {
    proj: mat4x4<f32>,
    view_model: mat4x4<f32>,
    point_size: f32,
    opacity: f32,
};

struct StarInstance {
    position: vec3<f32>,
    color: vec3<f32>,
};

@group(0) @binding(0)
var<uniform> sky: StarUniforms;
@group(0) @binding(1)
var<storage, read> stars: array<StarInstance>;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_star(@builtin(vertex_index) vid: u32, @builtin(instance_index) iid: u32) -> VertexOutput {
    let inst = stars[iid];
    // Triangle-strip quad corner in [-1, 1]².
    let corner = vec2<f32>(f32(vid & 1u), f32((vid >> 1u) & 1u)) * 2.0 - 1.0;

    // Billboard: offset in view space so the quad always faces the camera.
    var view_pos = sky.view_model * vec4<f32>(inst.position, 1.0);
    view_pos.x += corner.x * sky.point_size;
    view_pos.y += corner.y * sky.point_size;

    var out: VertexOutput;
    out.clip_position = sky.proj * view_pos;
    out.corner = corner;
    out.color = inst.color;
    return out;
}

@fragment
fn fs_star(in: VertexOutput) -> @location(0) vec4<f32> {
    let r = length(in.corner);
    let alpha = smoothstep(1.0, 0.3, r) * sky.opacity;
    if alpha < 0.001 {
        discard;
    }
    return vec4<f32>(in.color * alpha, alpha);
}
"#;

/// Global opacity of the star layer.
const STAR_LAYER_OPACITY: f32 = 0.6;

/// Renders the starfield as instanced billboards.
pub struct StarfieldRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    star_count: u32,
    point_size: f32,
}

impl StarfieldRenderer {
    /// Create the renderer, uploading the star catalog to the GPU.
    ///
    /// `point_size` is the per-class size already scaled by the clamped
    /// device pixel ratio.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        points: &[StarPoint],
        point_size: f32,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("star-shader"),
            source: wgpu::ShaderSource::Wgsl(STAR_SHADER_SOURCE.into()),
        });

        let instances: Vec<StarInstance> = points
            .iter()
            .map(|p| StarInstance {
                position: p.position.to_array(),
                _pad0: 0.0,
                color: p.color,
                _pad1: 0.0,
            })
            .collect();

        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star-instances"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let uniforms = StarUniforms {
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            view_model: Mat4::IDENTITY.to_cols_array_2d(),
            point_size,
            opacity: STAR_LAYER_OPACITY,
            _pad: [0.0; 2],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star-uniforms"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("star-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<StarUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("star-bg"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: instance_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("star-pipeline-layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("star-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_star"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_star"),
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

        log::info!(
            "Starfield renderer initialized: {} stars, point size {:.3}",
            points.len(),
            point_size
        );

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            star_count: points.len() as u32,
            point_size,
        }
    }

    /// Upload this frame's projection and rotated model-view matrices.
    pub fn update(&self, queue: &wgpu::Queue, proj: Mat4, view_model: Mat4) {
        let uniforms = StarUniforms {
            proj: proj.to_cols_array_2d(),
            view_model: view_model.to_cols_array_2d(),
            point_size: self.point_size,
            opacity: STAR_LAYER_OPACITY,
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Draw all stars.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.star_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..4, 0..self.star_count);
    }
}
