//! Particle-field renderer: screen-space soft discs plus connective lines.
//!
//! Both passes work in viewport pixel coordinates, converted to NDC in the
//! vertex stage from a small viewport uniform. The disc instance buffer and
//! the line vertex buffer are rewritten each frame.

use bytemuck::{Pod, Zeroable};

use starglow_render::{BufferAllocator, VertexPositionColor};

use crate::particles::ParticleField;

/// GPU uniform shared by both particle pipelines.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct FieldUniforms {
    viewport: [f32; 2],
    _pad: [f32; 2],
}

/// GPU instance data for one particle disc.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct DiscInstance {
    center: [f32; 2],
    radius: f32,
    opacity: f32,
    color: [f32; 3],
    _pad: f32,
}

/// WGSL shader source for discs and link lines.
const PARTICLE_SHADER_SOURCE: &str = r#"
struct FieldUniforms {
    viewport: vec2<f32>,
};

struct DiscInstance {
    center: vec2<f32>,
    radius: f32,
    opacity: f32,
    color: vec3<f32>,
};

@group(0) @binding(0)
var<uniform> field: FieldUniforms;
@group(0) @binding(1)
var<storage, read> discs: array<DiscInstance>;

fn px_to_ndc(px: vec2<f32>) -> vec2<f32> {
    let ndc = px / field.viewport * 2.0 - 1.0;
    return vec2<f32>(ndc.x, -ndc.y);
}

struct DiscOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) opacity: f32,
};

@vertex
fn vs_disc(@builtin(vertex_index) vid: u32, @builtin(instance_index) iid: u32) -> DiscOutput {
    let inst = discs[iid];
    let corner = vec2<f32>(f32(vid & 1u), f32((vid >> 1u) & 1u)) * 2.0 - 1.0;
    let px = inst.center + corner * inst.radius;

    var out: DiscOutput;
    out.clip_position = vec4<f32>(px_to_ndc(px), 0.0, 1.0);
    out.corner = corner;
    out.color = inst.color;
    out.opacity = inst.opacity;
    return out;
}

@fragment
fn fs_disc(in: DiscOutput) -> @location(0) vec4<f32> {
    let r = length(in.corner);
    let alpha = smoothstep(1.0, 0.7, r) * in.opacity;
    if alpha < 0.002 {
        discard;
    }
    return vec4<f32>(in.color, alpha);
}

struct LineInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(in: LineInput) -> LineOutput {
    var out: LineOutput;
    out.clip_position = vec4<f32>(px_to_ndc(in.position.xy), 0.0, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Ambient link-line color (matches the ambient particle palette).
const LINK_COLOR: [f32; 3] = [0.706, 0.745, 1.0];

/// Renders the 2D particle field.
pub struct ParticleFieldRenderer {
    disc_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    disc_buffer: wgpu::Buffer,
    line_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    max_particles: usize,
    disc_count: u32,
    line_vertex_count: u32,
}

impl ParticleFieldRenderer {
    /// Create the renderer with room for `max_particles` discs and the full
    /// pairwise line set.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        max_particles: usize,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particle-shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLE_SHADER_SOURCE.into()),
        });

        let uniforms = FieldUniforms {
            viewport: [1.0, 1.0],
            _pad: [0.0; 2],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle-uniforms"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let discs = vec![DiscInstance::zeroed(); max_particles.max(1)];
        let disc_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle-discs"),
            contents: bytemuck::cast_slice(&discs),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        // Worst case: every unordered pair linked.
        let max_lines = max_particles * max_particles.saturating_sub(1) / 2;
        let line_buffer = BufferAllocator::new(device).create_dynamic_vertex_buffer(
            "particle-lines",
            (max_lines.max(1) * 2 * std::mem::size_of::<VertexPositionColor>()) as u64,
        );

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particle-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<FieldUniforms>() as u64,
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
            label: Some("particle-bg"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: disc_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle-pipeline-layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let blend = Some(wgpu::BlendState::ALPHA_BLENDING);

        let disc_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particle-disc-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_disc"),
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
                entry_point: Some("fs_disc"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particle-line-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
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
                entry_point: Some("fs_line"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        log::info!(
            "Particle field renderer initialized: {} particle capacity",
            max_particles
        );

        Self {
            disc_pipeline,
            line_pipeline,
            uniform_buffer,
            disc_buffer,
            line_buffer,
            bind_group,
            max_particles,
            disc_count: 0,
            line_vertex_count: 0,
        }
    }

    /// Rewrite disc and line buffers from the field state. The link pass is
    /// skipped entirely when `links_enabled` is false (reduced motion).
    pub fn update(&mut self, queue: &wgpu::Queue, field: &ParticleField, links_enabled: bool) {
        let uniforms = FieldUniforms {
            viewport: [field.width(), field.height()],
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let discs: Vec<DiscInstance> = field
            .particles
            .iter()
            .take(self.max_particles)
            .map(|p| DiscInstance {
                center: p.position.to_array(),
                radius: p.radius,
                opacity: p.opacity,
                color: p.color(),
                _pad: 0.0,
            })
            .collect();
        self.disc_count = discs.len() as u32;
        if !discs.is_empty() {
            queue.write_buffer(&self.disc_buffer, 0, bytemuck::cast_slice(&discs));
        }

        if links_enabled {
            let mut vertices = Vec::new();
            for line in field.link_lines() {
                let color = [LINK_COLOR[0], LINK_COLOR[1], LINK_COLOR[2], line.opacity];
                vertices.push(VertexPositionColor {
                    position: [line.a.x, line.a.y, 0.0],
                    color,
                });
                vertices.push(VertexPositionColor {
                    position: [line.b.x, line.b.y, 0.0],
                    color,
                });
            }
            let max_vertices =
                self.max_particles * self.max_particles.saturating_sub(1);
            vertices.truncate(max_vertices);
            self.line_vertex_count = vertices.len() as u32;
            if !vertices.is_empty() {
                queue.write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&vertices));
            }
        } else {
            self.line_vertex_count = 0;
        }
    }

    /// Draw links beneath, then discs.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.line_vertex_count > 0 {
            pass.set_pipeline(&self.line_pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.set_vertex_buffer(0, self.line_buffer.slice(..));
            pass.draw(0..self.line_vertex_count, 0..1);
        }

        if self.disc_count > 0 {
            pass.set_pipeline(&self.disc_pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.draw(0..4, 0..self.disc_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disc_instance_layout() {
        assert_eq!(std::mem::size_of::<DiscInstance>(), 32);
    }

    #[test]
    fn test_field_uniform_layout() {
        assert_eq!(std::mem::size_of::<FieldUniforms>(), 16);
    }
}
