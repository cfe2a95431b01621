//! Nebula renderer: instanced textured billboards sharing one baked texture.
//!
//! Plane geometry never changes; per frame the instance buffer is rewritten
//! with the current rotations (a handful of planes, a few hundred bytes).

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::nebula::{NebulaPlane, NebulaTexture};

/// Upper bound on rendered planes.
const MAX_PLANES: usize = 8;

/// GPU instance data for one nebula plane.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct NebulaInstance {
    center: [f32; 3],
    rotation: f32,
    scale: f32,
    opacity: f32,
    _pad: [f32; 2],
}

/// GPU uniform for the nebula pass.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct NebulaUniforms {
    view_proj: [[f32; 4]; 4],
}

/// WGSL shader source for the nebula pass.
const NEBULA_SHADER_SOURCE: &str = r#"
struct NebulaUniforms {
    view_proj: mat4x4<f32>,
};

struct NebulaInstance {
    center: vec3<f32>,
    rotation: f32,
    scale: f32,
    opacity: f32,
};

@group(0) @binding(0)
var<uniform> sky: NebulaUniforms;
@group(0) @binding(1)
var<storage, read> planes: array<NebulaInstance>;
@group(1) @binding(0)
var fog_texture: texture_2d<f32>;
@group(1) @binding(1)
var fog_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) opacity: f32,
};

@vertex
fn vs_nebula(@builtin(vertex_index) vid: u32, @builtin(instance_index) iid: u32) -> VertexOutput {
    let inst = planes[iid];
    let corner = vec2<f32>(f32(vid & 1u), f32((vid >> 1u) & 1u)) * 2.0 - 1.0;

    // Rotate the quad in its own plane, then place it in the world.
    let c = cos(inst.rotation);
    let s = sin(inst.rotation);
    let local = vec2<f32>(
        corner.x * c - corner.y * s,
        corner.x * s + corner.y * c,
    ) * (inst.scale * 0.5);
    let world = vec4<f32>(inst.center + vec3<f32>(local, 0.0), 1.0);

    var out: VertexOutput;
    out.clip_position = sky.view_proj * world;
    out.uv = corner * 0.5 + 0.5;
    out.opacity = inst.opacity;
    return out;
}

@fragment
fn fs_nebula(in: VertexOutput) -> @location(0) vec4<f32> {
    let fog = textureSample(fog_texture, fog_sampler, in.uv);
    let alpha = fog.a * in.opacity;
    return vec4<f32>(fog.rgb * alpha, alpha);
}
"#;

/// Renders the nebula plane bank.
pub struct NebulaRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    plane_count: u32,
}

impl NebulaRenderer {
    /// Create the renderer, uploading the shared baked gradient texture.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        texture: &NebulaTexture,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("nebula-shader"),
            source: wgpu::ShaderSource::Wgsl(NEBULA_SHADER_SOURCE.into()),
        });

        // Shared soft-gradient texture, baked on the CPU.
        let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("nebula-texture"),
            size: wgpu::Extent3d {
                width: texture.size,
                height: texture.size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &gpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texture.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(texture.size * 4),
                rows_per_image: Some(texture.size),
            },
            wgpu::Extent3d {
                width: texture.size,
                height: texture.size,
                depth_or_array_layers: 1,
            },
        );

        let texture_view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("nebula-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let uniforms = NebulaUniforms {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("nebula-uniforms"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let instances = vec![NebulaInstance::zeroed(); MAX_PLANES];
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("nebula-instances"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("nebula-scene-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(64),
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

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("nebula-texture-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("nebula-scene-bg"),
            layout: &scene_bgl,
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

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("nebula-texture-bg"),
            layout: &texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("nebula-pipeline-layout"),
            bind_group_layouts: &[&scene_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("nebula-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_nebula"),
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
                entry_point: Some("fs_nebula"),
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
            "Nebula renderer initialized: {}x{} shared texture",
            texture.size,
            texture.size
        );

        Self {
            pipeline,
            uniform_buffer,
            instance_buffer,
            scene_bind_group,
            texture_bind_group,
            plane_count: 0,
        }
    }

    /// Upload this frame's plane rotations and view-projection matrix.
    pub fn update(&mut self, queue: &wgpu::Queue, planes: &[NebulaPlane], view_proj: Mat4) {
        let uniforms = NebulaUniforms {
            view_proj: view_proj.to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let mut instances = vec![NebulaInstance::zeroed(); MAX_PLANES];
        let count = planes.len().min(MAX_PLANES);
        for (slot, plane) in instances.iter_mut().zip(planes.iter().take(count)) {
            *slot = NebulaInstance {
                center: plane.position.to_array(),
                rotation: plane.rotation,
                scale: plane.scale,
                opacity: plane.opacity,
                _pad: [0.0; 2],
            };
        }
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        self.plane_count = count as u32;
    }

    /// Draw the nebula planes. Rendered first, behind the stars.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.plane_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
        pass.draw(0..4, 0..self.plane_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nebula_instance_layout() {
        // Must match the WGSL storage struct: vec3 + f32 + f32 + f32, padded.
        assert_eq!(std::mem::size_of::<NebulaInstance>(), 32);
    }
}
