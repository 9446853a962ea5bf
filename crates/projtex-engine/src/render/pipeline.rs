use std::num::NonZeroU64;

use anyhow::{anyhow, Context, Result};
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

use super::mesh_buffers::vertex_layouts;
use super::shader::{self, ShaderSource};
use super::texture::Texture2d;
use super::RenderCtx;

// ── uniforms ──────────────────────────────────────────────────────────────

/// Surface reflectivity for the ADS (ambient/diffuse/specular) model.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ka: Vector3<f32>,
    pub kd: Vector3<f32>,
    pub ks: Vector3<f32>,
    pub shininess: f32,
}

/// Point light; `position` is in eye space (w = 1).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Light {
    pub position: Vector4<f32>,
    pub intensity: Vector3<f32>,
}

/// Per-draw uniform block, laid out to match `Uniforms` in the scene shaders.
///
/// `normal` is a WGSL `mat3x3<f32>`: three columns padded to 16 bytes.
/// `ks[3]` carries the shininess exponent.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SceneUniforms {
    pub model: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub mvp: [[f32; 4]; 4],
    pub projector: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    pub camera_position: [f32; 4],
    pub light_position: [f32; 4],
    pub light_intensity: [f32; 4],
    pub ka: [f32; 4],
    pub kd: [f32; 4],
    pub ks: [f32; 4],
}

/// Everything needed to fill [`SceneUniforms`] for one draw.
#[derive(Debug, Copy, Clone)]
pub struct DrawParams<'a> {
    pub model: &'a Matrix4<f32>,
    pub model_view: &'a Matrix4<f32>,
    pub mvp: &'a Matrix4<f32>,
    pub normal: &'a Matrix3<f32>,
    pub projector: &'a Matrix4<f32>,
    pub camera_position: Point3<f32>,
    pub light: &'a Light,
    pub material: &'a Material,
}

fn mat4(m: &Matrix4<f32>) -> [[f32; 4]; 4] {
    (*m).into()
}

fn mat3_padded(m: &Matrix3<f32>) -> [[f32; 4]; 3] {
    let c = |i: usize| [m[(0, i)], m[(1, i)], m[(2, i)], 0.0];
    [c(0), c(1), c(2)]
}

fn vec3_w(v: &Vector3<f32>, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

impl SceneUniforms {
    pub fn new(p: &DrawParams<'_>) -> Self {
        Self {
            model: mat4(p.model),
            model_view: mat4(p.model_view),
            mvp: mat4(p.mvp),
            projector: mat4(p.projector),
            normal: mat3_padded(p.normal),
            camera_position: vec3_w(&p.camera_position.coords, 1.0),
            light_position: p.light.position.into(),
            light_intensity: vec3_w(&p.light.intensity, 0.0),
            ka: vec3_w(&p.material.ka, 0.0),
            kd: vec3_w(&p.material.kd, 0.0),
            ks: vec3_w(&p.material.ks, p.material.shininess),
        }
    }
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Render pipeline for lit, projectively textured meshes.
///
/// Bind group 0: uniforms (binding 0), projected texture (1), sampler (2).
pub struct ScenePipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl ScenePipeline {
    /// Builds the pipeline from a vertex and a fragment stage.
    ///
    /// Mismatched stage interfaces are rejected before touching the device.
    /// Anything wgpu still refuses (binding layout, target formats) is caught
    /// in a validation error scope and returned as an error.
    pub fn new(ctx: &RenderCtx<'_>, vertex: &ShaderSource, fragment: &ShaderSource) -> Result<Self> {
        shader::check_interface(vertex, fragment)?;

        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs = vertex.create_module(ctx.device);
        let fs = fragment.create_module(ctx.device);

        let uniform_size = NonZeroU64::new(std::mem::size_of::<SceneUniforms>() as u64)
            .context("uniform block is empty")?;

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("projtex scene bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: Some(uniform_size),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("projtex scene pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let buffers = vertex_layouts();

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("projtex scene pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: ctx.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: ctx.multisample(),

            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(anyhow!("{err}").context(format!(
                "failed to link {} + {}",
                vertex.name(),
                fragment.name()
            )));
        }

        log::debug!("scene pipeline linked ({}x MSAA)", ctx.sample_count);

        Ok(Self {
            pipeline,
            bind_group_layout,
        })
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn set(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }
}

// ── per-draw bindings ─────────────────────────────────────────────────────

/// Uniform buffer + bind group owned by one drawable.
pub struct DrawBindings {
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl DrawBindings {
    pub fn new(
        ctx: &RenderCtx<'_>,
        label: &str,
        pipeline: &ScenePipeline,
        texture: &Texture2d,
    ) -> Self {
        let uniforms = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("projtex {label} ubo")),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("projtex {label} bind group")),
            layout: pipeline.bind_group_layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        Self {
            uniforms,
            bind_group,
        }
    }

    /// Writes `data` and binds the group at index 0.
    pub fn bind(&self, ctx: &RenderCtx<'_>, pass: &mut wgpu::RenderPass<'_>, data: &SceneUniforms) {
        ctx.queue
            .write_buffer(&self.uniforms, 0, bytemuck::bytes_of(data));
        pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> Material {
        Material {
            ka: Vector3::new(0.1, 0.1, 0.1),
            kd: Vector3::new(0.5, 0.2, 0.1),
            ks: Vector3::new(0.95, 0.95, 0.95),
            shininess: 100.0,
        }
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn uniform_block_is_400_bytes() {
        // 4 × mat4x4 (64) + mat3x3 (48) + 6 × vec4 (16)
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 4 * 64 + 48 + 6 * 16);
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
    }

    #[test]
    fn normal_matrix_columns_are_padded() {
        let m = Matrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        let cols = mat3_padded(&m);
        assert_eq!(cols[0], [1.0, 4.0, 7.0, 0.0]);
        assert_eq!(cols[2], [3.0, 6.0, 9.0, 0.0]);
    }

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn uniforms_are_column_major_and_pack_shininess() {
        let model = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        let id4 = Matrix4::identity();
        let id3 = Matrix3::identity();
        let light = Light {
            position: Vector4::new(0.0, 0.0, 0.0, 1.0),
            intensity: Vector3::new(1.0, 1.0, 1.0),
        };
        let mat = material();

        let u = SceneUniforms::new(&DrawParams {
            model: &model,
            model_view: &id4,
            mvp: &id4,
            normal: &id3,
            projector: &id4,
            camera_position: Point3::new(0.0, 2.0, 7.0),
            light: &light,
            material: &mat,
        });

        // Translation lives in the fourth column.
        assert_eq!(u.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.camera_position, [0.0, 2.0, 7.0, 1.0]);
        assert_eq!(u.light_position, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(u.kd, [0.5, 0.2, 0.1, 0.0]);
        assert_eq!(u.ks[3], 100.0);
    }
}
