use wgpu::util::DeviceExt;

use crate::mesh::Mesh;

use super::RenderCtx;

// ── vertex layouts ────────────────────────────────────────────────────────

/// Shader location of the position attribute.
pub const POSITION_LOCATION: u32 = 0;
/// Shader location of the normal attribute.
pub const NORMAL_LOCATION: u32 = 1;
/// Shader location of the texture coordinate attribute.
pub const TEX_COORD_LOCATION: u32 = 2;

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![POSITION_LOCATION => Float32x3];
const NORMAL_ATTRS: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![NORMAL_LOCATION => Float32x3];
const TEX_COORD_ATTRS: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![TEX_COORD_LOCATION => Float32x2];

/// One buffer per attribute, in slot order: position, normal, texcoord.
pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRS,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &NORMAL_ATTRS,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &TEX_COORD_ATTRS,
        },
    ]
}

// ── gpu mesh ──────────────────────────────────────────────────────────────

/// GPU-resident copy of a [`Mesh`].
///
/// Buffers are immutable after upload.
#[derive(Debug)]
pub struct GpuMesh {
    positions: wgpu::Buffer,
    normals: wgpu::Buffer,
    tex_coords: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    pub fn upload(ctx: &RenderCtx<'_>, label: &str, mesh: &Mesh) -> Self {
        let buffer = |what: &str, contents: &[u8], usage: wgpu::BufferUsages| {
            ctx.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("projtex {label} {what}")),
                    contents,
                    usage,
                })
        };

        let index_count = u32::try_from(mesh.indices().len()).unwrap_or(u32::MAX);
        log::debug!(
            "uploading mesh {label}: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Self {
            positions: buffer(
                "positions",
                bytemuck::cast_slice(mesh.positions()),
                wgpu::BufferUsages::VERTEX,
            ),
            normals: buffer(
                "normals",
                bytemuck::cast_slice(mesh.normals()),
                wgpu::BufferUsages::VERTEX,
            ),
            tex_coords: buffer(
                "tex coords",
                bytemuck::cast_slice(mesh.tex_coords()),
                wgpu::BufferUsages::VERTEX,
            ),
            indices: buffer(
                "indices",
                bytemuck::cast_slice(mesh.indices()),
                wgpu::BufferUsages::INDEX,
            ),
            index_count,
        }
    }

    /// Binds the vertex/index buffers and issues one indexed draw.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.positions.slice(..));
        pass.set_vertex_buffer(1, self.normals.slice(..));
        pass.set_vertex_buffer(2, self.tex_coords.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_follow_attribute_slots() {
        let layouts = vertex_layouts();
        let locations: Vec<u32> = layouts
            .iter()
            .map(|l| l.attributes[0].shader_location)
            .collect();
        assert_eq!(locations, [POSITION_LOCATION, NORMAL_LOCATION, TEX_COORD_LOCATION]);
        assert_eq!(locations, [0, 1, 2]);
    }

    #[test]
    fn strides_match_mesh_arrays() {
        let layouts = vertex_layouts();
        assert_eq!(layouts[0].array_stride, 12);
        assert_eq!(layouts[1].array_stride, 12);
        assert_eq!(layouts[2].array_stride, 8);
        assert_eq!(layouts[2].attributes[0].format, wgpu::VertexFormat::Float32x2);
    }
}
