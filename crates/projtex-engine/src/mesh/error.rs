/// Errors produced by mesh generators and `Mesh::from_parts`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("{what} must be at least 1")]
    ZeroDivisions { what: &'static str },

    #[error("{what} must be positive and finite (got {value})")]
    InvalidExtent { what: &'static str, value: f32 },

    #[error("attribute length mismatch: {positions} positions, {normals} normals, {tex_coords} texcoords")]
    AttributeMismatch {
        positions:  usize,
        normals:    usize,
        tex_coords: usize,
    },

    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },

    #[error("{0} vertices exceed the 32-bit index range")]
    TooManyVertices(usize),
}
