//! CPU-side mesh data and procedural generators.
//!
//! Generators are pure: the same parameters always produce the same arrays.
//! Every `Mesh` that leaves this module has been validated, so renderers can
//! upload it without re-checking bounds.
//!
//! Conventions:
//! - positions/normals are `[f32; 3]`, texcoords `[f32; 2]` (bytemuck-castable)
//! - triangles are index triples into the vertex arrays, counter-clockwise
//!   when seen from the side the normals point to

mod error;
mod plane;
mod teapot;
mod teapot_data;

pub use error::MeshError;
pub use plane::plane;
pub use teapot::{teapot, TEAPOT_PATCH_COUNT};

/// Immutable triangle mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions:  Vec<[f32; 3]>,
    normals:    Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    indices:    Vec<u32>,
}

impl Mesh {
    /// Builds a mesh from raw arrays, checking the attribute/index invariants.
    pub fn from_parts(
        positions: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        tex_coords: Vec<[f32; 2]>,
        indices: Vec<u32>,
    ) -> Result<Self, MeshError> {
        let mesh = Self { positions, normals, tex_coords, indices };
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks that attribute arrays agree in length and every index is in range.
    pub fn validate(&self) -> Result<(), MeshError> {
        let n = self.positions.len();
        if self.normals.len() != n || self.tex_coords.len() != n {
            return Err(MeshError::AttributeMismatch {
                positions:  n,
                normals:    self.normals.len(),
                tex_coords: self.tex_coords.len(),
            });
        }
        if u32::try_from(n).is_err() {
            return Err(MeshError::TooManyVertices(n));
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(self.indices.len()));
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= n) {
            return Err(MeshError::IndexOutOfBounds { index, vertex_count: n });
        }
        Ok(())
    }
}
