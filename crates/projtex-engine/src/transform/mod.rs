//! 3D transform helpers shared by the scene and renderers.
//!
//! Canonical CPU space:
//! - right-handed, +Y up, camera looks down -Z
//! - matrices are column-major `nalgebra::Matrix4<f32>`
//!
//! Perspective matrices are built in OpenGL clip space (`z ∈ [-1, 1]`) and
//! converted with [`opengl_to_wgpu`] only where the rasterizer consumes them.

mod orbit;
mod projection;
mod projector;

pub use orbit::OrbitCamera;
pub use projection::CameraProjection;
pub use projector::Projector;

use nalgebra::{Matrix3, Matrix4};

/// Remaps OpenGL clip-space depth (`[-1, 1]`) to wgpu's `[0, 1]`.
#[rustfmt::skip]
pub fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Inverse transpose of the upper-left 3×3 block of `model_view`.
///
/// Returns identity when the block is singular.
pub fn normal_matrix(model_view: &Matrix4<f32>) -> Matrix3<f32> {
    model_view
        .fixed_view::<3, 3>(0, 0)
        .into_owned()
        .try_inverse()
        .map(|m| m.transpose())
        .unwrap_or_else(Matrix3::identity)
}
