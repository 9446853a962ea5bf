use nalgebra::{Matrix4, Point3, Vector3};

use super::projection::perspective;

/// A virtual slide projector used for projective texturing.
///
/// [`Projector::matrix`] maps world space to homogeneous texture space:
/// after the divide by `w`, points inside the projector frustum land in
/// `[0, 1]` on `x` and `y`. The frustum is built in OpenGL clip space; the
/// shader only reads it, the rasterizer never does.
#[derive(Debug, Clone, PartialEq)]
pub struct Projector {
    pub position: Point3<f32>,
    pub target:   Point3<f32>,
    pub up:       Vector3<f32>,
    /// Vertical field of view in degrees.
    pub fovy_deg: f32,
    pub aspect:   f32,
    pub z_near:   f32,
    pub z_far:    f32,
}

impl Projector {
    pub fn matrix(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(&self.position, &self.target, &self.up);
        let proj = perspective(self.fovy_deg, self.aspect, self.z_near, self.z_far);
        let bias = Matrix4::new_translation(&Vector3::repeat(0.5))
            * Matrix4::new_nonuniform_scaling(&Vector3::repeat(0.5));
        bias * proj * view
    }
}
