use nalgebra::Matrix4;

use super::opengl_to_wgpu;

/// Perspective camera projection that tracks the window aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraProjection {
    /// Vertical field of view in degrees.
    pub fovy_deg: f32,
    pub z_near:   f32,
    pub z_far:    f32,

    aspect: f32,
    matrix: Matrix4<f32>,
}

impl CameraProjection {
    pub fn new(fovy_deg: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Self {
            fovy_deg,
            z_near,
            z_far,
            aspect,
            matrix: perspective(fovy_deg, aspect, z_near, z_far),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Recomputes the projection for a `width × height` drawable.
    ///
    /// Zero-sized drawables (minimized windows) keep the previous aspect and
    /// return `false`.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        self.matrix = perspective(self.fovy_deg, self.aspect, self.z_near, self.z_far);
        true
    }

    /// Projection in OpenGL clip space.
    #[inline]
    pub fn gl_matrix(&self) -> Matrix4<f32> {
        self.matrix
    }

    /// Projection in wgpu clip space.
    pub fn matrix(&self) -> Matrix4<f32> {
        opengl_to_wgpu() * self.matrix
    }
}

pub(super) fn perspective(fovy_deg: f32, aspect: f32, z_near: f32, z_far: f32) -> Matrix4<f32> {
    Matrix4::new_perspective(aspect, fovy_deg.to_radians(), z_near, z_far)
}
