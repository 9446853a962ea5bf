use std::f32::consts::TAU;

use nalgebra::{Matrix4, Point3, Vector3};

/// Camera on a horizontal circle around the origin, always looking at it.
///
/// The eye sits at `(r·cos a, height, r·sin a)`; `a` advances by
/// `speed · dt` per tick and stays in `[0, 2π)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub radius: f32,
    pub height: f32,
    /// Angular speed in radians per second.
    pub speed:  f32,
    angle:      f32,
}

impl OrbitCamera {
    pub fn new(radius: f32, height: f32, angle: f32, speed: f32) -> Self {
        Self {
            radius,
            height,
            speed,
            angle: angle.rem_euclid(TAU),
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advances the orbit by `dt` seconds, wrapping modulo a full turn.
    pub fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + self.speed * dt).rem_euclid(TAU);
        // rem_euclid may round up to exactly TAU for tiny negative inputs.
        if self.angle >= TAU {
            self.angle = 0.0;
        }
    }

    pub fn eye(&self) -> Point3<f32> {
        Point3::new(
            self.radius * self.angle.cos(),
            self.height,
            self.radius * self.angle.sin(),
        )
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y())
    }
}
