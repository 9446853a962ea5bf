//! CPU side of the teapot/plane scene: animation state and per-draw uniforms.

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use projtex_engine::render::{DrawParams, Light, Material, SceneUniforms};
use projtex_engine::time::{FrameClock, FrameTime};
use projtex_engine::transform::{normal_matrix, CameraProjection, OrbitCamera, Projector};

use crate::config::SceneConfig;

// ── materials / lights ────────────────────────────────────────────────────

pub fn teapot_material() -> Material {
    Material {
        ka: Vector3::new(0.1, 0.1, 0.1),
        kd: Vector3::new(0.5, 0.2, 0.1),
        ks: Vector3::new(0.95, 0.95, 0.95),
        shininess: 100.0,
    }
}

pub fn plane_material() -> Material {
    Material {
        ka: Vector3::new(0.1, 0.1, 0.1),
        kd: Vector3::new(0.4, 0.4, 0.4),
        ks: Vector3::zeros(),
        shininess: 1.0,
    }
}

/// White light at the eye.
pub fn scene_light() -> Light {
    Light {
        position: Vector4::new(0.0, 0.0, 0.0, 1.0),
        intensity: Vector3::new(1.0, 1.0, 1.0),
    }
}

pub fn scene_projector() -> Projector {
    Projector {
        position: Point3::new(2.0, 5.0, 5.0),
        target: Point3::new(-2.0, -4.0, 0.0),
        up: Vector3::y(),
        fovy_deg: 30.0,
        aspect: 1.0,
        z_near: 0.2,
        z_far: 1000.0,
    }
}

pub fn teapot_model() -> Matrix4<f32> {
    Matrix4::new_translation(&Vector3::new(0.0, -1.0, 0.0))
        * Matrix4::from_axis_angle(&Vector3::x_axis(), (-90.0f32).to_radians())
}

pub fn plane_model() -> Matrix4<f32> {
    Matrix4::new_translation(&Vector3::new(0.0, -0.75, 0.0))
}

// ── state ─────────────────────────────────────────────────────────────────

/// Animation and camera state, mutated once per rendered frame.
#[derive(Debug, Clone)]
pub struct SceneState {
    clock: FrameClock,
    camera: OrbitCamera,
    projection: CameraProjection,
    projector: Matrix4<f32>,
    light: Light,
    view: Matrix4<f32>,
    resize_events: u64,
}

impl SceneState {
    pub fn new(config: &SceneConfig, width: u32, height: u32) -> Self {
        let camera = OrbitCamera::new(
            config.orbit_radius,
            config.orbit_height,
            config.orbit_angle,
            config.orbit_speed,
        );
        let mut projection = CameraProjection::new(config.fovy_deg, 1.0, config.z_near, config.z_far);
        projection.set_viewport(width, height);

        Self {
            clock: FrameClock::new(),
            view: camera.view_matrix(),
            camera,
            projection,
            projector: scene_projector().matrix(),
            light: scene_light(),
            resize_events: 0,
        }
    }

    /// Applies a window resize; the projection aspect becomes `width / height`.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if self.projection.set_viewport(width, height) {
            self.resize_events += 1;
        }
    }

    /// Sets the aspect without counting it as a resize event.
    pub fn sync_viewport(&mut self, width: u32, height: u32) {
        self.projection.set_viewport(width, height);
    }

    /// Advances animation to simulated time `now` (seconds).
    ///
    /// The first call reports `dt = 0`.
    pub fn advance(&mut self, now: f32) -> FrameTime {
        let time = self.clock.tick(now);
        self.camera.advance(time.dt);
        self.view = self.camera.view_matrix();
        time
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.camera.angle()
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.projection.aspect()
    }

    #[inline]
    pub fn resize_events(&self) -> u64 {
        self.resize_events
    }

    pub fn camera_position(&self) -> Point3<f32> {
        self.camera.eye()
    }

    /// Uniforms for drawing an object with `model` and `material` this frame.
    pub fn uniforms(&self, model: &Matrix4<f32>, material: &Material) -> SceneUniforms {
        let model_view = self.view * model;
        let mvp = self.projection.matrix() * model_view;
        let normal = normal_matrix(&model_view);

        SceneUniforms::new(&DrawParams {
            model,
            model_view: &model_view,
            mvp: &mvp,
            normal: &normal,
            projector: &self.projector,
            camera_position: self.camera_position(),
            light: &self.light,
            material,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{PI, TAU};

    use approx::assert_relative_eq;

    use super::*;

    fn state() -> SceneState {
        SceneState::new(&SceneConfig::default(), 800, 600)
    }

    // ── timing ────────────────────────────────────────────────────────────

    #[test]
    fn first_frame_has_zero_dt() {
        let mut s = state();
        let before = s.angle();
        let t = s.advance(12.5);
        assert_eq!(t.dt, 0.0);
        assert_eq!(s.angle(), before);
    }

    #[test]
    fn dt_spans_sim_time_between_drawn_frames() {
        // Sim time keeps running while surface frames are skipped; the next
        // drawn frame sees the whole gap as one step.
        let mut s = state();
        s.advance(3.0);
        let t = s.advance(3.75);
        assert_eq!(t.dt, 0.75);
        assert_eq!(t.frame_index, 1);
    }

    #[test]
    fn angle_follows_closed_form() {
        let mut s = state();
        let initial = s.angle();
        let dt = 1.0 / 60.0;
        let n = 600;

        s.advance(0.0);
        for i in 1..=n {
            s.advance(i as f32 * dt);
        }

        let expected = (initial + (PI / 8.0) * n as f32 * dt).rem_euclid(TAU);
        assert_relative_eq!(s.angle(), expected, epsilon = 1.0e-3);
    }

    #[test]
    fn angle_wraps_after_full_turn() {
        let mut s = state();
        s.advance(0.0);
        // One full turn takes 16 s at π/8 rad/s.
        s.advance(17.0);
        assert!(s.angle() >= 0.0 && s.angle() < TAU);
    }

    #[test]
    fn initial_camera_sits_on_positive_z() {
        let s = state();
        let eye = s.camera_position();
        assert_relative_eq!(eye.x, 0.0, epsilon = 1.0e-4);
        assert_relative_eq!(eye.y, 2.0);
        assert_relative_eq!(eye.z, 7.0, epsilon = 1.0e-4);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_sets_aspect_once_per_event() {
        let mut s = state();
        assert_relative_eq!(s.aspect(), 800.0 / 600.0);

        s.on_resize(1024, 512);
        assert_eq!(s.aspect(), 2.0);
        assert_eq!(s.resize_events(), 1);

        s.on_resize(300, 300);
        assert_eq!(s.aspect(), 1.0);
        assert_eq!(s.resize_events(), 2);
    }

    #[test]
    fn minimized_window_keeps_aspect() {
        let mut s = state();
        s.on_resize(0, 0);
        assert_relative_eq!(s.aspect(), 800.0 / 600.0);
        assert_eq!(s.resize_events(), 0);
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn teapot_model_stands_upright() {
        // The Z-up spout axis becomes +Y after the -90° X rotation.
        let up = teapot_model().transform_vector(&Vector3::z());
        assert_relative_eq!(up, Vector3::y(), epsilon = 1.0e-6);
        let origin = teapot_model().transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn uniforms_carry_material_and_light() {
        let s = state();
        let u = s.uniforms(&plane_model(), &plane_material());
        assert_eq!(u.kd, [0.4, 0.4, 0.4, 0.0]);
        assert_eq!(u.ks, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(u.light_position, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(u.light_intensity, [1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn projector_target_maps_to_texture_center() {
        let s = state();
        let u = s.uniforms(&plane_model(), &plane_material());
        let projector: Matrix4<f32> = u.projector.into();
        let p = projector * Vector4::new(-2.0, -4.0, 0.0, 1.0);
        assert_relative_eq!(p.x / p.w, 0.5, epsilon = 1.0e-5);
        assert_relative_eq!(p.y / p.w, 0.5, epsilon = 1.0e-5);
        assert!(p.z > 0.0);
    }

    #[test]
    fn origin_projects_inside_depth_range() {
        let s = state();
        let u = s.uniforms(&Matrix4::identity(), &teapot_material());
        let mvp: Matrix4<f32> = u.mvp.into();
        let clip = mvp * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc_z = clip.z / clip.w;
        assert!(clip.w > 0.0);
        assert!((0.0..=1.0).contains(&ndc_z));
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1.0e-4);
    }
}
