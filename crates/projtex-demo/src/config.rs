use std::f32::consts::PI;
use std::ffi::OsString;
use std::path::PathBuf;

use projtex_engine::device::GpuInit;
use projtex_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// Environment variable overriding [`SceneConfig::asset_dir`].
pub const ASSET_DIR_ENV: &str = "PROJTEX_ASSET_DIR";

/// Scene parameters: asset locations, tessellation and camera setup.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub asset_dir: PathBuf,
    /// Paths below are relative to `asset_dir` unless absolute.
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub texture: PathBuf,
    pub flip_texture: bool,

    pub teapot_grid: u32,
    pub plane_size: (f32, f32),
    pub plane_divs: (u32, u32),

    pub orbit_radius: f32,
    pub orbit_height: f32,
    pub orbit_angle: f32,
    /// Radians per second.
    pub orbit_speed: f32,

    pub fovy_deg: f32,
    pub z_near: f32,
    pub z_far: f32,

    pub clear_color: wgpu::Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")),
            vertex_shader: PathBuf::from("shaders/projtex.vert.wgsl"),
            fragment_shader: PathBuf::from("shaders/projtex.frag.wgsl"),
            texture: PathBuf::from("flower.png"),
            flip_texture: true,

            teapot_grid: 14,
            plane_size: (100.0, 100.0),
            plane_divs: (1, 1),

            orbit_radius: 7.0,
            orbit_height: 2.0,
            orbit_angle: 1.5708,
            orbit_speed: PI / 8.0,

            fovy_deg: 50.0,
            z_near: 0.3,
            z_far: 1000.0,

            clear_color: wgpu::Color::TRANSPARENT,
        }
    }
}

impl SceneConfig {
    /// Defaults with the `PROJTEX_ASSET_DIR` override applied.
    pub fn from_env() -> Self {
        Self::default().with_asset_dir_override(std::env::var_os(ASSET_DIR_ENV))
    }

    /// Replaces `asset_dir` when `dir` is present and non-empty.
    pub fn with_asset_dir_override(mut self, dir: Option<OsString>) -> Self {
        if let Some(dir) = dir.filter(|d| !d.is_empty()) {
            self.asset_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn vertex_shader_path(&self) -> PathBuf {
        self.asset_dir.join(&self.vertex_shader)
    }

    pub fn fragment_shader_path(&self) -> PathBuf {
        self.asset_dir.join(&self.fragment_shader)
    }

    pub fn texture_path(&self) -> PathBuf {
        self.asset_dir.join(&self.texture)
    }
}

/// Window settings for the demo.
pub fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        title: "Projective Texture".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
        ..RuntimeConfig::default()
    }
}

/// GPU settings for the demo: depth buffer, 4× MSAA, linear (non-sRGB) output.
pub fn gpu_init() -> GpuInit {
    GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scene() {
        let c = SceneConfig::default();
        assert_eq!(c.teapot_grid, 14);
        assert_eq!(c.plane_size, (100.0, 100.0));
        assert_eq!(c.plane_divs, (1, 1));
        assert!((c.orbit_speed - PI / 8.0).abs() < 1e-7);
        assert_eq!(c.clear_color, wgpu::Color::TRANSPARENT);
    }

    #[test]
    fn default_assets_ship_with_crate() {
        let c = SceneConfig::default();
        assert!(c.vertex_shader_path().is_file());
        assert!(c.fragment_shader_path().is_file());
        assert!(c.texture_path().is_file());
    }

    #[test]
    fn asset_dir_override() {
        let c = SceneConfig::default().with_asset_dir_override(Some("/opt/projtex".into()));
        assert_eq!(c.texture_path(), PathBuf::from("/opt/projtex/flower.png"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let default_dir = SceneConfig::default().asset_dir;
        let c = SceneConfig::default().with_asset_dir_override(Some(OsString::new()));
        assert_eq!(c.asset_dir, default_dir);
        let c = SceneConfig::default().with_asset_dir_override(None);
        assert_eq!(c.asset_dir, default_dir);
    }

    #[test]
    fn window_and_gpu_settings() {
        let rc = runtime_config();
        assert_eq!(rc.title, "Projective Texture");
        assert_eq!(rc.initial_size, LogicalSize::new(800.0, 600.0));

        let gi = gpu_init();
        assert_eq!(gi.sample_count, 4);
        assert!(gi.depth_format.is_some());
        assert!(!gi.prefer_srgb);
    }
}
