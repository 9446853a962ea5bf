//! Frame-loop state machine for the teapot/plane scene.

use anyhow::{Context, Result};
use nalgebra::Matrix4;
use winit::dpi::PhysicalSize;

use projtex_engine::core::{App, AppControl, FrameCtx, FrameStatus};
use projtex_engine::input::KeyEvent;
use projtex_engine::mesh::{self, Mesh};
use projtex_engine::render::{
    check_interface, DrawBindings, GpuMesh, Material, RenderCtx, ScenePipeline, ShaderSource,
    ShaderStage, Texture2d,
};

use crate::config::SceneConfig;
use crate::scene::{self, SceneState};

/// Everything loaded before the window opens: validated shaders and meshes.
pub struct SceneAssets {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
    pub teapot: Mesh,
    pub plane: Mesh,
}

impl SceneAssets {
    /// Reads, validates and links both shader stages and generates the meshes.
    pub fn load(config: &SceneConfig) -> Result<Self> {
        let vertex = ShaderSource::load(ShaderStage::Vertex, config.vertex_shader_path(), "vs_main")?;
        let fragment =
            ShaderSource::load(ShaderStage::Fragment, config.fragment_shader_path(), "fs_main")?;
        Self::with_shaders(config, vertex, fragment)
    }

    pub fn with_shaders(
        config: &SceneConfig,
        vertex: ShaderSource,
        fragment: ShaderSource,
    ) -> Result<Self> {
        check_interface(&vertex, &fragment)?;

        let teapot = mesh::teapot(config.teapot_grid, &Matrix4::identity())
            .context("failed to generate teapot")?;
        let (xsize, zsize) = config.plane_size;
        let (xdivs, zdivs) = config.plane_divs;
        let plane = mesh::plane(xsize, zsize, xdivs, zdivs).context("failed to generate plane")?;

        Ok(Self {
            vertex,
            fragment,
            teapot,
            plane,
        })
    }
}

/// One mesh on the GPU with its model matrix, material and bindings.
struct Drawable {
    mesh: GpuMesh,
    bindings: DrawBindings,
    model: Matrix4<f32>,
    material: Material,
}

impl Drawable {
    fn draw(&self, ctx: &RenderCtx<'_>, pass: &mut wgpu::RenderPass<'_>, scene: &SceneState) {
        let uniforms = scene.uniforms(&self.model, &self.material);
        self.bindings.bind(ctx, pass, &uniforms);
        self.mesh.draw(pass);
    }
}

/// GPU resources created on the first acquired frame.
struct GpuScene {
    pipeline: ScenePipeline,
    teapot: Drawable,
    plane: Drawable,
    _texture: Texture2d,
}

impl GpuScene {
    fn create(ctx: &RenderCtx<'_>, config: &SceneConfig, assets: &SceneAssets) -> Result<Self> {
        let pipeline = ScenePipeline::new(ctx, &assets.vertex, &assets.fragment)?;
        let texture = Texture2d::load_or_placeholder(ctx, &config.texture_path(), config.flip_texture);
        if !texture.loaded {
            log::warn!("projecting a blank texture");
        }

        let teapot = Drawable {
            mesh: GpuMesh::upload(ctx, "teapot", &assets.teapot),
            bindings: DrawBindings::new(ctx, "teapot", &pipeline, &texture),
            model: scene::teapot_model(),
            material: scene::teapot_material(),
        };
        let plane = Drawable {
            mesh: GpuMesh::upload(ctx, "plane", &assets.plane),
            bindings: DrawBindings::new(ctx, "plane", &pipeline, &texture),
            model: scene::plane_model(),
            material: scene::plane_material(),
        };

        Ok(Self {
            pipeline,
            teapot,
            plane,
            _texture: texture,
        })
    }

    fn draw(&self, ctx: &RenderCtx<'_>, pass: &mut wgpu::RenderPass<'_>, scene: &SceneState) {
        self.pipeline.set(pass);
        self.teapot.draw(ctx, pass, scene);
        self.plane.draw(ctx, pass, scene);
    }
}

enum FrameState {
    Uninitialized,
    Ready(GpuScene),
}

impl FrameState {
    fn is_ready(&self) -> bool {
        matches!(self, FrameState::Ready(_))
    }
}

/// The demo application.
pub struct ProjtexApp {
    config: SceneConfig,
    assets: SceneAssets,
    scene: SceneState,
    state: FrameState,
}

impl ProjtexApp {
    pub fn new(config: SceneConfig, assets: SceneAssets, width: u32, height: u32) -> Self {
        let scene = SceneState::new(&config, width, height);
        Self {
            config,
            assets,
            scene,
            state: FrameState::Uninitialized,
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }
}

impl App for ProjtexApp {
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        self.scene.on_resize(size.width, size.height);
    }

    fn on_key(&mut self, event: &KeyEvent) -> AppControl {
        // Keys are accepted but have no effect.
        let _ = event;
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let now = ctx.sim_time;
        let (width, height) = ctx.window.physical_size();

        let Self {
            config,
            assets,
            scene,
            state,
        } = self;

        let status = ctx.render(config.clear_color, |rctx, pass| {
            if let FrameState::Uninitialized = state {
                let gpu = GpuScene::create(rctx, config, assets)
                    .context("scene initialization failed")?;
                scene.sync_viewport(width, height);
                log::info!("scene ready");
                *state = FrameState::Ready(gpu);
            }

            let FrameState::Ready(gpu) = state else {
                return Ok(());
            };

            scene.advance(now);
            gpu.draw(rctx, pass, scene);
            Ok(())
        })?;

        if status == FrameStatus::Skipped {
            log::trace!("frame skipped");
        }

        Ok(AppControl::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ProjtexApp {
        let config = SceneConfig::default();
        let assets = SceneAssets::load(&config).unwrap();
        ProjtexApp::new(config, assets, 800, 600)
    }

    // ── assets ────────────────────────────────────────────────────────────

    #[test]
    fn shipped_assets_load() {
        let config = SceneConfig::default();
        let assets = SceneAssets::load(&config).unwrap();

        assert_eq!(assets.vertex.entry_point(), "vs_main");
        assert_eq!(assets.fragment.entry_point(), "fs_main");

        assert_eq!(assets.plane.vertex_count(), 4);
        assert_eq!(assets.plane.indices().len(), 6);
        assert_eq!(assets.teapot.vertex_count(), mesh::TEAPOT_PATCH_COUNT * 15 * 15);
        assert!(assets.teapot.validate().is_ok());
    }

    #[test]
    fn shader_stages_that_do_not_link_are_fatal() {
        let config = SceneConfig::default();
        let vertex =
            ShaderSource::load(ShaderStage::Vertex, config.vertex_shader_path(), "vs_main").unwrap();
        let fragment = ShaderSource::from_wgsl(
            ShaderStage::Fragment,
            "extra_varying.wgsl",
            "fs_main",
            "@fragment\nfn fs_main(@location(7) x: vec4<f32>) -> @location(0) vec4<f32> {\n    return x;\n}\n",
        )
        .unwrap();

        let err = SceneAssets::with_shaders(&config, vertex, fragment).err().unwrap();
        assert!(format!("{err:#}").contains("@location(7)"));
    }

    #[test]
    fn missing_shader_is_fatal() {
        let config = SceneConfig::default().with_asset_dir_override(Some("/nonexistent".into()));
        let err = SceneAssets::load(&config).err().unwrap();
        assert!(format!("{err:#}").contains("projtex.vert.wgsl"));
    }

    #[test]
    fn invalid_tessellation_is_fatal() {
        let config = SceneConfig {
            teapot_grid: 0,
            ..SceneConfig::default()
        };
        let vs = ShaderSource::load(ShaderStage::Vertex, config.vertex_shader_path(), "vs_main")
            .unwrap();
        let fs = ShaderSource::load(ShaderStage::Fragment, config.fragment_shader_path(), "fs_main")
            .unwrap();
        assert!(SceneAssets::with_shaders(&config, vs, fs).is_err());
    }

    // ── uniform layout ────────────────────────────────────────────────────

    /// Size of `Uniforms` and its member offsets as naga lays them out.
    fn wgsl_uniform_layout(path: &std::path::Path) -> (usize, Vec<(String, usize)>) {
        let src = std::fs::read_to_string(path).unwrap();
        let module = naga::front::wgsl::parse_str(&src).unwrap();
        let mut layouter = naga::proc::Layouter::default();
        layouter.update(module.to_ctx()).unwrap();

        let (handle, ty) = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some("Uniforms"))
            .unwrap();
        let naga::TypeInner::Struct { members, .. } = &ty.inner else {
            panic!("Uniforms in {} is not a struct", path.display());
        };
        let offsets = members
            .iter()
            .map(|m| (m.name.clone().unwrap_or_default(), m.offset as usize))
            .collect();
        (layouter[handle].size as usize, offsets)
    }

    #[test]
    fn uniform_block_matches_both_shaders() {
        use std::mem::{offset_of, size_of};

        use projtex_engine::render::SceneUniforms;

        let expected = vec![
            ("model".to_string(), offset_of!(SceneUniforms, model)),
            ("model_view".to_string(), offset_of!(SceneUniforms, model_view)),
            ("mvp".to_string(), offset_of!(SceneUniforms, mvp)),
            ("projector".to_string(), offset_of!(SceneUniforms, projector)),
            ("normal".to_string(), offset_of!(SceneUniforms, normal)),
            ("camera_position".to_string(), offset_of!(SceneUniforms, camera_position)),
            ("light_position".to_string(), offset_of!(SceneUniforms, light_position)),
            ("light_intensity".to_string(), offset_of!(SceneUniforms, light_intensity)),
            ("ka".to_string(), offset_of!(SceneUniforms, ka)),
            ("kd".to_string(), offset_of!(SceneUniforms, kd)),
            ("ks".to_string(), offset_of!(SceneUniforms, ks)),
        ];

        let config = SceneConfig::default();
        for path in [config.vertex_shader_path(), config.fragment_shader_path()] {
            let (size, members) = wgsl_uniform_layout(&path);
            assert_eq!(size, size_of::<SceneUniforms>(), "{}", path.display());
            assert_eq!(members, expected, "{}", path.display());
        }

        // mat3x3 columns are padded to vec4, so the block after it starts 48 bytes on.
        assert_eq!(offset_of!(SceneUniforms, normal), 256);
        assert_eq!(offset_of!(SceneUniforms, camera_position), 304);
    }

    // ── state machine ─────────────────────────────────────────────────────

    #[test]
    fn starts_uninitialized() {
        let a = app();
        assert!(!a.is_ready());
    }

    #[test]
    fn resize_event_updates_aspect_once() {
        let mut a = app();
        a.on_resize(PhysicalSize::new(1200, 400));
        assert_eq!(a.scene().aspect(), 3.0);
        assert_eq!(a.scene().resize_events(), 1);
    }

    #[test]
    fn keys_do_not_stop_the_app() {
        use projtex_engine::input::{Key, KeyState};

        let mut a = app();
        let ev = KeyEvent {
            key: Key::Escape,
            state: KeyState::Pressed,
            repeat: false,
        };
        assert_eq!(a.on_key(&ev), AppControl::Continue);
    }
}
