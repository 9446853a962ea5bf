use anyhow::Result;

use projtex_demo::app::{ProjtexApp, SceneAssets};
use projtex_demo::config::{self, SceneConfig};
use projtex_engine::logging::{init_logging, LoggingConfig};
use projtex_engine::window::Runtime;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let scene_config = SceneConfig::from_env();
    log::info!("assets from {}", scene_config.asset_dir.display());

    let assets = SceneAssets::load(&scene_config)?;

    let runtime = config::runtime_config();
    let (width, height) = (
        runtime.initial_size.width as u32,
        runtime.initial_size.height as u32,
    );
    let app = ProjtexApp::new(scene_config, assets, width, height);

    Runtime::run(runtime, config::gpu_init(), app)
}
