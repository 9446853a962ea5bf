use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` provide one.
///
/// wgpu's internal crates are chatty at `info`; cap them at `warn`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "projtex_engine=debug,wgpu=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Picks the filter string: explicit config, then `RUST_LOG`, then [`DEFAULT_FILTER`].
pub(crate) fn resolve_filter(config: Option<&str>, env: Option<&str>) -> String {
    let usable = |f: &&str| !f.trim().is_empty();
    config
        .filter(usable)
        .or(env.filter(usable))
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let env = std::env::var("RUST_LOG").ok();
        let filter = resolve_filter(config.env_filter.as_deref(), env.as_deref());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // try_init: a test harness may already have installed a logger.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with filter {filter:?}");
    });
}
