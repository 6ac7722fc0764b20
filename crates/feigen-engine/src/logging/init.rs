use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` takes an `env_logger` filter spec ("info",
/// "feigen_engine=debug,wgpu=warn"); `write_style` decides ANSI color.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; subsequent calls are ignored, so embedding applications and
/// tests may call it freely. Filter resolution order: `config.env_filter`,
/// then the `RUST_LOG` environment variable, then a default of `Info`.
pub fn init(config: LogConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok()) {
            Some(spec) => {
                builder.parse_filters(&spec);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}

/// Filter resolution order: an explicit spec from the config wins, then the
/// process environment. `None` means neither was set and the caller falls
/// back to `Info`.
fn resolve_filter(explicit: Option<String>, env: Option<String>) -> Option<String> {
    explicit.or(env)
}

/// Initializes the global logger with the default configuration.
///
/// Intended usage is the first line of `main`.
pub fn init_default() {
    init(LogConfig::default());
}
