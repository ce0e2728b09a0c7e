// Usage: tumble [config.toml]
//
// Without an argument `tumble.toml` in the working directory is used when
// present, otherwise the built-in defaults (the ring scenario).
use std::path::Path;

use tumble_app::{App, AppConfig};

const DEFAULT_CONFIG: &str = "tumble.toml";

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG).is_file() => AppConfig::load(DEFAULT_CONFIG)?,
        None => AppConfig::default(),
    };
    tumble_app::logging::init(&config.log_level)?;
    log::info!("scenario `{}`, {}x{}", config.scenario, config.width, config.height);

    App::new(config).run()
}
