//! `fern` dispatcher for the executable.  Libraries only use the `log`
//! macros.

use std::str::FromStr;
use std::time::Instant;

use anyhow::Context as _;
use log::LevelFilter;

/// Environment variable that overrides the configured level.
pub const LEVEL_ENV: &str = "TUMBLE_LOG";

/// Level from `TUMBLE_LOG` when set and valid, else `configured`, else `info`.
pub fn resolve_level(configured: &str, env: Option<&str>) -> LevelFilter {
    env.and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .or_else(|| LevelFilter::from_str(configured.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the global logger.  Lines look like `[   1.234s INFO  target] msg`,
/// timed from this call.
pub fn init(configured_level: &str) -> anyhow::Result<()> {
    let env = std::env::var(LEVEL_ENV).ok();
    let level = resolve_level(configured_level, env.as_deref());
    let start = Instant::now();

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{:>8.3}s {:<5} {}] {}",
                start.elapsed().as_secs_f32(),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // wgpu is very chatty at info
        .level_for("wgpu_core", LevelFilter::Warn)
        .level_for("wgpu_hal", LevelFilter::Warn)
        .level_for("naga", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()
        .context("installing logger")?;

    log::debug!("logging at {level}");
    Ok(())
}
