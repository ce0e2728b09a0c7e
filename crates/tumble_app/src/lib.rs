//! Window, event loop and scene wiring for the tumble demo.
//!
//! ```rust,ignore
//! use tumble_app::{App, AppConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load("tumble.toml")?;
//!     tumble_app::logging::init(&config.log_level)?;
//!     App::new(config).with_title("Tumble").run()
//! }
//! ```

pub mod builder;
mod graphics;
pub mod logging;
mod runner;
pub mod scene;

pub use builder::{App, AppConfig};
pub use scene::DemoScene;
pub use tumble_physics::Scenario;
