use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Deserializer};
use tumble_core::Color;
use tumble_physics::Scenario;

/// Window and demo settings, read from a TOML file.  Every field is
/// optional; missing ones take the [`Default`] value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    #[serde(deserialize_with = "scenario_from_str")]
    pub scenario: Scenario,
    /// Overrides the `resources/resources.loc` search.
    pub resource_root: Option<PathBuf>,
    pub log_level: String,
    pub background_color: [f32; 3],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Tumble".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            scenario: Scenario::default(),
            resource_root: None,
            log_level: "info".to_string(),
            background_color: [0.1, 0.1, 0.15],
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn clear_color(&self) -> Color {
        let [r, g, b] = self.background_color;
        Color::rgb(r, g, b)
    }
}

fn scenario_from_str<'de, D: Deserializer<'de>>(de: D) -> Result<Scenario, D::Error> {
    let name = String::deserialize(de)?;
    name.parse().map_err(serde::de::Error::custom)
}

/// Entry point.  Builder-style overrides on top of a loaded [`AppConfig`].
pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.config.scenario = scenario;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Open the window and run until it closes.
    pub fn run(self) -> anyhow::Result<()> {
        crate::runner::run_internal(self.config)
    }
}
