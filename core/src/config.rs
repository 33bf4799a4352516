use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::model::metric::MetricKind;

const ENV_PREFIX: &str = "WELLNESS";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Overrides the default `~/.wellness` data directory.
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    pub quick_add: QuickAddSettings,
}

/// Amount each quick-add action adds to a metric.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct QuickAddSettings {
    pub steps: f64,
    pub water: f64,
    pub sleep: f64,
    pub nutrition: f64,
    pub calories: f64,
    pub mental: f64,
}

impl QuickAddSettings {
    pub fn step(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Steps => self.steps,
            MetricKind::Water => self.water,
            MetricKind::Sleep => self.sleep,
            MetricKind::Nutrition => self.nutrition,
            MetricKind::Calories => self.calories,
            MetricKind::Mental => self.mental,
        }
    }
}

impl Default for QuickAddSettings {
    fn default() -> Self {
        Self {
            steps: 1000.0,
            water: 0.25,
            sleep: 0.5,
            nutrition: 250.0,
            calories: 50.0,
            mental: 10.0,
        }
    }
}

impl Settings {
    /// Layers defaults, an optional `config.*` file in `config_dir`, and
    /// `WELLNESS__*` environment variables (e.g. `WELLNESS__QUICK_ADD__WATER=0.5`).
    pub fn new(config_dir: Option<&Path>) -> Result<Self, ConfigError> {
        Self::build(config_dir, ENV_PREFIX)
    }

    fn build(config_dir: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let quick = QuickAddSettings::default();

        let mut builder = Config::builder()
            .set_default("log_level", "info")?
            .set_default("quick_add.steps", quick.steps)?
            .set_default("quick_add.water", quick.water)?
            .set_default("quick_add.sleep", quick.sleep)?
            .set_default("quick_add.nutrition", quick.nutrition)?
            .set_default("quick_add.calories", quick.calories)?
            .set_default("quick_add.mental", quick.mental)?;

        if let Some(dir) = config_dir {
            let name = dir.join("config");
            builder = builder.add_source(File::with_name(&name.to_string_lossy()).required(false));
        }

        builder
            .add_source(Environment::with_prefix(env_prefix).separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "info".to_string(),
            quick_add: QuickAddSettings::default(),
        }
    }
}
