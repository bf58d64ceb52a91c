// ABOUTME: Configuration types and parsing for marathon-deploy.yml.
// ABOUTME: Polling intervals, timeouts, and rollout defaults; every field is optional.

mod healthcheck;
mod settle;

pub use healthcheck::HealthConfig;
pub use settle::SettleConfig;

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "marathon-deploy.yml";
pub const CONFIG_FILENAME_HIDDEN: &str = ".marathon-deploy.yml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settle: SettleConfig,

    #[serde(default)]
    pub health: HealthConfig,

    /// Pause between verifying new instances and scaling the old app down.
    #[serde(default = "default_scale_down_delay", with = "humantime_serde")]
    pub scale_down_delay: Duration,

    /// How many times a scale call rejected by an in-flight deployment is retried.
    #[serde(default = "default_locked_retries")]
    pub locked_retries: u32,

    /// Instance count for a first deployment when none is requested.
    #[serde(default = "default_instances")]
    pub default_instances: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle: SettleConfig::default(),
            health: HealthConfig::default(),
            scale_down_delay: default_scale_down_delay(),
            locked_retries: default_locked_retries(),
            default_instances: default_instances(),
        }
    }
}

fn default_scale_down_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_locked_retries() -> u32 {
    12
}

fn default_instances() -> u32 {
    2
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file deserializes to unit; treat it as all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the config file from `dir` if there is one, otherwise defaults.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [dir.join(CONFIG_FILENAME), dir.join(CONFIG_FILENAME_HIDDEN)];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.default_instances == 0 {
            return Err(Error::InvalidConfig(
                "default_instances must be at least 1".to_string(),
            ));
        }
        if self.settle.interval.is_zero() || self.health.interval.is_zero() {
            return Err(Error::InvalidConfig(
                "poll intervals must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
