// ABOUTME: Deployment settle polling configuration.
// ABOUTME: Initial delay and fixed interval for waiting on in-flight deployments.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettleConfig {
    /// Wait before the first check; the control plane can briefly report no
    /// deployments right after a scale call.
    #[serde(default = "default_initial_delay", with = "humantime_serde")]
    pub initial_delay: Duration,

    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            initial_delay: default_initial_delay(),
            interval: default_interval(),
        }
    }
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_interval() -> Duration {
    Duration::from_secs(5)
}
