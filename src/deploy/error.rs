// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers creation conflicts, failed deployments, health timeouts, and control plane errors.

use crate::control_plane::ControlPlaneError;
use crate::types::AppId;

/// Errors that abort a rollout.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The app id already exists and redeploy was not forced.
    #[error("app {0} already exists (pass --force yes to redeploy it in place)")]
    CreationConflict(AppId),

    /// The control plane reported a task failure while a deployment was in flight.
    #[error("deployment of {app} failed: {message}")]
    DeploymentFailed { app: AppId, message: String },

    /// Tasks did not all become healthy in time.
    #[error(
        "health checks for {app} did not pass within {timeout_secs} seconds ({healthy}/{total} tasks healthy)"
    )]
    HealthCheckFailed {
        app: AppId,
        timeout_secs: u64,
        healthy: u32,
        total: u32,
    },

    /// Talking to the control plane failed.
    #[error("control plane error: {0}")]
    ControlPlane(#[from] ControlPlaneError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    CreationConflict,
    DeploymentFailed,
    HealthCheckFailed,
    Transport,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::CreationConflict(_) => DeployErrorKind::CreationConflict,
            DeployError::DeploymentFailed { .. } => DeployErrorKind::DeploymentFailed,
            DeployError::HealthCheckFailed { .. } => DeployErrorKind::HealthCheckFailed,
            DeployError::ControlPlane(_) => DeployErrorKind::Transport,
        }
    }
}
