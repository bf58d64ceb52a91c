// ABOUTME: Health barrier run after every scale-up of the new version.
// ABOUTME: Requires every task to report healthy before the rollout moves on.

use std::time::Duration;

use crate::config::HealthConfig;
use crate::control_plane::ControlPlane;
use crate::types::AppId;

use super::clock::Clock;
use super::error::DeployError;
use super::rollback::take_out_of_service;

/// Polls task health counts until every task is healthy or time runs out.
///
/// The control plane can mark an app with several health checks as healthy
/// once the first check passes, so a finished deployment is not proof of
/// health. This re-checks the counts directly.
pub struct HealthVerifier<'a, C: ?Sized, K: ?Sized> {
    control_plane: &'a C,
    clock: &'a K,
    config: &'a HealthConfig,
}

impl<'a, C, K> HealthVerifier<'a, C, K>
where
    C: ControlPlane + ?Sized,
    K: Clock + ?Sized,
{
    pub fn new(control_plane: &'a C, clock: &'a K, config: &'a HealthConfig) -> Self {
        Self {
            control_plane,
            clock,
            config,
        }
    }

    /// Wait until `app` reports `healthy == total` tasks.
    ///
    /// An app with no tasks passes immediately.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::HealthCheckFailed` after scaling the app to zero
    /// once `timeout` has elapsed without full health.
    pub async fn verify(&self, app: &AppId, timeout: Duration) -> Result<(), DeployError> {
        tracing::info!(%app, "waiting for tasks to become healthy");
        let started = self.clock.now();

        loop {
            let record = self.control_plane.get_app(app).await?;
            for task in &record.tasks {
                tracing::debug!(
                    %app,
                    task = %task.id,
                    host = task.host.as_deref().unwrap_or("-"),
                    health = ?task.health(),
                    "task"
                );
            }
            let counts = record.task_counts();
            tracing::info!(
                %app,
                total = counts.total,
                healthy = counts.healthy,
                unhealthy = counts.unhealthy,
                staged = counts.staged,
                running = counts.running,
                "task health"
            );

            if counts.total == 0 {
                tracing::debug!(%app, "no tasks to verify");
                return Ok(());
            }

            if counts.all_healthy() {
                tracing::info!(%app, "all tasks are healthy");
                return Ok(());
            }

            if self.clock.now().duration_since(started) > timeout {
                tracing::error!(%app, "health checks keep failing");
                take_out_of_service(self.control_plane, app).await;
                return Err(DeployError::HealthCheckFailed {
                    app: app.clone(),
                    timeout_secs: timeout.as_secs(),
                    healthy: counts.healthy,
                    total: counts.total,
                });
            }

            self.clock.sleep(self.config.interval).await;
        }
    }
}
