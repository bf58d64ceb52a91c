// ABOUTME: Waits for an app's in-flight deployments to finish.
// ABOUTME: A reported task failure scales the app to zero and aborts.

use crate::config::SettleConfig;
use crate::control_plane::ControlPlane;
use crate::types::AppId;

use super::clock::Clock;
use super::error::DeployError;
use super::rollback::take_out_of_service;

/// Polls an app until the control plane reports no deployments in flight.
pub struct DeploymentWaiter<'a, C: ?Sized, K: ?Sized> {
    control_plane: &'a C,
    clock: &'a K,
    config: &'a SettleConfig,
}

impl<'a, C, K> DeploymentWaiter<'a, C, K>
where
    C: ControlPlane + ?Sized,
    K: Clock + ?Sized,
{
    pub fn new(control_plane: &'a C, clock: &'a K, config: &'a SettleConfig) -> Self {
        Self {
            control_plane,
            clock,
            config,
        }
    }

    /// Wait until `app` has no deployments in flight.
    ///
    /// There is no timeout: the control plane either completes the
    /// deployment or reports a task failure.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::DeploymentFailed` after scaling the app to zero
    /// if the control plane reports a task failure.
    pub async fn settle(&self, app: &AppId) -> Result<(), DeployError> {
        tracing::info!(%app, "deployment in progress");
        self.clock.sleep(self.config.initial_delay).await;

        loop {
            let record = self.control_plane.get_app(app).await?;

            if let Some(failure) = record.last_task_failure {
                tracing::error!(%app, reason = %failure.message, "task failure reported");
                take_out_of_service(self.control_plane, app).await;
                return Err(DeployError::DeploymentFailed {
                    app: app.clone(),
                    message: failure.message,
                });
            }

            if !record.is_deploying() {
                tracing::debug!(%app, "deployment settled");
                return Ok(());
            }

            tracing::debug!(
                %app,
                deployments = record.deployments.len(),
                "waiting for deployments"
            );
            self.clock.sleep(self.config.interval).await;
        }
    }
}
