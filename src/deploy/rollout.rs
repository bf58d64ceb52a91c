// ABOUTME: Executes a rollout plan against the control plane.
// ABOUTME: Scales, settles, and health-checks the new app while retiring old ones.

use crate::config::Config;
use crate::control_plane::{ControlPlane, Scale};
use crate::types::AppId;

use super::clock::Clock;
use super::error::DeployError;
use super::health::HealthVerifier;
use super::plan::{RolloutPlan, RolloutStrategy, StepAction};
use super::waiter::DeploymentWaiter;

/// Drives one rollout plan to completion.
///
/// Any error leaves apps as they are at that point, except that a failed
/// settle or health check takes the affected app out of service first.
pub struct Rollout<'a, C: ?Sized, K: ?Sized> {
    control_plane: &'a C,
    clock: &'a K,
    config: &'a Config,
    verify_health: bool,
}

impl<'a, C, K> Rollout<'a, C, K>
where
    C: ControlPlane + ?Sized,
    K: Clock + ?Sized,
{
    pub fn new(control_plane: &'a C, clock: &'a K, config: &'a Config) -> Self {
        Self {
            control_plane,
            clock,
            config,
            verify_health: true,
        }
    }

    /// Skip the health barrier, for apps that define no health checks.
    pub fn without_health_checks(mut self) -> Self {
        self.verify_health = false;
        self
    }

    /// Run `plan` and return the new app's final instance count.
    ///
    /// # Errors
    ///
    /// Returns the first error from scaling, settling, or health checking.
    pub async fn execute(&self, plan: &RolloutPlan) -> Result<u32, DeployError> {
        let new_app = &plan.new_app;
        tracing::info!(
            app = %new_app,
            target = plan.target,
            strategy = plan.strategy_name(),
            "starting rollout"
        );

        match &plan.strategy {
            RolloutStrategy::FirstDeployment => {
                self.launch(new_app, plan.target).await?;
            }
            RolloutStrategy::ZeroDowntime { steps } => {
                for step in steps.iter() {
                    match step.action {
                        StepAction::ScaleInPlace => {
                            tracing::warn!(
                                app = %new_app,
                                "new app found among running apps, scaling in place"
                            );
                            self.launch(new_app, plan.target).await?;
                        }
                        StepAction::Exchange { delta } => {
                            self.exchange(new_app, &step.old_app, plan.target, delta)
                                .await?;
                        }
                    }
                }
            }
            RolloutStrategy::DowntimeFirst { old_apps } => {
                for old_app in old_apps.iter() {
                    tracing::info!(app = %old_app, "scaling old app down");
                    self.scale(old_app, Scale::to(0)).await?;
                    self.settle(old_app).await?;
                }
                self.launch(new_app, plan.target).await?;
            }
        }

        let instances = self.control_plane.get_app(new_app).await?.instances;
        tracing::info!(app = %new_app, instances, "rollout finished");
        Ok(instances)
    }

    /// Scale `app` to `target`, wait for it to settle, then check health.
    async fn launch(&self, app: &AppId, target: u32) -> Result<(), DeployError> {
        tracing::info!(%app, instances = target, "scaling app");
        self.scale(app, Scale::to(target)).await?;
        self.settle(app).await?;
        self.verify(app).await
    }

    /// Replace `old_app` with `new_app`, `delta` instances at a time.
    ///
    /// The new app grows before the old one shrinks, so serving capacity
    /// never drops below what either app had on its own.
    async fn exchange(
        &self,
        new_app: &AppId,
        old_app: &AppId,
        target: u32,
        delta: u32,
    ) -> Result<(), DeployError> {
        tracing::info!(new = %new_app, old = %old_app, delta, "exchanging instances");

        self.scale(new_app, Scale::by(i64::from(delta))).await?;
        self.settle(new_app).await?;
        self.verify(new_app).await?;

        self.clock.sleep(self.config.scale_down_delay).await;

        let old_instances = self.control_plane.get_app(old_app).await?.instances;
        if old_instances > 0 {
            let step_down = delta.min(old_instances);
            tracing::info!(app = %old_app, by = step_down, "scaling old app down");
            self.scale(old_app, Scale::by(-i64::from(step_down))).await?;
            self.settle(old_app).await?;
        }

        let new_instances = self.control_plane.get_app(new_app).await?.instances;
        if new_instances != target {
            self.launch(new_app, target).await?;
        }

        let old_instances = self.control_plane.get_app(old_app).await?.instances;
        if old_instances > 0 {
            tracing::info!(app = %old_app, "scaling old app to zero");
            self.scale(old_app, Scale::to(0)).await?;
            self.settle(old_app).await?;
        }

        Ok(())
    }

    /// Send a scale request, retrying while the app is locked by another deployment.
    async fn scale(&self, app: &AppId, scale: Scale) -> Result<(), DeployError> {
        let mut retries = 0;
        loop {
            match self.control_plane.scale_app(app, scale).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && retries < self.config.locked_retries => {
                    retries += 1;
                    tracing::warn!(%app, retries, "app is locked, retrying scale: {e}");
                    self.clock.sleep(self.config.settle.interval).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn settle(&self, app: &AppId) -> Result<(), DeployError> {
        DeploymentWaiter::new(self.control_plane, self.clock, &self.config.settle)
            .settle(app)
            .await
    }

    async fn verify(&self, app: &AppId) -> Result<(), DeployError> {
        if !self.verify_health {
            tracing::debug!(%app, "no health checks defined, skipping verification");
            return Ok(());
        }
        HealthVerifier::new(self.control_plane, self.clock, &self.config.health)
            .verify(app, self.config.health.timeout)
            .await
    }
}
