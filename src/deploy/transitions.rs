// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::control_plane::{ControlPlane, ControlPlaneErrorKind};
use crate::types::AppId;

use super::Deployment;
use super::clock::Clock;
use super::error::DeployError;
use super::plan::{RolloutPlan, same_service_running};
use super::rollout::Rollout;
use super::state::{Completed, Created, Discovered, Initialized, Planned};
use super::waiter::DeploymentWaiter;

/// What a finished deployment did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentSummary {
    pub app_id: AppId,
    pub instances: u32,
    pub strategy: &'static str,
    pub retired_apps: Vec<AppId>,
    pub redeployed: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Deployment<S> {
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            definition: self.definition,
            options: self.options,
            redeployed: self.redeployed,
            started_at: self.started_at,
            state,
        }
    }
}

// =============================================================================
// Initialized -> Created
// =============================================================================

impl Deployment<Initialized> {
    /// Create the new app with zero instances.
    ///
    /// If the id is taken and `force` is set, the existing app is updated in
    /// place with the new definition (keeping its instance count) and
    /// allowed to settle.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::CreationConflict` if the id is taken and
    /// `force` is not set. Nothing has been changed in that case.
    #[must_use = "deployment state must be used"]
    pub async fn create<C, K>(
        mut self,
        control_plane: &C,
        clock: &K,
        config: &Config,
    ) -> Result<Deployment<Created>, DeployError>
    where
        C: ControlPlane + ?Sized,
        K: Clock + ?Sized,
    {
        let app = self.app_id().clone();
        tracing::info!(%app, "creating app with zero instances");

        match control_plane
            .create_app(&app, &self.definition.with_instances(0))
            .await
        {
            Ok(()) => Ok(self.transition(Created)),
            Err(e) if e.kind() == ControlPlaneErrorKind::Conflict => {
                if !self.options.force {
                    return Err(DeployError::CreationConflict(app));
                }
                tracing::warn!(%app, "app already exists, redeploying in place");
                control_plane
                    .update_app(&app, &self.definition.without_instances(), true)
                    .await?;
                DeploymentWaiter::new(control_plane, clock, &config.settle)
                    .settle(&app)
                    .await?;
                self.redeployed = true;
                Ok(self.transition(Created))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Created -> Discovered
// =============================================================================

impl Deployment<Created> {
    /// Find running apps of the same service.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ControlPlane` if the app list cannot be fetched.
    #[must_use = "deployment state must be used"]
    pub async fn discover<C>(
        self,
        control_plane: &C,
    ) -> Result<Deployment<Discovered>, DeployError>
    where
        C: ControlPlane + ?Sized,
    {
        let service = self.service_name();
        let existing = same_service_running(control_plane.list_apps().await?, &service);

        tracing::info!(%service, running = existing.len(), "discovered running apps");
        for app in &existing {
            tracing::debug!(app = %app.id, instances = app.instances, "running app");
        }

        Ok(self.transition(Discovered { existing }))
    }
}

// =============================================================================
// Discovered -> Planned
// =============================================================================

impl Deployment<Discovered> {
    /// Choose a rollout strategy and target.
    pub fn plan(self, default_instances: u32) -> Deployment<Planned> {
        let plan = RolloutPlan::new(
            self.app_id(),
            self.options.instances,
            self.options.zero_downtime,
            default_instances,
            &self.state.existing,
        );
        self.transition(Planned { plan })
    }
}

// =============================================================================
// Planned -> Completed
// =============================================================================

impl Deployment<Planned> {
    /// Run the plan.
    ///
    /// Health verification is skipped when the definition declares no
    /// health checks, since no task would ever report healthy.
    ///
    /// # Errors
    ///
    /// Returns the first scale, settle, or health check failure.
    #[must_use = "deployment state must be used"]
    pub async fn execute<C, K>(
        self,
        control_plane: &C,
        clock: &K,
        config: &Config,
    ) -> Result<Deployment<Completed>, DeployError>
    where
        C: ControlPlane + ?Sized,
        K: Clock + ?Sized,
    {
        let mut rollout = Rollout::new(control_plane, clock, config);
        if !self.definition.has_health_checks() {
            tracing::info!(app = %self.app_id(), "no health checks defined");
            rollout = rollout.without_health_checks();
        }

        let instances = rollout.execute(&self.state.plan).await?;
        let plan = self.state.plan.clone();
        Ok(self.transition(Completed { plan, instances }))
    }
}

// =============================================================================
// Completed
// =============================================================================

impl Deployment<Completed> {
    pub fn summary(&self) -> DeploymentSummary {
        DeploymentSummary {
            app_id: self.app_id().clone(),
            instances: self.state.instances,
            strategy: self.state.plan.strategy_name(),
            retired_apps: self.state.plan.retired_apps(),
            redeployed: self.redeployed,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }

    /// Finish the deployment, returning its summary.
    pub fn finish(self) -> DeploymentSummary {
        self.summary()
    }
}
