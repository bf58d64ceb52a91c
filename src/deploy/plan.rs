// ABOUTME: Rollout strategy selection from the new app and its running predecessors.
// ABOUTME: Produces a plan of ordered steps; execution lives in rollout.rs.

use nonempty::NonEmpty;
use serde::Serialize;

use crate::control_plane::AppRecord;
use crate::types::{AppId, ServiceName};

/// How the new version replaces the old ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RolloutStrategy {
    /// Nothing is running yet: scale the new app straight to target.
    FirstDeployment,

    /// Bring up new instances before taking old ones down, one old app at a time.
    ZeroDowntime { steps: NonEmpty<RolloutStep> },

    /// Scale every old app to zero, then bring up the new one.
    DowntimeFirst { old_apps: NonEmpty<AppId> },
}

/// One old app to retire during a zero-downtime rollout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolloutStep {
    pub old_app: AppId,
    pub action: StepAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    /// The "old" app is the new app itself; just scale it to target.
    // Only reachable when a force redeploy left the new app running.
    ScaleInPlace,

    /// Grow the new app by `delta`, shrink the old one by as much, then finish both.
    Exchange { delta: u32 },
}

/// The full rollout for one deployment run. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolloutPlan {
    pub new_app: AppId,
    pub target: u32,
    pub strategy: RolloutStrategy,
}

impl RolloutPlan {
    /// Plan a rollout.
    ///
    /// `existing` holds the running apps of the same service in discovery
    /// order; the most recently discovered is handled first. When
    /// `requested` is `None` the target is `default_instances` for a first
    /// deployment, otherwise the first handled old app's instance count.
    pub fn new(
        new_app: &AppId,
        requested: Option<u32>,
        zero_downtime: bool,
        default_instances: u32,
        existing: &[AppRecord],
    ) -> Self {
        let reversed = existing.iter().rev().map(|app| app.id.clone()).collect();
        let (Some(old_apps), Some(latest)) = (NonEmpty::from_vec(reversed), existing.last())
        else {
            return Self {
                new_app: new_app.clone(),
                target: requested.unwrap_or(default_instances),
                strategy: RolloutStrategy::FirstDeployment,
            };
        };
        let target = requested.unwrap_or(latest.instances);

        let strategy = if zero_downtime {
            let steps = old_apps.map(|old_app| {
                let action = if old_app.refers_to(new_app) {
                    StepAction::ScaleInPlace
                } else {
                    StepAction::Exchange {
                        delta: exchange_delta(target),
                    }
                };
                RolloutStep { old_app, action }
            });
            RolloutStrategy::ZeroDowntime { steps }
        } else {
            RolloutStrategy::DowntimeFirst { old_apps }
        };

        Self {
            new_app: new_app.clone(),
            target,
            strategy,
        }
    }

    /// Old apps this plan scales to zero, in execution order.
    pub fn retired_apps(&self) -> Vec<AppId> {
        match &self.strategy {
            RolloutStrategy::FirstDeployment => Vec::new(),
            RolloutStrategy::ZeroDowntime { steps } => steps
                .iter()
                .filter(|step| step.action != StepAction::ScaleInPlace)
                .map(|step| step.old_app.clone())
                .collect(),
            RolloutStrategy::DowntimeFirst { old_apps } => old_apps
                .iter()
                .filter(|old_app| !old_app.refers_to(&self.new_app))
                .cloned()
                .collect(),
        }
    }

    /// Short name for progress output.
    pub fn strategy_name(&self) -> &'static str {
        match self.strategy {
            RolloutStrategy::FirstDeployment => "first deployment",
            RolloutStrategy::ZeroDowntime { .. } => "zero downtime",
            RolloutStrategy::DowntimeFirst { .. } => "downtime first",
        }
    }
}

/// Instances moved per exchange: half the target rounded half-to-even, at least one.
pub fn exchange_delta(target: u32) -> u32 {
    let half = (f64::from(target) * 0.5).round_ties_even() as u32;
    half.max(1)
}

/// Running apps that belong to `service`, in the order given.
pub fn same_service_running(apps: Vec<AppRecord>, service: &ServiceName) -> Vec<AppRecord> {
    apps.into_iter()
        .filter(|app| app.instances > 0 && &app.id.service_name() == service)
        .collect()
}
