// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: Holds the definition and run options shared by every state.

use chrono::{DateTime, Utc};

use crate::control_plane::AppRecord;
use crate::definition::AppDefinition;
use crate::types::{AppId, ServiceName};

use super::plan::RolloutPlan;
use super::state::{Completed, Discovered, Initialized, Planned};

/// Caller choices for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutOptions {
    /// Target instance count; `None` keeps the running app's count.
    pub instances: Option<u32>,
    /// Bring new instances up before taking old ones down.
    pub zero_downtime: bool,
    /// Redeploy in place when the app id already exists.
    pub force: bool,
}

impl Default for RolloutOptions {
    fn default() -> Self {
        Self {
            instances: None,
            zero_downtime: true,
            force: false,
        }
    }
}

/// A deployment in progress, parameterized by its current state.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) definition: AppDefinition,
    pub(crate) options: RolloutOptions,
    pub(crate) redeployed: bool,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(definition: AppDefinition, options: RolloutOptions) -> Self {
        Deployment {
            definition,
            options,
            redeployed: false,
            started_at: Utc::now(),
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn app_id(&self) -> &AppId {
        self.definition.id()
    }

    pub fn service_name(&self) -> ServiceName {
        self.definition.id().service_name()
    }

    pub fn definition(&self) -> &AppDefinition {
        &self.definition
    }

    pub fn options(&self) -> &RolloutOptions {
        &self.options
    }

    /// True when an existing app was updated in place instead of created.
    pub fn redeployed(&self) -> bool {
        self.redeployed
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Deployment<Discovered> {
    /// Running apps of the same service, in discovery order.
    pub fn existing(&self) -> &[AppRecord] {
        &self.state.existing
    }
}

impl Deployment<Planned> {
    pub fn plan(&self) -> &RolloutPlan {
        &self.state.plan
    }
}

impl Deployment<Completed> {
    pub fn plan(&self) -> &RolloutPlan {
        &self.state.plan
    }

    /// Instance count of the new app after the rollout.
    pub fn instances(&self) -> u32 {
        self.state.instances
    }
}
