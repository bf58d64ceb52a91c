// ABOUTME: In-memory ControlPlane that records every call.
// ABOUTME: Per-app behaviors simulate failures, slow deployments, and locked apps.

use async_trait::async_trait;
use marathon_deploy::control_plane::{AppRecord, ControlPlane, ControlPlaneError, Scale};
use marathon_deploy::definition::AppDefinition;
use marathon_deploy::types::AppId;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;

/// How a simulated app misbehaves.
#[derive(Debug, Clone, Default)]
pub struct AppBehavior {
    /// Tasks never report healthy.
    pub unhealthy: bool,
    /// Scaling up records this task failure.
    pub fail_on_scale_up: Option<String>,
    /// Polls that still show a deployment in flight after each write.
    pub deploying_polls: u32,
    /// Scale calls rejected as locked before one succeeds.
    pub locked_scales: u32,
}

/// A control plane call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { app: String, instances: Option<u32> },
    Update { app: String, force: bool, sets_instances: bool },
    Scale { app: String, scale: Scale },
    ScaleRejected { app: String },
}

/// An accepted scale call and the instance counts it moved between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleRecord {
    pub app: String,
    pub from: u32,
    pub to: u32,
    pub force: bool,
}

#[derive(Debug)]
struct FakeApp {
    id: String,
    instances: u32,
    pending_polls: u32,
    failure: Option<String>,
    behavior: AppBehavior,
}

#[derive(Default)]
struct State {
    apps: Vec<FakeApp>,
    behaviors: HashMap<String, AppBehavior>,
    calls: Vec<Call>,
    scales: Vec<ScaleRecord>,
}

impl State {
    fn app_mut(&mut self, id: &AppId) -> Result<&mut FakeApp, ControlPlaneError> {
        self.apps
            .iter_mut()
            .find(|app| app.id == id.as_str())
            .ok_or_else(|| ControlPlaneError::NotFound {
                app_id: id.clone(),
            })
    }
}

#[derive(Default)]
pub struct FakeControlPlane {
    state: Mutex<State>,
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing app. Apps are listed in the order they are added.
    pub fn with_app(self, id: &str, instances: u32) -> Self {
        {
            let mut state = self.state.lock();
            let behavior = state.behaviors.get(id).cloned().unwrap_or_default();
            state.apps.push(FakeApp {
                id: id.to_string(),
                instances,
                pending_polls: 0,
                failure: None,
                behavior,
            });
        }
        self
    }

    /// Set the behavior of an app, existing or created later.
    pub fn with_behavior(self, id: &str, behavior: AppBehavior) -> Self {
        {
            let mut state = self.state.lock();
            if let Some(app) = state.apps.iter_mut().find(|app| app.id == id) {
                app.behavior = behavior.clone();
            }
            state.behaviors.insert(id.to_string(), behavior);
        }
        self
    }

    pub fn instances(&self, id: &str) -> Option<u32> {
        self.state
            .lock()
            .apps
            .iter()
            .find(|app| app.id == id)
            .map(|app| app.instances)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn scales(&self) -> Vec<ScaleRecord> {
        self.state.lock().scales.clone()
    }

    /// `(app, instances)` for every accepted scale call.
    pub fn scale_sequence(&self) -> Vec<(String, u32)> {
        self.scales()
            .into_iter()
            .map(|record| (record.app, record.to))
            .collect()
    }

    fn record(app: &FakeApp, consume_poll: bool) -> AppRecord {
        let healthy = if app.behavior.unhealthy { 0 } else { app.instances };
        let tasks: Vec<_> = (0..app.instances)
            .map(|n| {
                json!({
                    "id": format!("{}.task{n}", app.id.trim_start_matches('/')),
                    "state": "TASK_RUNNING",
                    "startedAt": "2024-05-01T10:00:00Z",
                    "healthCheckResults": [{"alive": !app.behavior.unhealthy}]
                })
            })
            .collect();
        let deployments = if consume_poll && app.pending_polls > 0 {
            vec![json!({"id": "97c136bf-5a28-4821-9d94-480d9fbb01c8"})]
        } else {
            Vec::new()
        };
        let failure = app.failure.as_ref().map(|message| {
            json!({"message": message, "state": "TASK_FAILED", "taskId": "failed.task"})
        });

        serde_json::from_value(json!({
            "id": app.id,
            "instances": app.instances,
            "tasks": tasks,
            "tasksHealthy": healthy,
            "tasksUnhealthy": app.instances - healthy,
            "tasksStaged": 0,
            "tasksRunning": app.instances,
            "deployments": deployments,
            "lastTaskFailure": failure,
        }))
        .unwrap()
    }
}

#[async_trait]
impl ControlPlane for FakeControlPlane {
    async fn create_app(
        &self,
        id: &AppId,
        definition: &AppDefinition,
    ) -> Result<(), ControlPlaneError> {
        let mut state = self.state.lock();
        if state.apps.iter().any(|app| app.id == id.as_str()) {
            return Err(ControlPlaneError::Conflict {
                app_id: id.clone(),
            });
        }
        state.calls.push(Call::Create {
            app: id.to_string(),
            instances: definition.instances(),
        });
        let behavior = state.behaviors.get(id.as_str()).cloned().unwrap_or_default();
        state.apps.push(FakeApp {
            id: id.to_string(),
            instances: definition.instances().unwrap_or(0),
            pending_polls: 0,
            failure: None,
            behavior,
        });
        Ok(())
    }

    async fn update_app(
        &self,
        id: &AppId,
        definition: &AppDefinition,
        force: bool,
    ) -> Result<(), ControlPlaneError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Update {
            app: id.to_string(),
            force,
            sets_instances: definition.instances().is_some(),
        });
        let app = state.app_mut(id)?;
        if let Some(instances) = definition.instances() {
            app.instances = instances;
        }
        app.pending_polls = app.behavior.deploying_polls;
        Ok(())
    }

    async fn scale_app(&self, id: &AppId, scale: Scale) -> Result<(), ControlPlaneError> {
        let mut state = self.state.lock();
        let app = state.app_mut(id)?;

        if app.behavior.locked_scales > 0 {
            app.behavior.locked_scales -= 1;
            state.calls.push(Call::ScaleRejected { app: id.to_string() });
            return Err(ControlPlaneError::Locked {
                app_id: id.clone(),
                message: "App is locked by one or more deployments.".to_string(),
            });
        }

        let from = app.instances;
        let to = scale.resolve(from);
        if to > from {
            if let Some(message) = app.behavior.fail_on_scale_up.clone() {
                app.failure = Some(message);
            }
        }
        app.instances = to;
        app.pending_polls = app.behavior.deploying_polls;

        state.calls.push(Call::Scale {
            app: id.to_string(),
            scale,
        });
        state.scales.push(ScaleRecord {
            app: id.to_string(),
            from,
            to,
            force: scale.force,
        });
        Ok(())
    }

    async fn get_app(&self, id: &AppId) -> Result<AppRecord, ControlPlaneError> {
        let mut state = self.state.lock();
        let app = state.app_mut(id)?;
        let record = Self::record(app, true);
        app.pending_polls = app.pending_polls.saturating_sub(1);
        Ok(record)
    }

    async fn list_apps(&self) -> Result<Vec<AppRecord>, ControlPlaneError> {
        let state = self.state.lock();
        Ok(state
            .apps
            .iter()
            .map(|app| Self::record(app, false))
            .collect())
    }
}
