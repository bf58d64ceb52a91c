// ABOUTME: Control plane snapshot types: app records, tasks, deployments, failures.
// ABOUTME: Plain values decoded from each poll; never mutated in place.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{AppId, DeploymentId, TaskId};

/// Snapshot of an app as reported by the control plane.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub id: AppId,
    #[serde(default)]
    pub instances: u32,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub tasks_healthy: u32,
    #[serde(default)]
    pub tasks_unhealthy: u32,
    #[serde(default)]
    pub tasks_staged: u32,
    #[serde(default)]
    pub tasks_running: u32,
    #[serde(default)]
    pub deployments: Vec<DeploymentRef>,
    #[serde(default)]
    pub last_task_failure: Option<TaskFailure>,
}

impl AppRecord {
    /// An app with no tasks, deployments, or failures.
    pub fn new(id: AppId, instances: u32) -> Self {
        Self {
            id,
            instances,
            tasks: Vec::new(),
            tasks_healthy: 0,
            tasks_unhealthy: 0,
            tasks_staged: 0,
            tasks_running: 0,
            deployments: Vec::new(),
            last_task_failure: None,
        }
    }

    /// Task counts as reported by the control plane; `total` is the number
    /// of task records.
    pub fn task_counts(&self) -> TaskCounts {
        TaskCounts {
            total: self.tasks.len() as u32,
            healthy: self.tasks_healthy,
            unhealthy: self.tasks_unhealthy,
            staged: self.tasks_staged,
            running: self.tasks_running,
        }
    }

    /// True while the control plane still has deployments in flight.
    pub fn is_deploying(&self) -> bool {
        !self.deployments.is_empty()
    }
}

/// Health tallies for one app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: u32,
    pub healthy: u32,
    pub unhealthy: u32,
    pub staged: u32,
    pub running: u32,
}

impl TaskCounts {
    pub fn all_healthy(&self) -> bool {
        self.healthy == self.total
    }
}

/// A single running instance of an app.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub health_check_results: Vec<HealthCheckResult>,
}

impl TaskRecord {
    /// Classify the task from its state and health check results.
    pub fn health(&self) -> TaskHealth {
        if self.state.as_deref() == Some("TASK_STAGING") || self.started_at.is_none() {
            return TaskHealth::Staged;
        }
        if self.health_check_results.is_empty() {
            return TaskHealth::Unknown;
        }
        if self.health_check_results.iter().all(|r| r.alive) {
            TaskHealth::Healthy
        } else {
            TaskHealth::Unhealthy
        }
    }
}

/// Per-task health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskHealth {
    Healthy,
    Unhealthy,
    Staged,
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    #[serde(default)]
    pub alive: bool,
}

/// Reference to an in-flight deployment operation.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentRef {
    pub id: DeploymentId,
}

/// The most recent task failure the control plane recorded for an app.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFailure {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// What a scale call should do to an app's instance count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleTarget {
    /// Set the instance count.
    Instances(u32),
    /// Adjust the instance count relative to its current value.
    Delta(i64),
}

/// A scale request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub target: ScaleTarget,
    pub force: bool,
}

impl Scale {
    pub fn to(instances: u32) -> Self {
        Self {
            target: ScaleTarget::Instances(instances),
            force: false,
        }
    }

    pub fn by(delta: i64) -> Self {
        Self {
            target: ScaleTarget::Delta(delta),
            force: false,
        }
    }

    /// Forced scale to zero, used to take a failed app out of service.
    pub fn to_zero_forced() -> Self {
        Self {
            target: ScaleTarget::Instances(0),
            force: true,
        }
    }

    /// Resolve against the current instance count, clamping at zero.
    pub fn resolve(&self, current: u32) -> u32 {
        match self.target {
            ScaleTarget::Instances(n) => n,
            ScaleTarget::Delta(d) => (i64::from(current) + d).clamp(0, i64::from(u32::MAX)) as u32,
        }
    }
}
