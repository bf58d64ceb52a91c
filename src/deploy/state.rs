// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each state carries the data the next transition needs.

use crate::control_plane::AppRecord;

use super::plan::RolloutPlan;

/// Initial state: definition loaded, nothing changed on the control plane yet.
/// Available actions: `create()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// The new app exists on the control plane.
/// Available actions: `discover()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Created;

/// Running apps of the same service have been found.
/// Available actions: `plan()`
#[derive(Debug, Clone)]
pub struct Discovered {
    pub(crate) existing: Vec<AppRecord>,
}

/// A rollout plan has been chosen.
/// Available actions: `execute()`
#[derive(Debug, Clone)]
pub struct Planned {
    pub(crate) plan: RolloutPlan,
}

/// The new app is at its target and every old app is scaled to zero.
/// Available actions: `summary()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) plan: RolloutPlan,
    pub(crate) instances: u32,
}
