// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the rollout planner and executor, and run entry points.

mod clock;
mod deployment;
mod error;
mod health;
mod plan;
mod rollback;
mod rollout;
mod run;
mod state;
mod transitions;
mod waiter;

pub use clock::{Clock, TokioClock};
pub use deployment::{Deployment, RolloutOptions};
pub use error::{DeployError, DeployErrorKind};
pub use health::HealthVerifier;
pub use plan::{
    RolloutPlan, RolloutStep, RolloutStrategy, StepAction, exchange_delta, same_service_running,
};
pub use rollback::take_out_of_service;
pub use rollout::Rollout;
pub use run::{DeployOptions, deploy, run};
pub use state::{Completed, Created, Discovered, Initialized, Planned};
pub use transitions::DeploymentSummary;
pub use waiter::DeploymentWaiter;
