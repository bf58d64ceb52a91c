// ABOUTME: Control plane client abstraction and its Marathon implementation.
// ABOUTME: Exposes the ControlPlane trait, snapshot types, and errors.

mod error;
mod marathon;
mod traits;
mod types;

pub use error::{ControlPlaneError, ControlPlaneErrorKind};
pub use marathon::MarathonClient;
pub use traits::ControlPlane;
pub use types::{
    AppRecord, DeploymentRef, HealthCheckResult, Scale, ScaleTarget, TaskCounts, TaskFailure,
    TaskHealth, TaskRecord,
};
