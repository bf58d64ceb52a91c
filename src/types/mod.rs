// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent app, task, and deployment ID confusion.

mod id;
mod service_name;

pub use id::{AppId, AppIdError, DeploymentId, Id, TaskId};
pub use service_name::{ServiceName, service_name};
