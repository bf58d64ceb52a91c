// ABOUTME: Control plane operations trait consumed by the rollout core.
// ABOUTME: Create, update, scale, inspect, and list app records.

use async_trait::async_trait;

use super::error::ControlPlaneError;
use super::types::{AppRecord, Scale};
use crate::definition::AppDefinition;
use crate::types::AppId;

/// App lifecycle operations on a cluster control plane.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Create an app from its definition. Fails with `Conflict` if the id exists.
    async fn create_app(
        &self,
        id: &AppId,
        definition: &AppDefinition,
    ) -> Result<(), ControlPlaneError>;

    /// Replace an existing app's definition.
    async fn update_app(
        &self,
        id: &AppId,
        definition: &AppDefinition,
        force: bool,
    ) -> Result<(), ControlPlaneError>;

    /// Change an app's instance count.
    async fn scale_app(&self, id: &AppId, scale: Scale) -> Result<(), ControlPlaneError>;

    /// Fetch a fresh snapshot of one app.
    async fn get_app(&self, id: &AppId) -> Result<AppRecord, ControlPlaneError>;

    /// Fetch snapshots of every app.
    async fn list_apps(&self) -> Result<Vec<AppRecord>, ControlPlaneError>;
}
