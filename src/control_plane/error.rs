// ABOUTME: Control plane error types with SNAFU pattern.
// ABOUTME: Separates transport failures from API rejections for programmatic handling.

use snafu::Snafu;

use crate::types::AppId;

/// Errors talking to the control plane.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ControlPlaneError {
    #[snafu(display("invalid control plane URL '{url}': {reason}"))]
    InvalidUrl { url: String, reason: String },

    #[snafu(display("failed to set up TLS: {source}"))]
    Tls { source: rustls::Error },

    #[snafu(display("failed to build request for {path}: {source}"))]
    Request {
        path: String,
        source: hyper::http::Error,
    },

    #[snafu(display("request to {path} failed: {source}"))]
    Transport {
        path: String,
        source: hyper_util::client::legacy::Error,
    },

    #[snafu(display("failed to read response from {path}: {source}"))]
    Body { path: String, source: hyper::Error },

    #[snafu(display("failed to decode response from {path}: {source}"))]
    Decode {
        path: String,
        source: serde_json::Error,
    },

    #[snafu(display("failed to encode request body: {source}"))]
    Encode { source: serde_json::Error },

    #[snafu(display("app already exists: {app_id}"))]
    Conflict { app_id: AppId },

    #[snafu(display("app {app_id} is locked by a deployment in progress: {message}"))]
    Locked { app_id: AppId, message: String },

    #[snafu(display("app not found: {app_id}"))]
    NotFound { app_id: AppId },

    #[snafu(display("control plane rejected the credential (HTTP {status})"))]
    Unauthorized { status: u16 },

    #[snafu(display("control plane returned HTTP {status}: {message}"))]
    Api { status: u16, message: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPlaneErrorKind {
    /// Bad URL, network failure, or unreadable response.
    Transport,
    /// The app id is already taken.
    Conflict,
    /// The app is locked by an in-flight deployment.
    Locked,
    /// The app does not exist.
    NotFound,
    /// The credential was rejected.
    Unauthorized,
    /// Any other rejection by the API.
    Api,
}

impl ControlPlaneError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ControlPlaneErrorKind {
        match self {
            ControlPlaneError::InvalidUrl { .. }
            | ControlPlaneError::Tls { .. }
            | ControlPlaneError::Request { .. }
            | ControlPlaneError::Transport { .. }
            | ControlPlaneError::Body { .. }
            | ControlPlaneError::Decode { .. }
            | ControlPlaneError::Encode { .. } => ControlPlaneErrorKind::Transport,
            ControlPlaneError::Conflict { .. } => ControlPlaneErrorKind::Conflict,
            ControlPlaneError::Locked { .. } => ControlPlaneErrorKind::Locked,
            ControlPlaneError::NotFound { .. } => ControlPlaneErrorKind::NotFound,
            ControlPlaneError::Unauthorized { .. } => ControlPlaneErrorKind::Unauthorized,
            ControlPlaneError::Api { .. } => ControlPlaneErrorKind::Api,
        }
    }

    /// Whether waiting for in-flight deployments and retrying may succeed.
    pub fn is_transient(&self) -> bool {
        self.kind() == ControlPlaneErrorKind::Locked
    }
}
