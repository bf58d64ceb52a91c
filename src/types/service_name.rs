// ABOUTME: Logical service names derived from app ids.
// ABOUTME: Groups versions like /group/payments.v2 and /group/payments.v3 together.

use serde::Serialize;
use std::fmt;

/// The logical service shared by all versions of an app.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derive the service name from an app id: the last path segment up to its
/// first `.`. Assumes ids follow `/some/group/service_name.uniquevalue`.
pub fn service_name(app_id: &str) -> ServiceName {
    let last = app_id.rsplit('/').next().unwrap_or_default();
    let name = last.split('.').next().unwrap_or_default();
    ServiceName(name.to_string())
}
