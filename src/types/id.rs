// ABOUTME: Phantom-typed identifiers for compile-time type safety.
// ABOUTME: Prevents accidental swapping of app, task, and deployment IDs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use thiserror::Error;

use super::service_name::{ServiceName, service_name};

/// Marker types for phantom type parameters.
pub enum AppMarker {}
pub enum TaskMarker {}
pub enum DeploymentMarker {}

/// A type-safe identifier that prevents accidental mixing of different ID types.
#[must_use = "IDs reference control plane resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// Manual impls so T needs no bounds; it is only a marker.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// Deserialization is lenient: ids read back from the control plane are
/// taken as-is. Use [`AppId::parse`] for user input.
impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

pub type AppId = Id<AppMarker>;
pub type TaskId = Id<TaskMarker>;
pub type DeploymentId = Id<DeploymentMarker>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppIdError {
    #[error("app id cannot be empty")]
    Empty,

    #[error("app id cannot contain whitespace: '{0}'")]
    Whitespace(String),

    #[error("app id has an empty path segment: '{0}'")]
    EmptySegment(String),
}

impl Id<AppMarker> {
    /// Validate a user-supplied app id such as `/group/payments.v3`.
    pub fn parse(value: &str) -> Result<Self, AppIdError> {
        let trimmed = value.strip_prefix('/').unwrap_or(value);
        if trimmed.is_empty() {
            return Err(AppIdError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(AppIdError::Whitespace(value.to_string()));
        }
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.split('/').any(str::is_empty) {
            return Err(AppIdError::EmptySegment(value.to_string()));
        }
        Ok(Self::new(value))
    }

    /// The logical service this app is a version of.
    pub fn service_name(&self) -> ServiceName {
        service_name(self.as_str())
    }

    /// True when `self`, taken as an existing app, is really `new_app` itself:
    /// an empty id, the same id, or the same id with a leading slash.
    pub fn refers_to(&self, new_app: &AppId) -> bool {
        self.value.is_empty()
            || self.value == new_app.value
            || self.value == format!("/{}", new_app.value)
    }

    /// Percent-encoded URL path for this id, always with a leading slash.
    pub fn url_path(&self) -> String {
        self.value
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| format!("/{}", urlencoding::encode(segment)))
            .collect()
    }
}
