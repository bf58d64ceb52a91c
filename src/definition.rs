// ABOUTME: App definition loading from JSON or YAML files.
// ABOUTME: Keeps the document opaque apart from id, instances, and health checks.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::{AppId, AppIdError};

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read app definition {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in app definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML in app definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("app definition must be an object")]
    NotAnObject,

    #[error("app definition has no string \"id\" field")]
    MissingId,

    #[error("invalid app id in definition: {0}")]
    InvalidId(#[from] AppIdError),

    #[error("\"instances\" must be a non-negative integer, got {0}")]
    InvalidInstances(Value),
}

/// A declarative app definition, passed through to the control plane as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct AppDefinition {
    id: AppId,
    body: Map<String, Value>,
}

impl AppDefinition {
    pub fn from_value(value: Value) -> Result<Self, DefinitionError> {
        let Value::Object(body) = value else {
            return Err(DefinitionError::NotAnObject);
        };

        let id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or(DefinitionError::MissingId)?;
        let id = AppId::parse(id)?;

        if let Some(instances) = body.get("instances")
            && !instances.is_null()
            && instance_count(instances).is_none()
        {
            return Err(DefinitionError::InvalidInstances(instances.clone()));
        }

        Ok(Self { id, body })
    }

    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, DefinitionError> {
        Self::from_value(serde_yaml::from_str(yaml)?)
    }

    /// Load a definition file. `.yml` and `.yaml` files are parsed as YAML,
    /// everything else as JSON.
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    pub fn id(&self) -> &AppId {
        &self.id
    }

    /// Instance count requested by the definition, if any.
    pub fn instances(&self) -> Option<u32> {
        self.body.get("instances").and_then(instance_count)
    }

    pub fn has_health_checks(&self) -> bool {
        self.body
            .get("healthChecks")
            .and_then(Value::as_array)
            .is_some_and(|checks| !checks.is_empty())
    }

    /// Copy of this definition with a fixed instance count.
    pub fn with_instances(&self, instances: u32) -> Self {
        let mut body = self.body.clone();
        body.insert("instances".to_string(), Value::from(instances));
        Self {
            id: self.id.clone(),
            body,
        }
    }

    /// Copy of this definition that leaves the instance count untouched on update.
    pub fn without_instances(&self) -> Self {
        let mut body = self.body.clone();
        body.remove("instances");
        Self {
            id: self.id.clone(),
            body,
        }
    }

    pub fn as_json(&self) -> &Map<String, Value> {
        &self.body
    }
}

fn instance_count(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}
