//! Typed OAM application model
//!
//! Only the envelope, metadata and policies are typed. `components` and
//! `workflow` stay opaque JSON values: their shape belongs to the component
//! and workflow catalogs, not to this crate.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Definition of an OAM application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDefinition {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: ApplicationSpec,
}

/// Resource metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// Application specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSpec {
    /// Component list, kept untyped
    #[serde(default)]
    pub components: JsonValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<AppPolicy>,
    /// Workflow steps, kept untyped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<JsonValue>,
}

/// Application policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPolicy {
    pub name: String,
    #[serde(rename = "type")]
    pub policy_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<JsonValue>,
}

impl ApplicationDefinition {
    /// Name under which the application is registered
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Number of entries in `spec.components` (0 when it is not a list)
    pub fn component_count(&self) -> usize {
        self.spec.components.as_array().map_or(0, Vec::len)
    }
}

/// Specification carrying only the components, as supplied by callers
/// replacing an application's parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ComponentsSpec {
    pub components: JsonValue,
}
