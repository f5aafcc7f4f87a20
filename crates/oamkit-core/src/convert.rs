//! Conversion between generically decoded documents and the typed model
//!
//! Both directions go through a JSON intermediate. On the way in this rejects
//! trees JSON cannot express (non-string keys); on the way out it sorts object
//! keys so the emitted YAML is canonical.

use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::definition::ApplicationDefinition;
use crate::error::{BundleError, Result};

/// Convert a generic document tree into an [`ApplicationDefinition`]
pub fn to_typed(tree: &YamlValue) -> Result<ApplicationDefinition> {
    let json = serde_json::to_value(tree).map_err(BundleError::conversion)?;
    serde_json::from_value(json).map_err(BundleError::conversion)
}

/// Serialize an application as canonical YAML
pub fn to_yaml(app: &ApplicationDefinition) -> Result<Vec<u8>> {
    let canonical = canonical_json(app)?;
    let yaml = serde_yaml::to_string(&canonical).map_err(|e| {
        BundleError::internal(format!(
            "error converting application '{}' to YAML: {}",
            app.name(),
            e
        ))
    })?;
    Ok(yaml.into_bytes())
}

/// Encode any serializable value as a key-sorted JSON tree
pub(crate) fn canonical_json<T: Serialize>(value: &T) -> Result<JsonValue> {
    serde_json::to_value(value)
        .map_err(|e| BundleError::internal(format!("error converting to JSON: {}", e)))
}
