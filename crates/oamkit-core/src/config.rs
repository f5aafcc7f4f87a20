//! Bundle options
//!
//! Options can be built in code or loaded from a YAML file:
//!
//! ```yaml
//! emptyBundle: reject
//! rename: rekey
//! extraApplicationTypes:
//!   - group: apps.example.com
//!     version: v1
//!     kind: Application
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BundleError, Result};
use crate::gvk::{Recognizer, TypeDescriptor};
use crate::split::YAML_EXTENSIONS;

/// What `build` does when no application is found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyBundlePolicy {
    /// A bundle may hold only auxiliary resources
    #[default]
    Allow,
    /// Fail with `NoApplications`
    Reject,
}

/// How a rename affects the registry key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenamePolicy {
    /// The application keeps the key it was loaded under
    #[default]
    KeepKey,
    /// The application moves to the new name
    Rekey,
}

/// Options controlling how a bundle is built and edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleOptions {
    pub empty_bundle: EmptyBundlePolicy,
    pub rename: RenamePolicy,
    pub extra_application_types: Vec<TypeDescriptor>,
    pub extra_metadata_types: Vec<TypeDescriptor>,
    /// File name suffixes treated as manifests
    pub yaml_extensions: Vec<String>,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            empty_bundle: EmptyBundlePolicy::default(),
            rename: RenamePolicy::default(),
            extra_application_types: Vec::new(),
            extra_metadata_types: Vec::new(),
            yaml_extensions: YAML_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

impl BundleOptions {
    /// Parse options from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(BundleError::Config)
    }

    /// Load options from a YAML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn with_empty_bundle(mut self, policy: EmptyBundlePolicy) -> Self {
        self.empty_bundle = policy;
        self
    }

    pub fn with_rename(mut self, policy: RenamePolicy) -> Self {
        self.rename = policy;
        self
    }

    /// Recognition tables with the extra descriptors appended
    pub fn recognizer(&self) -> Recognizer {
        let recognizer = self
            .extra_application_types
            .iter()
            .cloned()
            .fold(Recognizer::new(), Recognizer::with_application_type);
        self.extra_metadata_types
            .iter()
            .cloned()
            .fold(recognizer, Recognizer::with_metadata_type)
    }

    /// Whether a file name passes the suffix gate
    pub fn accepts_file(&self, name: &str) -> bool {
        self.yaml_extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}
