//! Group/version/kind descriptors and the recognition tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the schema family of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// API group, empty for the core group (`apiVersion: v1`)
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl TypeDescriptor {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Build a descriptor from `apiVersion` and `kind`
    ///
    /// Returns `None` when either is empty or `apiVersion` has more than one `/`.
    pub fn from_api_version(api_version: &str, kind: &str) -> Option<Self> {
        if api_version.is_empty() || kind.is_empty() {
            return None;
        }
        let (group, version) = match api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", api_version),
        };
        if version.is_empty() || version.contains('/') {
            return None;
        }
        Some(Self::new(group, version, kind))
    }

    /// The `apiVersion` string of this descriptor
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// A static entry of a recognition table
#[derive(Debug, Clone, Copy)]
pub struct KnownType {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
}

impl From<KnownType> for TypeDescriptor {
    fn from(known: KnownType) -> Self {
        TypeDescriptor::new(known.group, known.version, known.kind)
    }
}

/// Application resources across schema revisions
pub const APPLICATION_TYPES: &[KnownType] = &[
    KnownType {
        group: "core.oam.dev",
        version: "v1alpha2",
        kind: "ApplicationConfiguration",
    },
    KnownType {
        group: "core.oam.dev",
        version: "v1beta1",
        kind: "Application",
    },
];

/// Resources carrying information about the catalog application itself
pub const METADATA_TYPES: &[KnownType] = &[
    KnownType {
        group: "core.napptive.com",
        version: "v1alpha1",
        kind: "ApplicationMetadata",
    },
    KnownType {
        group: "core.oam.dev",
        version: "v1alpha1",
        kind: "ApplicationMetadata",
    },
];

/// Bucket a document falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentClass {
    Application,
    Metadata,
    Unknown,
}

/// Recognition tables used to bucket descriptors
///
/// Starts from [`APPLICATION_TYPES`] and [`METADATA_TYPES`]; extra entries
/// can only be added, never removed.
#[derive(Debug, Clone)]
pub struct Recognizer {
    application: Vec<TypeDescriptor>,
    metadata: Vec<TypeDescriptor>,
}

impl Default for Recognizer {
    fn default() -> Self {
        Self {
            application: APPLICATION_TYPES.iter().copied().map(Into::into).collect(),
            metadata: METADATA_TYPES.iter().copied().map(Into::into).collect(),
        }
    }
}

impl Recognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept an additional application descriptor
    pub fn with_application_type(mut self, descriptor: TypeDescriptor) -> Self {
        if !self.application.contains(&descriptor) {
            self.application.push(descriptor);
        }
        self
    }

    /// Accept an additional metadata descriptor
    pub fn with_metadata_type(mut self, descriptor: TypeDescriptor) -> Self {
        if !self.metadata.contains(&descriptor) {
            self.metadata.push(descriptor);
        }
        self
    }

    /// Bucket a descriptor, applications first
    pub fn bucket(&self, descriptor: &TypeDescriptor) -> DocumentClass {
        if self.application.contains(descriptor) {
            DocumentClass::Application
        } else if self.metadata.contains(descriptor) {
            DocumentClass::Metadata
        } else {
            DocumentClass::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_version() {
        assert_eq!(
            TypeDescriptor::from_api_version("core.oam.dev/v1beta1", "Application"),
            Some(TypeDescriptor::new("core.oam.dev", "v1beta1", "Application"))
        );
        assert_eq!(
            TypeDescriptor::from_api_version("v1", "ConfigMap"),
            Some(TypeDescriptor::new("", "v1", "ConfigMap"))
        );
        assert_eq!(TypeDescriptor::from_api_version("", "ConfigMap"), None);
        assert_eq!(TypeDescriptor::from_api_version("v1", ""), None);
        assert_eq!(TypeDescriptor::from_api_version("a/b/c", "Thing"), None);
    }

    #[test]
    fn test_api_version_round_trip() {
        let gvk = TypeDescriptor::new("core.oam.dev", "v1beta1", "Application");
        assert_eq!(gvk.api_version(), "core.oam.dev/v1beta1");
        assert_eq!(TypeDescriptor::new("", "v1", "Secret").api_version(), "v1");
        assert_eq!(gvk.to_string(), "core.oam.dev/v1beta1, Kind=Application");
    }

    #[test]
    fn test_default_tables() {
        let app = TypeDescriptor::new("core.oam.dev", "v1beta1", "Application");
        let legacy = TypeDescriptor::new("core.oam.dev", "v1alpha2", "ApplicationConfiguration");
        let meta = TypeDescriptor::new("core.napptive.com", "v1alpha1", "ApplicationMetadata");
        let cm = TypeDescriptor::new("", "v1", "ConfigMap");

        let recognizer = Recognizer::new();
        assert_eq!(recognizer.bucket(&app), DocumentClass::Application);
        assert_eq!(recognizer.bucket(&legacy), DocumentClass::Application);
        assert_eq!(recognizer.bucket(&meta), DocumentClass::Metadata);
        assert_eq!(recognizer.bucket(&cm), DocumentClass::Unknown);
    }

    #[test]
    fn test_exact_triple_match() {
        // Right kind, wrong version
        let gvk = TypeDescriptor::new("core.oam.dev", "v1", "Application");
        assert_eq!(Recognizer::new().bucket(&gvk), DocumentClass::Unknown);
    }

    #[test]
    fn test_recognizer_is_additive() {
        let custom = TypeDescriptor::new("apps.example.com", "v1", "Application");
        let recognizer = Recognizer::new().with_application_type(custom.clone());

        assert_eq!(recognizer.bucket(&custom), DocumentClass::Application);
        assert_eq!(
            recognizer.bucket(&TypeDescriptor::new("core.oam.dev", "v1beta1", "Application")),
            DocumentClass::Application
        );
        assert_eq!(Recognizer::new().bucket(&custom), DocumentClass::Unknown);
    }
}
