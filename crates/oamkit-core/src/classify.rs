//! Two-phase document decoding
//!
//! The first phase reads only the `apiVersion`/`kind` envelope. The second
//! phase decodes the document according to the bucket its descriptor falls
//! into, producing a [`ResourceDocument`].

use serde::Deserialize;
use std::borrow::Cow;
use serde_yaml::Value as YamlValue;

use crate::bundle::OpaqueEntity;
use crate::components::ComponentsNode;
use crate::convert;
use crate::definition::ApplicationDefinition;
use crate::error::{BundleError, Result};
use crate::gvk::{DocumentClass, Recognizer, TypeDescriptor};

/// Minimal envelope shared by every resource
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeMeta {
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    kind: String,
}

/// A fully decoded document
#[derive(Debug, Clone)]
pub enum ResourceDocument {
    /// An application with its comment-preserving components capture
    Application(Box<ApplicationDefinition>, ComponentsNode),
    /// An auxiliary metadata marker, dropped by the bundle
    Metadata(TypeDescriptor),
    /// Any other resource, kept verbatim
    Opaque(OpaqueEntity),
    /// Valid YAML without a type descriptor
    Unrecognized,
    /// Not valid YAML; holds the parser message
    Unparsable(String),
}

/// Read the type descriptor of a document
///
/// Fails only if the document is not valid YAML. A well-formed document
/// without a usable `apiVersion`/`kind` yields `None`.
pub fn classify(document: &str) -> Result<Option<(TypeDescriptor, YamlValue)>> {
    let tree: YamlValue = serde_yaml::from_str(document)
        .map_err(|e| BundleError::decode("document", e))?;

    if !tree.is_mapping() {
        return Ok(None);
    }
    let Ok(meta) = serde_yaml::from_value::<TypeMeta>(tree.clone()) else {
        return Ok(None);
    };

    Ok(TypeDescriptor::from_api_version(&meta.api_version, &meta.kind).map(|gvk| (gvk, tree)))
}

/// Decode a document into its typed variant
///
/// Documents that cannot be classified come back as `Unrecognized` or
/// `Unparsable`. Only a recognized application that does not fit the typed
/// model is an error. Text that is not UTF-8 is read lossily; opaque
/// entities still keep the original bytes.
pub fn decode_document(
    document: &[u8],
    source: &str,
    recognizer: &Recognizer,
) -> Result<ResourceDocument> {
    let text = String::from_utf8_lossy(document);
    if matches!(text, Cow::Owned(_)) {
        tracing::warn!(file = source, "document is not valid UTF-8, reading it lossily");
    }

    let (gvk, tree) = match classify(&text) {
        Ok(Some(classified)) => classified,
        Ok(None) => return Ok(ResourceDocument::Unrecognized),
        Err(BundleError::Decode { message, .. }) => {
            return Ok(ResourceDocument::Unparsable(message));
        }
        Err(other) => return Err(other),
    };

    match recognizer.bucket(&gvk) {
        DocumentClass::Application => {
            let app = convert::to_typed(&tree).map_err(|e| e.in_file(source))?;
            let components =
                ComponentsNode::from_document(&text).map_err(|e| e.in_file(source))?;
            Ok(ResourceDocument::Application(Box::new(app), components))
        }
        DocumentClass::Metadata => Ok(ResourceDocument::Metadata(gvk)),
        DocumentClass::Unknown => Ok(ResourceDocument::Opaque(OpaqueEntity::new(
            source,
            gvk,
            document.to_vec(),
        ))),
    }
}
