//! oamkit Core - bundle model for OAM application manifests
//!
//! This crate turns a set of manifest files (loose or packed in a `.tar.gz`)
//! into an editable [`Bundle`]:
//! - `split`: multi-document YAML splitting
//! - `gvk` / `classify`: group/version/kind recognition
//! - `definition` / `convert`: the typed `Application` model and its codec
//! - `components`: comment-preserving capture of `spec.components`
//! - `bundle`: the registry, parameter merge and export
//! - `archive`: `.tar.gz` in/out
//!
//! # Example
//!
//! ```
//! use oamkit_core::{Bundle, BundleFile};
//!
//! let app = r#"
//! apiVersion: core.oam.dev/v1beta1
//! kind: Application
//! metadata:
//!   name: web
//! spec:
//!   components:
//!     - name: frontend # public entrypoint
//!       type: webservice
//! "#;
//!
//! let mut bundle = Bundle::build(vec![BundleFile::new("app.yaml", app)]).unwrap();
//! assert_eq!(bundle.names()["web"], "web");
//!
//! let params = bundle.parameters().unwrap();
//! assert!(params["web"].contains("# public entrypoint"));
//!
//! bundle.apply_parameters("web", "web-prod", "").unwrap();
//! let export = bundle.to_yaml().unwrap();
//! assert_eq!(export.applications.len(), 1);
//! ```

pub mod archive;
pub mod bundle;
pub mod classify;
pub mod components;
pub mod config;
pub mod convert;
pub mod definition;
pub mod error;
pub mod gvk;
pub mod split;

pub use archive::{extract_files, pack_files};
pub use bundle::{Bundle, BundleExport, BundleFile, InstanceConf, OpaqueEntity};
pub use classify::{ResourceDocument, classify, decode_document};
pub use components::ComponentsNode;
pub use config::{BundleOptions, EmptyBundlePolicy, RenamePolicy};
pub use definition::{AppPolicy, ApplicationDefinition, ApplicationSpec, Metadata};
pub use error::{BundleError, ErrorKind, Result};
pub use gvk::{DocumentClass, Recognizer, TypeDescriptor};
pub use split::{Documents, YAML_EXTENSIONS, split_documents};
