//! Application bundle registry
//!
//! A [`Bundle`] is built once from a set of manifest files and edited in
//! place. Applications are kept twice, as a typed [`ApplicationDefinition`]
//! and as a comment-preserving [`ComponentsNode`], in two maps that always
//! share the same keys in the same order.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::archive;
use crate::classify::{ResourceDocument, decode_document};
use crate::components::ComponentsNode;
use crate::config::{BundleOptions, EmptyBundlePolicy, RenamePolicy};
use crate::convert;
use crate::definition::ApplicationDefinition;
use crate::error::{BundleError, Result};
use crate::gvk::{Recognizer, TypeDescriptor};
use crate::split::split_documents;

/// One input file, possibly holding several documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl BundleFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A document that is neither an application nor application metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueEntity {
    source: String,
    descriptor: TypeDescriptor,
    content: Vec<u8>,
}

impl OpaqueEntity {
    pub fn new(source: impl Into<String>, descriptor: TypeDescriptor, content: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            descriptor,
            content,
        }
    }

    /// File the document was read from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Original document bytes
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Name and editable components of one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConf {
    pub name: String,
    pub component_spec: String,
}

/// Serialized form of a bundle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleExport {
    /// Canonical YAML per application, in registry order
    pub applications: Vec<Vec<u8>>,
    /// Opaque documents, unchanged and in input order
    pub entities: Vec<Vec<u8>>,
}

impl BundleExport {
    /// Join applications then entities into one `---` separated stream
    pub fn to_multi_document(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, doc) in self.applications.iter().chain(&self.entities).enumerate() {
            if i > 0 {
                out.extend_from_slice(b"---\n");
            }
            out.extend_from_slice(doc);
            if !doc.ends_with(b"\n") {
                out.push(b'\n');
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty() && self.entities.is_empty()
    }
}

/// In-memory set of applications and the resources shipped with them
#[derive(Debug, Clone)]
pub struct Bundle {
    definitions: IndexMap<String, ApplicationDefinition>,
    components: IndexMap<String, ComponentsNode>,
    entities: Vec<OpaqueEntity>,
    options: BundleOptions,
}

impl Bundle {
    /// Build a bundle with default options
    pub fn build(files: impl IntoIterator<Item = BundleFile>) -> Result<Self> {
        Self::build_with_options(files, BundleOptions::default())
    }

    /// Build a bundle, processing files in the order given
    ///
    /// Files whose name does not pass the suffix gate are skipped, as are
    /// documents that are not valid YAML or carry no type descriptor. A
    /// recognized application that does not fit the typed model aborts the
    /// whole build.
    pub fn build_with_options(
        files: impl IntoIterator<Item = BundleFile>,
        options: BundleOptions,
    ) -> Result<Self> {
        let recognizer = options.recognizer();
        let mut bundle = Self {
            definitions: IndexMap::new(),
            components: IndexMap::new(),
            entities: Vec::new(),
            options,
        };

        for file in files {
            if !bundle.options.accepts_file(&file.name) {
                tracing::debug!(file = %file.name, "skipping file without a YAML extension");
                continue;
            }
            bundle.load_file(&file, &recognizer)?;
        }

        if bundle.definitions.is_empty() {
            match bundle.options.empty_bundle {
                EmptyBundlePolicy::Allow => {
                    tracing::warn!("bundle contains no applications");
                }
                EmptyBundlePolicy::Reject => return Err(BundleError::NoApplications),
            }
        }

        tracing::debug!(
            applications = bundle.definitions.len(),
            entities = bundle.entities.len(),
            "bundle built"
        );
        Ok(bundle)
    }

    /// Build a bundle from a `.tar.gz` stream with default options
    pub fn from_archive(bytes: &[u8]) -> Result<Self> {
        Self::from_archive_with_options(bytes, BundleOptions::default())
    }

    pub fn from_archive_with_options(bytes: &[u8], options: BundleOptions) -> Result<Self> {
        let files = archive::extract_files(bytes)?;
        Self::build_with_options(files, options)
    }

    fn load_file(&mut self, file: &BundleFile, recognizer: &Recognizer) -> Result<()> {
        for document in split_documents(&file.content) {
            match decode_document(document, &file.name, recognizer)? {
                ResourceDocument::Application(app, components) => {
                    self.insert_application(*app, components, &file.name);
                }
                ResourceDocument::Metadata(descriptor) => {
                    tracing::debug!(file = %file.name, %descriptor, "discarding application metadata");
                }
                ResourceDocument::Opaque(entity) => self.entities.push(entity),
                ResourceDocument::Unrecognized => {
                    tracing::warn!(file = %file.name, "skipping document without apiVersion and kind");
                }
                ResourceDocument::Unparsable(error) => {
                    tracing::warn!(file = %file.name, %error, "skipping document that is not valid YAML");
                }
            }
        }
        Ok(())
    }

    fn insert_application(
        &mut self,
        app: ApplicationDefinition,
        components: ComponentsNode,
        file: &str,
    ) {
        let key = app.name().to_string();
        if self.definitions.insert(key.clone(), app).is_some() {
            tracing::warn!(file, application = %key, "duplicate application, keeping the last one");
        }
        self.components.insert(key, components);
    }

    /// Registry key to the current `metadata.name` of each application
    pub fn names(&self) -> BTreeMap<String, String> {
        self.definitions
            .iter()
            .map(|(key, app)| (key.clone(), app.name().to_string()))
            .collect()
    }

    /// Rendered `components` block of each application
    pub fn parameters(&self) -> Result<BTreeMap<String, String>> {
        self.components
            .iter()
            .map(|(key, node)| Ok((key.clone(), render(key, node)?)))
            .collect()
    }

    /// Same as [`parameters`](Self::parameters), paired with the key
    pub fn configurations(&self) -> Result<BTreeMap<String, InstanceConf>> {
        self.components
            .iter()
            .map(|(key, node)| {
                let conf = InstanceConf {
                    name: key.clone(),
                    component_spec: render(key, node)?,
                };
                Ok((key.clone(), conf))
            })
            .collect()
    }

    /// Components text of the first application, if any
    pub fn component_spec(&self) -> Result<Option<String>> {
        self.components
            .first()
            .map(|(key, node)| render(key, node))
            .transpose()
    }

    /// Rename an application and/or replace its components
    ///
    /// Empty arguments leave the matching field untouched. The call either
    /// applies every change or fails leaving the bundle as it was.
    pub fn apply_parameters(
        &mut self,
        name: &str,
        new_name: &str,
        new_components_spec: &str,
    ) -> Result<()> {
        if self.definitions.is_empty() {
            return Err(BundleError::NoApplications);
        }
        if !self.definitions.contains_key(name) {
            return Err(BundleError::not_found(name));
        }

        let replacement = if new_components_spec.is_empty() {
            None
        } else {
            Some(ComponentsNode::from_spec(new_components_spec)?)
        };

        let rekey =
            !new_name.is_empty() && new_name != name && self.options.rename == RenamePolicy::Rekey;
        if rekey && self.definitions.contains_key(new_name) {
            return Err(BundleError::NameConflict {
                from: name.to_string(),
                to: new_name.to_string(),
            });
        }

        if let Some(node) = replacement {
            if let Some(app) = self.definitions.get_mut(name) {
                app.spec.components = node.value().clone();
            }
            self.components.insert(name.to_string(), node);
            tracing::debug!(application = name, "components replaced");
        }

        if !new_name.is_empty() {
            if let Some(app) = self.definitions.get_mut(name) {
                app.metadata.name = new_name.to_string();
            }
            if rekey {
                self.rekey(name, new_name);
            }
            tracing::debug!(application = name, new_name, "application renamed");
        }
        Ok(())
    }

    /// Move an entry to a new key, keeping its position
    fn rekey(&mut self, from: &str, to: &str) {
        if let Some((index, _, app)) = self.definitions.shift_remove_full(from) {
            self.definitions.shift_insert(index, to.to_string(), app);
        }
        if let Some((index, _, node)) = self.components.shift_remove_full(from) {
            self.components.shift_insert(index, to.to_string(), node);
        }
    }

    /// Serialize applications and pass opaque entities through
    pub fn to_yaml(&self) -> Result<BundleExport> {
        let applications = self
            .definitions
            .values()
            .map(convert::to_yaml)
            .collect::<Result<Vec<_>>>()?;
        let entities = self.entities.iter().map(|e| e.content().to_vec()).collect();

        Ok(BundleExport {
            applications,
            entities,
        })
    }

    pub fn application(&self, key: &str) -> Option<&ApplicationDefinition> {
        self.definitions.get(key)
    }

    pub fn applications(&self) -> impl Iterator<Item = (&str, &ApplicationDefinition)> {
        self.definitions.iter().map(|(key, app)| (key.as_str(), app))
    }

    pub fn components_of(&self, key: &str) -> Option<&ComponentsNode> {
        self.components.get(key)
    }

    pub fn opaque_entities(&self) -> &[OpaqueEntity] {
        &self.entities
    }

    /// Number of applications
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn options(&self) -> &BundleOptions {
        &self.options
    }
}

fn render(key: &str, node: &ComponentsNode) -> Result<String> {
    node.render().map_err(|e| {
        BundleError::internal(format!("error getting the parameters of {}: {}", key, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const APPLICATION_FILE: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: cm-test
data:
  cpu: "0.50"
  memory: "250Mi"
---
apiVersion: core.oam.dev/v1beta1
kind: Application
metadata:
  name: application
  annotations:
    version: v1.0.0
    description: "Customized version of nginx"
spec:
  components: # comment
    - name: component1
      type: webservice
      properties:
        image: nginx:1.20.0 # Image
        ports:
        - port: 80 # Port
          expose: true
"#;

    const CONFIG_MAP: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: cm-test
data:
  cpu: "0.50"
  memory: "250Mi"
"#;

    const WITH_WORKFLOW: &str = r#"apiVersion: core.oam.dev/v1beta1
kind: Application
metadata:
  name: appWithWorkflow
  annotations:
    version: "v0.0.1"
    description: "My app"
spec:
  components:
    - name: component1
      type: worker # Required worker
      properties:
        image: busybox
        cmd: ["sleep", "86400"]
    - name: component2
      type: worker
      properties:
        image: busybox
        cmd: ["sleep", "86400"]
      traits:
        - type: scaler
          properties:
            replicas: 1
  workflow:
    steps:
    - name: apply-app
      type: apply-application-in-parallel
"#;

    const TWO_APPLICATIONS: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: cm-test
---
apiVersion: core.oam.dev/v1beta1
kind: Application
metadata:
  name: app1
spec:
  components:
    - name: component1
      type: webservice
---
apiVersion: core.oam.dev/v1beta1
kind: Application
metadata:
  name: app2
spec:
  components:
    - name: component1
      type: worker
---
"#;

    const METADATA: &str = r#"
apiVersion: core.napptive.com/v1alpha1
kind: ApplicationMetadata
"#;

    const NEW_SPEC: &str = r#"
components:
  - name: component1
    type: webservice # Webservice type
    properties:
      image: 'nginx:1.20.0'
      ports:
        - port: 82
          expose: true
"#;

    fn bundle(files: &[(&str, &str)]) -> Bundle {
        Bundle::build(files.iter().map(|(name, content)| BundleFile::new(*name, *content))).unwrap()
    }

    fn rekeying(files: &[(&str, &str)]) -> Bundle {
        let options = BundleOptions::default().with_rename(RenamePolicy::Rekey);
        let files = files.iter().map(|(name, content)| BundleFile::new(*name, *content));
        Bundle::build_with_options(files, options).unwrap()
    }

    #[test]
    fn test_build_application_and_entity() {
        let bundle = bundle(&[("file1.yaml", APPLICATION_FILE)]);

        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.names()["application"], "application");
        assert_eq!(bundle.opaque_entities().len(), 1);
        assert_eq!(bundle.opaque_entities()[0].descriptor().kind, "ConfigMap");
        assert_eq!(bundle.opaque_entities()[0].source(), "file1.yaml");
    }

    #[test]
    fn test_build_skips_metadata_and_other_files() {
        let bundle = bundle(&[
            ("file1.yaml", WITH_WORKFLOW),
            ("metadata.yaml", METADATA),
            ("readme.md", "\n# README file\n"),
        ]);

        assert_eq!(bundle.len(), 1);
        assert!(bundle.opaque_entities().is_empty());
    }

    #[test]
    fn test_build_metadata_only_bundle() {
        let bundle = bundle(&[("metadata.yaml", METADATA)]);

        assert!(bundle.is_empty());
        assert!(bundle.names().is_empty());
        assert!(bundle.parameters().unwrap().is_empty());
        assert_eq!(bundle.component_spec().unwrap(), None);
    }

    #[test]
    fn test_build_rejects_empty_bundle_when_configured() {
        let options = BundleOptions::default().with_empty_bundle(EmptyBundlePolicy::Reject);
        let err = Bundle::build_with_options(vec![BundleFile::new("cm.yaml", CONFIG_MAP)], options)
            .unwrap_err();
        assert!(matches!(err, BundleError::NoApplications));
    }

    #[test]
    fn test_build_skips_invalid_yaml_documents() {
        let mixed = format!("{}---\nnot: [valid yaml\n", WITH_WORKFLOW);
        let bundle = bundle(&[
            ("file1.yaml", mixed.as_str()),
            ("broken.yaml", "apiVersion: v1\nkind: [\n"),
            ("cm.yaml", CONFIG_MAP),
        ]);

        assert_eq!(bundle.names()["appWithWorkflow"], "appWithWorkflow");
        assert_eq!(bundle.opaque_entities().len(), 1);
    }

    #[test]
    fn test_build_keeps_non_utf8_entities() {
        let mut content = WITH_WORKFLOW.as_bytes().to_vec();
        let latin1 = b"apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cm\ndata:\n  k: caf\xe9\n";
        content.extend_from_slice(b"---\n");
        content.extend_from_slice(latin1);

        let bundle = Bundle::build(vec![BundleFile::new("app.yaml", content)]).unwrap();

        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.opaque_entities().len(), 1);
        assert_eq!(bundle.opaque_entities()[0].content(), &latin1[..]);
        assert_eq!(bundle.to_yaml().unwrap().entities, vec![latin1.to_vec()]);
    }

    #[test]
    fn test_build_skips_documents_without_descriptor() {
        let content = "# just a comment\nfoo: bar\n---\n- a\n- b\n---\n".to_string() + CONFIG_MAP;
        let bundle = bundle(&[("misc.yaml", content.as_str())]);

        assert!(bundle.is_empty());
        assert_eq!(bundle.opaque_entities().len(), 1);
    }

    #[test]
    fn test_entities_keep_encounter_order() {
        let secret = "apiVersion: v1\nkind: Secret\nmetadata:\n  name: s\n";
        let service = "apiVersion: v1\nkind: Service\nmetadata:\n  name: svc\n";
        let mixed = format!("{}---\n{}", secret, WITH_WORKFLOW);
        let bundle = bundle(&[
            ("b.yaml", mixed.as_str()),
            ("a.yml", service),
            ("c.yaml", CONFIG_MAP),
        ]);

        let kinds: Vec<_> = bundle
            .opaque_entities()
            .iter()
            .map(|e| e.descriptor().kind.as_str())
            .collect();
        assert_eq!(kinds, vec!["Secret", "Service", "ConfigMap"]);
        assert_eq!(bundle.opaque_entities()[0].content(), secret.as_bytes());
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let first = "apiVersion: core.oam.dev/v1beta1\nkind: Application\nmetadata:\n  name: dup\nspec:\n  components:\n    - name: first\n";
        let other = "apiVersion: core.oam.dev/v1beta1\nkind: Application\nmetadata:\n  name: other\n";
        let second = "apiVersion: core.oam.dev/v1beta1\nkind: Application\nmetadata:\n  name: dup\nspec:\n  components:\n    - name: second # latest\n";
        let bundle = bundle(&[("one.yaml", first), ("two.yaml", other), ("three.yaml", second)]);

        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.application("dup").unwrap().spec.components[0]["name"], "second");
        assert!(bundle.parameters().unwrap()["dup"].contains("# latest"));
        // First-seen position is kept
        let keys: Vec<_> = bundle.applications().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["dup", "other"]);
    }

    #[test]
    fn test_legacy_application_configuration_is_recognized() {
        let doc = "apiVersion: core.oam.dev/v1alpha2\nkind: ApplicationConfiguration\nmetadata:\n  name: legacy\nspec:\n  components:\n    - componentName: web\n";
        let bundle = bundle(&[("legacy.yaml", doc)]);
        assert_eq!(bundle.names()["legacy"], "legacy");
    }

    #[test]
    fn test_parameters_of_two_applications() {
        let bundle = bundle(&[("file1.yaml", TWO_APPLICATIONS)]);
        let parameters = bundle.parameters().unwrap();

        assert_eq!(parameters.len(), 2);
        assert_eq!(
            parameters["app2"],
            "components:\n  - name: component1\n    type: worker\n"
        );
        assert_eq!(bundle.opaque_entities().len(), 1);
    }

    #[test]
    fn test_parameters_keep_comments() {
        let bundle = bundle(&[("file1.yaml", APPLICATION_FILE)]);

        insta::assert_snapshot!(bundle.parameters().unwrap()["application"], @r"
        components: # comment
          - name: component1
            type: webservice
            properties:
              image: nginx:1.20.0 # Image
              ports:
              - port: 80 # Port
                expose: true
        ");
    }

    #[test]
    fn test_component_spec_is_first_application() {
        let bundle = bundle(&[("file1.yaml", TWO_APPLICATIONS)]);
        let spec = bundle.component_spec().unwrap().unwrap();
        assert!(spec.contains("type: webservice"));
    }

    #[test]
    fn test_apply_rename_keeps_key() {
        let mut bundle = bundle(&[("file1.yaml", WITH_WORKFLOW)]);

        bundle.apply_parameters("appWithWorkflow", "changed", "").unwrap();

        assert_eq!(bundle.names()["appWithWorkflow"], "changed");
        assert_eq!(bundle.application("appWithWorkflow").unwrap().name(), "changed");
        // Later calls still use the original key
        bundle.apply_parameters("appWithWorkflow", "again", "").unwrap();
        assert!(bundle.apply_parameters("changed", "x", "").unwrap_err().is_not_found());
    }

    #[test]
    fn test_apply_rename_isolation() {
        let mut bundle = bundle(&[("file1.yaml", TWO_APPLICATIONS)]);
        let before = bundle.to_yaml().unwrap();

        bundle.apply_parameters("app1", "renamed", "").unwrap();
        let after = bundle.to_yaml().unwrap();

        assert_eq!(bundle.names()["app2"], "app2");
        assert_ne!(before.applications[0], after.applications[0]);
        assert_eq!(before.applications[1], after.applications[1]);
        assert_eq!(before.entities, after.entities);
    }

    #[test]
    fn test_apply_rename_with_rekey() {
        let mut bundle = rekeying(&[("file1.yaml", TWO_APPLICATIONS)]);

        bundle.apply_parameters("app1", "frontend", "").unwrap();

        let keys: Vec<_> = bundle.applications().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["frontend", "app2"]);
        assert_eq!(bundle.names()["frontend"], "frontend");
        assert!(bundle.components_of("frontend").is_some());
        assert!(bundle.components_of("app1").is_none());
        assert!(bundle.apply_parameters("app1", "x", "").unwrap_err().is_not_found());
    }

    #[test]
    fn test_apply_rename_conflict_leaves_bundle_unchanged() {
        let mut bundle = rekeying(&[("file1.yaml", TWO_APPLICATIONS)]);
        let before = bundle.to_yaml().unwrap();

        let err = bundle.apply_parameters("app1", "app2", NEW_SPEC).unwrap_err();

        assert!(matches!(err, BundleError::NameConflict { .. }));
        assert_eq!(bundle.to_yaml().unwrap(), before);
        assert!(!bundle.parameters().unwrap()["app1"].contains("Webservice type"));
    }

    #[test]
    fn test_apply_components_spec() {
        let mut bundle = bundle(&[("file1.yaml", WITH_WORKFLOW)]);
        let original = bundle.parameters().unwrap()["appWithWorkflow"].clone();
        assert_eq!(original.matches("\n  - name: ").count(), 2);
        assert!(original.contains("type: worker # Required worker"));

        bundle.apply_parameters("appWithWorkflow", "", NEW_SPEC).unwrap();

        let parameters = bundle.parameters().unwrap();
        assert_eq!(
            parameters["appWithWorkflow"],
            "components:\n  - name: component1\n    type: webservice # Webservice type\n    properties:\n      image: 'nginx:1.20.0'\n      ports:\n        - port: 82\n          expose: true\n"
        );
        assert_eq!(
            bundle.component_spec().unwrap().as_ref(),
            Some(&parameters["appWithWorkflow"])
        );

        let app = bundle.application("appWithWorkflow").unwrap();
        assert_eq!(app.component_count(), 1);
        assert_eq!(app.spec.components[0]["properties"]["ports"][0]["port"], 82);
        assert!(app.spec.workflow.is_some());
        assert!(bundle.parameters().unwrap()["appWithWorkflow"].contains("# Webservice type"));

        let export = bundle.to_yaml().unwrap();
        let yaml = String::from_utf8(export.applications[0].clone()).unwrap();
        assert!(yaml.contains("port: 82"));
        assert!(yaml.contains("apply-application-in-parallel"));
    }

    #[test]
    fn test_apply_json_components_spec() {
        let mut bundle = bundle(&[("file1.yaml", APPLICATION_FILE)]);

        let spec = r#"{"components": [{"name": "api", "type": "worker"}]}"#;
        bundle.apply_parameters("application", "", spec).unwrap();

        assert_eq!(
            bundle.parameters().unwrap()["application"],
            "components:\n- name: api\n  type: worker\n"
        );
    }

    #[test]
    fn test_apply_configurations_back() {
        let mut bundle = bundle(&[("file1.yaml", WITH_WORKFLOW)]);
        let before = bundle.to_yaml().unwrap();

        let configurations = bundle.configurations().unwrap();
        let conf = &configurations["appWithWorkflow"];
        assert_eq!(conf.name, "appWithWorkflow");

        bundle
            .apply_parameters("appWithWorkflow", "", &conf.component_spec)
            .unwrap();

        assert_eq!(bundle.to_yaml().unwrap(), before);
        assert_eq!(
            bundle.configurations().unwrap()["appWithWorkflow"].component_spec,
            conf.component_spec
        );
    }

    #[test]
    fn test_apply_noop_changes_nothing() {
        let mut bundle = bundle(&[("file1.yaml", APPLICATION_FILE)]);
        let export = bundle.to_yaml().unwrap();
        let parameters = bundle.parameters().unwrap();

        bundle.apply_parameters("application", "", "").unwrap();

        assert_eq!(bundle.to_yaml().unwrap(), export);
        assert_eq!(bundle.parameters().unwrap(), parameters);
        assert_eq!(bundle.names()["application"], "application");
    }

    #[test]
    fn test_apply_errors() {
        let mut empty = bundle(&[("metadata.yaml", METADATA)]);
        let err = empty.apply_parameters("appWithWorkflow", "changed", "").unwrap_err();
        assert!(matches!(err, BundleError::NoApplications));
        assert!(err.is_not_found());

        let mut bundle = bundle(&[("file1.yaml", WITH_WORKFLOW)]);
        let err = bundle.apply_parameters("error", "changed", "").unwrap_err();
        assert!(matches!(err, BundleError::ApplicationNotFound { .. }));

        let err = bundle.apply_parameters("error", "", NEW_SPEC).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_apply_invalid_spec_is_atomic() {
        let mut bundle = bundle(&[("file1.yaml", WITH_WORKFLOW)]);
        let before = bundle.to_yaml().unwrap();

        let err = bundle
            .apply_parameters("appWithWorkflow", "changed", "policies: []\n")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(bundle.names()["appWithWorkflow"], "appWithWorkflow");
        assert_eq!(bundle.to_yaml().unwrap(), before);
    }

    #[test]
    fn test_to_yaml_round_trip() {
        let original = bundle(&[("file1.yaml", APPLICATION_FILE), ("file2.yaml", WITH_WORKFLOW)]);
        let export = original.to_yaml().unwrap();

        let stream = String::from_utf8(export.to_multi_document()).unwrap();
        let rebuilt = bundle(&[("bundle.yaml", stream.as_str())]);

        assert_eq!(rebuilt.names(), original.names());
        for (key, app) in original.applications() {
            assert_eq!(rebuilt.application(key), Some(app));
        }
        assert_eq!(rebuilt.opaque_entities().len(), 1);
        assert_eq!(rebuilt.to_yaml().unwrap(), export);
    }

    #[test]
    fn test_to_yaml_after_rename() {
        let mut bundle = bundle(&[("file1.yaml", APPLICATION_FILE)]);
        bundle.apply_parameters("application", "changed", "").unwrap();

        let export = bundle.to_yaml().unwrap();
        assert_eq!(export.entities, vec![CONFIG_MAP.as_bytes().to_vec()]);

        let yaml = String::from_utf8(export.applications[0].clone()).unwrap();
        insta::assert_snapshot!(yaml, @r#"
        apiVersion: core.oam.dev/v1beta1
        kind: Application
        metadata:
          annotations:
            description: Customized version of nginx
            version: v1.0.0
          name: changed
        spec:
          components:
          - name: component1
            properties:
              image: nginx:1.20.0
              ports:
              - expose: true
                port: 80
            type: webservice
        "#);
    }

    #[test]
    fn test_multi_document_join() {
        let export = BundleExport {
            applications: vec![b"a: 1\n".to_vec()],
            entities: vec![b"b: 2".to_vec(), b"c: 3\n".to_vec()],
        };
        assert_eq!(export.to_multi_document(), b"a: 1\n---\nb: 2\n---\nc: 3\n".to_vec());
        assert!(BundleExport::default().to_multi_document().is_empty());
    }
}
