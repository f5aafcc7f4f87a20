//! CLI commands

pub mod apply;
pub mod export;
pub mod names;
pub mod params;

use oamkit_core::{Bundle, BundleExport, BundleFile};
use std::io::Write;
use std::path::Path;

use crate::error::{CliError, Result};
use crate::input::is_archive;

/// Write the export of a bundle to `output`, or to stdout
///
/// Archive outputs hold one `<key>.yaml` file per application plus a
/// `resources.yaml` stream with the opaque entities.
pub fn write_export(bundle: &Bundle, output: Option<&Path>) -> Result<()> {
    let export = bundle.to_yaml()?;

    let Some(path) = output else {
        let mut stdout = std::io::stdout().lock();
        return stdout
            .write_all(&export.to_multi_document())
            .map_err(|e| CliError::io(Path::new("<stdout>"), e));
    };

    let content = if is_archive(path) {
        oamkit_core::pack_files(&archive_files(bundle, export))?
    } else {
        export.to_multi_document()
    };
    std::fs::write(path, content).map_err(|e| CliError::io(path, e))?;
    tracing::debug!(output = %path.display(), "bundle written");
    Ok(())
}

fn archive_files(bundle: &Bundle, export: BundleExport) -> Vec<BundleFile> {
    let mut files: Vec<_> = bundle
        .applications()
        .zip(export.applications)
        .map(|((key, _), content)| BundleFile::new(format!("{}.yaml", key), content))
        .collect();

    if !export.entities.is_empty() {
        let resources = BundleExport {
            applications: Vec::new(),
            entities: export.entities,
        };
        files.push(BundleFile::new(
            "resources.yaml",
            resources.to_multi_document(),
        ));
    }
    files
}
