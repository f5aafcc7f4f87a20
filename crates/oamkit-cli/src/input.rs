//! Bundle loading from archives, files and directories

use oamkit_core::{Bundle, BundleFile, BundleOptions};
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{CliError, Result};

/// Whether a path names a gzip-compressed tar archive
pub fn is_archive(path: &Path) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

/// Load the bundle named by `input`
///
/// An archive is extracted, a directory is walked in path order and any
/// other path is read as a single file.
pub fn load_bundle(input: &Path, options: BundleOptions) -> Result<Bundle> {
    if input.is_dir() {
        let files = read_directory(input)?;
        tracing::debug!(input = %input.display(), files = files.len(), "loaded directory");
        return Ok(Bundle::build_with_options(files, options)?);
    }

    let content = std::fs::read(input).map_err(|e| CliError::io(input, e))?;
    if is_archive(input) {
        return Ok(Bundle::from_archive_with_options(&content, options)?);
    }

    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| input.to_string_lossy().to_string());
    Ok(Bundle::build_with_options(
        vec![BundleFile::new(name, content)],
        options,
    )?)
}

/// Read every file under `root`, named by its `/`-separated relative path
fn read_directory(root: &Path) -> Result<Vec<BundleFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            CliError::io(&path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = path
            .strip_prefix(root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let content = std::fs::read(path).map_err(|e| CliError::io(path, e))?;
        files.push(BundleFile::new(name, content));
    }

    Ok(files)
}

/// Load options from `--config`, or use the defaults
pub fn load_options(config: Option<&Path>) -> Result<BundleOptions> {
    match config {
        Some(path) => Ok(BundleOptions::load_from(path)?),
        None => Ok(BundleOptions::default()),
    }
}
