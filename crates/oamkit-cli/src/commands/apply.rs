//! Apply command - rename an application and/or replace its components

use oamkit_core::BundleOptions;
use std::path::Path;

use crate::commands::write_export;
use crate::error::{CliError, Result};
use crate::input::load_bundle;

pub fn run(
    input: &Path,
    app: &str,
    rename: Option<&str>,
    components: Option<&Path>,
    output: Option<&Path>,
    options: BundleOptions,
) -> Result<()> {
    let mut bundle = load_bundle(input, options)?;

    let spec = match components {
        Some(path) => std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?,
        None => String::new(),
    };
    bundle.apply_parameters(app, rename.unwrap_or_default(), &spec)?;

    write_export(&bundle, output)
}
