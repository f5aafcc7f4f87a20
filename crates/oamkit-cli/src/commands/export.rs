//! Export command - rebuild a bundle and emit it again

use oamkit_core::BundleOptions;
use std::path::Path;

use crate::commands::write_export;
use crate::error::Result;
use crate::input::load_bundle;

pub fn run(input: &Path, output: Option<&Path>, options: BundleOptions) -> Result<()> {
    let bundle = load_bundle(input, options)?;
    write_export(&bundle, output)
}
