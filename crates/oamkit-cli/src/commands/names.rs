//! Names command - list the applications of a bundle

use console::style;
use oamkit_core::BundleOptions;
use std::path::Path;

use crate::error::Result;
use crate::input::load_bundle;

pub fn run(input: &Path, options: BundleOptions) -> Result<()> {
    let bundle = load_bundle(input, options)?;
    let names = bundle.names();

    if names.is_empty() {
        println!("{}", style("No applications found").dim());
        return Ok(());
    }

    for (key, name) in &names {
        if key == name {
            println!("{}", style(key).cyan().bold());
        } else {
            println!("{} {} {}", style(key).cyan().bold(), style("→").dim(), name);
        }
    }
    Ok(())
}
