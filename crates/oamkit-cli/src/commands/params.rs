//! Params command - show the editable components of each application

use console::style;
use oamkit_core::{BundleError, BundleOptions};
use std::path::Path;

use crate::error::{CliError, Result};
use crate::input::load_bundle;

pub fn run(input: &Path, app: Option<&str>, json: bool, options: BundleOptions) -> Result<()> {
    let bundle = load_bundle(input, options)?;
    let mut configurations = bundle.configurations()?;

    if let Some(key) = app {
        configurations.retain(|k, _| k == key);
        if configurations.is_empty() {
            return Err(BundleError::not_found(key).into());
        }
    }

    if json {
        let output = serde_json::to_string_pretty(&configurations)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    for (i, (key, conf)) in configurations.iter().enumerate() {
        if app.is_none() {
            if i > 0 {
                println!();
            }
            println!("{}", style(format!("# {}", key)).cyan().bold());
        }
        print!("{}", conf.component_spec);
    }
    Ok(())
}
