//! oamkit CLI - inspect, parameterize and re-emit OAM application bundles

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;
mod input;

use error::Result;

#[derive(Parser)]
#[command(name = "oamkit")]
#[command(author = "oamkit Contributors")]
#[command(version)]
#[command(about = "Inspect, parameterize and re-emit OAM application bundles", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bundle options file (YAML)
    #[arg(long, global = true, env = "OAMKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the applications of a bundle
    Names {
        /// Bundle archive (.tar.gz/.tgz), manifest file or directory
        input: PathBuf,
    },

    /// Show the components of each application
    Params {
        /// Bundle archive (.tar.gz/.tgz), manifest file or directory
        input: PathBuf,

        /// Only show this application
        #[arg(long)]
        app: Option<String>,

        /// Output name and component spec per application as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename an application and/or replace its components, then export
    Apply {
        /// Bundle archive (.tar.gz/.tgz), manifest file or directory
        input: PathBuf,

        /// Application to modify
        #[arg(long)]
        app: String,

        /// New application name
        #[arg(long)]
        rename: Option<String>,

        /// File holding the new `components` (YAML or JSON)
        #[arg(long)]
        components: Option<PathBuf>,

        /// Output file (.tar.gz/.tgz writes an archive; default stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rebuild a bundle and emit it as YAML
    Export {
        /// Bundle archive (.tar.gz/.tgz), manifest file or directory
        input: PathBuf,

        /// Output file (.tar.gz/.tgz writes an archive; default stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let options = input::load_options(cli.config.as_deref())?;

    match cli.command {
        Commands::Names { input } => commands::names::run(&input, options),

        Commands::Params { input, app, json } => {
            commands::params::run(&input, app.as_deref(), json, options)
        }

        Commands::Apply {
            input,
            app,
            rename,
            components,
            output,
        } => commands::apply::run(
            &input,
            &app,
            rename.as_deref(),
            components.as_deref(),
            output.as_deref(),
            options,
        ),

        Commands::Export { input, output } => {
            commands::export::run(&input, output.as_deref(), options)
        }
    }
}
