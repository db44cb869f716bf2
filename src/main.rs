//! Runs a named experiment and writes its results to stdout
//!
//! Usage:
//!   wiener-paths --name <EXPERIMENT> -- <options for the experiment>
//!   wiener-paths --list

use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use wiener_paths::experiment::{ExperimentError, ExperimentRegistry};

#[derive(Parser)]
#[command(version, about = "Single entry point for running all path experiments")]
struct Cli {
    /// Experiment to run
    #[arg(long, required_unless_present = "list")]
    name: Option<String>,

    /// Print every available experiment with its options
    #[arg(long)]
    list: bool,

    /// Options passed through to the experiment
    #[arg(last = true)]
    args: Vec<String>,
}

fn init_logging() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging();
    let cli = Cli::parse();
    let registry = ExperimentRegistry::with_builtin();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let Some(name) = cli.name.filter(|_| !cli.list) else {
        registry.write_help(&mut out)?;
        return Ok(());
    };

    let experiment = registry.find(&name)?;
    tracing::info!(experiment = name.as_str(), "running experiment");
    match experiment.run(&cli.args, &mut out) {
        Err(ExperimentError::Args(err)) => err.exit(),
        result => result?,
    }
    out.flush()?;
    Ok(())
}
