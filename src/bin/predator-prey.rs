//! Predator-prey simulation binary
//!
//! Run with: `cargo run --bin predator-prey -- periodic`

use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, ValueHint};
use predator_prey::{
    builtin_scenarios, ModelKind, PlotDataExporter, Runner, Scenario, ScenarioFile,
    SimulationConfig, SimulationError,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Lotka-Volterra simulation and period analysis", long_about = None)]
struct Cli {
    /// Built-in sweep to run: "periodic" or "non-periodic"
    #[arg(default_value = "non-periodic", value_parser = ModelKind::from_str)]
    mode: ModelKind,

    /// JSON scenario file to run instead of the built-in sweep
    #[arg(long, value_hint = ValueHint::FilePath)]
    scenarios: Option<PathBuf>,

    /// Directory receiving plot data and the summary
    #[arg(short, long, default_value = "output", value_hint = ValueHint::DirPath)]
    output: PathBuf,

    /// Skip writing plot data
    #[arg(long, action = ArgAction::SetTrue)]
    no_export: bool,

    /// Run scenarios on all cores
    #[arg(long, action = ArgAction::SetTrue)]
    parallel: bool,

    /// Also write summary.json to the output directory
    #[arg(long, action = ArgAction::SetTrue)]
    summary: bool,

    /// Enable debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --verbose, e.g.
    //   RUST_LOG=predator_prey::integrator=debug predator-prey periodic
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();

    let (config, scenarios) = load_scenarios(&cli)?;

    let mut runner = Runner::new(config).parallel(cli.parallel);
    let exporter = PlotDataExporter::new(&cli.output);
    if !cli.no_export {
        runner = runner.with_exporter(exporter.clone());
    }

    let summary = runner.run_each(&scenarios, |report| print!("{}", report.render()))?;

    if cli.summary {
        let path = exporter.write_summary(&summary)?;
        tracing::info!("Summary written to {}", path.display());
    }

    Ok(())
}

/// Scenario file when given, otherwise the built-in sweep for the mode.
fn load_scenarios(cli: &Cli) -> Result<(SimulationConfig, Vec<Scenario>), SimulationError> {
    match &cli.scenarios {
        Some(path) => {
            let file = ScenarioFile::load(path)?;
            tracing::info!("Loaded {} scenarios from {}", file.scenarios.len(), path.display());
            Ok((file.config, file.scenarios()))
        }
        None => {
            println!("Finding {} solution.", cli.mode);
            Ok((SimulationConfig::default(), builtin_scenarios(cli.mode)?))
        }
    }
}
