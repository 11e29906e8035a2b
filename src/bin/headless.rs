//! Trains without a window and writes the fitness history as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use racetrack::cli::RunArgs;
use racetrack::simulation::evolution::{Trainer, TrainingOutcome};
use racetrack::simulation::race::NoCommands;

/// Train cars headlessly and report fitness statistics.
#[derive(Debug, Parser)]
#[command(name = "racetrack-headless", version, about)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    /// Where to write the statistics. Defaults to a timestamped file.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let params = cli
        .run
        .headless_params()
        .context("failed to load parameters")?;
    let tracks = cli.run.tracks(&params).context("failed to load tracks")?;
    let generations = params.max_generations;

    let mut trainer = Trainer::new(tracks, params).context("failed to set up training")?;
    let outcome = trainer
        .run(generations, &mut NoCommands)
        .context("training aborted")?;
    if outcome == TrainingOutcome::Quit {
        info!("training stopped early");
    }

    let report_path = cli.report.unwrap_or_else(|| {
        PathBuf::from(format!(
            "training_{}.json",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ))
    });
    trainer
        .stats()
        .save_to_file(&report_path)
        .with_context(|| format!("failed to write {}", report_path.display()))?;
    info!(
        "wrote statistics for {} generations to {}",
        trainer.stats().history().len(),
        report_path.display()
    );

    Ok(())
}
