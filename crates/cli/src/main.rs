//! `ism-folds` -- fan an ISM scoring pass out over cross-validation folds.
//!
//! Discovers the `f<fold>_c<cross>` instances of a model directory, builds
//! one scoring command per instance, and submits them as a batch.
//! Environment variables are documented on
//! [`ismfold_cli::config::EnvConfig`].

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ismfold_cli::args::Cli;
use ismfold_cli::config::{EnvConfig, RunConfig};
use ismfold_cli::run::{self, RunOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ismfold_cli=info,ismfold_slurm=info,ismfold_core=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = RunConfig::new(cli, EnvConfig::from_env()?)?;

    tracing::info!(
        models_dir = %config.job.models_dir.display(),
        backend = ?config.backend,
        restart = config.job.restart,
        dry_run = config.dry_run,
        "Starting ism-folds"
    );

    match run::run(config).await? {
        RunOutcome::Planned { jobs, .. } => {
            tracing::info!(jobs, "Dry run complete");
        }
        RunOutcome::Submitted { summary, .. } => {
            tracing::info!(
                launched = summary.launched,
                failed_to_launch = summary.failed_to_launch,
                finished = summary.finished,
                "All jobs finished"
            );
        }
    }

    Ok(())
}
