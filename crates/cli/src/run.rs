//! Discovery, job building, and submission for one invocation.

use std::io::Write;

use ismfold_core::builder::build_jobs;
use ismfold_core::discovery::{self, FoldLayout};
use ismfold_core::job::JobDescriptor;
use ismfold_core::scheduler::{JobScheduler, SubmitPolicy, SubmitSummary};
use ismfold_slurm::{LocalBackend, MultiRunner, SlurmBackend, SlurmConfig};

use crate::args::BackendKind;
use crate::config::RunConfig;

/// What an invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Jobs were printed, not submitted.
    Planned { layout: FoldLayout, jobs: usize },
    /// Jobs were handed to a scheduler and have finished.
    Submitted {
        layout: FoldLayout,
        summary: SubmitSummary,
    },
}

/// Discover the layout and build the job list, honoring restart mode.
pub fn plan(config: &RunConfig) -> anyhow::Result<(FoldLayout, Vec<JobDescriptor>)> {
    let layout = discovery::discover(&config.job.models_dir, config.job.data_head);
    tracing::info!(
        folds = layout.num_folds,
        crosses = layout.num_crosses,
        "Folds {}, Crosses {}",
        layout.num_folds,
        layout.num_crosses
    );

    let jobs = build_jobs(&config.job, layout);
    tracing::info!(
        jobs = jobs.len(),
        skipped = layout.len() - jobs.len(),
        "Built job list"
    );
    Ok((layout, jobs))
}

/// Write one JSON object per job to `out`.
pub fn write_plan(jobs: &[JobDescriptor], out: &mut impl Write) -> anyhow::Result<()> {
    for job in jobs {
        serde_json::to_writer(&mut *out, job)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Hand `jobs` to `scheduler` as one batch.
pub async fn submit_with<S: JobScheduler>(
    scheduler: &S,
    jobs: Vec<JobDescriptor>,
    policy: SubmitPolicy,
) -> anyhow::Result<SubmitSummary> {
    let summary = scheduler.submit(jobs, policy).await?;
    if summary.failed_to_launch > 0 {
        tracing::warn!(
            failed = summary.failed_to_launch,
            "Some jobs could not be launched"
        );
    }
    Ok(summary)
}

/// Execute a full invocation.
pub async fn run(config: RunConfig) -> anyhow::Result<RunOutcome> {
    let (layout, jobs) = plan(&config)?;

    if config.dry_run {
        let count = jobs.len();
        write_plan(&jobs, &mut std::io::stdout().lock())?;
        return Ok(RunOutcome::Planned {
            layout,
            jobs: count,
        });
    }

    let summary = match config.backend {
        BackendKind::Slurm => {
            let mut slurm = SlurmConfig::new(config.script_dir.clone());
            slurm.command_timeout = config.command_timeout;
            let runner = MultiRunner::new(SlurmBackend::new(slurm));
            submit_with(&runner, jobs, config.policy).await?
        }
        BackendKind::Local => {
            let runner = MultiRunner::new(LocalBackend::new());
            submit_with(&runner, jobs, config.policy).await?
        }
    };

    Ok(RunOutcome::Submitted { layout, summary })
}
