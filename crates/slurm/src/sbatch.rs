//! SLURM backend: `sbatch` to launch, `squeue` to poll.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::Output;
use std::sync::LazyLock;
use std::time::Duration;

use ismfold_core::job::JobDescriptor;
use regex::Regex;
use tokio::process::Command;

use crate::backend::{BatchBackend, JobId};
use crate::error::SlurmError;
use crate::script;

/// Default timeout for a single sbatch/squeue invocation.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

static SUBMITTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Submitted batch job (\d+)").expect("valid regex"));

/// How to reach the SLURM command-line tools.
#[derive(Debug, Clone)]
pub struct SlurmConfig {
    pub sbatch_program: String,
    pub squeue_program: String,
    /// Directory batch scripts are written to before submission.
    pub script_dir: PathBuf,
    pub command_timeout: Duration,
}

impl SlurmConfig {
    pub fn new(script_dir: PathBuf) -> Self {
        Self {
            sbatch_program: "sbatch".to_string(),
            squeue_program: "squeue".to_string(),
            script_dir,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

/// Extract the job id from `sbatch` stdout.
pub fn parse_submitted_job_id(stdout: &str) -> Option<JobId> {
    SUBMITTED_RE
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Job ids listed by `squeue -h -o %i`, one per line.
pub fn parse_squeue_ids(stdout: &str) -> HashSet<JobId> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// squeue rejects the whole query once every listed id has aged out of the
/// controller; that means none of them is active.
fn is_invalid_job_id_error(stderr: &str) -> bool {
    stderr.contains("Invalid job id")
}

/// Backend submitting through the SLURM command-line tools.
#[derive(Debug, Clone)]
pub struct SlurmBackend {
    config: SlurmConfig,
}

impl SlurmBackend {
    pub fn new(config: SlurmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SlurmConfig {
        &self.config
    }

    /// Run `program` with `args` under the configured timeout.
    async fn run_tool(&self, program: &str, args: &[&str]) -> Result<Output, SlurmError> {
        let result = tokio::time::timeout(
            self.config.command_timeout,
            Command::new(program).args(args).kill_on_drop(true).output(),
        )
        .await;

        match result {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(source)) => Err(SlurmError::Spawn {
                program: program.to_string(),
                source,
            }),
            Err(_) => Err(SlurmError::Timeout {
                program: program.to_string(),
                secs: self.config.command_timeout.as_secs(),
            }),
        }
    }
}

impl BatchBackend for SlurmBackend {
    async fn launch(&self, job: &JobDescriptor) -> Result<JobId, SlurmError> {
        tokio::fs::create_dir_all(&self.config.script_dir).await?;
        let path = script::script_path(&self.config.script_dir, job);
        tokio::fs::write(&path, script::render_batch_script(job)).await?;

        let path_str = path.to_string_lossy();
        let output = self
            .run_tool(&self.config.sbatch_program, &[&*path_str])
            .await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            return Err(SlurmError::ExecutionFailed {
                program: self.config.sbatch_program.clone(),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_submitted_job_id(&stdout).ok_or_else(|| SlurmError::UnexpectedOutput {
            program: self.config.sbatch_program.clone(),
            output: stdout.trim().to_string(),
        })
    }

    async fn active(&self, ids: &[JobId]) -> Result<HashSet<JobId>, SlurmError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let id_list = ids.join(",");
        let output = self
            .run_tool(
                &self.config.squeue_program,
                &["-h", "-o", "%i", "-j", id_list.as_str()],
            )
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_invalid_job_id_error(&stderr) {
                return Ok(HashSet::new());
            }
            return Err(SlurmError::ExecutionFailed {
                program: self.config.squeue_program.clone(),
                exit_code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        let listed = parse_squeue_ids(&String::from_utf8_lossy(&output.stdout));
        // Only report ids we asked about.
        Ok(ids
            .iter()
            .filter(|id| listed.contains(*id))
            .cloned()
            .collect())
    }
}
