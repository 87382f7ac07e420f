//! Environment configuration and the merged per-run configuration.

use std::path::PathBuf;
use std::time::Duration;

use ismfold_core::builder::{JobConfig, ScoringEnv, DEFAULT_CONDA_PROFILE, DEFAULT_SCORING_TOOL};
use ismfold_core::error::CoreError;
use ismfold_core::job::Resources;
use ismfold_core::options::IsmOptions;
use ismfold_core::scheduler::SubmitPolicy;

use crate::args::{BackendKind, Cli};

/// Subdirectory of the model directory holding generated sbatch scripts.
const DEFAULT_SCRIPT_SUBDIR: &str = "slurm";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidInteger { key: &'static str, value: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Settings read from the environment (after `.env` is loaded).
///
/// | Env Var                    | Default                                   |
/// |----------------------------|-------------------------------------------|
/// | `ISM_CONDA_PROFILE`        | `$HOME/anaconda3/etc/profile.d/conda.sh`  |
/// | `ISM_SCORING_TOOL`         | `saluki_ism_tfr.py`                       |
/// | `ISM_LAUNCH_STAGGER_SECS`  | `10`                                      |
/// | `ISM_POLL_INTERVAL_SECS`   | `60`                                      |
/// | `ISM_SBATCH_SCRIPT_DIR`    | `<models_dir>/slurm`                      |
/// | `ISM_COMMAND_TIMEOUT_SECS` | `60`                                      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub conda_profile: String,
    pub scoring_tool: String,
    pub launch_stagger: Duration,
    pub poll_interval: Duration,
    pub script_dir: Option<PathBuf>,
    pub command_timeout: Duration,
}

impl EnvConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secs = |key: &'static str, default: u64| -> Result<Duration, ConfigError> {
            match get(key) {
                None => Ok(Duration::from_secs(default)),
                Some(value) => value
                    .trim()
                    .parse()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidInteger { key, value }),
            }
        };

        Ok(Self {
            conda_profile: get("ISM_CONDA_PROFILE")
                .unwrap_or_else(|| DEFAULT_CONDA_PROFILE.to_string()),
            scoring_tool: get("ISM_SCORING_TOOL")
                .unwrap_or_else(|| DEFAULT_SCORING_TOOL.to_string()),
            launch_stagger: secs("ISM_LAUNCH_STAGGER_SECS", 10)?,
            poll_interval: secs("ISM_POLL_INTERVAL_SECS", 60)?,
            script_dir: get("ISM_SBATCH_SCRIPT_DIR").map(PathBuf::from),
            command_timeout: secs("ISM_COMMAND_TIMEOUT_SECS", 60)?,
        })
    }
}

/// Immutable configuration for one invocation, merged from CLI and env.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub job: JobConfig,
    pub policy: SubmitPolicy,
    pub backend: BackendKind,
    pub script_dir: PathBuf,
    pub command_timeout: Duration,
    pub dry_run: bool,
}

impl RunConfig {
    pub fn new(cli: Cli, env: EnvConfig) -> Result<Self, ConfigError> {
        let policy = SubmitPolicy::new(cli.max_proc, env.launch_stagger, env.poll_interval)?;
        let script_dir = env
            .script_dir
            .unwrap_or_else(|| cli.models_dir.join(DEFAULT_SCRIPT_SUBDIR));

        let job = JobConfig {
            models_dir: cli.models_dir,
            data_head: cli.data_head,
            data_dir: cli.data_dir,
            ism: IsmOptions {
                mut_len: cli.mut_len,
                out_dir: cli.out_dir,
                split_label: cli.split_label,
            },
            env: ScoringEnv {
                conda_profile: env.conda_profile,
                conda_env: cli.conda_env,
                scoring_tool: env.scoring_tool,
            },
            name_prefix: cli.name,
            queue: cli.queue,
            restart: cli.restart,
            resources: Resources::default(),
        };

        Ok(Self {
            job,
            policy,
            backend: cli.backend,
            script_dir,
            command_timeout: env.command_timeout,
            dry_run: cli.dry_run,
        })
    }
}
