//! Per fold/cross job construction.
//!
//! Turns a [`JobConfig`] and a discovered [`FoldLayout`] into the list of
//! [`JobDescriptor`]s to submit, applying the restart filter on the way.

use std::path::PathBuf;

use crate::discovery::{self, FoldLayout, DATA_SUBDIR, PARAMS_FILE};
use crate::job::{with_suffix, JobDescriptor, Resources};
use crate::options::IsmOptions;
use crate::restart;
use crate::types::FoldCross;

/// Default conda profile script sourced before activating the environment.
pub const DEFAULT_CONDA_PROFILE: &str = "$HOME/anaconda3/etc/profile.d/conda.sh";

/// Default conda environment holding the scoring tool.
pub const DEFAULT_CONDA_ENV: &str = "tf2.6-rna";

/// Default scoring executable.
pub const DEFAULT_SCORING_TOOL: &str = "saluki_ism_tfr.py";

/// Where and how the scoring tool is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringEnv {
    /// Shell script sourced to make `conda activate` available.
    pub conda_profile: String,
    pub conda_env: String,
    pub scoring_tool: String,
}

impl Default for ScoringEnv {
    fn default() -> Self {
        Self {
            conda_profile: DEFAULT_CONDA_PROFILE.to_string(),
            conda_env: DEFAULT_CONDA_ENV.to_string(),
            scoring_tool: DEFAULT_SCORING_TOOL.to_string(),
        }
    }
}

/// Everything needed to build the job list. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub models_dir: PathBuf,
    pub data_head: Option<u32>,
    /// Data directory used by every job when all splits are selected.
    pub data_dir: Option<PathBuf>,
    pub ism: IsmOptions,
    pub env: ScoringEnv,
    /// Prefix for job names; the fold/cross is appended.
    pub name_prefix: String,
    pub queue: String,
    /// Skip pairs whose results already exist.
    pub restart: bool,
    pub resources: Resources,
}

impl JobConfig {
    /// Command prefix shared by every job: environment activation followed
    /// by the scoring tool and the parameters file.
    pub fn base_command(&self) -> String {
        format!(
            ". {profile}; conda activate {env}; {tool} {params}",
            profile = self.env.conda_profile,
            env = self.env.conda_env,
            tool = self.env.scoring_tool,
            params = self.models_dir.join(PARAMS_FILE).display(),
        )
    }

    /// Output directory of one fold/cross.
    pub fn out_dir(&self, fc: FoldCross) -> PathBuf {
        self.models_dir.join(fc.to_string()).join(&self.ism.out_dir)
    }

    /// Input data directory of one fold/cross.
    pub fn data_dir_for(&self, fc: FoldCross) -> PathBuf {
        match (&self.data_dir, self.ism.selects_all_splits()) {
            (Some(dir), true) => dir.clone(),
            _ => self.models_dir.join(fc.to_string()).join(DATA_SUBDIR),
        }
    }

    /// Full shell command scoring one fold/cross.
    pub fn command_for(&self, fc: FoldCross) -> String {
        let out_dir = self.out_dir(fc);
        format!(
            "{base} {model} {data}{args}",
            base = self.base_command(),
            model = discovery::model_path(&self.models_dir, fc, self.data_head).display(),
            data = self.data_dir_for(fc).display(),
            args = self.ism.to_args(&out_dir.to_string_lossy()),
        )
    }

    /// Descriptor for one fold/cross, regardless of restart state.
    pub fn job_for(&self, fc: FoldCross) -> JobDescriptor {
        let out_dir = self.out_dir(fc);
        JobDescriptor::new(
            self.command_for(fc),
            format!("{}_{fc}", self.name_prefix),
            with_suffix(&out_dir, ".out"),
            with_suffix(&out_dir, ".err"),
            self.queue.clone(),
            self.resources.clone(),
        )
    }
}

/// Build one descriptor per fold/cross in `layout`, fold-major.
///
/// In restart mode, pairs whose output directory already holds the results
/// file produce no descriptor.
pub fn build_jobs(config: &JobConfig, layout: FoldLayout) -> Vec<JobDescriptor> {
    if config.ism.selects_all_splits() && config.data_dir.is_none() {
        tracing::warn!("All splits selected without a data directory; using per-instance data");
    }

    let mut jobs = Vec::with_capacity(layout.len());
    for fc in layout.pairs() {
        if config.restart && restart::is_complete(&config.out_dir(fc)) {
            tracing::info!(instance = %fc, "Results present, skipping");
            continue;
        }
        jobs.push(config.job_for(fc));
    }
    jobs
}
