//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Where jobs are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Submit through `sbatch` and poll with `squeue`.
    Slurm,
    /// Run each job under `bash -c` on this machine.
    Local,
}

/// Run ISM scoring over every fold/cross of a cross-validation model directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "ism-folds", version, about, long_about = None)]
pub struct Cli {
    /// Cross-validation model directory holding f<fold>_c<cross> instances.
    pub models_dir: PathBuf,

    // -- ISM options --------------------------------------------------------
    /// Length of 3' sequence to mutate.
    #[arg(short = 'l', help_heading = "ISM options")]
    pub mut_len: Option<u32>,

    /// Output directory for ISM, created under each instance.
    #[arg(short = 'o', default_value = "ism", help_heading = "ISM options")]
    pub out_dir: String,

    /// Dataset split label for the TFRecord pattern; `*` selects all splits.
    #[arg(long = "split", default_value = "test", help_heading = "ISM options")]
    pub split_label: String,

    // -- Cross-fold options -------------------------------------------------
    /// Index for dataset/head.
    #[arg(short = 'd', help_heading = "Cross-fold options")]
    pub data_head: Option<u32>,

    /// Data directory used for every job when all splits are selected.
    #[arg(long = "data", help_heading = "Cross-fold options")]
    pub data_dir: Option<PathBuf>,

    /// Conda environment holding the scoring tool.
    #[arg(short = 'e', default_value = "tf2.6-rna", help_heading = "Cross-fold options")]
    pub conda_env: String,

    /// Job name prefix.
    #[arg(long = "name", default_value = "ism", help_heading = "Cross-fold options")]
    pub name: String,

    /// Maximum concurrent processes.
    #[arg(long = "max_proc", help_heading = "Cross-fold options")]
    pub max_proc: Option<usize>,

    /// Number of processes passed by wrapper scripts; accepted and ignored.
    #[arg(short = 'p', hide = true)]
    pub processes: Option<u32>,

    /// Queue on which to run the jobs.
    #[arg(short = 'q', default_value = "gtx1080ti", help_heading = "Cross-fold options")]
    pub queue: String,

    /// Restart a partially completed run, skipping finished instances.
    #[arg(short = 'r', help_heading = "Cross-fold options")]
    pub restart: bool,

    /// Execution backend.
    #[arg(long, value_enum, default_value_t = BackendKind::Slurm)]
    pub backend: BackendKind,

    /// Print the job descriptors as JSON lines instead of submitting.
    #[arg(long)]
    pub dry_run: bool,
}
