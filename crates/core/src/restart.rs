//! Restart filter: a fold/cross whose output directory already holds the
//! results file is treated as finished.

use std::path::{Path, PathBuf};

/// File the scoring tool writes last; its presence marks a finished job.
pub const RESULTS_FILE: &str = "scores.h5";

/// Location of the results file inside a job's output directory.
pub fn results_path(out_dir: &Path) -> PathBuf {
    out_dir.join(RESULTS_FILE)
}

/// Whether the job writing to `out_dir` has already produced its results.
pub fn is_complete(out_dir: &Path) -> bool {
    results_path(out_dir).is_file()
}
