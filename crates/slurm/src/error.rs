//! Errors raised while talking to a batch backend.

/// Error type for backend operations (sbatch, squeue, local processes).
#[derive(Debug, thiserror::Error)]
pub enum SlurmError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("{program} failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("unexpected {program} output: {output}")]
    UnexpectedOutput { program: String, output: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
