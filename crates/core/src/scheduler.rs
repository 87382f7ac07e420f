//! Submission seam between job building and the batch facility.
//!
//! Defines [`JobScheduler`], implemented by the backends in the slurm crate,
//! along with [`SubmitPolicy`], [`SubmitSummary`], and [`SchedulerError`].

use std::time::Duration;

use serde::Serialize;

use crate::error::CoreError;
use crate::job::JobDescriptor;

/// Pause between consecutive launches.
pub const DEFAULT_LAUNCH_STAGGER: Duration = Duration::from_secs(10);

/// Interval between status polls of launched jobs.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Concurrency and pacing for one batch submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPolicy {
    /// Maximum jobs active at once; `None` launches everything up front.
    max_concurrency: Option<usize>,
    pub launch_stagger: Duration,
    pub poll_interval: Duration,
}

impl SubmitPolicy {
    /// Build a policy, rejecting a concurrency cap of zero (nothing could
    /// ever launch) and a zero poll interval.
    pub fn new(
        max_concurrency: Option<usize>,
        launch_stagger: Duration,
        poll_interval: Duration,
    ) -> Result<Self, CoreError> {
        if max_concurrency == Some(0) {
            return Err(CoreError::Validation(
                "Maximum concurrent processes must be at least 1".to_string(),
            ));
        }
        if poll_interval.is_zero() {
            return Err(CoreError::Validation(
                "Status poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            max_concurrency,
            launch_stagger,
            poll_interval,
        })
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Whether another job may start while `active` are running.
    pub fn has_capacity(&self, active: usize) -> bool {
        self.max_concurrency.map_or(true, |max| active < max)
    }
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            launch_stagger: DEFAULT_LAUNCH_STAGGER,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Outcome of a batch submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmitSummary {
    /// Jobs accepted by the backend.
    pub launched: usize,
    /// Jobs the backend refused or failed to start.
    pub failed_to_launch: usize,
    /// Launched jobs observed to have left the active set.
    pub finished: usize,
}

/// Errors that abort a batch submission.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The backend could not report which jobs are still active.
    #[error("Status poll failed: {0}")]
    Poll(String),
}

/// A batch facility that launches jobs, bounds concurrency, and blocks
/// until every launched job has finished.
///
/// Retries and completion detection belong to the implementation; callers
/// only see the final [`SubmitSummary`].
pub trait JobScheduler: Send + Sync {
    /// Run `jobs` under `policy`, returning once none remain active.
    fn submit(
        &self,
        jobs: Vec<JobDescriptor>,
        policy: SubmitPolicy,
    ) -> impl std::future::Future<Output = Result<SubmitSummary, SchedulerError>> + Send;
}
