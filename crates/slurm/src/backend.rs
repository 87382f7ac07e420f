//! Backend abstraction driven by the multi-run loop.

use std::collections::HashSet;

use ismfold_core::job::JobDescriptor;

use crate::error::SlurmError;

/// Identifier a backend hands out for a launched job.
pub type JobId = String;

/// A place jobs can be launched and later checked on.
///
/// The multi-run loop owns concurrency and pacing; a backend only starts
/// single jobs and reports which of them are still active.
pub trait BatchBackend: Send + Sync {
    /// Start `job`, returning an identifier for later status checks.
    fn launch(
        &self,
        job: &JobDescriptor,
    ) -> impl std::future::Future<Output = Result<JobId, SlurmError>> + Send;

    /// The subset of `ids` that is still queued or running.
    fn active(
        &self,
        ids: &[JobId],
    ) -> impl std::future::Future<Output = Result<HashSet<JobId>, SlurmError>> + Send;
}
