//! The multi-run loop: launch under a concurrency cap, poll until done.

use std::collections::VecDeque;

use ismfold_core::job::JobDescriptor;
use ismfold_core::scheduler::{JobScheduler, SchedulerError, SubmitPolicy, SubmitSummary};

use crate::backend::{BatchBackend, JobId};

/// Consecutive failed status polls tolerated before giving up on a batch.
pub const MAX_CONSECUTIVE_POLL_FAILURES: u32 = 5;

/// A launched job the loop is still waiting on.
struct ActiveJob {
    id: JobId,
    name: String,
}

/// [`JobScheduler`] that drives any [`BatchBackend`].
///
/// Jobs launch in order while fewer than `max_concurrency` are active, with
/// `launch_stagger` between launches. Every `poll_interval` the backend is
/// asked which jobs remain; the rest are retired. A job that fails to launch
/// is logged and counted, never retried.
#[derive(Debug)]
pub struct MultiRunner<B> {
    backend: B,
}

impl<B: BatchBackend> MultiRunner<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Launch pending jobs until the cap is reached or nothing is left.
    async fn launch_ready(
        &self,
        pending: &mut VecDeque<JobDescriptor>,
        active: &mut Vec<ActiveJob>,
        policy: &SubmitPolicy,
        summary: &mut SubmitSummary,
    ) {
        while policy.has_capacity(active.len()) {
            let Some(job) = pending.pop_front() else {
                break;
            };

            match self.backend.launch(&job).await {
                Ok(id) => {
                    tracing::info!(job_id = %id, name = job.name(), "Launched job");
                    active.push(ActiveJob {
                        id,
                        name: job.name().to_string(),
                    });
                    summary.launched += 1;
                }
                Err(e) => {
                    tracing::error!(name = job.name(), error = %e, "Job launch failed");
                    summary.failed_to_launch += 1;
                    continue;
                }
            }

            if !pending.is_empty() && !policy.launch_stagger.is_zero() {
                tokio::time::sleep(policy.launch_stagger).await;
            }
        }
    }
}

impl<B: BatchBackend> JobScheduler for MultiRunner<B> {
    async fn submit(
        &self,
        jobs: Vec<JobDescriptor>,
        policy: SubmitPolicy,
    ) -> Result<SubmitSummary, SchedulerError> {
        let total = jobs.len();
        let mut pending: VecDeque<JobDescriptor> = jobs.into();
        let mut active: Vec<ActiveJob> = Vec::new();
        let mut summary = SubmitSummary::default();
        let mut poll_failures = 0u32;

        tracing::info!(
            total,
            max_concurrency = ?policy.max_concurrency(),
            "Submitting batch"
        );

        loop {
            self.launch_ready(&mut pending, &mut active, &policy, &mut summary)
                .await;

            if pending.is_empty() && active.is_empty() {
                break;
            }

            tokio::time::sleep(policy.poll_interval).await;

            let ids: Vec<JobId> = active.iter().map(|j| j.id.clone()).collect();
            let still_active = match self.backend.active(&ids).await {
                Ok(set) => {
                    poll_failures = 0;
                    set
                }
                Err(e) => {
                    poll_failures += 1;
                    tracing::warn!(attempt = poll_failures, error = %e, "Status poll failed");
                    if poll_failures >= MAX_CONSECUTIVE_POLL_FAILURES {
                        return Err(SchedulerError::Poll(e.to_string()));
                    }
                    continue;
                }
            };

            active.retain(|job| {
                let running = still_active.contains(&job.id);
                if !running {
                    tracing::info!(job_id = %job.id, name = %job.name, "Job finished");
                    summary.finished += 1;
                }
                running
            });

            tracing::debug!(
                pending = pending.len(),
                active = active.len(),
                finished = summary.finished,
                "Batch progress"
            );
        }

        tracing::info!(
            launched = summary.launched,
            failed_to_launch = summary.failed_to_launch,
            finished = summary.finished,
            "Batch complete"
        );
        Ok(summary)
    }
}
