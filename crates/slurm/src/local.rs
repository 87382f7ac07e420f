//! Local backend: runs each job's command under `bash -c` on this machine.
//!
//! Useful on workstations without a cluster. The job's queue and resource
//! requests are ignored; stdout/stderr go to the descriptor's log files.

use std::collections::{HashMap, HashSet};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};

use ismfold_core::job::JobDescriptor;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::backend::{BatchBackend, JobId};
use crate::error::SlurmError;

/// Backend spawning one local shell per job.
#[derive(Debug, Default)]
pub struct LocalBackend {
    children: Mutex<HashMap<JobId, Child>>,
    next_id: AtomicU64,
}

impl LocalBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

async fn open_log(path: &std::path::Path) -> Result<std::fs::File, SlurmError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let file = tokio::fs::File::create(path).await?;
    Ok(file.into_std().await)
}

impl BatchBackend for LocalBackend {
    async fn launch(&self, job: &JobDescriptor) -> Result<JobId, SlurmError> {
        let stdout = open_log(job.stdout()).await?;
        let stderr = open_log(job.stderr()).await?;

        let child = Command::new("bash")
            .arg("-c")
            .arg(job.command())
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|source| SlurmError::Spawn {
                program: "bash".to_string(),
                source,
            })?;

        let id = format!("local-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(job_id = %id, pid = ?child.id(), name = job.name(), "Spawned local job");
        self.children.lock().await.insert(id.clone(), child);
        Ok(id)
    }

    async fn active(&self, ids: &[JobId]) -> Result<HashSet<JobId>, SlurmError> {
        let mut children = self.children.lock().await;
        let mut still_running = HashSet::new();

        for id in ids {
            let Some(child) = children.get_mut(id) else {
                continue;
            };
            match child.try_wait()? {
                None => {
                    still_running.insert(id.clone());
                }
                Some(status) => {
                    tracing::debug!(job_id = %id, exit_code = ?status.code(), "Local job exited");
                    children.remove(id);
                }
            }
        }

        Ok(still_running)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ismfold_core::job::Resources;

    use super::*;

    fn job(dir: &std::path::Path, name: &str, command: &str) -> JobDescriptor {
        JobDescriptor::new(
            command.into(),
            name.into(),
            dir.join(format!("{name}.out")),
            dir.join(format!("{name}.err")),
            "local".into(),
            Resources::default(),
        )
    }

    async fn wait_until_inactive(backend: &LocalBackend, id: &JobId) {
        for _ in 0..100 {
            let active = backend.active(std::slice::from_ref(id)).await.expect("active");
            if !active.contains(id) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("job {id} did not finish");
    }

    #[tokio::test]
    async fn writes_stdout_and_stderr_logs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = LocalBackend::new();
        let j = job(dir.path(), "echo", "echo out; echo err >&2");

        let id = backend.launch(&j).await.expect("launch");
        wait_until_inactive(&backend, &id).await;

        let out = std::fs::read_to_string(j.stdout()).expect("read stdout");
        let err = std::fs::read_to_string(j.stderr()).expect("read stderr");
        assert_eq!(out.trim(), "out");
        assert_eq!(err.trim(), "err");
    }

    #[tokio::test]
    async fn creates_missing_log_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = LocalBackend::new();
        let j = job(&dir.path().join("f0_c0"), "nested", "true");

        let id = backend.launch(&j).await.expect("launch");
        wait_until_inactive(&backend, &id).await;
        assert!(j.stdout().is_file());
    }

    #[tokio::test]
    async fn long_running_job_stays_active() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = LocalBackend::new();
        let id = backend
            .launch(&job(dir.path(), "sleepy", "sleep 5"))
            .await
            .expect("launch");

        let active = backend.active(std::slice::from_ref(&id)).await.expect("active");
        assert!(active.contains(&id));

        // Clean up the child rather than leaving it to finish on its own.
        let mut children = backend.children.lock().await;
        if let Some(child) = children.get_mut(&id) {
            let _ = child.kill().await;
        }
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = LocalBackend::new();
        let a = backend.launch(&job(dir.path(), "a", "true")).await.expect("launch");
        let b = backend.launch(&job(dir.path(), "b", "true")).await.expect("launch");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_active() {
        let backend = LocalBackend::new();
        let active = backend
            .active(&["local-99".to_string()])
            .await
            .expect("active");
        assert!(active.is_empty());
    }
}
