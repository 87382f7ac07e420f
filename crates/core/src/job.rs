//! Job descriptors handed to the submission facility.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// GPUs requested per scoring job.
pub const DEFAULT_GPUS: u32 = 1;

/// Memory requested per scoring job, in megabytes.
pub const DEFAULT_MEM_MB: u64 = 30_000;

/// Wall-clock limit per scoring job, in SLURM `days-hours:minutes:seconds` form.
pub const DEFAULT_TIME_LIMIT: &str = "2-0:0:0";

/// Resources requested from the scheduler for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resources {
    pub gpus: u32,
    pub mem_mb: u64,
    pub time_limit: String,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            gpus: DEFAULT_GPUS,
            mem_mb: DEFAULT_MEM_MB,
            time_limit: DEFAULT_TIME_LIMIT.to_string(),
        }
    }
}

/// One unit of work for the scheduler. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDescriptor {
    command: String,
    name: String,
    stdout: PathBuf,
    stderr: PathBuf,
    queue: String,
    resources: Resources,
}

impl JobDescriptor {
    pub fn new(
        command: String,
        name: String,
        stdout: PathBuf,
        stderr: PathBuf,
        queue: String,
        resources: Resources,
    ) -> Self {
        Self {
            command,
            name,
            stdout,
            stderr,
            queue,
            resources,
        }
    }

    /// Shell command line run by the job.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stdout(&self) -> &Path {
        &self.stdout
    }

    pub fn stderr(&self) -> &Path {
        &self.stderr
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }
}

/// `path` with `suffix` appended to its final component, e.g. `ism` -> `ism.out`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resources() {
        let r = Resources::default();
        assert_eq!(r.gpus, 1);
        assert_eq!(r.mem_mb, 30_000);
        assert_eq!(r.time_limit, "2-0:0:0");
    }

    #[test]
    fn suffix_is_appended_not_replaced() {
        assert_eq!(
            with_suffix(Path::new("/m/f0_c0/ism.v2"), ".out"),
            PathBuf::from("/m/f0_c0/ism.v2.out")
        );
    }

    #[test]
    fn descriptor_serializes_all_fields() {
        let job = JobDescriptor::new(
            "echo hi".into(),
            "ism_f0_c0".into(),
            "/o/ism.out".into(),
            "/o/ism.err".into(),
            "gtx1080ti".into(),
            Resources::default(),
        );
        let json = serde_json::to_value(&job).expect("serialize");
        assert_eq!(json["command"], "echo hi");
        assert_eq!(json["name"], "ism_f0_c0");
        assert_eq!(json["stdout"], "/o/ism.out");
        assert_eq!(json["stderr"], "/o/ism.err");
        assert_eq!(json["queue"], "gtx1080ti");
        assert_eq!(json["resources"]["gpus"], 1);
        assert_eq!(json["resources"]["mem_mb"], 30000);
        assert_eq!(json["resources"]["time_limit"], "2-0:0:0");
    }
}
