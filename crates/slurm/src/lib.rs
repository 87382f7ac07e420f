//! Batch submission for ISM scoring jobs.
//!
//! [`MultiRunner`] implements [`ismfold_core::scheduler::JobScheduler`] over
//! a [`BatchBackend`]: [`SlurmBackend`] for clusters, [`LocalBackend`] for a
//! single machine.

pub mod backend;
pub mod error;
pub mod local;
pub mod runner;
pub mod sbatch;
pub mod script;

pub use backend::{BatchBackend, JobId};
pub use error::SlurmError;
pub use local::LocalBackend;
pub use runner::MultiRunner;
pub use sbatch::{SlurmBackend, SlurmConfig};
