//! Domain logic for fanning an ISM scoring pass out over a cross-validated
//! model directory.
//!
//! Everything here is synchronous and process-free: discovery reads the
//! filesystem, the builder produces [`job::JobDescriptor`]s, and submission
//! is delegated through the [`scheduler::JobScheduler`] trait.

pub mod builder;
pub mod discovery;
pub mod error;
pub mod job;
pub mod options;
pub mod restart;
pub mod scheduler;
pub mod types;
