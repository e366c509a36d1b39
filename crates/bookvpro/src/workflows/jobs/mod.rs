//! Background classification jobs polled over HTTP.

pub mod domain;
pub mod router;
pub mod runner;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{Job, JobId, JobStatus};
pub use router::job_router;
pub use runner::{normalize_titles, JobError, JobRunner};
pub use store::{InMemoryJobRepository, JobRepository, JobStoreError};
