use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{Job, JobId};

/// Storage for job snapshots shared between the runner and the HTTP handlers.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, JobStoreError>;
    /// Applies `apply` to the stored job while holding exclusive access.
    fn update(&self, id: &JobId, apply: &mut dyn FnMut(&mut Job)) -> Result<(), JobStoreError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, JobStoreError>;
    /// Drops finished jobs completed before `cutoff`, returning how many were removed.
    fn purge_finished_before(&self, cutoff: DateTime<Utc>) -> Result<usize, JobStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum JobStoreError {
    #[error("job already exists")]
    Conflict,
    #[error("job not found")]
    NotFound,
    #[error("job store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryJobRepository {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl InMemoryJobRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<JobId, Job>>, JobStoreError> {
        self.jobs
            .lock()
            .map_err(|_| JobStoreError::Unavailable("job store mutex poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobRepository for InMemoryJobRepository {
    fn insert(&self, job: Job) -> Result<Job, JobStoreError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&job.job_id) {
            return Err(JobStoreError::Conflict);
        }
        guard.insert(job.job_id.clone(), job.clone());
        Ok(job)
    }

    fn update(&self, id: &JobId, apply: &mut dyn FnMut(&mut Job)) -> Result<(), JobStoreError> {
        let mut guard = self.lock()?;
        let job = guard.get_mut(id).ok_or(JobStoreError::NotFound)?;
        apply(job);
        Ok(())
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, JobStoreError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn purge_finished_before(&self, cutoff: DateTime<Utc>) -> Result<usize, JobStoreError> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|_, job| match job.finished_at {
            Some(finished_at) if job.is_finished() => finished_at >= cutoff,
            _ => true,
        });
        Ok(before - guard.len())
    }
}
