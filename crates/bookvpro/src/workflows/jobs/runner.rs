use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::StreamExt;
use tracing::{debug, error, info};

use super::domain::{Job, JobId, JobStatus};
use super::store::{JobRepository, JobStoreError};
use crate::config::JobConfig;
use crate::workflows::grading::{BookClassifier, ClassificationRecord};

/// Accepts title lists, runs them through the classifier in the background and
/// keeps the job snapshots current for polling.
pub struct JobRunner<R> {
    repository: Arc<R>,
    classifier: Arc<BookClassifier>,
    config: JobConfig,
}

impl<R> JobRunner<R>
where
    R: JobRepository + 'static,
{
    pub fn new(repository: Arc<R>, classifier: Arc<BookClassifier>, config: JobConfig) -> Self {
        Self {
            repository,
            classifier,
            config,
        }
    }

    /// Queue a job and spawn its worker on the current tokio runtime.
    pub fn start<S: AsRef<str>>(&self, keywords: &[S]) -> Result<Job, JobError> {
        let titles = self.accept(keywords)?;
        let now = Utc::now();

        let purged = self
            .repository
            .purge_finished_before(now - self.config.retention)?;
        if purged > 0 {
            debug!(purged, "dropped expired jobs");
        }

        let job = self
            .repository
            .insert(Job::queued(JobId::generate(), titles.len(), now))?;
        info!(
            job_id = %job.job_id,
            status = %job.status,
            titles = titles.len(),
            "classification job queued"
        );

        tokio::spawn(process(
            self.repository.clone(),
            self.classifier.clone(),
            job.job_id.clone(),
            titles,
            self.config.workers,
            self.config.request_delay,
        ));

        Ok(job)
    }

    pub fn status(&self, id: &JobId) -> Result<Option<Job>, JobError> {
        Ok(self.repository.fetch(id)?)
    }

    /// Classify synchronously, for callers that wait on the response.
    pub async fn classify_now<S: AsRef<str>>(
        &self,
        keywords: &[S],
    ) -> Result<Vec<ClassificationRecord>, JobError> {
        let titles = self.accept(keywords)?;
        Ok(self
            .classifier
            .classify_all(titles, self.config.workers, self.config.request_delay)
            .await)
    }

    fn accept<S: AsRef<str>>(&self, keywords: &[S]) -> Result<Vec<String>, JobError> {
        let titles = normalize_titles(keywords);
        if titles.len() > self.config.max_titles {
            return Err(JobError::TooManyTitles {
                count: titles.len(),
                max: self.config.max_titles,
            });
        }
        Ok(titles)
    }
}

/// Trims each line and drops blanks. Duplicates are kept.
pub fn normalize_titles<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|line| line.as_ref().trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

async fn process<R: JobRepository>(
    repository: Arc<R>,
    classifier: Arc<BookClassifier>,
    job_id: JobId,
    titles: Vec<String>,
    workers: usize,
    pacing: Duration,
) {
    if let Err(err) = repository.update(&job_id, &mut |job| job.start()) {
        error!(%job_id, error = %err, "unable to start job");
        return;
    }
    debug!(%job_id, status = JobStatus::Running.label(), "classification job picked up");

    let stream = classifier.classify_stream(titles, workers, pacing);
    futures::pin_mut!(stream);
    while let Some(record) = stream.next().await {
        let mut pending = Some(record);
        let outcome = repository.update(&job_id, &mut |job| {
            if let Some(record) = pending.take() {
                job.record(record);
            }
        });
        if let Err(err) = outcome {
            error!(%job_id, error = %err, "job disappeared while running");
            return;
        }
    }

    let now = Utc::now();
    match repository.update(&job_id, &mut |job| job.complete(now)) {
        Ok(()) => info!(%job_id, status = JobStatus::Completed.label(), "classification job finished"),
        Err(err) => error!(%job_id, error = %err, "unable to complete job"),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("too many titles: {count} submitted, limit is {max}")]
    TooManyTitles { count: usize, max: usize },
    #[error(transparent)]
    Store(#[from] JobStoreError),
}
