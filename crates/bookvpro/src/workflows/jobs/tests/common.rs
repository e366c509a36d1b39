use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::JobConfig;
use crate::integrations::{ResultPageSource, SearchError};
use crate::workflows::grading::{BookClassifier, GradePolicy};
use crate::workflows::jobs::{InMemoryJobRepository, Job, JobId, JobRunner, JobStatus};

pub(super) struct FixturePages {
    pages: HashMap<String, String>,
}

#[async_trait]
impl ResultPageSource for FixturePages {
    async fn fetch_result_page(&self, title: &str) -> Result<String, SearchError> {
        self.pages
            .get(title)
            .cloned()
            .ok_or(SearchError::Status { status: 500 })
    }

    fn result_link(&self, title: &str) -> String {
        format!("https://books.test/{title}")
    }
}

pub(super) fn fixture_pages() -> FixturePages {
    FixturePages {
        pages: HashMap::from([
            ("코스모스".to_string(), "<div>도서 판매처 27</div>".to_string()),
            ("무명의 시집".to_string(), "<div>검색결과 없음</div>".to_string()),
            (
                "사피엔스".to_string(),
                "<div class=\"cm_book_card\">판매처 0</div>".to_string(),
            ),
        ]),
    }
}

pub(super) fn job_config() -> JobConfig {
    JobConfig {
        workers: 2,
        request_delay: Duration::ZERO,
        request_timeout: Duration::from_secs(1),
        max_titles: 5,
        retention: chrono::Duration::minutes(60),
    }
}

pub(super) fn build_runner() -> (Arc<JobRunner<InMemoryJobRepository>>, InMemoryJobRepository) {
    let repository = InMemoryJobRepository::default();
    let classifier = Arc::new(BookClassifier::new(
        Arc::new(fixture_pages()),
        GradePolicy::default(),
    ));
    let runner = Arc::new(JobRunner::new(
        Arc::new(repository.clone()),
        classifier,
        job_config(),
    ));
    (runner, repository)
}

pub(super) async fn wait_for_completion(
    runner: &JobRunner<InMemoryJobRepository>,
    job_id: &JobId,
) -> Job {
    for _ in 0..200 {
        let job = runner
            .status(job_id)
            .expect("store available")
            .expect("job exists");
        if job.status == JobStatus::Completed {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not complete");
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json body")
}
