use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, warn};

use super::domain::{ClassificationRecord, SearchSignal};
use super::extract::{extract_seller_count, has_representative_card};
use super::policy::GradePolicy;
use crate::integrations::{KeywordVolumeSource, ResultPageSource};

/// Looks a title up and grades it. Lookups never surface errors: a failed
/// result page yields [`ClassificationRecord::fallback`], a failed volume
/// lookup only drops the volume.
pub struct BookClassifier {
    pages: Arc<dyn ResultPageSource>,
    volumes: Option<Arc<dyn KeywordVolumeSource>>,
    policy: GradePolicy,
}

impl std::fmt::Debug for BookClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookClassifier")
            .field("policy", &self.policy)
            .field("volume_lookups", &self.volumes.is_some())
            .finish_non_exhaustive()
    }
}

impl BookClassifier {
    pub fn new(pages: Arc<dyn ResultPageSource>, policy: GradePolicy) -> Self {
        Self {
            pages,
            volumes: None,
            policy,
        }
    }

    pub fn with_volume_source(mut self, volumes: Arc<dyn KeywordVolumeSource>) -> Self {
        self.volumes = Some(volumes);
        self
    }

    pub async fn classify(&self, title: &str) -> ClassificationRecord {
        let page = match self.pages.fetch_result_page(title).await {
            Ok(page) => page,
            Err(err) => {
                warn!(%title, error = %err, "result page lookup failed, grading B");
                metrics::counter!("bookvpro_lookup_failures_total", "source" => "result_page")
                    .increment(1);
                return ClassificationRecord::fallback(title);
            }
        };

        let signal = SearchSignal {
            seller_count: extract_seller_count(&page),
            has_card: has_representative_card(&page),
            search_volume: self.lookup_volume(title).await,
        };
        let grade = self.policy.grade(&signal);
        debug!(%title, ?signal, %grade, "title graded");
        metrics::counter!("bookvpro_titles_classified_total", "grade" => grade.label())
            .increment(1);

        ClassificationRecord {
            title: title.to_string(),
            search_volume: signal.search_volume.unwrap_or(0),
            seller_count: signal.seller_count,
            has_card: signal.has_card,
            grade,
            link: self.pages.result_link(title),
        }
    }

    async fn lookup_volume(&self, title: &str) -> Option<u64> {
        let volumes = self.volumes.as_ref()?;
        match volumes.monthly_volume(title).await {
            Ok(volume) => volume,
            Err(err) => {
                warn!(%title, error = %err, "keyword volume lookup failed");
                metrics::counter!("bookvpro_lookup_failures_total", "source" => "keyword_volume")
                    .increment(1);
                None
            }
        }
    }

    /// Classifies titles with at most `workers` lookups in flight, each worker
    /// pausing for `pacing` after a lookup. Records come out in input order.
    pub fn classify_stream(
        &self,
        titles: Vec<String>,
        workers: usize,
        pacing: Duration,
    ) -> impl Stream<Item = ClassificationRecord> + '_ {
        stream::iter(titles)
            .map(move |title| async move {
                let record = self.classify(&title).await;
                if !pacing.is_zero() {
                    tokio::time::sleep(pacing).await;
                }
                record
            })
            .buffered(workers.max(1))
    }

    pub async fn classify_all(
        &self,
        titles: Vec<String>,
        workers: usize,
        pacing: Duration,
    ) -> Vec<ClassificationRecord> {
        self.classify_stream(titles, workers, pacing).collect().await
    }
}
