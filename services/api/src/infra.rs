use bookvpro::config::AppConfig;
use bookvpro::error::AppError;
use bookvpro::integrations::naver::{
    build_http_client, NaverSearchScraper, OpenBookSearchClient, SearchAdClient,
};
use bookvpro::integrations::BookCatalog;
use bookvpro::workflows::grading::BookClassifier;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Optional open-search backend for the `/search` proxy.
#[derive(Clone, Default)]
pub(crate) struct CatalogState {
    pub(crate) catalog: Option<Arc<dyn BookCatalog>>,
}

/// Scraper plus, when credentials are configured, keyword volume lookups.
pub(crate) fn build_classifier(config: &AppConfig) -> Result<BookClassifier, AppError> {
    let http = build_http_client(config.jobs.request_timeout)?;
    let scraper = NaverSearchScraper::new(http.clone(), config.naver.search_base_url.clone());
    let classifier = BookClassifier::new(Arc::new(scraper), config.grading);

    match &config.naver.search_ad {
        Some(credentials) => {
            info!("keyword volume lookups enabled");
            Ok(classifier.with_volume_source(Arc::new(SearchAdClient::new(
                http,
                credentials.clone(),
            ))))
        }
        None => {
            info!("keyword volume lookups disabled: search ad credentials not set");
            Ok(classifier)
        }
    }
}

pub(crate) fn build_catalog(config: &AppConfig) -> Result<CatalogState, AppError> {
    let Some(credentials) = &config.naver.open_api else {
        return Ok(CatalogState::default());
    };

    let http = build_http_client(config.jobs.request_timeout)?;
    Ok(CatalogState {
        catalog: Some(Arc::new(OpenBookSearchClient::new(http, credentials.clone()))),
    })
}
