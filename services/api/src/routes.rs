use crate::infra::{AppState, CatalogState};
use crate::ui::INDEX_HTML;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use bookvpro::workflows::jobs::{job_router, JobRepository, JobRunner};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

const DEFAULT_SEARCH_DISPLAY: u8 = 5;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    pub(crate) keyword: Option<String>,
    #[serde(default)]
    pub(crate) display: Option<u8>,
}

pub(crate) fn with_service_routes<R>(runner: Arc<JobRunner<R>>) -> Router
where
    R: JobRepository + 'static,
{
    job_router(runner)
        .route("/", get(index))
        .route("/search", get(search_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn search_endpoint(
    Extension(state): Extension<CatalogState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(keyword) = params
        .keyword
        .map(|keyword| keyword.trim().to_string())
        .filter(|keyword| !keyword.is_empty())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "keyword required" })),
        )
            .into_response();
    };

    let Some(catalog) = state.catalog else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "open search API is not configured" })),
        )
            .into_response();
    };

    let display = params.display.unwrap_or(DEFAULT_SEARCH_DISPLAY);
    match catalog.search_books(&keyword, display).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => {
            warn!(%keyword, error = %err, "open search lookup failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "search failed" })),
            )
                .into_response()
        }
    }
}
