use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::JobId;
use super::runner::{JobError, JobRunner};
use super::store::JobRepository;
use crate::error::AppError;
use crate::export::{render_results_page, spreadsheet_response, SpreadsheetFormat};
use crate::workflows::grading::ClassificationRecord;

#[derive(Debug, Default, Deserialize)]
pub struct KeywordsRequest {
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Form body posted by the plain HTML textarea.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub keywords: String,
}

/// `?format=xlsx|csv`; the workbook when omitted.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: SpreadsheetFormat,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub results: Vec<ClassificationRecord>,
}

/// Router exposing job submission, polling, synchronous checks and export.
pub fn job_router<R>(runner: Arc<JobRunner<R>>) -> Router
where
    R: JobRepository + 'static,
{
    Router::new()
        .route("/start", post(start_handler::<R>))
        .route("/status/{job_id}", get(status_handler::<R>))
        .route("/download/{job_id}", get(job_download_handler::<R>))
        .route("/check", post(check_handler::<R>))
        .route("/analyze", post(analyze_handler::<R>))
        .route("/download", post(download_handler))
        .with_state(runner)
}

pub(crate) async fn start_handler<R>(
    State(runner): State<Arc<JobRunner<R>>>,
    Json(request): Json<KeywordsRequest>,
) -> Response
where
    R: JobRepository + 'static,
{
    match runner.start(&request.keywords) {
        Ok(job) => (
            StatusCode::ACCEPTED,
            Json(json!({ "job_id": job.job_id, "total": job.total })),
        )
            .into_response(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn status_handler<R>(
    State(runner): State<Arc<JobRunner<R>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: JobRepository + 'static,
{
    match runner.status(&JobId(job_id)) {
        Ok(Some(job)) => (StatusCode::OK, Json(job)).into_response(),
        Ok(None) => not_found(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn job_download_handler<R>(
    State(runner): State<Arc<JobRunner<R>>>,
    Path(job_id): Path<String>,
    Query(export): Query<ExportQuery>,
) -> Response
where
    R: JobRepository + 'static,
{
    match runner.status(&JobId(job_id)) {
        Ok(Some(job)) => spreadsheet_response(&job.results, export.format).into_response(),
        Ok(None) => not_found(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn check_handler<R>(
    State(runner): State<Arc<JobRunner<R>>>,
    Json(request): Json<KeywordsRequest>,
) -> Response
where
    R: JobRepository + 'static,
{
    match runner.classify_now(&request.keywords).await {
        Ok(results) => (StatusCode::OK, Json(json!({ "results": results }))).into_response(),
        Err(err) => job_error_response(err),
    }
}

pub(crate) async fn analyze_handler<R>(
    State(runner): State<Arc<JobRunner<R>>>,
    Form(form): Form<AnalyzeForm>,
) -> Response
where
    R: JobRepository + 'static,
{
    let lines: Vec<&str> = form.keywords.lines().collect();
    match runner.classify_now(&lines).await {
        Ok(results) => Html(render_results_page(&results)).into_response(),
        Err(err) => {
            let status = job_error_status(&err);
            let message = html_escape::encode_text(&err.to_string()).into_owned();
            (status, Html(format!("<p>{message}</p>"))).into_response()
        }
    }
}

pub(crate) async fn download_handler(
    Query(export): Query<ExportQuery>,
    Json(request): Json<DownloadRequest>,
) -> Result<Response, AppError> {
    spreadsheet_response(&request.results, export.format)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
}

fn job_error_status(err: &JobError) -> StatusCode {
    match err {
        JobError::TooManyTitles { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        JobError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn job_error_response(err: JobError) -> Response {
    let status = job_error_status(&err);
    if status.is_server_error() {
        error!(error = %err, "job request failed");
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
