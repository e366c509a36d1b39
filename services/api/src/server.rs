use crate::cli::ServeArgs;
use crate::infra::{build_catalog, build_classifier, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bookvpro::config::AppConfig;
use bookvpro::error::AppError;
use bookvpro::telemetry;
use bookvpro::workflows::jobs::{InMemoryJobRepository, JobRunner};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let classifier = Arc::new(build_classifier(&config)?);
    let catalog = build_catalog(&config)?;
    let runner = Arc::new(JobRunner::new(
        Arc::new(InMemoryJobRepository::default()),
        classifier,
        config.jobs.clone(),
    ));

    let app = with_service_routes(runner)
        .layer(Extension(app_state))
        .layer(Extension(catalog))
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        workers = config.jobs.workers,
        "book grading service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
