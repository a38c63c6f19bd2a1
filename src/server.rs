//! HTTP layer: routing, request handlers, and response shaping
//!
//! The two API routes validate first and only then touch a browser, so every
//! 400 is produced without Chrome ever starting. Render work runs on a
//! detached task that the handler awaits: a client hanging up early cannot
//! cancel an in-flight capture halfway and leak its browser.

use crate::{
    archive::{self, ArchiveEntry},
    batch,
    validate::{self, BatchQuery, ScreenshotQuery},
    ApiError, CaptureError, Config, FallbackStrategy, Metrics, Renderer,
};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
};
use tracing::info;

/// Shared handler state: configuration plus metric handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub metrics: Arc<Metrics>,
}

/// Build the service router from explicit configuration.
pub fn build_router(config: Arc<Config>, metrics: Arc<Metrics>) -> Router {
    let state = AppState {
        config: Arc::clone(&config),
        metrics,
    };

    let router = Router::new()
        .route("/screenshot", get(screenshot))
        .route("/batch-screenshot", get(batch_screenshot));

    let router = match &config.fallback {
        FallbackStrategy::NotFound => router.fallback(not_found),
        FallbackStrategy::StaticDir { dir } => {
            let index = dir.join("index.html");
            router.fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(index)))
        }
    };

    router
        .layer(ConcurrencyLimitLayer::new(config.max_concurrent_requests))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(build_cors_layer(&config.allowed_origins))
        .with_state(state)
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn screenshot(
    State(state): State<AppState>,
    Query(query): Query<ScreenshotQuery>,
) -> Result<Response, ApiError> {
    let request =
        validate::parse_screenshot_query(&query, &state.config.viewport).map_err(|e| {
            state.metrics.record_validation_failure();
            e
        })?;

    info!("Taking screenshot of {}", request.url);
    let started = Instant::now();

    let renderer = Renderer::new((*state.config).clone());
    let outcome = tokio::spawn(async move { renderer.capture(&request).await })
        .await
        .map_err(|e| ApiError::Render(CaptureError::TaskFailed(e.to_string())))?;

    state
        .metrics
        .record_screenshot(started.elapsed(), outcome.is_ok());
    let data = outcome.map_err(ApiError::Render)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (
                header::CONTENT_DISPOSITION,
                "inline; filename=\"screenshot.png\"",
            ),
            (header::CACHE_CONTROL, "no-store"),
        ],
        data,
    )
        .into_response())
}

async fn batch_screenshot(
    State(state): State<AppState>,
    Query(query): Query<BatchQuery>,
) -> Result<Response, ApiError> {
    let request = validate::parse_batch_query(&query).map_err(|e| {
        state.metrics.record_validation_failure();
        e
    })?;

    info!("Taking batch screenshots of {} urls", request.urls.len());
    let started = Instant::now();

    let config = Arc::clone(&state.config);
    let outcome = tokio::spawn(async move {
        let results = batch::capture_all(&config, &request.urls).await?;

        let entries: Vec<ArchiveEntry> = results
            .into_iter()
            .map(|result| ArchiveEntry {
                name: archive::entry_name(result.index, &result.url),
                data: result.data,
            })
            .collect();

        archive::pack(&entries)
    })
    .await
    .map_err(|e| ApiError::BatchRender(CaptureError::TaskFailed(e.to_string())))?;

    state
        .metrics
        .record_batch(started.elapsed(), outcome.is_ok());
    let data = outcome.map_err(ApiError::BatchRender)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"screenshots.zip\"",
            ),
            (header::CACHE_CONTROL, "no-store"),
        ],
        data,
    )
        .into_response())
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
