//! Route configuration and setup

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use vidbox_core::Config;

use crate::handlers;
use crate::state::AppState;

// Slack on top of the video size cap for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let config = state.config.clone();
    let body_limit = config.max_video_size_bytes + MULTIPART_OVERHEAD_BYTES;

    let mut app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/register", post(handlers::auth::register))
        .route("/api/login", post(handlers::auth::login))
        .route("/api/logout", post(handlers::auth::logout))
        .route(
            "/api/videos",
            get(handlers::video_get::list_videos).post(handlers::video_upload::upload_video),
        )
        .route(
            "/api/videos/{id}",
            get(handlers::video_get::get_video)
                .patch(handlers::video_edit::edit_video)
                .delete(handlers::video_delete::delete_video),
        )
        .route(
            "/api/videos/{id}/stream",
            get(handlers::video_stream::stream_video),
        )
        .route(
            "/api/videos/{id}/download",
            get(handlers::video_stream::download_video),
        )
        .route("/api/account", delete(handlers::account::delete_account))
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit));

    if !config.cors_origins.is_empty() {
        app = app.layer(setup_cors(&config)?);
    }

    Ok(app.with_state(state))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}
