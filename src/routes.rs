use axum::{
    error_handling::HandleErrorLayer, http::StatusCode, routing::get, BoxError, Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::history::handlers as history_handlers;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Whole-request budget; covers the upstream call plus the history write
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build the weather API routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather_handlers::get_weather))
        .route("/weather/{city}", get(weather_handlers::get_weather))
        .route("/theme/{condition}", get(weather_handlers::get_theme))
        .route("/cities", get(weather_handlers::get_cities))
}

/// Build the history API routes
fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(history_handlers::get_history))
        .route("/searches", get(history_handlers::get_searches))
}

/// Build all API v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(weather_routes())
        .merge(history_routes())
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

/// Build the complete application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check at root level
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .nest("/api/v1", api_v1_routes())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
