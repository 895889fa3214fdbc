//! Contains all the routes that this application can handle.

mod api;

use crate::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Router,
};

/// A submission is a single email address, anything bigger is rejected with a 413.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(app_state))
        .route("/health-check", get(health_check))
}

/// API - Routes nested under "/api" path
fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/waitlist",
            post(api::waitlist).layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(app_state)
}
