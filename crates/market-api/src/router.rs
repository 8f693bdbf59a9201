//! Route definitions for the market HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to every handler via Axum's
//! `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(account_routes())
        .merge(role_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// Auth endpoints: login
fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(handlers::auth::login))
}

/// Account registration, lookup, and update variants
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(handlers::account::create))
        .route("/accounts", put(handlers::account::update))
        .route("/accounts/status", put(handlers::account::update_status))
        .route("/accounts/verified", put(handlers::account::verify))
        .route("/accounts/{id}", get(handlers::account::get))
}

/// Role listing, administration, and cache reload
fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(handlers::role::list))
        .route("/roles", post(handlers::role::create))
        .route("/roles", put(handlers::role::update))
        .route("/roles/admin", put(handlers::role::update_admin))
        .route("/roles/status", put(handlers::role::update_status))
        .route("/roles/reload", post(handlers::role::reload))
}

/// Liveness and dependency health
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
