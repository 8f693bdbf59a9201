//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use market_core::traits::cache::CacheProvider;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// Reports per-dependency connectivity; always answers, even degraded.
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => "up",
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            "down"
        }
    };

    let cache = match state.cache.health_check().await {
        Ok(true) => "up",
        Ok(false) => "down",
        Err(e) => {
            warn!(error = %e.message, "Cache health check failed");
            "down"
        }
    };

    let status = if database == "up" && cache == "up" {
        "ok"
    } else {
        "degraded"
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        database: database.to_string(),
        cache: cache.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
