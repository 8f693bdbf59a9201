//! Auth handlers — login.

use axum::Json;
use axum::extract::State;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, LoginResponse};
use crate::error::ApiResult;
use crate::handlers::validate;
use crate::state::AppState;

/// POST /api/auth/login
///
/// Unknown account, inactive account, and wrong password are all the
/// same `Invalid credentials` outcome; nothing in the response says
/// which it was.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    validate(&req)?;

    let result = state.session_manager.login(&req.email, &req.password).await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        token: result.token.token,
        expires_at: result.token.expires_at,
    })))
}
