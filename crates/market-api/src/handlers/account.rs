//! Account handlers — registration, lookup, profile and status updates.

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;
use uuid::Uuid;

use market_core::error::AppError;
use market_entity::account::CreateAccount;
use market_entity::role::Capability;

use crate::dto::request::{
    CreateAccountRequest, UpdateAccountRequest, UpdateAccountStatusRequest, VerifyAccountRequest,
};
use crate::dto::response::{AccountResponse, ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::validate;
use crate::state::AppState;

/// Role assigned at registration.
const SEED_ROLE_UNVERIFIED: &str = "unverified";
/// Role assigned when an account is verified.
const SEED_ROLE_VERIFIED: &str = "verified";

/// POST /api/accounts
///
/// Open registration. New accounts land in the `unverified` role.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> ApiResult<Json<ApiResponse<AccountResponse>>> {
    validate(&req)?;

    let role_id = state.role_cache.resolve_by_name(SEED_ROLE_UNVERIFIED).await?;
    let password_hash = state.password_hasher.hash_password(&req.password)?;

    let account = state
        .account_repo
        .create(&CreateAccount {
            email: req.email,
            username: req.username,
            password_hash,
            role_id,
        })
        .await?;

    info!(account_id = %account.id, "Account registered");
    Ok(Json(ApiResponse::ok(account.into())))
}

/// GET /api/accounts/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<AccountResponse>>> {
    auth.require(&[Capability::View])?;

    let account = state
        .account_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    Ok(Json(ApiResponse::ok(account.into())))
}

/// PUT /api/accounts
///
/// Profile save: email and username only.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateAccountRequest>,
) -> ApiResult<Json<ApiResponse<AccountResponse>>> {
    auth.require(&[Capability::Edit])?;
    validate(&req)?;

    let mut account = state
        .account_repo
        .find_by_id(req.id)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    account.email = req.email;
    account.username = req.username;

    let saved = state
        .account_repo
        .save(&account)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    Ok(Json(ApiResponse::ok(saved.into())))
}

/// PUT /api/accounts/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateAccountStatusRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    auth.require(&[Capability::Edit])?;

    if !state.account_repo.set_active(req.id, req.active).await? {
        return Err(AppError::not_found("Account not found").into());
    }

    info!(account_id = %req.id, active = req.active, "Account status updated");
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Account status updated".to_string(),
    })))
}

/// PUT /api/accounts/verified
///
/// Marks the account verified and moves it to the `verified` role.
pub async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<VerifyAccountRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    auth.require(&[Capability::Edit])?;

    let role_id = state.role_cache.resolve_by_name(SEED_ROLE_VERIFIED).await?;

    if !state.account_repo.set_verified(req.id, role_id).await? {
        return Err(AppError::not_found("Account not found").into());
    }

    info!(account_id = %req.id, "Account verified");
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Account verified".to_string(),
    })))
}
