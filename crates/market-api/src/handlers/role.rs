//! Role handlers — listing, administration, and cache reload.

use axum::Json;
use axum::extract::State;
use tracing::info;
use uuid::Uuid;

use market_core::error::AppError;
use market_entity::role::{Capability, Role};

use crate::dto::request::{
    CreateRoleRequest, UpdateRoleAdminRequest, UpdateRoleRequest, UpdateRoleStatusRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::handlers::validate;
use crate::state::AppState;

/// GET /api/roles
///
/// Serves the cache's current view of the set.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Role>>>> {
    auth.require(&[Capability::View])?;

    let roles = state.role_cache.all().await?;
    Ok(Json(ApiResponse::ok(roles)))
}

/// POST /api/roles
///
/// Role mutations do not touch the cache; the set stays as it was until
/// an explicit reload.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateRoleRequest>,
) -> ApiResult<Json<ApiResponse<Role>>> {
    auth.require_admin()?;
    validate(&req)?;

    let role = state
        .role_repo
        .create(&Role {
            id: Uuid::new_v4(),
            name: req.name,
            can_view: req.can_view,
            can_add: req.can_add,
            can_edit: req.can_edit,
            can_delete: req.can_delete,
            can_purchase: req.can_purchase,
            can_wishlist: req.can_wishlist,
            is_admin: false,
            is_owner: false,
            deprecated: false,
        })
        .await?;

    info!(role_id = %role.id, name = %role.name, "Role created");
    Ok(Json(ApiResponse::ok(role)))
}

/// PUT /api/roles
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<ApiResponse<Role>>> {
    auth.require_admin()?;
    validate(&req)?;

    let mut role = state
        .role_repo
        .find_by_id(req.id)
        .await?
        .ok_or_else(|| AppError::not_found("Role not found"))?;

    role.name = req.name;
    role.can_view = req.can_view;
    role.can_add = req.can_add;
    role.can_edit = req.can_edit;
    role.can_delete = req.can_delete;
    role.can_purchase = req.can_purchase;
    role.can_wishlist = req.can_wishlist;

    let saved = state
        .role_repo
        .save(&role)
        .await?
        .ok_or_else(|| AppError::not_found("Role not found"))?;

    Ok(Json(ApiResponse::ok(saved)))
}

/// PUT /api/roles/admin
pub async fn update_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateRoleAdminRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    auth.require_admin()?;

    if !state.role_repo.set_admin(req.id, req.is_admin).await? {
        return Err(AppError::not_found("Role not found").into());
    }

    info!(role_id = %req.id, is_admin = req.is_admin, "Role admin flag updated");
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Role admin flag updated".to_string(),
    })))
}

/// PUT /api/roles/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateRoleStatusRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    auth.require_admin()?;

    if !state.role_repo.set_deprecated(req.id, req.deprecated).await? {
        return Err(AppError::not_found("Role not found").into());
    }

    info!(role_id = %req.id, deprecated = req.deprecated, "Role status updated");
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Role status updated".to_string(),
    })))
}

/// POST /api/roles/reload
///
/// Replaces the cached role set from durable storage in one write.
pub async fn reload(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    auth.require_admin()?;

    state.role_cache.reload_all().await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Role cache reloaded".to_string(),
    })))
}
