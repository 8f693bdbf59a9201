//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountRequest {
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Display username.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Profile save request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    /// Account identifier.
    pub id: Uuid,
    /// New email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// New display username.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
}

/// Active-flag update request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAccountStatusRequest {
    /// Account identifier.
    pub id: Uuid,
    /// Whether the account may log in.
    pub active: bool,
}

/// Verification request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyAccountRequest {
    /// Account identifier.
    pub id: Uuid,
}

/// Role creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoleRequest {
    /// Role name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_add: bool,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub can_purchase: bool,
    #[serde(default)]
    pub can_wishlist: bool,
}

/// Full role save request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    /// Role identifier.
    pub id: Uuid,
    /// Role name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub can_view: bool,
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_purchase: bool,
    pub can_wishlist: bool,
}

/// Admin-flag update request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoleAdminRequest {
    /// Role identifier.
    pub id: Uuid,
    /// Whether the role is administrative.
    pub is_admin: bool,
}

/// Deprecation update request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoleStatusRequest {
    /// Role identifier.
    pub id: Uuid,
    /// Whether the role is deprecated.
    pub deprecated: bool,
}
