//! HTTP handlers.

pub mod account;
pub mod auth;
pub mod health;
pub mod role;

use validator::Validate;

use market_core::error::AppError;

use crate::error::ApiError;

/// Runs DTO validation, mapping failures to a 400 response.
pub(crate) fn validate<T: Validate>(req: &T) -> Result<(), ApiError> {
    req.validate()
        .map_err(|e| ApiError::from(AppError::validation(e.to_string())))
}
