//! `AuthUser` extractor — runs the authorization gate on the request.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use market_auth::gate::AuthContext;
use market_entity::role::Capability;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated context available in handlers.
///
/// Extraction runs the gate's authentication steps (presence, token
/// validity, session binding, role resolution); handlers finish with
/// [`AuthUser::require`] or [`AuthUser::require_admin`] for the
/// capability check.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl AuthUser {
    /// Requires every listed capability of the authenticated role.
    pub fn require(&self, required: &[Capability]) -> Result<(), ApiError> {
        self.0.require(required).map_err(ApiError::from)
    }

    /// Requires an administrative role.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        self.0.require_admin().map_err(ApiError::from)
    }
}

impl std::ops::Deref for AuthUser {
    type Target = AuthContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let context = state.gate.authenticate(header).await?;
        Ok(AuthUser(context))
    }
}
