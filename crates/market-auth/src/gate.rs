//! Per-request authorization pipeline.

use std::sync::Arc;

use tracing::debug;

use market_core::error::AppError;
use market_core::result::AppResult;
use market_entity::role::{Capability, Role};

use crate::roles::RoleCache;
use crate::session::SessionBinder;
use crate::token::{Claims, TokenAuthority};

/// Proof that a request passed authentication: the validated claims and
/// the resolved role they carry.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Validated token claims.
    pub claims: Claims,
    /// The role the claims reference, resolved against the current set.
    pub role: Role,
}

impl AuthContext {
    /// Email of the authenticated identity.
    pub fn email(&self) -> &str {
        &self.claims.email
    }

    /// Step 5 of the pipeline: the role must grant every required
    /// capability.
    pub fn require(&self, required: &[Capability]) -> AppResult<()> {
        if !self.role.allows_all(required) {
            debug!(
                role = %self.role.name,
                required = ?required,
                "Capability check failed"
            );
            return Err(AppError::authorization("Forbidden: insufficient permissions"));
        }
        Ok(())
    }

    /// Requires an administrative role.
    pub fn require_admin(&self) -> AppResult<()> {
        if !self.role.is_admin {
            return Err(AppError::authorization("Forbidden: insufficient permissions"));
        }
        Ok(())
    }
}

/// Runs every protected request through the same fixed pipeline:
///
/// 1. a credential must be presented,
/// 2. it must parse and verify as a live token,
/// 3. it must be the currently bound token for its identity,
/// 4. its role must exist in the current role set,
/// 5. that role must grant every required capability.
///
/// Steps 1–3 fail closed as authentication errors with uniform messages;
/// steps 4 and 5 are authorization failures. Cache or database outages
/// propagate as availability errors instead of being folded into either.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    authority: Arc<TokenAuthority>,
    binder: Arc<SessionBinder>,
    roles: Arc<RoleCache>,
}

impl AuthorizationGate {
    /// Creates a new gate over the given components.
    pub fn new(
        authority: Arc<TokenAuthority>,
        binder: Arc<SessionBinder>,
        roles: Arc<RoleCache>,
    ) -> Self {
        Self {
            authority,
            binder,
            roles,
        }
    }

    /// Steps 1–4: presence, validity, session binding, role resolution.
    pub async fn authenticate(&self, header: Option<&str>) -> AppResult<AuthContext> {
        let token = extract_token(header)?;

        let claims = self.authority.parse(token)?;

        // The token must be the one currently bound for this identity. A
        // stale or superseded token is indistinguishable from an invalid
        // one by design.
        match self.binder.current_token(&claims.email).await? {
            Some(bound) if bound == token => {}
            _ => {
                debug!("Presented token is not the bound session token");
                return Err(AppError::authentication("Invalid token"));
            }
        }

        // A role absent from the current set means it was deleted or
        // deprecated after issuance; the holder no longer has any grant.
        let role = match self.roles.find_by_id(claims.role).await? {
            Some(role) => role,
            None => {
                debug!(role = %claims.role, "Token references an unknown role");
                return Err(AppError::authorization("Forbidden: insufficient permissions"));
            }
        };

        Ok(AuthContext { claims, role })
    }

    /// The full pipeline: [`Self::authenticate`] plus the capability
    /// check (step 5).
    pub async fn authorize(
        &self,
        header: Option<&str>,
        required: &[Capability],
    ) -> AppResult<AuthContext> {
        let context = self.authenticate(header).await?;
        context.require(required)?;
        Ok(context)
    }

    /// Authenticates and requires an administrative role.
    pub async fn authorize_admin(&self, header: Option<&str>) -> AppResult<AuthContext> {
        let context = self.authenticate(header).await?;
        context.require_admin()?;
        Ok(context)
    }
}

/// Pulls the raw token out of an `Authorization` header value.
///
/// The `Bearer` scheme prefix is stripped when present; a bare token is
/// accepted as-is.
fn extract_token(header: Option<&str>) -> AppResult<&str> {
    let raw = header
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::authentication("Missing token"))?;

    let token = raw
        .strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .unwrap_or(raw)
        .trim();

    if token.is_empty() {
        return Err(AppError::authentication("Missing token"));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{StaticRoleStore, memory_cache, role};
    use market_core::config::auth::AuthConfig;
    use market_core::error::ErrorKind;

    struct Fixture {
        gate: AuthorizationGate,
        authority: Arc<TokenAuthority>,
        binder: Arc<SessionBinder>,
        role: Role,
    }

    async fn fixture(role: Role) -> Fixture {
        let config = AuthConfig {
            signing_key: "test-signing-key".to_string(),
            token_ttl_minutes: 60,
        };
        let cache = memory_cache();
        let authority = Arc::new(TokenAuthority::new(&config));
        let binder = Arc::new(SessionBinder::new(Arc::clone(&cache), &config));
        let roles = Arc::new(RoleCache::new(
            Arc::new(StaticRoleStore {
                roles: vec![role.clone()],
            }),
            cache,
        ));
        roles.reload_all().await.unwrap();

        Fixture {
            gate: AuthorizationGate::new(Arc::clone(&authority), Arc::clone(&binder), roles),
            authority,
            binder,
            role,
        }
    }

    /// Issues a token for `email` and binds it as the active session.
    async fn login(f: &Fixture, email: &str) -> String {
        let issued = f.authority.issue(email, f.role.id).unwrap();
        f.binder.bind(email, &issued.token).await.unwrap();
        issued.token
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let f = fixture(role("verified")).await;
        for header in [None, Some(""), Some("   "), Some("Bearer ")] {
            let err = f.gate.authorize(header, &[]).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Authentication);
            assert_eq!(err.message, "Missing token");
        }
    }

    #[tokio::test]
    async fn test_malformed_token_is_rejected() {
        let f = fixture(role("verified")).await;
        let err = f
            .gate
            .authorize(Some("Bearer not-a-token"), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Invalid token");
    }

    #[tokio::test]
    async fn test_valid_token_without_binding_is_rejected() {
        let f = fixture(role("verified")).await;
        // Issued but never bound, as if the session registry expired.
        let issued = f.authority.issue("a@x.com", f.role.id).unwrap();

        let err = f
            .gate
            .authorize(Some(&format!("Bearer {}", issued.token)), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Invalid token");
    }

    #[tokio::test]
    async fn test_superseded_token_is_rejected() {
        let f = fixture(role("verified")).await;
        let bound = login(&f, "a@x.com").await;

        // A second issuance does not displace the bound token.
        let later = f.authority.issue("a@x.com", f.role.id).unwrap();
        f.binder.bind("a@x.com", &later.token).await.unwrap();

        let header = format!("Bearer {}", later.token);
        if later.token != bound {
            let err = f.gate.authorize(Some(&header), &[]).await.unwrap_err();
            assert_eq!(err.message, "Invalid token");
        }
        // The originally bound token still passes.
        let header = format!("Bearer {bound}");
        assert!(f.gate.authorize(Some(&header), &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_role_in_claims_is_forbidden() {
        let f = fixture(role("verified")).await;
        let issued = f.authority.issue("a@x.com", uuid::Uuid::new_v4()).unwrap();
        f.binder.bind("a@x.com", &issued.token).await.unwrap();

        let err = f
            .gate
            .authorize(Some(&format!("Bearer {}", issued.token)), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, "Forbidden: insufficient permissions");
    }

    #[tokio::test]
    async fn test_insufficient_capability_is_forbidden() {
        // can_view only.
        let f = fixture(role("verified")).await;
        let token = login(&f, "a@x.com").await;
        let header = format!("Bearer {token}");

        let err = f
            .gate
            .authorize(Some(&header), &[Capability::Delete])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, "Forbidden: insufficient permissions");
    }

    #[tokio::test]
    async fn test_granted_capability_passes() {
        let f = fixture(role("verified")).await;
        let token = login(&f, "a@x.com").await;
        let header = format!("Bearer {token}");

        let context = f
            .gate
            .authorize(Some(&header), &[Capability::View])
            .await
            .unwrap();
        assert_eq!(context.email(), "a@x.com");
        assert_eq!(context.role.id, f.role.id);
    }

    #[tokio::test]
    async fn test_admin_role_passes_any_capability() {
        let mut admin = role("admin");
        admin.is_admin = true;
        let f = fixture(admin).await;
        let token = login(&f, "root@x.com").await;
        let header = format!("Bearer {token}");

        let required = [Capability::Delete, Capability::Edit, Capability::Purchase];
        assert!(f.gate.authorize(Some(&header), &required).await.is_ok());
        assert!(f.gate.authorize_admin(Some(&header)).await.is_ok());
    }

    #[tokio::test]
    async fn test_non_admin_fails_admin_gate() {
        let f = fixture(role("verified")).await;
        let token = login(&f, "a@x.com").await;
        let header = format!("Bearer {token}");

        let err = f.gate.authorize_admin(Some(&header)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_bare_token_without_scheme_is_accepted() {
        let f = fixture(role("verified")).await;
        let token = login(&f, "a@x.com").await;

        assert!(f.gate.authorize(Some(&token), &[]).await.is_ok());
    }
}
