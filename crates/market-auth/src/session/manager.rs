//! The login sequence: credential check, token issuance, session bind.

use std::sync::Arc;

use tracing::{debug, info};

use market_core::error::AppError;
use market_core::result::AppResult;
use market_entity::account::Account;

use crate::password::PasswordHasher;
use crate::token::{IssuedToken, TokenAuthority};

use super::binder::{BindOutcome, SessionBinder};
use super::store::AccountStore;

/// A completed login: the account, its fresh token, and whether that
/// token became the bound session token.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The account that logged in.
    pub account: Account,
    /// The freshly issued token.
    pub token: IssuedToken,
    /// Whether the fresh token is now the bound one.
    pub outcome: BindOutcome,
}

/// Runs the login sequence in a fixed order: account lookup, password
/// verification, token issuance, session bind.
///
/// Unknown account, inactive account, and wrong password all produce the
/// same `Invalid credentials` error, and a failed step never reaches the
/// steps after it. In particular a wrong password never touches the
/// session registry, so an existing binding survives the attempt.
#[derive(Debug, Clone)]
pub struct SessionManager {
    accounts: Arc<dyn AccountStore>,
    hasher: Arc<PasswordHasher>,
    authority: Arc<TokenAuthority>,
    binder: Arc<SessionBinder>,
}

impl SessionManager {
    /// Creates a new session manager over the given components.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        hasher: Arc<PasswordHasher>,
        authority: Arc<TokenAuthority>,
        binder: Arc<SessionBinder>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            authority,
            binder,
        }
    }

    /// Authenticates the credentials and binds a fresh token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let account = self
            .accounts
            .find_active_by_email(email)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid credentials"))?;

        if !self.hasher.verify_password(password, &account.password_hash)? {
            debug!("Password mismatch on login");
            return Err(AppError::authentication("Invalid credentials"));
        }

        let token = self.authority.issue(&account.email, account.role_id)?;

        // A concurrent or earlier login may already hold the binding; the
        // login still succeeds with a fresh token either way.
        let outcome = self.binder.bind(&account.email, &token.token).await?;
        info!(account_id = %account.id, ?outcome, "Login succeeded");

        Ok(LoginResult {
            account,
            token,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{StaticAccountStore, account, memory_cache};
    use market_core::config::auth::AuthConfig;
    use market_core::error::ErrorKind;
    use uuid::Uuid;

    fn config() -> AuthConfig {
        AuthConfig {
            signing_key: "test-signing-key".to_string(),
            token_ttl_minutes: 60,
        }
    }

    fn manager_with(accounts: Vec<Account>) -> (SessionManager, Arc<SessionBinder>) {
        let config = config();
        let binder = Arc::new(SessionBinder::new(memory_cache(), &config));
        let manager = SessionManager::new(
            Arc::new(StaticAccountStore { accounts }),
            Arc::new(PasswordHasher::new()),
            Arc::new(TokenAuthority::new(&config)),
            Arc::clone(&binder),
        );
        (manager, binder)
    }

    fn stored_account(email: &str, password: &str) -> Account {
        let hash = PasswordHasher::new().hash_password(password).unwrap();
        account(email, &hash, Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_login_issues_and_binds_token() {
        let (manager, binder) = manager_with(vec![stored_account("a@x.com", "hunter2!")]);

        let result = manager.login("a@x.com", "hunter2!").await.unwrap();
        assert_eq!(result.outcome, BindOutcome::Bound);
        assert_eq!(result.account.email, "a@x.com");
        assert_eq!(
            binder.current_token("a@x.com").await.unwrap(),
            Some(result.token.token)
        );
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_binding_intact() {
        let (manager, binder) = manager_with(vec![stored_account("a@x.com", "hunter2!")]);

        let first = manager.login("a@x.com", "hunter2!").await.unwrap();

        // The failed attempt stops at the password check and never
        // reaches the registry.
        let err = manager.login("a@x.com", "wrong-password").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(
            binder.current_token("a@x.com").await.unwrap(),
            Some(first.token.token)
        );
    }

    #[tokio::test]
    async fn test_unknown_account_creates_no_binding() {
        let (manager, binder) = manager_with(vec![]);

        let err = manager.login("ghost@x.com", "whatever").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(binder.current_token("ghost@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_inactive_account_is_invisible() {
        let mut acct = stored_account("a@x.com", "hunter2!");
        acct.active = false;
        let (manager, _) = manager_with(vec![acct]);

        let err = manager.login("a@x.com", "hunter2!").await.unwrap_err();
        assert_eq!(err.message, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_second_login_keeps_first_binding() {
        let (manager, binder) = manager_with(vec![stored_account("a@x.com", "hunter2!")]);

        let first = manager.login("a@x.com", "hunter2!").await.unwrap();
        let second = manager.login("a@x.com", "hunter2!").await.unwrap();

        assert_eq!(second.outcome, BindOutcome::AlreadyBound);
        assert_eq!(
            binder.current_token("a@x.com").await.unwrap(),
            Some(first.token.token)
        );
    }
}
