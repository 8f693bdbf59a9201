//! Cache-backed registry enforcing at most one live token per identity.

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::debug;

use market_cache::{CacheManager, keys};
use market_core::config::auth::AuthConfig;
use market_core::result::AppResult;
use market_core::traits::cache::CacheProvider;

/// Outcome of a bind attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// The token is now the sole valid token for the identity.
    Bound,
    /// Another token is already bound; the registry was left untouched.
    AlreadyBound,
}

/// Records which token is currently authoritative for each identity.
///
/// The binding is written with set-if-absent semantics: two concurrent
/// logins for the same identity cannot overwrite each other, and a login
/// while a binding exists leaves the registry untouched. Bindings carry a
/// TTL equal to the token lifetime so a binding never outlives the token
/// it vouches for.
#[derive(Debug, Clone)]
pub struct SessionBinder {
    /// Shared cache handle.
    cache: Arc<CacheManager>,
    /// Binding lifetime, matching the token lifetime.
    binding_ttl: Duration,
}

impl SessionBinder {
    /// Creates a new session binder.
    pub fn new(cache: Arc<CacheManager>, config: &AuthConfig) -> Self {
        Self {
            cache,
            binding_ttl: Duration::from_secs(config.token_ttl_minutes * 60),
        }
    }

    /// Derives the fixed-length identity key for an email.
    ///
    /// Not a secret; purely cache-key normalization.
    pub fn identity_key(email: &str) -> String {
        let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
        format!("{digest:x}")
    }

    /// Binds `token` as the current token for the identity, if and only
    /// if no token is currently bound.
    ///
    /// An `AlreadyBound` outcome is a no-op for the caller, not a
    /// failure: the login still succeeded, the registry just keeps the
    /// earlier token authoritative.
    pub async fn bind(&self, email: &str, token: &str) -> AppResult<BindOutcome> {
        let key = keys::session_binding(&Self::identity_key(email));
        let bound = self
            .cache
            .set_nx(&key, token, Some(self.binding_ttl))
            .await?;

        let outcome = if bound {
            BindOutcome::Bound
        } else {
            BindOutcome::AlreadyBound
        };
        debug!(?outcome, "Session bind attempt");
        Ok(outcome)
    }

    /// Returns the currently bound token for the identity, if any.
    ///
    /// Cache transport failures propagate as availability errors; they
    /// are never folded into "no binding".
    pub async fn current_token(&self, email: &str) -> AppResult<Option<String>> {
        let key = keys::session_binding(&Self::identity_key(email));
        self.cache.get(&key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::memory_cache;

    fn binder() -> SessionBinder {
        SessionBinder::new(
            memory_cache(),
            &AuthConfig {
                signing_key: "test".to_string(),
                token_ttl_minutes: 60,
            },
        )
    }

    #[test]
    fn test_identity_key_is_deterministic_and_normalized() {
        let a = SessionBinder::identity_key("a@x.com");
        let b = SessionBinder::identity_key(" A@X.COM ");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, SessionBinder::identity_key("b@x.com"));
    }

    #[tokio::test]
    async fn test_bind_then_current() {
        let binder = binder();
        let outcome = binder.bind("a@x.com", "token-1").await.unwrap();
        assert_eq!(outcome, BindOutcome::Bound);
        assert_eq!(
            binder.current_token("a@x.com").await.unwrap(),
            Some("token-1".to_string())
        );
    }

    #[tokio::test]
    async fn test_second_bind_is_a_noop() {
        let binder = binder();
        binder.bind("a@x.com", "token-1").await.unwrap();
        let outcome = binder.bind("a@x.com", "token-2").await.unwrap();
        assert_eq!(outcome, BindOutcome::AlreadyBound);
        assert_eq!(
            binder.current_token("a@x.com").await.unwrap(),
            Some("token-1".to_string())
        );
    }

    #[tokio::test]
    async fn test_unbound_identity_has_no_token() {
        let binder = binder();
        assert_eq!(binder.current_token("a@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_binds_have_exactly_one_winner() {
        let binder = Arc::new(binder());

        let mut handles = Vec::new();
        for i in 0..16 {
            let binder = Arc::clone(&binder);
            handles.push(tokio::spawn(async move {
                binder.bind("a@x.com", &format!("token-{i}")).await.unwrap()
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap() == BindOutcome::Bound {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);

        // The surviving token is one of the attempted ones.
        let current = binder.current_token("a@x.com").await.unwrap().unwrap();
        assert!(current.starts_with("token-"));
    }
}
