//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use market_auth::gate::AuthorizationGate;
use market_auth::password::hasher::PasswordHasher;
use market_auth::roles::RoleCache;
use market_auth::session::{SessionBinder, SessionManager};
use market_auth::token::TokenAuthority;
use market_cache::CacheManager;
use market_core::config::AppConfig;
use market_database::repositories::{AccountRepository, RoleRepository};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Cache manager (Redis or in-memory).
    pub cache: Arc<CacheManager>,

    /// Argon2 credential hasher.
    pub password_hasher: Arc<PasswordHasher>,
    /// Token issuance and validation.
    pub token_authority: Arc<TokenAuthority>,
    /// Single-active-session registry.
    pub session_binder: Arc<SessionBinder>,
    /// The login sequence over hasher, authority, and binder.
    pub session_manager: Arc<SessionManager>,
    /// Cache-aside role set.
    pub role_cache: Arc<RoleCache>,
    /// Per-request authorization pipeline.
    pub gate: Arc<AuthorizationGate>,

    /// Account repository.
    pub account_repo: Arc<AccountRepository>,
    /// Role repository.
    pub role_repo: Arc<RoleRepository>,
}

impl AppState {
    /// Wires every component from the three infrastructure handles.
    pub fn new(config: AppConfig, db_pool: PgPool, cache: Arc<CacheManager>) -> Self {
        let account_repo = Arc::new(AccountRepository::new(db_pool.clone()));
        let role_repo = Arc::new(RoleRepository::new(db_pool.clone()));

        let password_hasher = Arc::new(PasswordHasher::new());
        let token_authority = Arc::new(TokenAuthority::new(&config.auth));
        let session_binder = Arc::new(SessionBinder::new(Arc::clone(&cache), &config.auth));
        let role_cache = Arc::new(RoleCache::new(
            Arc::clone(&role_repo) as Arc<dyn market_auth::roles::RoleStore>,
            Arc::clone(&cache),
        ));
        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&account_repo) as Arc<dyn market_auth::session::AccountStore>,
            Arc::clone(&password_hasher),
            Arc::clone(&token_authority),
            Arc::clone(&session_binder),
        ));
        let gate = Arc::new(AuthorizationGate::new(
            Arc::clone(&token_authority),
            Arc::clone(&session_binder),
            Arc::clone(&role_cache),
        ));

        Self {
            config: Arc::new(config),
            db_pool,
            cache,
            password_hasher,
            token_authority,
            session_binder,
            session_manager,
            role_cache,
            gate,
            account_repo,
            role_repo,
        }
    }
}
