//! Durable-storage seam for the login path.

use async_trait::async_trait;

use market_core::result::AppResult;
use market_database::repositories::AccountRepository;
use market_entity::account::Account;

/// The account reads the login flow depends on.
///
/// Implemented by [`AccountRepository`] in production; tests substitute
/// an in-memory store.
#[async_trait]
pub trait AccountStore: Send + Sync + std::fmt::Debug + 'static {
    /// An active account by email, case-insensitive. Inactive accounts
    /// are invisible to this lookup.
    async fn find_active_by_email(&self, email: &str) -> AppResult<Option<Account>>;
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_active_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        AccountRepository::find_active_by_email(self, email).await
    }
}
