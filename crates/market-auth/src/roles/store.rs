//! Durable-storage seam for role reads.

use async_trait::async_trait;

use market_core::result::AppResult;
use market_database::repositories::RoleRepository;
use market_entity::role::Role;

/// The durable-storage reads the role cache depends on.
///
/// Implemented by [`RoleRepository`] in production; tests substitute an
/// in-memory store.
#[async_trait]
pub trait RoleStore: Send + Sync + std::fmt::Debug + 'static {
    /// Every non-deprecated role, ordered by identifier ascending.
    async fn load_non_deprecated(&self) -> AppResult<Vec<Role>>;

    /// A single non-deprecated role by name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn load_non_deprecated(&self) -> AppResult<Vec<Role>> {
        self.find_non_deprecated().await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        RoleRepository::find_by_name(self, name).await
    }
}
