//! Cache-aside mapping of the role set, refreshed from durable storage.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use market_cache::{CacheManager, keys};
use market_core::error::AppError;
use market_core::result::AppResult;
use market_core::traits::cache::CacheProvider;
use market_entity::role::Role;

use super::store::RoleStore;

/// Cache-aside view of the full non-deprecated role set.
///
/// The set lives under one well-known key and is only ever replaced
/// wholesale: a reader observes either the previous complete set or the
/// new complete set, never a partial write. There is no incremental
/// invalidation; operators trigger [`RoleCache::reload_all`] after any
/// role mutation.
#[derive(Debug, Clone)]
pub struct RoleCache {
    /// Durable storage reads.
    store: Arc<dyn RoleStore>,
    /// Shared cache handle.
    cache: Arc<CacheManager>,
}

impl RoleCache {
    /// Creates a new role cache.
    pub fn new(store: Arc<dyn RoleStore>, cache: Arc<CacheManager>) -> Self {
        Self { store, cache }
    }

    /// Reads every non-deprecated role from durable storage, ordered by
    /// identifier ascending, and replaces the cached set in one write.
    pub async fn reload_all(&self) -> AppResult<()> {
        let roles = self.store.load_non_deprecated().await?;
        self.cache
            .set_json(&keys::roles(), &roles, None)
            .await?;
        info!(count = roles.len(), "Role cache reloaded");
        Ok(())
    }

    /// Returns the cached set verbatim, falling back to durable storage
    /// when the cache has no readable set.
    ///
    /// The fallback does not repopulate the cache; full reloads stay an
    /// explicit, separate operation.
    pub async fn all(&self) -> AppResult<Vec<Role>> {
        match self.cached_set().await? {
            Some(roles) => Ok(roles),
            None => self.store.load_non_deprecated().await,
        }
    }

    /// Resolves a role name to its identifier.
    ///
    /// Scans the cached set first; on cache miss, or when the name is not
    /// in the cached set, falls back to a single-row durable lookup
    /// without mutating the cache.
    pub async fn resolve_by_name(&self, name: &str) -> AppResult<Uuid> {
        if let Some(roles) = self.cached_set().await? {
            if let Some(role) = roles.iter().find(|r| r.name == name) {
                return Ok(role.id);
            }
        }

        match self.store.find_by_name(name).await? {
            Some(role) => Ok(role.id),
            None => Err(AppError::not_found(format!("Role '{name}' not found"))),
        }
    }

    /// Looks up a role by identifier in the current set (cached, or the
    /// durable fallback when the cache is empty).
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        Ok(self.all().await?.into_iter().find(|r| r.id == id))
    }

    /// The cached set, or `None` when the key is absent or unreadable.
    ///
    /// An unreadable value is treated as a miss so a corrupt entry cannot
    /// take authorization down with it; availability errors still
    /// propagate.
    async fn cached_set(&self) -> AppResult<Option<Vec<Role>>> {
        let raw = match self.cache.get(&keys::roles()).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match serde_json::from_str::<Vec<Role>>(&raw) {
            Ok(roles) => Ok(Some(roles)),
            Err(e) => {
                warn!(error = %e, "Cached role set unreadable, treating as miss");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{StaticRoleStore, memory_cache, role};
    use market_core::error::ErrorKind;

    fn cache_with(roles: Vec<Role>) -> (RoleCache, Arc<CacheManager>) {
        let cache = memory_cache();
        let store = Arc::new(StaticRoleStore { roles });
        (RoleCache::new(store, Arc::clone(&cache)), cache)
    }

    #[tokio::test]
    async fn test_reload_then_all_is_ordered_and_complete() {
        let mut r1 = role("unverified");
        let mut r2 = role("verified");
        let mut deprecated = role("legacy");
        deprecated.deprecated = true;
        // Force a known ordering.
        r1.id = Uuid::from_u128(1);
        r2.id = Uuid::from_u128(2);
        deprecated.id = Uuid::from_u128(3);

        let (roles, _) = cache_with(vec![r2.clone(), r1.clone(), deprecated]);
        roles.reload_all().await.unwrap();

        let all = roles.all().await.unwrap();
        assert_eq!(all, vec![r1, r2]);
    }

    #[tokio::test]
    async fn test_resolve_by_name_hits_cache() {
        let r1 = role("unverified");
        let (roles, _) = cache_with(vec![r1.clone()]);
        roles.reload_all().await.unwrap();

        assert_eq!(roles.resolve_by_name("unverified").await.unwrap(), r1.id);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_without_mutating_cache() {
        // Cache holds an empty set; durable storage has the role.
        let r1 = role("unverified");
        let (roles, cache) = cache_with(vec![r1.clone()]);
        cache
            .set_json::<Vec<Role>>(&keys::roles(), &vec![], None)
            .await
            .unwrap();

        assert_eq!(roles.resolve_by_name("unverified").await.unwrap(), r1.id);

        // The cached set is still empty until an explicit reload.
        let cached: Option<Vec<Role>> = cache.get_json(&keys::roles()).await.unwrap();
        assert_eq!(cached, Some(vec![]));
        assert_eq!(roles.all().await.unwrap(), Vec::<Role>::new());
    }

    #[tokio::test]
    async fn test_all_falls_back_when_cache_is_cold() {
        let r1 = role("unverified");
        let (roles, _) = cache_with(vec![r1.clone()]);

        // No reload has happened; the durable fallback serves the read.
        assert_eq!(roles.all().await.unwrap(), vec![r1]);
    }

    #[tokio::test]
    async fn test_unknown_role_is_a_typed_not_found() {
        let (roles, _) = cache_with(vec![]);
        let err = roles.resolve_by_name("ghost").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_unreadable_cached_set_is_treated_as_miss() {
        let r1 = role("unverified");
        let (roles, cache) = cache_with(vec![r1.clone()]);
        cache.set(&keys::roles(), "{not json", None).await.unwrap();

        assert_eq!(roles.all().await.unwrap(), vec![r1.clone()]);
        assert_eq!(roles.resolve_by_name("unverified").await.unwrap(), r1.id);
    }
}
