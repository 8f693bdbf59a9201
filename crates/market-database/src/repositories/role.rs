//! Role repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use market_core::error::{AppError, ErrorKind};
use market_core::result::AppResult;
use market_entity::role::Role;

/// Repository for role queries and administrative updates.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a role by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find role by id", e)
            })
    }

    /// List every non-deprecated role, ordered by identifier ascending.
    ///
    /// The ordering keeps wholesale cache reloads deterministic.
    pub async fn find_non_deprecated(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE deprecated IS NOT TRUE ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))
    }

    /// Find a single non-deprecated role by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT * FROM roles WHERE name = $1 AND deprecated IS NOT TRUE",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role by name", e))
    }

    /// Insert a new role and return it.
    pub async fn create(&self, role: &Role) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (id, name, can_view, can_add, can_edit, can_delete, can_purchase, \
             can_wishlist, is_admin, is_owner, deprecated) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING *",
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(role.can_view)
        .bind(role.can_add)
        .bind(role.can_edit)
        .bind(role.can_delete)
        .bind(role.can_purchase)
        .bind(role.can_wishlist)
        .bind(role.is_admin)
        .bind(role.is_owner)
        .bind(role.deprecated)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict("A role with this name already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create role", e),
        })
    }

    /// Save all capability flags of an existing role. Returns the updated row.
    pub async fn save(&self, role: &Role) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>(
            "UPDATE roles SET name = $2, can_view = $3, can_add = $4, can_edit = $5, \
             can_delete = $6, can_purchase = $7, can_wishlist = $8, is_admin = $9, \
             is_owner = $10, deprecated = $11 \
             WHERE id = $1 RETURNING *",
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(role.can_view)
        .bind(role.can_add)
        .bind(role.can_edit)
        .bind(role.can_delete)
        .bind(role.can_purchase)
        .bind(role.can_wishlist)
        .bind(role.is_admin)
        .bind(role.is_owner)
        .bind(role.deprecated)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save role", e))
    }

    /// Set the admin flag. Returns `true` if a row was updated.
    pub async fn set_admin(&self, id: Uuid, is_admin: bool) -> AppResult<bool> {
        let result = sqlx::query("UPDATE roles SET is_admin = $2 WHERE id = $1")
            .bind(id)
            .bind(is_admin)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update role admin flag", e)
            })?;
        Ok(result.rows_affected() == 1)
    }

    /// Set the deprecated flag. Returns `true` if a row was updated.
    pub async fn set_deprecated(&self, id: Uuid, deprecated: bool) -> AppResult<bool> {
        let result = sqlx::query("UPDATE roles SET deprecated = $2 WHERE id = $1")
            .bind(id)
            .bind(deprecated)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update role status", e)
            })?;
        Ok(result.rows_affected() == 1)
    }
}
