//! Account repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use market_core::error::{AppError, ErrorKind};
use market_core::result::AppResult;
use market_entity::account::{Account, CreateAccount};

/// Repository for account queries and updates.
///
/// The authorization path only reads through this repository; writes are
/// reserved for the account handlers.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    /// Find an active account by email (case-insensitive).
    ///
    /// Inactive accounts are invisible to the login path.
    pub async fn find_active_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE LOWER(email) = LOWER($1) AND active",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
        })
    }

    /// Insert a new account and return it.
    pub async fn create(&self, account: &CreateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, email, username, password_hash, role_id, verified, active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, FALSE, TRUE, NOW(), NOW()) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&account.email)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict("An account with this email already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create account", e),
        })
    }

    /// Save profile fields of an existing account. Returns the updated row.
    pub async fn save(&self, account: &Account) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET email = $2, username = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save account", e))
    }

    /// Set the active flag. Returns `true` if a row was updated.
    pub async fn set_active(&self, id: Uuid, active: bool) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE accounts SET active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(active)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update account status", e)
                })?;
        Ok(result.rows_affected() == 1)
    }

    /// Mark the account verified and move it to the given role.
    /// Returns `true` if a row was updated.
    pub async fn set_verified(&self, id: Uuid, role_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE accounts SET verified = TRUE, role_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(role_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to verify account", e)
        })?;
        Ok(result.rows_affected() == 1)
    }
}
