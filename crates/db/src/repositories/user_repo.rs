//! Repository for the `users` table.

use planboard_core::entity::EntityKind;
use planboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::search::UserHit;
use crate::models::user::{CreateUser, User};
use crate::repositories::catalog_repo::match_clause;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, name, email, created_at, updated_at";

/// Provides create, lookup, and search operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Delete a user by ID. Their favorites go with them.
    pub async fn delete(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch every user whose id is in `ids`. Missing ids are skipped.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE user_id = ANY($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Users whose name or email matches `pattern`, newest id first.
    pub async fn search(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserHit>, sqlx::Error> {
        let query = format!(
            "SELECT u.user_id, u.name, u.email, u.created_at
             FROM users u
             WHERE {}
             ORDER BY u.user_id DESC
             LIMIT $2 OFFSET $3",
            match_clause(EntityKind::User, "u", 1)
        );
        sqlx::query_as::<_, UserHit>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
