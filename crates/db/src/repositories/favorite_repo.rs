//! Repository for the `favorites` table.

use planboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::favorite::FavoriteRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, entity_type, entity_id, created_at";

/// Provides insert, lookup, listing, and delete operations for favorites.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Insert a favorite.
    ///
    /// Returns `None` when the `(user_id, entity_type, entity_id)` triple
    /// already exists.
    pub async fn insert(
        pool: &PgPool,
        user_id: DbId,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Option<FavoriteRow>, sqlx::Error> {
        let query = format!(
            "INSERT INTO favorites (user_id, entity_type, entity_id)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_favorites_user_entity DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FavoriteRow>(&query)
            .bind(user_id)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Option<FavoriteRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM favorites
             WHERE user_id = $1 AND entity_type = $2 AND entity_id = $3"
        );
        sqlx::query_as::<_, FavoriteRow>(&query)
            .bind(user_id)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a favorite by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// A user's favorites, newest first, optionally of one entity type.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        entity_type: Option<&str>,
    ) -> Result<Vec<FavoriteRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM favorites
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR entity_type = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, FavoriteRow>(&query)
            .bind(user_id)
            .bind(entity_type)
            .fetch_all(pool)
            .await
    }

    /// `(entity_type, count)` for each type the user has favorited.
    pub async fn count_by_type(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT entity_type, COUNT(*) FROM favorites
             WHERE user_id = $1
             GROUP BY entity_type",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
