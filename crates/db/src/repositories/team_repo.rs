//! Repository for the `teams` and `team_members` tables.

use planboard_core::entity::EntityKind;
use planboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::search::TeamHit;
use crate::models::team::{CreateTeam, Team};
use crate::repositories::catalog_repo::match_clause;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides create, membership, lookup, and search operations for teams.
pub struct TeamRepo;

impl TeamRepo {
    /// Insert a new team, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTeam) -> Result<Team, sqlx::Error> {
        let query = format!(
            "INSERT INTO teams (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Add a user to a team. Adding an existing member is a no-op.
    pub async fn add_member(pool: &PgPool, team_id: DbId, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO team_members (team_id, user_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(team_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete a team by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch every team whose id is in `ids`. Missing ids are skipped.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = ANY($1)");
        sqlx::query_as::<_, Team>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Teams whose name or description matches `pattern`, newest id first,
    /// each with its member count.
    pub async fn search(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TeamHit>, sqlx::Error> {
        let query = format!(
            "SELECT tm.id, tm.name, tm.description, tm.created_at,
                    (SELECT COUNT(*) FROM team_members m WHERE m.team_id = tm.id) AS member_count
             FROM teams tm
             WHERE {}
             ORDER BY tm.id DESC
             LIMIT $2 OFFSET $3",
            match_clause(EntityKind::Team, "tm", 1)
        );
        sqlx::query_as::<_, TeamHit>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
