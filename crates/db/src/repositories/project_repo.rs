//! Repository for the `projects` table.

use planboard_core::entity::EntityKind;
use planboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project};
use crate::models::search::{ProjectHit, ProjectHitRow};
use crate::repositories::catalog_repo::match_clause;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, team_id, created_at, updated_at";

/// Provides create, lookup, and search operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, team_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.team_id)
            .fetch_one(pool)
            .await
    }

    /// Fetch every project whose id is in `ids`. Missing ids are skipped.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = ANY($1)");
        sqlx::query_as::<_, Project>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Projects whose name or description matches `pattern`, newest id
    /// first, each joined with its team.
    pub async fn search(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectHit>, sqlx::Error> {
        let query = format!(
            "SELECT p.id, p.name, p.description, p.created_at,
                    tm.id AS team_id, tm.name AS team_name
             FROM projects p
             LEFT JOIN teams tm ON tm.id = p.team_id
             WHERE {}
             ORDER BY p.id DESC
             LIMIT $2 OFFSET $3",
            match_clause(EntityKind::Project, "p", 1)
        );
        let rows = sqlx::query_as::<_, ProjectHitRow>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(ProjectHit::from).collect())
    }
}
