//! Repository for the `tasks` table.

use planboard_core::entity::EntityKind;
use planboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::search::{TaskHit, TaskHitRow};
use crate::models::task::{CreateTask, Task};
use crate::repositories::catalog_repo::match_clause;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, description, status, project_id, author_id, assignee_id, created_at, updated_at";

/// Provides create, lookup, and search operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `todo`.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, status, project_id, author_id, assignee_id)
             VALUES ($1, $2, COALESCE($3, 'todo'), $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.project_id)
            .bind(input.author_id)
            .bind(input.assignee_id)
            .fetch_one(pool)
            .await
    }

    /// Fetch every task whose id is in `ids`. Missing ids are skipped.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = ANY($1)");
        sqlx::query_as::<_, Task>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Tasks whose title or description matches `pattern`, newest id first,
    /// each joined with its project, author, and assignee.
    pub async fn search(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskHit>, sqlx::Error> {
        let query = format!(
            "SELECT t.id, t.title, t.description, t.status, t.created_at,
                    p.id AS project_id, p.name AS project_name,
                    a.user_id AS author_id, a.name AS author_name,
                    s.user_id AS assignee_id, s.name AS assignee_name
             FROM tasks t
             JOIN projects p ON p.id = t.project_id
             JOIN users a ON a.user_id = t.author_id
             LEFT JOIN users s ON s.user_id = t.assignee_id
             WHERE {}
             ORDER BY t.id DESC
             LIMIT $2 OFFSET $3",
            match_clause(EntityKind::Task, "t", 1)
        );
        let rows = sqlx::query_as::<_, TaskHitRow>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(TaskHit::from).collect())
    }
}
