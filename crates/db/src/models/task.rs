//! Task entity model and DTOs.

use planboard_core::entity::{EntityRef, Identified, TaskId};
use planboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub project_id: DbId,
    pub author_id: DbId,
    pub assignee_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identified for Task {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::Task(TaskId(self.id))
    }
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `todo` if omitted.
    pub status: Option<String>,
    pub project_id: DbId,
    pub author_id: DbId,
    pub assignee_id: Option<DbId>,
}
