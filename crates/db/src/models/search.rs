//! Search result models.
//!
//! Each kind's search query returns a flat row with its related records
//! joined in. The rows are folded into hit types that nest those related
//! records as summaries.

use planboard_core::entity::{EntityRef, Identified};
use planboard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::project::{Project, ProjectSummary};
use crate::models::task::Task;
use crate::models::team::{Team, TeamSummary};
use crate::models::user::{User, UserSummary};

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct ProjectHitRow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub team_id: Option<DbId>,
    pub team_name: Option<String>,
    pub created_at: Timestamp,
}

/// A matching project with its owning team.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectHit {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub team: Option<TeamSummary>,
    pub created_at: Timestamp,
}

impl From<ProjectHitRow> for ProjectHit {
    fn from(row: ProjectHitRow) -> Self {
        let team = match (row.team_id, row.team_name) {
            (Some(id), Some(name)) => Some(TeamSummary { id, name }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            team,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct TaskHitRow {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub project_id: DbId,
    pub project_name: String,
    pub author_id: DbId,
    pub author_name: String,
    pub assignee_id: Option<DbId>,
    pub assignee_name: Option<String>,
}

/// A matching task with its project, author, and assignee.
#[derive(Debug, Clone, Serialize)]
pub struct TaskHit {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub project: ProjectSummary,
    pub author: UserSummary,
    pub assignee: Option<UserSummary>,
    pub created_at: Timestamp,
}

impl From<TaskHitRow> for TaskHit {
    fn from(row: TaskHitRow) -> Self {
        let assignee = match (row.assignee_id, row.assignee_name) {
            (Some(user_id), Some(name)) => Some(UserSummary { user_id, name }),
            _ => None,
        };
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            project: ProjectSummary {
                id: row.project_id,
                name: row.project_name,
            },
            author: UserSummary {
                user_id: row.author_id,
                name: row.author_name,
            },
            assignee,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Users and teams
// ---------------------------------------------------------------------------

/// A matching user. Users carry no related context.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserHit {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub created_at: Timestamp,
}

/// A matching team with its member count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamHit {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub member_count: i64,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Kind-erased wrappers
// ---------------------------------------------------------------------------

/// A search hit of any kind. Serializes as the inner hit.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchHit {
    Project(ProjectHit),
    Task(TaskHit),
    User(UserHit),
    Team(TeamHit),
}

/// A full entity row of any kind. Serializes as the inner row.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EntityRecord {
    Project(Project),
    Task(Task),
    User(User),
    Team(Team),
}

impl Identified for EntityRecord {
    fn entity_ref(&self) -> EntityRef {
        match self {
            EntityRecord::Project(p) => p.entity_ref(),
            EntityRecord::Task(t) => t.entity_ref(),
            EntityRecord::User(u) => u.entity_ref(),
            EntityRecord::Team(t) => t.entity_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn project_without_team_has_no_summary() {
        let hit = ProjectHit::from(ProjectHitRow {
            id: 1,
            name: "Apollo".into(),
            description: None,
            team_id: None,
            team_name: None,
            created_at: Utc::now(),
        });
        assert!(hit.team.is_none());
    }

    #[test]
    fn task_hit_nests_related_records() {
        let hit = TaskHit::from(TaskHitRow {
            id: 5,
            title: "Ship it".into(),
            description: None,
            status: "todo".into(),
            created_at: Utc::now(),
            project_id: 2,
            project_name: "Apollo".into(),
            author_id: 3,
            author_name: "Ada".into(),
            assignee_id: None,
            assignee_name: None,
        });
        let json = serde_json::to_value(SearchHit::Task(hit)).unwrap();
        assert_eq!(json["project"]["name"], "Apollo");
        assert_eq!(json["author"]["user_id"], 3);
        assert!(json["assignee"].is_null());
        assert!(json.get("project_id").is_none());
    }

    #[test]
    fn entity_record_reports_kind_specific_key() {
        let now = Utc::now();
        let record = EntityRecord::User(User {
            user_id: 42,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: now,
            updated_at: now,
        });
        assert_eq!(record.entity_ref().to_string(), "user 42");
    }
}
