//! User entity model and DTOs.

use planboard_core::entity::{EntityRef, Identified, UserId};
use planboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table. Keyed on `user_id`, not `id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identified for User {
    fn entity_ref(&self) -> EntityRef {
        EntityRef::User(UserId(self.user_id))
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

/// The identifying fields of a user, embedded in other records' context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub user_id: DbId,
    pub name: String,
}
