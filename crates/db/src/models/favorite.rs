//! Favorite row model.

use planboard_core::entity::{EntityKind, EntityRef, UserId};
use planboard_core::error::CoreError;
use planboard_core::favorites::Favorite;
use planboard_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `favorites` table, before its kind tag is checked.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteRow {
    pub id: DbId,
    pub user_id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub created_at: Timestamp,
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = CoreError;

    fn try_from(row: FavoriteRow) -> Result<Self, Self::Error> {
        let kind: EntityKind = row.entity_type.parse()?;
        Ok(Favorite {
            id: row.id,
            user_id: UserId(row.user_id),
            target: EntityRef::from_parts(kind, row.entity_id),
            created_at: row.created_at,
        })
    }
}
