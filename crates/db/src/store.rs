//! PostgreSQL implementation of the core persistence traits.

use planboard_core::entity::{EntityKind, EntityRef, UserId};
use planboard_core::favorites::Favorite;
use planboard_core::search::Page;
use planboard_core::store::{EntityCatalog, FavoriteStore, InsertOutcome};
use planboard_core::types::DbId;

use crate::models::favorite::FavoriteRow;
use crate::models::search::{EntityRecord, SearchHit};
use crate::repositories::{
    CatalogRepo, FavoriteRepo, ProjectRepo, TaskRepo, TeamRepo, UserRepo,
};
use crate::DbPool;

/// Favorites and entity catalog backed by one connection pool.
///
/// Cheap to clone; handlers build one per request from shared state.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Convert a stored row, surfacing an unknown kind tag as a decode error.
fn decode(row: FavoriteRow) -> Result<Favorite, sqlx::Error> {
    Favorite::try_from(row).map_err(|e| {
        tracing::warn!(error = %e, "Favorite row with unrecognized entity_type");
        sqlx::Error::Decode(Box::new(e))
    })
}

impl FavoriteStore for PgStore {
    type Error = sqlx::Error;

    async fn user_exists(&self, user_id: UserId) -> Result<bool, sqlx::Error> {
        UserRepo::exists(&self.pool, user_id.get()).await
    }

    async fn find_favorite(
        &self,
        user_id: UserId,
        target: EntityRef,
    ) -> Result<Option<Favorite>, sqlx::Error> {
        FavoriteRepo::find(&self.pool, user_id.get(), target.kind().as_str(), target.id())
            .await?
            .map(decode)
            .transpose()
    }

    async fn insert_favorite(
        &self,
        user_id: UserId,
        target: EntityRef,
    ) -> Result<InsertOutcome, sqlx::Error> {
        let inserted =
            FavoriteRepo::insert(&self.pool, user_id.get(), target.kind().as_str(), target.id())
                .await;
        match inserted {
            Ok(Some(row)) => decode(row).map(InsertOutcome::Inserted),
            Ok(None) => Ok(InsertOutcome::Duplicate),
            // The only foreign key on favorites is the owning user.
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Ok(InsertOutcome::UserMissing)
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_favorite(&self, id: DbId) -> Result<bool, sqlx::Error> {
        FavoriteRepo::delete(&self.pool, id).await
    }

    async fn list_favorites(
        &self,
        user_id: UserId,
        kind: Option<EntityKind>,
    ) -> Result<Vec<Favorite>, sqlx::Error> {
        FavoriteRepo::list_for_user(&self.pool, user_id.get(), kind.map(EntityKind::as_str))
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn count_favorites(&self, user_id: UserId) -> Result<Vec<(EntityKind, i64)>, sqlx::Error> {
        let rows = FavoriteRepo::count_by_type(&self.pool, user_id.get()).await?;
        let mut counts = Vec::with_capacity(rows.len());
        for (tag, count) in rows {
            match tag.parse::<EntityKind>() {
                Ok(kind) => counts.push((kind, count)),
                Err(e) => tracing::warn!(error = %e, "Skipping favorites of unrecognized type"),
            }
        }
        Ok(counts)
    }
}

impl EntityCatalog for PgStore {
    type Error = sqlx::Error;
    type Hit = SearchHit;
    type Record = EntityRecord;

    async fn search(
        &self,
        kind: EntityKind,
        pattern: &str,
        page: Page,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        let pool = &self.pool;
        let (limit, offset) = (page.limit, page.offset);
        let hits = match kind {
            EntityKind::Project => ProjectRepo::search(pool, pattern, limit, offset)
                .await?
                .into_iter()
                .map(SearchHit::Project)
                .collect(),
            EntityKind::Task => TaskRepo::search(pool, pattern, limit, offset)
                .await?
                .into_iter()
                .map(SearchHit::Task)
                .collect(),
            EntityKind::User => UserRepo::search(pool, pattern, limit, offset)
                .await?
                .into_iter()
                .map(SearchHit::User)
                .collect(),
            EntityKind::Team => TeamRepo::search(pool, pattern, limit, offset)
                .await?
                .into_iter()
                .map(SearchHit::Team)
                .collect(),
        };
        Ok(hits)
    }

    async fn count_matches(&self, kind: EntityKind, pattern: &str) -> Result<i64, sqlx::Error> {
        CatalogRepo::count_matches(&self.pool, kind, pattern).await
    }

    async fn suggest_names(
        &self,
        kind: EntityKind,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        CatalogRepo::suggest_names(&self.pool, kind, pattern, limit).await
    }

    async fn fetch_by_ids(
        &self,
        kind: EntityKind,
        ids: &[DbId],
    ) -> Result<Vec<EntityRecord>, sqlx::Error> {
        let pool = &self.pool;
        let records = match kind {
            EntityKind::Project => ProjectRepo::find_by_ids(pool, ids)
                .await?
                .into_iter()
                .map(EntityRecord::Project)
                .collect(),
            EntityKind::Task => TaskRepo::find_by_ids(pool, ids)
                .await?
                .into_iter()
                .map(EntityRecord::Task)
                .collect(),
            EntityKind::User => UserRepo::find_by_ids(pool, ids)
                .await?
                .into_iter()
                .map(EntityRecord::User)
                .collect(),
            EntityKind::Team => TeamRepo::find_by_ids(pool, ids)
                .await?
                .into_iter()
                .map(EntityRecord::Team)
                .collect(),
        };
        Ok(records)
    }
}
