//! Persistence contracts consumed by the favorites and search services.
//!
//! The services never talk to a database directly. They are written against
//! these two traits; `planboard-db` implements them for PostgreSQL and the
//! unit tests implement them in memory.

use std::future::Future;

use serde::Serialize;

use crate::entity::{EntityKind, EntityRef, Identified, UserId};
use crate::favorites::Favorite;
use crate::search::Page;
use crate::types::DbId;

/// What happened to an attempted favorite insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(Favorite),
    /// The uniqueness constraint on the triple rejected the row.
    Duplicate,
    /// The owning user was deleted after the existence check.
    UserMissing,
}

/// Storage for favorite tuples and the users that own them.
pub trait FavoriteStore: Send + Sync {
    type Error: Send;

    /// Whether a user with this id exists.
    fn user_exists(&self, user_id: UserId)
        -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Look up the favorite for an exact `(user, kind, id)` triple.
    fn find_favorite(
        &self,
        user_id: UserId,
        target: EntityRef,
    ) -> impl Future<Output = Result<Option<Favorite>, Self::Error>> + Send;

    /// Insert a favorite.
    ///
    /// Constraint rejections are reported as outcomes, not errors, so a
    /// concurrent insert or user deletion can be told apart from a failure.
    fn insert_favorite(
        &self,
        user_id: UserId,
        target: EntityRef,
    ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send;

    /// Delete a favorite by surrogate id. Returns `true` if a row was removed.
    fn delete_favorite(&self, id: DbId) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// A user's favorites, newest first, optionally restricted to one kind.
    fn list_favorites(
        &self,
        user_id: UserId,
        kind: Option<EntityKind>,
    ) -> impl Future<Output = Result<Vec<Favorite>, Self::Error>> + Send;

    /// Number of favorites per kind. Kinds with no favorites may be omitted.
    fn count_favorites(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<(EntityKind, i64)>, Self::Error>> + Send;
}

/// Per-kind query primitives over the entity tables.
pub trait EntityCatalog: Send + Sync {
    type Error: Send;
    /// A search result for any kind, with its shallow relational context.
    type Hit: Serialize + Send;
    /// A full entity record of any kind, used to hydrate favorites.
    type Record: Identified + Serialize + Send;

    /// Records of `kind` with any search column containing `pattern`,
    /// primary key descending, paginated with `page`.
    ///
    /// `pattern` is a ready-made `ILIKE` pattern (see
    /// [`crate::search::contains_pattern`]).
    fn search(
        &self,
        kind: EntityKind,
        pattern: &str,
        page: Page,
    ) -> impl Future<Output = Result<Vec<Self::Hit>, Self::Error>> + Send;

    /// Number of records of `kind` matching `pattern`, ignoring pagination.
    fn count_matches(
        &self,
        kind: EntityKind,
        pattern: &str,
    ) -> impl Future<Output = Result<i64, Self::Error>> + Send;

    /// Up to `limit` name-column values of `kind` matching `pattern`.
    fn suggest_names(
        &self,
        kind: EntityKind,
        pattern: &str,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;

    /// Every record of `kind` whose key is in `ids`, in one round trip.
    /// Missing ids are simply absent from the result.
    fn fetch_by_ids(
        &self,
        kind: EntityKind,
        ids: &[DbId],
    ) -> impl Future<Output = Result<Vec<Self::Record>, Self::Error>> + Send;
}
