//! Polymorphic favorites.
//!
//! A favorite is a `(user, kind, entity id)` triple. The triple is unique;
//! favorites are only ever created or deleted, never updated. Adding a
//! favorite checks that the user exists but deliberately does not check the
//! target entity, so favorites may outlive what they point at. Readers that
//! hydrate favorites simply get no entity for those.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{EntityKind, EntityRef, Identified, UserId};
use crate::error::{CoreError, ServiceError};
use crate::store::{EntityCatalog, FavoriteStore, InsertOutcome};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A stored favorite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "FavoriteView")]
pub struct Favorite {
    pub id: DbId,
    pub user_id: UserId,
    pub target: EntityRef,
    pub created_at: Timestamp,
}

/// Wire shape of a [`Favorite`]: the reference is split back into
/// `entity_type` and `entity_id`.
#[derive(Serialize)]
struct FavoriteView {
    id: DbId,
    user_id: UserId,
    entity_type: EntityKind,
    entity_id: DbId,
    created_at: Timestamp,
}

impl From<Favorite> for FavoriteView {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id,
            user_id: favorite.user_id,
            entity_type: favorite.target.kind(),
            entity_id: favorite.target.id(),
            created_at: favorite.created_at,
        }
    }
}

/// A favorite with its entity attached, when the entity still exists.
#[derive(Debug, Clone, Serialize)]
pub struct HydratedFavorite<R> {
    #[serde(flatten)]
    pub favorite: Favorite,
    pub entity: Option<R>,
}

/// Favorites keyed by kind, each list newest first.
pub type GroupedFavorites = BTreeMap<EntityKind, Vec<Favorite>>;

/// How many favorites a user has of each kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteCounts {
    pub counts: BTreeMap<EntityKind, i64>,
    pub total: i64,
}

/// Request body for adding a favorite.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddFavoriteRequest {
    pub entity_type: String,
    #[validate(range(min = 1, message = "entity_id must be a positive integer"))]
    pub entity_id: DbId,
}

impl AddFavoriteRequest {
    /// Resolve the body into a typed reference.
    pub fn target(&self) -> Result<EntityRef, CoreError> {
        let kind = self.entity_type.parse()?;
        self.validate()?;
        EntityRef::new(kind, self.entity_id)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Group favorites by kind, keeping their relative order.
pub fn group_by_kind(favorites: Vec<Favorite>) -> GroupedFavorites {
    let mut grouped = GroupedFavorites::new();
    for favorite in favorites {
        grouped
            .entry(favorite.target.kind())
            .or_default()
            .push(favorite);
    }
    grouped
}

fn user_not_found(user_id: UserId) -> CoreError {
    CoreError::NotFound {
        entity: "User",
        id: user_id.get(),
    }
}

fn already_favorited(target: EntityRef) -> CoreError {
    CoreError::Conflict(format!("{target} is already a favorite"))
}

fn not_favorited(target: EntityRef) -> CoreError {
    CoreError::NotFound {
        entity: "Favorite",
        id: target.id(),
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Mark `target` as a favorite of `user_id`.
///
/// Fails with `NotFound` if the user does not exist and `Conflict` if the
/// triple is already present. Both also apply when a concurrent request
/// inserts the triple or deletes the user between the checks and the
/// insert.
pub async fn add_favorite<S: FavoriteStore>(
    store: &S,
    user_id: UserId,
    target: EntityRef,
) -> Result<Favorite, ServiceError<S::Error>> {
    let user_exists = store
        .user_exists(user_id)
        .await
        .map_err(ServiceError::Persistence)?;
    if !user_exists {
        return Err(user_not_found(user_id).into());
    }

    let existing = store
        .find_favorite(user_id, target)
        .await
        .map_err(ServiceError::Persistence)?;
    if existing.is_some() {
        return Err(already_favorited(target).into());
    }

    let outcome = store
        .insert_favorite(user_id, target)
        .await
        .map_err(ServiceError::Persistence)?;
    let favorite = match outcome {
        InsertOutcome::Inserted(favorite) => favorite,
        InsertOutcome::Duplicate => return Err(already_favorited(target).into()),
        InsertOutcome::UserMissing => return Err(user_not_found(user_id).into()),
    };

    tracing::info!(
        favorite_id = favorite.id,
        user_id = user_id.get(),
        entity_type = %target.kind(),
        entity_id = target.id(),
        "Favorite added",
    );

    Ok(favorite)
}

/// Remove the favorite matching the triple.
pub async fn remove_favorite<S: FavoriteStore>(
    store: &S,
    user_id: UserId,
    target: EntityRef,
) -> Result<(), ServiceError<S::Error>> {
    let favorite = store
        .find_favorite(user_id, target)
        .await
        .map_err(ServiceError::Persistence)?
        .ok_or_else(|| not_favorited(target))?;

    let deleted = store
        .delete_favorite(favorite.id)
        .await
        .map_err(ServiceError::Persistence)?;
    if !deleted {
        return Err(not_favorited(target).into());
    }

    tracing::info!(
        favorite_id = favorite.id,
        user_id = user_id.get(),
        entity_type = %target.kind(),
        entity_id = target.id(),
        "Favorite removed",
    );

    Ok(())
}

/// Every favorite of a user, grouped by kind.
///
/// Only kinds with at least one favorite appear in the map.
pub async fn list_favorites_for_user<S: FavoriteStore>(
    store: &S,
    user_id: UserId,
) -> Result<GroupedFavorites, ServiceError<S::Error>> {
    let favorites = store
        .list_favorites(user_id, None)
        .await
        .map_err(ServiceError::Persistence)?;
    Ok(group_by_kind(favorites))
}

/// A user's favorites of one kind, newest first, with their entities.
///
/// Entities are fetched in a single batch. A favorite whose entity no
/// longer exists is returned with `entity: None`.
pub async fn list_favorites_by_kind<S, C>(
    store: &S,
    catalog: &C,
    user_id: UserId,
    kind: EntityKind,
) -> Result<Vec<HydratedFavorite<C::Record>>, ServiceError<S::Error>>
where
    S: FavoriteStore,
    C: EntityCatalog<Error = S::Error>,
{
    let favorites = store
        .list_favorites(user_id, Some(kind))
        .await
        .map_err(ServiceError::Persistence)?;
    if favorites.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<DbId> = favorites.iter().map(|f| f.target.id()).collect();
    let records = catalog
        .fetch_by_ids(kind, &ids)
        .await
        .map_err(ServiceError::Persistence)?;
    let mut by_ref: HashMap<EntityRef, C::Record> = records
        .into_iter()
        .map(|record| (record.entity_ref(), record))
        .collect();

    let hydrated: Vec<_> = favorites
        .into_iter()
        .map(|favorite| {
            let entity = by_ref.remove(&favorite.target);
            HydratedFavorite { favorite, entity }
        })
        .collect();

    let missing = hydrated.iter().filter(|h| h.entity.is_none()).count();
    if missing > 0 {
        tracing::debug!(
            user_id = user_id.get(),
            entity_type = %kind,
            missing,
            "Favorites reference entities that no longer exist",
        );
    }

    Ok(hydrated)
}

/// Whether the triple is a favorite.
pub async fn is_favorite<S: FavoriteStore>(
    store: &S,
    user_id: UserId,
    target: EntityRef,
) -> Result<bool, ServiceError<S::Error>> {
    let favorite = store
        .find_favorite(user_id, target)
        .await
        .map_err(ServiceError::Persistence)?;
    Ok(favorite.is_some())
}

/// Per-kind favorite counts. Every kind is present, zero when empty.
pub async fn count_favorites<S: FavoriteStore>(
    store: &S,
    user_id: UserId,
) -> Result<FavoriteCounts, ServiceError<S::Error>> {
    let rows = store
        .count_favorites(user_id)
        .await
        .map_err(ServiceError::Persistence)?;

    let mut counts: BTreeMap<EntityKind, i64> =
        EntityKind::ALL.into_iter().map(|kind| (kind, 0)).collect();
    for (kind, count) in rows {
        *counts.entry(kind).or_default() += count;
    }
    let total = counts.values().sum();

    Ok(FavoriteCounts { counts, total })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
