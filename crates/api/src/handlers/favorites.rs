//! Handlers for per-user favorites.
//!
//! Path kind tags are parsed before any database access, so an unknown
//! `entity_type` fails with `INVALID_ENTITY_KIND` and never reaches the
//! store.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use planboard_core::entity::{EntityKind, EntityRef, UserId};
use planboard_core::favorites::{self, AddFavoriteRequest};
use planboard_core::types::DbId;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload of the membership check.
#[derive(Debug, Serialize)]
pub struct IsFavoriteResponse {
    pub is_favorite: bool,
}

/// POST /api/v1/users/{user_id}/favorites
///
/// Mark an entity as a favorite. Returns 201 with the created favorite.
pub async fn add_favorite(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<DbId>,
    ApiJson(input): ApiJson<AddFavoriteRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = UserId::new(user_id)?;
    let target = input.target()?;

    let favorite = favorites::add_favorite(&state.store(), user_id, target).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: favorite })))
}

/// GET /api/v1/users/{user_id}/favorites
///
/// All of a user's favorites grouped by kind, newest first within a kind.
pub async fn list_favorites(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let user_id = UserId::new(user_id)?;

    let grouped = favorites::list_favorites_for_user(&state.store(), user_id).await?;

    Ok(Json(DataResponse { data: grouped }))
}

/// GET /api/v1/users/{user_id}/favorites/counts
pub async fn count_favorites(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let user_id = UserId::new(user_id)?;

    let counts = favorites::count_favorites(&state.store(), user_id).await?;

    Ok(Json(DataResponse { data: counts }))
}

/// GET /api/v1/users/{user_id}/favorites/{entity_type}
///
/// A user's favorites of one kind, each with its entity attached (or
/// `null` when the entity no longer exists).
pub async fn list_favorites_by_kind(
    State(state): State<AppState>,
    ApiPath((user_id, entity_type)): ApiPath<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let kind: EntityKind = entity_type.parse()?;
    let user_id = UserId::new(user_id)?;

    let store = state.store();
    let hydrated = favorites::list_favorites_by_kind(&store, &store, user_id, kind).await?;

    Ok(Json(DataResponse { data: hydrated }))
}

/// GET /api/v1/users/{user_id}/favorites/{entity_type}/{entity_id}
pub async fn is_favorite(
    State(state): State<AppState>,
    ApiPath((user_id, entity_type, entity_id)): ApiPath<(DbId, String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let target = EntityRef::parse(&entity_type, entity_id)?;
    let user_id = UserId::new(user_id)?;

    let is_favorite = favorites::is_favorite(&state.store(), user_id, target).await?;

    Ok(Json(DataResponse {
        data: IsFavoriteResponse { is_favorite },
    }))
}

/// DELETE /api/v1/users/{user_id}/favorites/{entity_type}/{entity_id}
///
/// Returns 204 on success, 404 if the entity was not a favorite.
pub async fn remove_favorite(
    State(state): State<AppState>,
    ApiPath((user_id, entity_type, entity_id)): ApiPath<(DbId, String, DbId)>,
) -> AppResult<StatusCode> {
    let target = EntityRef::parse(&entity_type, entity_id)?;
    let user_id = UserId::new(user_id)?;

    favorites::remove_favorite(&state.store(), user_id, target).await?;

    Ok(StatusCode::NO_CONTENT)
}
