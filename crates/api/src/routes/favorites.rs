//! Route definitions for per-user favorites.
//!
//! Mounted at `/users/{user_id}/favorites` in the API route tree.

use axum::routing::get;
use axum::Router;

use crate::handlers::favorites;
use crate::state::AppState;

/// Favorite routes mounted at `/users/{user_id}/favorites`.
///
/// ```text
/// POST   /                             -> add_favorite
/// GET    /                             -> list_favorites
/// GET    /counts                       -> count_favorites
/// GET    /{entity_type}                -> list_favorites_by_kind
/// GET    /{entity_type}/{entity_id}    -> is_favorite
/// DELETE /{entity_type}/{entity_id}    -> remove_favorite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/counts", get(favorites::count_favorites))
        .route("/{entity_type}", get(favorites::list_favorites_by_kind))
        .route(
            "/{entity_type}/{entity_id}",
            get(favorites::is_favorite).delete(favorites::remove_favorite),
        )
}
