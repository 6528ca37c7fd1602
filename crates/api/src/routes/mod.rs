pub mod favorites;
pub mod health;
pub mod search;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/{user_id}/favorites                              add, list grouped
/// /users/{user_id}/favorites/counts                       per-kind counts
/// /users/{user_id}/favorites/{entity_type}                hydrated list
/// /users/{user_id}/favorites/{entity_type}/{entity_id}    check, remove
///
/// /search                                                 federated search
/// /search/counts                                          match counts
/// /search/suggestions                                     typeahead
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users/{user_id}/favorites", favorites::router())
        .nest("/search", search::router())
}
