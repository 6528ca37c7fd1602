//! Route definitions for search and suggestions.
//!
//! Mounted at `/search` in the API route tree.

use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Search routes mounted at `/search`.
///
/// ```text
/// GET    /               -> search
/// GET    /counts         -> search_counts
/// GET    /suggestions    -> suggestions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search::search))
        .route("/counts", get(search::search_counts))
        .route("/suggestions", get(search::suggestions))
}
