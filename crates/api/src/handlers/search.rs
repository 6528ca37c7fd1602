//! Handlers for federated search and typeahead suggestions.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use planboard_core::search::{self, parse_filter, SearchCountsParams, SearchParams, SearchRequest};
use planboard_core::suggestions::{self, SuggestionParams};

use crate::error::AppResult;
use crate::extract::ApiQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/search
///
/// Substring search across every selected kind. Each kind is paginated
/// independently; `total` counts the results returned.
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let request = SearchRequest::from_params(&params)?;

    let results = search::search(&state.store(), &request).await?;

    Ok(Json(DataResponse { data: results }))
}

/// GET /api/v1/search/counts
///
/// Total matches per selected kind, ignoring pagination.
pub async fn search_counts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchCountsParams>,
) -> AppResult<impl IntoResponse> {
    let filter = parse_filter(params.kind.as_deref())?;
    let query = params.q.as_deref().unwrap_or("");

    let counts = search::search_counts(&state.store(), query, filter).await?;

    Ok(Json(DataResponse { data: counts }))
}

/// GET /api/v1/search/suggestions
///
/// Up to ten distinct names containing `q`. Queries shorter than two
/// characters return an empty list.
pub async fn suggestions(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SuggestionParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.q.as_deref().unwrap_or("");

    let suggestions = suggestions::suggestions(&state.store(), query).await?;

    Ok(Json(DataResponse { data: suggestions }))
}
