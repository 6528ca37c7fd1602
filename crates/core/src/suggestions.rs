//! Typeahead suggestions drawn from every kind's name column.
//!
//! Not ranked: the order is the registry order of the kinds, then each
//! kind's own order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::error::ServiceError;
use crate::search::{contains_pattern, has_control_chars};
use crate::store::EntityCatalog;

/// Queries shorter than this (in characters, after trimming) get no
/// suggestions.
pub const MIN_SUGGESTION_QUERY_LENGTH: usize = 2;

/// Names taken from each kind before merging.
pub const SUGGESTIONS_PER_KIND: i64 = 5;

/// Length cap of the merged list.
pub const MAX_SUGGESTIONS: usize = 10;

/// Query parameters for the suggestions endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionParams {
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    pub suggestions: Vec<String>,
}

/// Concatenate per-kind name lists, drop exact duplicates (first one wins)
/// and cap the result at [`MAX_SUGGESTIONS`].
pub fn merge_suggestions<I>(per_kind: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    per_kind
        .into_iter()
        .flatten()
        .filter(|name| seen.insert(name.clone()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suggest names containing `query`.
///
/// Short queries, and queries with control characters, return an empty list
/// without touching the catalog.
pub async fn suggestions<C: EntityCatalog>(
    catalog: &C,
    query: &str,
) -> Result<Suggestions, ServiceError<C::Error>> {
    let query = query.trim();
    if query.chars().count() < MIN_SUGGESTION_QUERY_LENGTH || has_control_chars(query) {
        return Ok(Suggestions {
            suggestions: Vec::new(),
        });
    }

    let pattern = contains_pattern(query);
    let mut per_kind = Vec::with_capacity(EntityKind::ALL.len());
    for kind in EntityKind::ALL {
        let names = catalog
            .suggest_names(kind, &pattern, SUGGESTIONS_PER_KIND)
            .await
            .map_err(ServiceError::Persistence)?;
        per_kind.push(names);
    }

    Ok(Suggestions {
        suggestions: merge_suggestions(per_kind),
    })
}
