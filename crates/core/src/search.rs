//! Federated search across projects, tasks, users and teams.
//!
//! A search is a fan-out: every selected kind is queried on its own with the
//! same substring pattern and the same page, and each kind keeps its own
//! result bucket. There is no cross-kind ranking, and `limit` applies per
//! kind, so an `all` search can return up to `limit` results of each kind.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::EntityKind;
use crate::error::{CoreError, ServiceError};
use crate::store::EntityCatalog;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Default number of results per kind.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum query length, in characters, after trimming.
pub const MAX_QUERY_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Kind filter
// ---------------------------------------------------------------------------

/// Which kinds a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(EntityKind),
}

impl KindFilter {
    /// The selected kinds, in registry order.
    pub fn kinds(self) -> Vec<EntityKind> {
        match self {
            KindFilter::All => EntityKind::ALL.to_vec(),
            KindFilter::Only(kind) => vec![kind],
        }
    }
}

impl FromStr for KindFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(KindFilter::All)
        } else {
            s.parse().map(KindFilter::Only)
        }
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindFilter::All => f.write_str("all"),
            KindFilter::Only(kind) => kind.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Request parsing
// ---------------------------------------------------------------------------

/// Per-kind pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }
}

/// Query parameters for the search endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SearchParams {
    /// Free-text query.
    pub q: Option<String>,
    /// `all` or a single kind tag.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Max results per kind.
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    /// Results to skip per kind.
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: Option<i64>,
}

/// Query parameters for the match-count endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchCountsParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A validated search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed query text.
    pub query: String,
    pub filter: KindFilter,
    pub page: Page,
}

impl SearchRequest {
    /// Validate raw parameters. Nothing is queried if this fails.
    pub fn from_params(params: &SearchParams) -> Result<Self, CoreError> {
        params.validate()?;
        let query = validate_query(params.q.as_deref().unwrap_or(""))?;
        let filter = parse_filter(params.kind.as_deref())?;
        Ok(Self {
            query,
            filter,
            page: Page {
                limit: params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
                offset: params.offset.unwrap_or(0),
            },
        })
    }
}

/// Parse an optional kind filter; absent means `all`.
pub fn parse_filter(kind: Option<&str>) -> Result<KindFilter, CoreError> {
    kind.map_or(Ok(KindFilter::All), |k| k.parse())
}

/// True if `query` contains a control character such as NUL, which
/// PostgreSQL text values cannot hold.
pub fn has_control_chars(query: &str) -> bool {
    query.chars().any(char::is_control)
}

/// Trim a query and check its length and characters.
pub fn validate_query(raw: &str) -> Result<String, CoreError> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(CoreError::Validation(
            "Search query must not be empty".to_string(),
        ));
    }
    if has_control_chars(query) {
        return Err(CoreError::Validation(
            "Search query must not contain control characters".to_string(),
        ));
    }
    let length = query.chars().count();
    if length > MAX_QUERY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Search query must be at most {MAX_QUERY_LENGTH} characters, got {length}"
        )));
    }
    Ok(query.to_string())
}

/// Build an `ILIKE` pattern matching any value that contains `term`.
///
/// `%`, `_` and `\` in the term are escaped so they match literally.
///
/// # Examples
///
/// ```
/// use planboard_core::search::contains_pattern;
/// assert_eq!(contains_pattern("alpha"), "%alpha%");
/// assert_eq!(contains_pattern("50%"), "%50\\%%");
/// ```
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Per-kind result buckets plus the number of results actually returned.
///
/// A bucket is serialized only when its kind was selected, and `total` is
/// always the sum of the bucket lengths.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults<H> {
    #[serde(skip_serializing_if = "Option::is_none")]
    projects: Option<Vec<H>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tasks: Option<Vec<H>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    users: Option<Vec<H>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    teams: Option<Vec<H>>,
    total: usize,
}

impl<H> Default for SearchResults<H> {
    fn default() -> Self {
        Self {
            projects: None,
            tasks: None,
            users: None,
            teams: None,
            total: 0,
        }
    }
}

impl<H> SearchResults<H> {
    fn slot(&mut self, kind: EntityKind) -> &mut Option<Vec<H>> {
        match kind {
            EntityKind::Project => &mut self.projects,
            EntityKind::Task => &mut self.tasks,
            EntityKind::User => &mut self.users,
            EntityKind::Team => &mut self.teams,
        }
    }

    /// Set the bucket for `kind`, replacing any previous one.
    pub fn insert(&mut self, kind: EntityKind, hits: Vec<H>) {
        let added = hits.len();
        if let Some(previous) = self.slot(kind).replace(hits) {
            self.total -= previous.len();
        }
        self.total += added;
    }

    /// The bucket for `kind`, if that kind was searched.
    pub fn hits(&self, kind: EntityKind) -> Option<&[H]> {
        let bucket = match kind {
            EntityKind::Project => &self.projects,
            EntityKind::Task => &self.tasks,
            EntityKind::User => &self.users,
            EntityKind::Team => &self.teams,
        };
        bucket.as_deref()
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// True match counts per kind, unaffected by pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCounts {
    pub counts: BTreeMap<EntityKind, i64>,
    pub total: i64,
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// Run a federated search.
///
/// One query per selected kind, in registry order. A failure on any kind
/// fails the whole search.
pub async fn search<C: EntityCatalog>(
    catalog: &C,
    request: &SearchRequest,
) -> Result<SearchResults<C::Hit>, ServiceError<C::Error>> {
    let pattern = contains_pattern(&request.query);
    let mut results = SearchResults::default();

    for kind in request.filter.kinds() {
        let hits = catalog
            .search(kind, &pattern, request.page)
            .await
            .map_err(ServiceError::Persistence)?;
        results.insert(kind, hits);
    }

    tracing::debug!(
        query = %request.query,
        filter = %request.filter,
        limit = request.page.limit,
        offset = request.page.offset,
        results = results.total(),
        "Search executed",
    );

    Ok(results)
}

/// Count every match per selected kind.
pub async fn search_counts<C: EntityCatalog>(
    catalog: &C,
    query: &str,
    filter: KindFilter,
) -> Result<SearchCounts, ServiceError<C::Error>> {
    let query = validate_query(query)?;
    let pattern = contains_pattern(&query);

    let mut counts = BTreeMap::new();
    for kind in filter.kinds() {
        let count = catalog
            .count_matches(kind, &pattern)
            .await
            .map_err(ServiceError::Persistence)?;
        counts.insert(kind, count);
    }
    let total = counts.values().sum();

    Ok(SearchCounts { counts, total })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
