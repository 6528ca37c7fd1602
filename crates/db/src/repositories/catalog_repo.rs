//! Registry-driven queries that look the same for every entity kind.
//!
//! Table, key, and column names come from [`EntityKind::descriptor`], never
//! from caller input, so interpolating them into SQL is safe.

use planboard_core::entity::EntityKind;
use sqlx::PgPool;

/// `(alias.col1 ILIKE $n OR alias.col2 ILIKE $n ...)` over the kind's
/// search columns.
pub(crate) fn match_clause(kind: EntityKind, alias: &str, param: usize) -> String {
    let columns = kind
        .descriptor()
        .search_columns
        .iter()
        .map(|column| format!("{alias}.{column} ILIKE ${param}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("({columns})")
}

/// Counting and suggestion queries shared by all kinds.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Number of rows of `kind` matching `pattern` on any search column.
    pub async fn count_matches(
        pool: &PgPool,
        kind: EntityKind,
        pattern: &str,
    ) -> Result<i64, sqlx::Error> {
        let d = kind.descriptor();
        let query = format!(
            "SELECT COUNT(*) FROM {table} e WHERE {matches}",
            table = d.table,
            matches = match_clause(kind, "e", 1),
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(pattern)
            .fetch_one(pool)
            .await
    }

    /// Up to `limit` name-column values of `kind` matching `pattern`,
    /// newest first.
    pub async fn suggest_names(
        pool: &PgPool,
        kind: EntityKind,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        let d = kind.descriptor();
        let query = format!(
            "SELECT e.{name} FROM {table} e
             WHERE e.{name} ILIKE $1
             ORDER BY e.{id} DESC
             LIMIT $2",
            name = d.name_column,
            table = d.table,
            id = d.id_column,
        );
        sqlx::query_scalar::<_, String>(&query)
            .bind(pattern)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
