//! Tag browsing and conjunctive free-text search over `entries`.

use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::debug;

use crate::db::entries::{ENTRY_COLUMNS, list_all};
use crate::db::models::Entry;
use crate::error::RecipeError;

/// Columns each token is matched against; a token matches an entry when any of them
/// contains it.
const SEARCH_FIELDS: [&str; 3] = ["tags", "title", "ingredients"];

/// A parsed search query: every token must match, each in at least one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    tokens: Vec<String>,
}

impl SearchFilter {
    /// Split on single spaces. Consecutive spaces yield empty tokens, which match
    /// everything.
    pub fn parse(query: &str) -> Self {
        Self {
            tokens: query.split(' ').map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Bound parameters in binding order: each token once per field, the whole list
    /// sorted. Sorting keeps a token's copies adjacent, so every clause still
    /// receives a single token.
    pub fn params(&self) -> Vec<String> {
        let mut params: Vec<String> = self
            .tokens
            .iter()
            .flat_map(|t| std::iter::repeat_n(t.clone(), SEARCH_FIELDS.len()))
            .collect();
        params.sort();
        params
    }

    /// One parenthesized OR-clause per token, AND-ed together.
    pub fn build(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE "));
        let params = self.params();
        for (i, clause) in params.chunks(SEARCH_FIELDS.len()).enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            qb.push("(");
            for (j, (field, value)) in SEARCH_FIELDS.iter().zip(clause).enumerate() {
                if j > 0 {
                    qb.push(" OR ");
                }
                qb.push(*field)
                    .push(" LIKE ('%' || ")
                    .push_bind(value.clone())
                    .push(" || '%')");
            }
            qb.push(")");
        }
        qb.push(" ORDER BY id ASC");
        qb
    }
}

/// Entries matching every token of `query`; an empty query lists everything.
pub async fn search(conn: &mut SqliteConnection, query: &str) -> Result<Vec<Entry>, RecipeError> {
    if query.is_empty() {
        return list_all(conn).await;
    }
    let filter = SearchFilter::parse(query);
    debug!(tokens = ?filter.tokens(), "running search");
    let entries = filter
        .build()
        .build_query_as::<Entry>()
        .fetch_all(&mut *conn)
        .await?;
    Ok(entries)
}

/// Distinct tags across all entries, sorted.
pub async fn all_tags(conn: &mut SqliteConnection) -> Result<Vec<String>, RecipeError> {
    let rows: Vec<String> = sqlx::query_scalar("SELECT tags FROM entries")
        .fetch_all(&mut *conn)
        .await?;
    Ok(distinct_tags(rows.iter().map(String::as_str)))
}

fn distinct_tags<'a>(fields: impl Iterator<Item = &'a str>) -> Vec<String> {
    fields
        .flat_map(|tags| tags.split(' '))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
