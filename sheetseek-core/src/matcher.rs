//! Digit-only key normalization and partial-match lookup
//!
//! Matching runs in two explicit steps: [`project_keys`] derives one
//! canonical key per record, then [`filter_keys`] keeps the records whose key
//! contains the canonical query.

use crate::error::{Result, SearchError};
use crate::table::{Record, UnifiedTable};
use indexmap::IndexSet;
use serde::Serialize;

/// Keep only the ASCII digits of a value, in order. Absent values yield `""`.
pub fn canonicalize(text: Option<&str>) -> String {
    text.map(|t| t.chars().filter(char::is_ascii_digit).collect::<String>())
        .unwrap_or_default()
}

/// Canonical form of a raw query; a query without digits is rejected
/// instead of matching every row.
pub fn canonical_query(query: &str) -> Result<String> {
    let key = canonicalize(Some(query));
    if key.is_empty() {
        return Err(SearchError::EmptyQuery {
            query: query.to_string(),
        });
    }
    Ok(key)
}

/// One canonical key per record, derived from `column`
pub fn project_keys(table: &UnifiedTable, column: &str) -> Result<Vec<String>> {
    let index = table.column_index(column)?;
    Ok(table
        .records()
        .iter()
        .map(|record| canonicalize(record.value(index)))
        .collect())
}

/// A record whose key contains the query key
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRow<'a> {
    /// Position in the unified table
    pub position: usize,
    pub record: &'a Record,
    pub key: String,
}

impl MatchedRow<'_> {
    pub fn origin(&self) -> &str {
        self.record.origin()
    }
}

/// Records matching one query, in table order
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub table: &'a UnifiedTable,
    pub column: String,
    pub query_key: String,
    pub rows: Vec<MatchedRow<'a>>,
}

impl MatchResult<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Distinct (key, origin) pair shown when a query matches nothing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KeyOrigin {
    pub key: String,
    pub origin: String,
}

/// Keep the records whose key contains `query_key`. `keys` must come from
/// [`project_keys`] on the same table.
pub fn filter_keys<'a>(
    table: &'a UnifiedTable,
    keys: &[String],
    query_key: &str,
) -> Vec<MatchedRow<'a>> {
    table
        .records()
        .iter()
        .zip(keys)
        .enumerate()
        .filter(|(_, (_, key))| key.contains(query_key))
        .map(|(position, (record, key))| MatchedRow {
            position,
            record,
            key: key.clone(),
        })
        .collect()
}

/// Distinct (key, origin) pairs in first-occurrence order
pub fn distinct_pairs(table: &UnifiedTable, keys: &[String]) -> Vec<KeyOrigin> {
    let pairs: IndexSet<(&str, &str)> = table
        .records()
        .iter()
        .zip(keys)
        .map(|(record, key)| (key.as_str(), record.origin()))
        .collect();

    pairs
        .into_iter()
        .map(|(key, origin)| KeyOrigin {
            key: key.to_string(),
            origin: origin.to_string(),
        })
        .collect()
}

/// Find every record whose `column` key contains the digits of `query`
pub fn find_matches<'a>(
    table: &'a UnifiedTable,
    column: &str,
    query: &str,
) -> Result<MatchResult<'a>> {
    let keys = project_keys(table, column)?;
    let query_key = canonical_query(query)?;
    let rows = filter_keys(table, &keys, &query_key);

    tracing::debug!(column, query_key = %query_key, matches = rows.len(), "search");

    Ok(MatchResult {
        table,
        column: column.to_string(),
        query_key,
        rows,
    })
}

/// Diagnostic projection of `column`: distinct (key, origin) pairs
pub fn distinct_keys(table: &UnifiedTable, column: &str) -> Result<Vec<KeyOrigin>> {
    let keys = project_keys(table, column)?;
    Ok(distinct_pairs(table, &keys))
}
