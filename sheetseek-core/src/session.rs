//! One loaded workbook searched repeatedly

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::matcher::{
    KeyOrigin, MatchResult, canonical_query, distinct_pairs, filter_keys, project_keys,
};
use crate::reader::{self, RawSheet};
use crate::table::{Summary, UnifiedTable};
use crate::unify::unify;
use std::path::Path;

/// Outcome of a query that ran to completion
#[derive(Debug, Clone)]
pub enum SearchOutcome<'a> {
    Found(MatchResult<'a>),
    /// Nothing matched; `candidates` lists every distinct (key, origin) pair
    NotFound {
        query_key: String,
        candidates: Vec<KeyOrigin>,
    },
}

#[derive(Debug, Clone)]
struct Selection {
    column: String,
    keys: Vec<String>,
}

/// A unified table owned by one user, plus the column chosen for searching.
///
/// The table is never modified after loading. Keys are projected once per
/// selected column and reused by every search.
#[derive(Debug, Clone)]
pub struct Session {
    table: UnifiedTable,
    selection: Option<Selection>,
}

impl Session {
    /// Load a workbook from disk
    pub fn open<P: AsRef<Path>>(path: P, config: &SearchConfig) -> Result<Self> {
        let sheets = reader::read_workbook(path)?;
        Self::from_sheets(&sheets, config)
    }

    /// Load a workbook received as bytes
    pub fn from_bytes(bytes: &[u8], source_name: &str, config: &SearchConfig) -> Result<Self> {
        let sheets = reader::read_workbook_from_bytes(bytes, source_name)?;
        Self::from_sheets(&sheets, config)
    }

    /// Build a session from already-read sheets. The configured key column is
    /// selected when the table has it.
    pub fn from_sheets(sheets: &[RawSheet], config: &SearchConfig) -> Result<Self> {
        let table = unify(sheets, config)?;
        let mut session = Self {
            table,
            selection: None,
        };

        if let Some(column) = &config.global.key_column {
            if session.table.has_column(column) {
                session.select_column(column)?;
            } else {
                tracing::warn!(column = %column, "configured key column not found in workbook");
            }
        }

        Ok(session)
    }

    pub fn table(&self) -> &UnifiedTable {
        &self.table
    }

    pub fn summary(&self) -> Summary {
        self.table.summary()
    }

    pub fn selected_column(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.column.as_str())
    }

    /// Choose the column to search. On error the previous selection stays.
    pub fn select_column(&mut self, column: &str) -> Result<()> {
        if self.selected_column() == Some(column) {
            return Ok(());
        }

        let keys = project_keys(&self.table, column)?;
        tracing::debug!(column, rows = keys.len(), "projected keys");
        self.selection = Some(Selection {
            column: column.to_string(),
            keys,
        });
        Ok(())
    }

    /// Run one query against the selected column
    pub fn search(&self, query: &str) -> Result<SearchOutcome<'_>> {
        let selection = self
            .selection
            .as_ref()
            .ok_or(SearchError::NoColumnSelected)?;
        let query_key = canonical_query(query)?;
        let rows = filter_keys(&self.table, &selection.keys, &query_key);

        tracing::debug!(
            column = %selection.column,
            query_key = %query_key,
            matches = rows.len(),
            "search"
        );

        if rows.is_empty() {
            return Ok(SearchOutcome::NotFound {
                candidates: distinct_pairs(&self.table, &selection.keys),
                query_key,
            });
        }

        Ok(SearchOutcome::Found(MatchResult {
            table: &self.table,
            column: selection.column.clone(),
            query_key,
            rows,
        }))
    }

    /// Distinct (key, origin) pairs of the selected column
    pub fn candidates(&self) -> Result<Vec<KeyOrigin>> {
        let selection = self
            .selection
            .as_ref()
            .ok_or(SearchError::NoColumnSelected)?;
        Ok(distinct_pairs(&self.table, &selection.keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheets() -> Vec<RawSheet> {
        vec![
            RawSheet::new(
                "A",
                vec!["CNPJ".to_string(), "Nome".to_string()],
                vec![
                    vec![Some("79.759.890/0001-06".to_string()), Some("Acme".to_string())],
                    vec![Some("11.111.111/1111-11".to_string()), Some("Beta".to_string())],
                ],
            ),
            RawSheet::new(
                "B",
                vec!["CNPJ".to_string(), "Telefone".to_string()],
                vec![vec![Some("79759890000106".to_string()), Some("555".to_string())]],
            ),
        ]
    }

    #[test]
    fn test_search_requires_column() {
        let session = Session::from_sheets(&sheets(), &SearchConfig::default()).unwrap();
        assert_eq!(session.selected_column(), None);
        assert!(matches!(
            session.search("123"),
            Err(SearchError::NoColumnSelected)
        ));
        assert!(session.candidates().is_err());
    }

    #[test]
    fn test_configured_key_column_is_selected() {
        let mut config = SearchConfig::default();
        config.global.key_column = Some("CNPJ".to_string());
        let session = Session::from_sheets(&sheets(), &config).unwrap();
        assert_eq!(session.selected_column(), Some("CNPJ"));

        config.global.key_column = Some("CPF".to_string());
        let session = Session::from_sheets(&sheets(), &config).unwrap();
        assert_eq!(session.selected_column(), None);
    }

    #[test]
    fn test_found_and_not_found() {
        let mut session = Session::from_sheets(&sheets(), &SearchConfig::default()).unwrap();
        session.select_column("CNPJ").unwrap();

        match session.search("79.759.890").unwrap() {
            SearchOutcome::Found(result) => {
                let origins: Vec<_> = result.rows.iter().map(|r| r.origin()).collect();
                assert_eq!(origins, vec!["A", "B"]);
                assert_eq!(result.column, "CNPJ");
            }
            other => panic!("expected matches, got {other:?}"),
        }

        match session.search("424242").unwrap() {
            SearchOutcome::NotFound {
                query_key,
                candidates,
            } => {
                assert_eq!(query_key, "424242");
                assert_eq!(candidates.len(), 3);
                assert_eq!(candidates[1].key, "11111111111111");
            }
            other => panic!("expected no match, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_calls_keep_session_usable() {
        let mut session = Session::from_sheets(&sheets(), &SearchConfig::default()).unwrap();
        session.select_column("CNPJ").unwrap();

        assert!(matches!(
            session.select_column("CPF"),
            Err(SearchError::UnknownColumn { .. })
        ));
        assert_eq!(session.selected_column(), Some("CNPJ"));

        assert!(matches!(
            session.search("--"),
            Err(SearchError::EmptyQuery { .. })
        ));
        assert!(matches!(
            session.search("1111"),
            Ok(SearchOutcome::Found(_))
        ));
    }

    #[test]
    fn test_changing_column_recomputes_keys() {
        let mut session = Session::from_sheets(&sheets(), &SearchConfig::default()).unwrap();
        session.select_column("CNPJ").unwrap();
        session.select_column("Telefone").unwrap();

        let candidates = session.candidates().unwrap();
        let keys: Vec<_> = candidates.iter().map(|c| (c.key.as_str(), c.origin.as_str())).collect();
        assert_eq!(keys, vec![("", "A"), ("555", "B")]);
    }

    #[test]
    fn test_sessions_are_independent() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Session>();

        let mut first = Session::from_sheets(&sheets(), &SearchConfig::default()).unwrap();
        let second = Session::from_sheets(&sheets()[1..], &SearchConfig::default()).unwrap();
        first.select_column("Nome").unwrap();

        assert_eq!(first.summary().row_count, 3);
        assert_eq!(second.summary().row_count, 1);
        assert_eq!(second.selected_column(), None);
    }
}
