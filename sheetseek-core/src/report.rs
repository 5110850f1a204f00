//! Tabular projections handed to renderers

use crate::matcher::{KeyOrigin, MatchResult};
use crate::table::UnifiedTable;
use serde::Serialize;

/// Named columns plus rows of optional text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl DisplayTable {
    /// Data columns in unified order, then the origin column last.
    /// The canonical key is not shown.
    pub fn from_matches(result: &MatchResult<'_>) -> Self {
        let table = result.table;
        let columns = data_columns_with_origin(table);

        let rows = result
            .rows
            .iter()
            .map(|row| {
                let mut values = row.record.values().to_vec();
                values.push(Some(row.origin().to_string()));
                values
            })
            .collect();

        Self { columns, rows }
    }

    /// Key and origin columns of the no-match diagnostic
    pub fn from_candidates(table: &UnifiedTable, candidates: &[KeyOrigin]) -> Self {
        Self {
            columns: vec![
                table.key_label().to_string(),
                table.origin_label().to_string(),
            ],
            rows: candidates
                .iter()
                .map(|c| vec![Some(c.key.clone()), Some(c.origin.clone())])
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn data_columns_with_origin(table: &UnifiedTable) -> Vec<String> {
    table
        .column_names()
        .into_iter()
        .map(str::to_string)
        .chain(std::iter::once(table.origin_label().to_string()))
        .collect()
}
