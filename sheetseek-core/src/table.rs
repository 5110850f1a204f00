//! Unified table built from all sheets of a workbook

use crate::error::{Result, SearchError};
use indexmap::IndexSet;
use serde::Serialize;
use std::fmt;

/// All sheets of a workbook stacked into one table.
///
/// Provenance lives in [`Record::origin`], never in a data column, so a sheet
/// with its own "Origin" column keeps that data intact.
#[derive(Debug, Clone)]
pub struct UnifiedTable {
    pub(crate) columns: IndexSet<String>,
    pub(crate) records: Vec<Record>,
    pub(crate) sheets: Vec<SheetSummary>,
    pub(crate) origin_label: String,
    pub(crate) key_label: String,
}

impl UnifiedTable {
    /// Ordered union of all sheet columns
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    /// Position of a data column
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .get_index_of(name)
            .ok_or_else(|| SearchError::UnknownColumn {
                name: name.to_string(),
                available: self.columns.iter().cloned().collect(),
            })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sheets that contributed rows, in load order
    pub fn sheets(&self) -> &[SheetSummary] {
        &self.sheets
    }

    /// Display label of the provenance column, never equal to a data column
    pub fn origin_label(&self) -> &str {
        &self.origin_label
    }

    /// Display label of the canonical key column, never equal to a data column
    pub fn key_label(&self) -> &str {
        &self.key_label
    }

    /// Counts shown after a load
    pub fn summary(&self) -> Summary {
        Summary {
            sheet_count: self.sheets.len(),
            row_count: self.records.len(),
        }
    }
}

/// One row of the unified table
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub(crate) origin: String,
    pub(crate) values: Vec<Option<String>>,
}

impl Record {
    /// Name of the sheet this row came from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Values aligned to [`UnifiedTable::column_names`]
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index)?.as_deref()
    }
}

/// Row count of one loaded sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub sheet_count: usize,
    pub row_count: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sheets loaded, {} rows in total",
            self.sheet_count, self.row_count
        )
    }
}

/// Pick `label`, or `label_1`, `label_2`, ... if a data column already uses it
pub(crate) fn disambiguate_label(label: &str, columns: &IndexSet<String>) -> String {
    if !columns.contains(label) {
        return label.to_string();
    }

    let mut suffix = 1;
    loop {
        let candidate = format!("{label}_{suffix}");
        if !columns.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> IndexSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_disambiguate_label() {
        assert_eq!(disambiguate_label("Origin", &columns(&["CNPJ"])), "Origin");
        assert_eq!(
            disambiguate_label("Origin", &columns(&["Origin"])),
            "Origin_1"
        );
        assert_eq!(
            disambiguate_label("Origin", &columns(&["Origin", "Origin_1"])),
            "Origin_2"
        );
    }

    #[test]
    fn test_unknown_column() {
        let table = UnifiedTable {
            columns: columns(&["CNPJ", "Nome"]),
            records: Vec::new(),
            sheets: Vec::new(),
            origin_label: "Origin".to_string(),
            key_label: "Key".to_string(),
        };

        assert_eq!(table.column_index("Nome").unwrap(), 1);
        match table.column_index("CPF") {
            Err(SearchError::UnknownColumn { name, available }) => {
                assert_eq!(name, "CPF");
                assert_eq!(available, vec!["CNPJ", "Nome"]);
            }
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_summary_display() {
        let summary = Summary {
            sheet_count: 2,
            row_count: 3,
        };
        assert_eq!(summary.to_string(), "2 sheets loaded, 3 rows in total");
    }
}
