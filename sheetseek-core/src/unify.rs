//! Header repair and concatenation of sheets into one table

use crate::config::{GlobalConfig, SearchConfig};
use crate::error::{Result, SearchError};
use crate::reader::RawSheet;
use crate::table::{Record, SheetSummary, UnifiedTable, disambiguate_label};
use indexmap::IndexSet;
use regex::Regex;
use std::collections::HashSet;

/// Compiled header repair settings
#[derive(Debug, Clone)]
pub struct HeaderRules {
    synthetic_prefix: String,
    placeholders: Vec<Regex>,
}

impl HeaderRules {
    pub fn new(config: &GlobalConfig) -> Result<Self> {
        let placeholders = config
            .placeholder_patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("(?i){pattern}")).map_err(|source| {
                    SearchError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            synthetic_prefix: config.synthetic_prefix.clone(),
            placeholders,
        })
    }

    /// Whether a trimmed header label was generated rather than typed
    pub fn is_placeholder(&self, label: &str) -> bool {
        label.is_empty() || self.placeholders.iter().any(|re| re.is_match(label))
    }

    /// Repair headers by position.
    ///
    /// Blank and placeholder cells become `<prefix> <i>`; other labels are
    /// trimmed. A label repeated within the sheet gets `.1`, `.2`, ... so
    /// every position keeps its own column.
    pub fn repair_headers(&self, headers: &[String], width: usize) -> Vec<String> {
        let mut used: HashSet<String> = HashSet::with_capacity(width);
        let mut repaired = Vec::with_capacity(width);

        for index in 0..width {
            let label = headers.get(index).map(|h| h.trim()).unwrap_or("");
            let name = if self.is_placeholder(label) {
                format!("{} {}", self.synthetic_prefix, index)
            } else {
                label.to_string()
            };

            let name = if used.contains(&name) {
                let mut suffix = 1;
                loop {
                    let candidate = format!("{name}.{suffix}");
                    if !used.contains(&candidate) {
                        break candidate;
                    }
                    suffix += 1;
                }
            } else {
                name
            };

            used.insert(name.clone());
            repaired.push(name);
        }

        repaired
    }
}

/// Stack all sheets into one table.
///
/// Columns are the union of repaired headers in first-encounter order; rows
/// keep sheet order then row order, each tagged with its sheet name.
pub fn unify(sheets: &[RawSheet], config: &SearchConfig) -> Result<UnifiedTable> {
    let rules = HeaderRules::new(&config.global)?;
    let mut columns: IndexSet<String> = IndexSet::new();
    let mut layouts: Vec<(&RawSheet, Vec<usize>)> = Vec::with_capacity(sheets.len());

    for sheet in sheets {
        if config.is_sheet_skipped(&sheet.name) {
            tracing::info!(sheet = %sheet.name, "skipping sheet");
            continue;
        }

        let width = sheet
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(sheet.headers.len()))
            .max()
            .unwrap_or(0);

        let positions: Vec<usize> = rules
            .repair_headers(&sheet.headers, width)
            .into_iter()
            .map(|name| columns.insert_full(name).0)
            .collect();
        layouts.push((sheet, positions));
    }

    let mut records = Vec::with_capacity(layouts.iter().map(|(s, _)| s.row_count()).sum());
    let mut summaries = Vec::with_capacity(layouts.len());

    for (sheet, positions) in &layouts {
        for row in &sheet.rows {
            let mut values = vec![None; columns.len()];
            for (cell, &target) in row.iter().zip(positions) {
                values[target] = cell.clone();
            }
            records.push(Record {
                origin: sheet.name.clone(),
                values,
            });
        }
        summaries.push(SheetSummary {
            name: sheet.name.clone(),
            rows: sheet.row_count(),
        });
    }

    let origin_label = disambiguate_label(&config.global.origin_label, &columns);
    if origin_label != config.global.origin_label {
        tracing::warn!(
            column = %config.global.origin_label,
            label = %origin_label,
            "data column shadows the origin label"
        );
    }
    let key_label = disambiguate_label(&config.global.key_label, &columns);

    tracing::info!(
        sheets = summaries.len(),
        rows = records.len(),
        columns = columns.len(),
        "unified workbook"
    );

    Ok(UnifiedTable {
        columns,
        records,
        sheets: summaries,
        origin_label,
        key_label,
    })
}
