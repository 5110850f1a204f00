//! Output formatters for search results

use anyhow::Result;
use colored::*;
use sheetseek_core::{DisplayTable, KeyOrigin, SearchOutcome, UnifiedTable};
use std::path::Path;

/// Print loaded sheets and the column list offered for searching
pub fn print_columns_human(file_path: &Path, table: &UnifiedTable) {
    println!("{}", format!("Loaded: {}", file_path.display()).bold());
    println!("{}", format!("✓ {}", table.summary()).green().bold());
    println!();

    for sheet in table.sheets() {
        println!("  {} {} ({} rows)", "Sheet:".bold(), sheet.name.cyan().bold(), sheet.rows);
    }
    println!();

    println!("{}", "Columns:".bold().underline());
    for (index, name) in table.column_names().iter().enumerate() {
        println!("  {:>3}  {}", index.to_string().bright_black(), name);
    }
}

pub fn print_columns_json(file_path: &Path, table: &UnifiedTable) -> Result<()> {
    let output = serde_json::json!({
        "file": file_path.display().to_string(),
        "sheets": table.sheets(),
        "columns": table.column_names(),
        "summary": table.summary(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print matches, or the no-match hint followed by every available key
pub fn print_outcome_human(table: &UnifiedTable, outcome: &SearchOutcome<'_>) {
    match outcome {
        SearchOutcome::Found(result) => {
            println!(
                "{}",
                format!("✓ {} records found.", result.len()).green().bold()
            );
            println!();
            print_table(&DisplayTable::from_matches(result));
        }
        SearchOutcome::NotFound {
            query_key,
            candidates,
        } => {
            println!(
                "{}",
                format!("No records found for '{}'.", query_key).yellow().bold()
            );
            println!(
                "  Check the identifier: digits only, with or without punctuation. Example: {}",
                "7975989000106".cyan()
            );
            println!();
            print_candidates_human(table, candidates);
        }
    }
}

pub fn print_outcome_json(table: &UnifiedTable, outcome: &SearchOutcome<'_>) -> Result<()> {
    let output = match outcome {
        SearchOutcome::Found(result) => serde_json::json!({
            "column": result.column,
            "query_key": result.query_key,
            "total": result.len(),
            "matches": DisplayTable::from_matches(result),
        }),
        SearchOutcome::NotFound {
            query_key,
            candidates,
        } => serde_json::json!({
            "query_key": query_key,
            "total": 0,
            "candidates": DisplayTable::from_candidates(table, candidates),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_candidates_human(table: &UnifiedTable, candidates: &[KeyOrigin]) {
    println!("{}", "Available keys:".bold().underline());
    print_table(&DisplayTable::from_candidates(table, candidates));
}

pub fn print_candidates_json(table: &UnifiedTable, candidates: &[KeyOrigin]) -> Result<()> {
    let output = serde_json::json!({
        "total": candidates.len(),
        "candidates": DisplayTable::from_candidates(table, candidates),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Render a table with left-aligned columns sized to their widest cell
fn print_table(view: &DisplayTable) {
    let cell = |value: &Option<String>| value.as_deref().unwrap_or("").to_string();

    let mut widths: Vec<usize> = view.columns.iter().map(|c| c.chars().count()).collect();
    for row in &view.rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell(value).chars().count());
        }
    }

    let header: Vec<String> = view
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, &width)| pad(name, width))
        .collect();
    println!("  {}", header.join("  ").bold());

    let rule: Vec<String> = widths.iter().map(|&width| "─".repeat(width)).collect();
    println!("  {}", rule.join("  ").bright_black());

    for row in &view.rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, &width)| pad(&cell(value), width))
            .collect();
        println!("  {}", line.join("  "));
    }

    println!();
    println!("  {} {}", "Rows:".bold(), view.len());
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}
