//! Excel/ODS file reader using calamine

use crate::error::{Result, SearchError};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

pub mod workbook;

pub use workbook::RawSheet;

/// Read every sheet of a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Vec<RawSheet>> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let mut excel = open_workbook_auto(path).map_err(|source| SearchError::Load {
        source_name: source_name.clone(),
        source,
    })?;

    read_sheets(&mut excel, &source_name)
}

/// Read every sheet of a workbook held in memory, e.g. an uploaded file
pub fn read_workbook_from_bytes(bytes: &[u8], source_name: &str) -> Result<Vec<RawSheet>> {
    let mut excel =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|source| SearchError::Load {
            source_name: source_name.to_string(),
            source,
        })?;

    read_sheets(&mut excel, source_name)
}

fn read_sheets<RS: Read + Seek>(excel: &mut Sheets<RS>, source_name: &str) -> Result<Vec<RawSheet>> {
    let sheet_names = excel.sheet_names();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in &sheet_names {
        // Any unreadable sheet fails the whole load
        let range = excel
            .worksheet_range(sheet_name)
            .map_err(|source| SearchError::Load {
                source_name: source_name.to_string(),
                source,
            })?;

        let sheet = parse_sheet(sheet_name, &range);
        tracing::debug!(
            sheet = %sheet.name,
            columns = sheet.width(),
            rows = sheet.row_count(),
            "read sheet"
        );
        sheets.push(sheet);
    }

    Ok(sheets)
}

/// Turn a calamine range into a header row plus text rows.
///
/// Cell positions are absolute: a range starting at column C still yields
/// two leading blank columns, so header positions match the sheet.
fn parse_sheet(name: &str, range: &Range<Data>) -> RawSheet {
    let Some((_, start_col)) = range.start() else {
        return RawSheet {
            name: name.to_string(),
            ..RawSheet::default()
        };
    };

    let leading = start_col as usize;
    let width = leading + range.width();

    let mut rows = range.rows().map(|cells| {
        let mut row: Vec<Option<String>> = Vec::with_capacity(width);
        row.resize(leading, None);
        row.extend(cells.iter().map(cell_to_text));
        row
    });

    let headers = rows
        .next()
        .map(|header| {
            header
                .into_iter()
                .map(|cell| cell.unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    RawSheet {
        name: name.to_string(),
        headers,
        rows: rows.collect(),
    }
}

/// Render a cell as text without coercing identifiers
fn cell_to_text(data: &Data) -> Option<String> {
    match data {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        // f64 Display never prints a trailing ".0" or an exponent
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::Error(e) => Some(e.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        }),
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::DurationIso(s) => Some(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn test_cell_to_text_keeps_identifiers() {
        assert_eq!(cell_to_text(&Data::Empty), None);
        assert_eq!(cell_to_text(&Data::String(String::new())), None);
        assert_eq!(
            cell_to_text(&Data::String("07.975.989/0001-06".to_string())).as_deref(),
            Some("07.975.989/0001-06")
        );
        assert_eq!(
            cell_to_text(&Data::Float(79759890000106.0)).as_deref(),
            Some("79759890000106")
        );
        assert_eq!(cell_to_text(&Data::Int(42)).as_deref(), Some("42"));
        assert_eq!(cell_to_text(&Data::Float(1.5)).as_deref(), Some("1.5"));
        assert_eq!(cell_to_text(&Data::Bool(true)).as_deref(), Some("True"));
        assert_eq!(cell_to_text(&Data::Bool(false)).as_deref(), Some("False"));
    }

    #[test]
    fn test_cell_to_text_renders_dates() {
        let date = ExcelDateTime::new(45122.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            cell_to_text(&Data::DateTime(date)).as_deref(),
            Some("2023-07-15 00:00:00")
        );

        let afternoon = ExcelDateTime::new(45122.75, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            cell_to_text(&Data::DateTime(afternoon)).as_deref(),
            Some("2023-07-15 18:00:00")
        );
    }

    #[test]
    fn test_parse_sheet_splits_header() {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("CNPJ".to_string()));
        range.set_value((1, 0), Data::String("11.111.111/1111-11".to_string()));
        range.set_value((1, 1), Data::String("Acme".to_string()));
        range.set_value((2, 0), Data::Float(22222222222222.0));

        let sheet = parse_sheet("A", &range);

        assert_eq!(sheet.name, "A");
        assert_eq!(sheet.headers, vec!["CNPJ".to_string(), String::new()]);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.rows[0][1].as_deref(), Some("Acme"));
        assert_eq!(sheet.rows[1][0].as_deref(), Some("22222222222222"));
        assert_eq!(sheet.rows[1][1], None);
    }

    #[test]
    fn test_parse_sheet_keeps_absolute_columns() {
        let mut range = Range::new((0, 2), (1, 2));
        range.set_value((0, 2), Data::String("CNPJ".to_string()));
        range.set_value((1, 2), Data::String("1".to_string()));

        let sheet = parse_sheet("A", &range);

        assert_eq!(sheet.headers, vec![String::new(), String::new(), "CNPJ".to_string()]);
        assert_eq!(sheet.rows[0][2].as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_empty_sheet() {
        let range: Range<Data> = Range::empty();
        let sheet = parse_sheet("Empty", &range);
        assert_eq!(sheet.name, "Empty");
        assert!(sheet.headers.is_empty());
        assert_eq!(sheet.row_count(), 0);
    }

    #[test]
    fn test_corrupt_bytes_fail_to_load() {
        let err = read_workbook_from_bytes(b"not a workbook", "upload.xlsx").unwrap_err();
        assert!(matches!(err, SearchError::Load { .. }));
        assert!(err.to_string().contains("upload.xlsx"));
    }

    #[test]
    fn test_missing_file_fails_to_load() {
        let err = read_workbook("does/not/exist.xlsx").unwrap_err();
        assert!(matches!(err, SearchError::Load { .. }));
    }
}
