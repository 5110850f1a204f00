//! Raw sheet data structures

/// One worksheet as read from the file, before header repair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    /// Header cells in column order; blank cells are empty strings
    pub headers: Vec<String>,
    /// Data rows, each aligned to `headers`
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawSheet {
    /// Build a sheet from string literals, padding ragged rows to the header width
    pub fn new<S: Into<String>>(
        name: S,
        headers: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width.max(row.len()), None);
                row
            })
            .collect();
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}
