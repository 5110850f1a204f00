//! Error types for loading and searching

use thiserror::Error;

/// Errors surfaced to the caller of a load or a search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to read workbook '{source_name}': {source}")]
    Load {
        source_name: String,
        #[source]
        source: calamine::Error,
    },

    #[error("Unknown column '{name}' (available: {})", .available.join(", "))]
    UnknownColumn { name: String, available: Vec<String> },

    #[error("Query '{query}' contains no digits")]
    EmptyQuery { query: String },

    #[error("No column selected. Call select_column() first")]
    NoColumnSelected,

    #[error("Invalid header placeholder pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_column_lists_available() {
        let err = SearchError::UnknownColumn {
            name: "CPF".to_string(),
            available: vec!["CNPJ".to_string(), "Nome".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown column 'CPF' (available: CNPJ, Nome)"
        );
    }

    #[test]
    fn test_empty_query_message() {
        let err = SearchError::EmptyQuery {
            query: "abc".to_string(),
        };
        assert!(err.to_string().contains("'abc'"));
    }
}
