//! sheetseek-core: unify workbook sheets and search them by a normalized identifier
//!
//! Every sheet of a workbook is stacked into one [`UnifiedTable`] tagged with
//! the sheet each row came from. A chosen column (typically a CNPJ) is reduced
//! to its digits and searched by substring, so `79.759.890/0001-06`,
//! `79759890000106` and `0001-06` all find the same record.

pub mod config;
pub mod error;
pub mod matcher;
pub mod reader;
pub mod report;
pub mod session;
pub mod table;
pub mod unify;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use matcher::{KeyOrigin, MatchResult, MatchedRow, canonicalize, distinct_keys, find_matches};
pub use reader::RawSheet;
pub use report::DisplayTable;
pub use session::{SearchOutcome, Session};
pub use table::{Record, SheetSummary, Summary, UnifiedTable};
pub use unify::unify;
