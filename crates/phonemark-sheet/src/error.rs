use phonemark_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("spreadsheet not found: {0}")]
    MissingFile(PathBuf),
    #[error("failed to open spreadsheet {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("spreadsheet has no worksheets: {0}")]
    NoWorksheet(PathBuf),
    #[error("header row {row} is past the end of the sheet ({rows} rows)")]
    MissingHeaderRow { row: usize, rows: usize },
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, SheetError>;
