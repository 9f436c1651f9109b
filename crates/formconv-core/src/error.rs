//! Error types for formconv-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding an xlsform workbook
#[derive(Debug, Error)]
pub enum Error {
    /// A sheet the xlsform convention requires is absent
    #[error("Missing mandatory sheet {0:?}.")]
    MissingSheet(String),

    /// A sheet exists but contains no non-empty row
    #[error("Empty sheet {0:?}.")]
    EmptySheet(String),

    /// A mandatory column is absent from the header row
    #[error("Column {column:?} in sheet {sheet:?} is mandatory.")]
    MissingColumn { column: String, sheet: String },

    /// Two sheets share a name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0:?}")]
    InvalidSheetName(String),
}
