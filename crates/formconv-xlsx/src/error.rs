//! XLSX error types

use thiserror::Error;

/// Result type for XLSX reading
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading an XLSX archive
#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a ZIP archive, or is corrupted
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive is not a spreadsheet
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// A part referenced by the workbook is absent
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A cell `r` attribute that is not an A1-style reference
    #[error("Invalid cell reference {reference:?} in {sheet:?}")]
    CellReference { sheet: String, reference: String },

    /// Sheet names rejected by the workbook model
    #[error(transparent)]
    Workbook(#[from] formconv_core::Error),
}
