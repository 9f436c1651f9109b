//! Conversion error types

use thiserror::Error;

use formconv_formula::CompileError;

/// Result type for conversions
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur while converting an xlsform
///
/// Lines are 1-based row numbers of the sheet the offending row was read
/// from.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Group/repeat nesting, node id overflow
    #[error("line {line}: {message}")]
    Structure { line: usize, message: String },

    /// Invalid cell content
    #[error("line {line}: {message}")]
    Validation { line: usize, message: String },

    /// A formula that doesn't compile
    #[error("line {line}: {source}")]
    Compile {
        line: usize,
        #[source]
        source: CompileError,
    },

    /// A table sheet that can't back its field
    #[error("Table {table}: {message}")]
    Resource { table: String, message: String },

    /// Missing sheets or columns
    #[error(transparent)]
    Decode(#[from] formconv_core::Error),

    #[cfg(feature = "xlsx")]
    #[error(transparent)]
    Xlsx(#[from] formconv_xlsx::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input file extension with no reader
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

impl ConvertError {
    pub(crate) fn structure(line: usize, message: impl Into<String>) -> Self {
        Self::Structure {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn validation(line: usize, message: impl Into<String>) -> Self {
        Self::Validation {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn resource(table: &str, message: impl Into<String>) -> Self {
        Self::Resource {
            table: table.to_string(),
            message: message.into(),
        }
    }

    /// Source line of the error, when it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Structure { line, .. }
            | Self::Validation { line, .. }
            | Self::Compile { line, .. } => Some(*line),
            _ => None,
        }
    }
}
