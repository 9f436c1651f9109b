//! # formconv-xlsx
//!
//! XLSX (Office Open XML) reader for formconv.
//!
//! Only cell texts are read: every sheet becomes rows of strings in a
//! [`formconv_core::Workbook`], each row ending at its last non-empty cell. Styles, formulas and comments
//! are ignored.

pub mod error;
pub mod reader;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
