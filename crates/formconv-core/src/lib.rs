//! # formconv-core
//!
//! Core data structures for the formconv xlsform converter.
//!
//! This crate provides the types shared by the readers and the converter:
//! - [`Workbook`] and [`Sheet`] - Named grids of cell texts, as produced by a spreadsheet reader
//! - [`Row`], [`SurveyRow`], [`ChoicesRow`], [`SettingsRow`] - Typed sheet records
//! - [`XlsForm`] - The decoded content of an xlsform workbook
//!
//! ## Example
//!
//! ```rust
//! use formconv_core::{decode, Workbook};
//!
//! let workbook = Workbook::new()
//!     .with_sheet("survey", &[&["type", "name", "label"], &["text", "q1", "Name?"]])
//!     .unwrap()
//!     .with_sheet("choices", &[&["list name", "name", "label"]])
//!     .unwrap();
//!
//! let form = decode(&workbook).unwrap();
//! assert_eq!(form.survey[0].name(), "q1");
//! assert_eq!(form.survey[0].line(), 2);
//! ```

pub mod error;
pub mod language;
pub mod row;
pub mod workbook;
pub mod xlsform;

// Re-exports for convenience
pub use error::{Error, Result};
pub use language::{split_lang, FALLBACK_LANG, LANG_SEPARATOR};
pub use row::{columns, ChoicesRow, ColumnKey, Row, SettingsRow, SurveyRow};
pub use workbook::{Sheet, Workbook};
pub use xlsform::{decode, XlsForm, CHOICES_SHEET, SETTINGS_SHEET, SURVEY_SHEET};
