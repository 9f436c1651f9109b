//! # formconv
//!
//! Convert xlsform spreadsheets into AJF form definitions.
//!
//! An xlsform describes a survey with a `survey` sheet of questions, a
//! `choices` sheet of option lists and an optional `settings` sheet. This
//! crate turns it into the JSON document read by the AJF form engine:
//! slides, groups, repeating slides and fields, with their `relevant`,
//! `constraint` and `calculation` formulas compiled to JavaScript.
//!
//! ## Features
//!
//! - Reading `.xlsx` files (feature `xlsx`, on by default)
//! - Group and repeat nesting checks, with the line of the offending row
//! - Formula compilation through [`formconv_formula`]
//! - Table fields backed by their own sheet
//! - Settings tags and translations
//!
//! ## Example
//!
//! ```rust
//! use formconv::prelude::*;
//!
//! let workbook = Workbook::new()
//!     .with_sheet(
//!         "survey",
//!         &[
//!             &["type", "name", "label", "relevant"],
//!             &["integer", "age", "Age", ""],
//!             &["text", "job", "Job", "${age} >= 18"],
//!         ],
//!     )
//!     .unwrap()
//!     .with_sheet("choices", &[&["list name", "name", "label"]])
//!     .unwrap();
//!
//! let doc = convert_workbook(&workbook).unwrap();
//! let job = doc.find("job").unwrap();
//! assert_eq!(job.visibility.as_ref().unwrap().condition, "age >= 18");
//!
//! let json = JsonWriter::to_string(&doc, &WriteOptions::default()).unwrap();
//! assert!(json.contains("\"nodeType\": 3"));
//! ```

pub mod builder;
pub mod choices;
pub mod convert;
pub mod document;
pub mod error;
pub mod ids;
pub mod prelude;
pub mod preprocess;
pub mod row_type;
pub mod settings;
pub mod translation;
pub mod validate;
pub mod writer;

pub use convert::{convert, convert_workbook};
pub use document::{
    Choice, ChoicesOrigin, Condition, Document, Field, FieldType, FieldValidation, Formula, Node,
    NodeType, TableCell, Tag, TranslationMap, ValidationCondition,
};
pub use error::{ConvertError, ConvertResult};
pub use writer::{Indent, JsonWriter, WriteOptions};

// Re-export input types
pub use formconv_core::{decode, Workbook, XlsForm};
pub use formconv_formula::{CompileError, Compiler, FormulaContext};
#[cfg(feature = "xlsx")]
pub use formconv_xlsx::{XlsxError, XlsxReader};

use std::path::Path;

/// Read a spreadsheet, choosing the reader from the file extension
pub fn open<P: AsRef<Path>>(path: P) -> ConvertResult<Workbook> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        #[cfg(feature = "xlsx")]
        Some("xlsx") | Some("xlsm") => Ok(XlsxReader::read_file(path)?),
        _ => Err(ConvertError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Read and decode a spreadsheet
pub fn open_form<P: AsRef<Path>>(path: P) -> ConvertResult<XlsForm> {
    Ok(decode(&open(path)?)?)
}

/// Read and convert a spreadsheet
pub fn convert_file<P: AsRef<Path>>(path: P) -> ConvertResult<Document> {
    convert(&open_form(path)?)
}
