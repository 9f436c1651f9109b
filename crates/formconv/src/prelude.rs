//! Prelude module - common imports for formconv users
//!
//! ```rust
//! use formconv::prelude::*;
//! ```

pub use crate::{
    // Conversion
    convert,
    convert_file,
    convert_workbook,
    decode,
    open,
    open_form,
    // Output types
    Document,
    Field,
    FieldType,
    Node,
    NodeType,
    // Error types
    ConvertError,
    ConvertResult,
    // Writing
    Indent,
    JsonWriter,
    WriteOptions,
    // Input types
    Workbook,
    XlsForm,
};

#[cfg(feature = "xlsx")]
pub use crate::XlsxReader;
