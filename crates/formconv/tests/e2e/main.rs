//! End-to-end tests for formconv.
//!
//! Most tests build a [`Workbook`](formconv::Workbook) in memory and check
//! the converted document; `files` goes through an XLSX archive on disk.

mod fields;
mod files;
mod output;
mod structure;

pub use common::*;
