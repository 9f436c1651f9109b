//! End-to-end tests for formconv-xlsx.
//!
//! Each test builds the workbook it needs as an XLSX archive in a temp
//! file (inline-string cells only), reads it back with `XlsxReader` and
//! asserts on the resulting grids.

mod common;
mod reading;

pub use common::*;
