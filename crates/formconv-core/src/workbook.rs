//! Workbook type - named sheets of string cells

use crate::error::{Error, Result};

/// A sheet: a name and a grid of cell texts
///
/// Rows may have different lengths; missing cells read as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create a new sheet
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All rows of the sheet
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Text of a cell (0-based indices), empty when out of the grid
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A workbook as seen by the converter: an ordered set of named sheets
///
/// Spreadsheet readers produce this; the converter only ever asks for the
/// rows of a sheet by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create an empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Add a sheet, returning its index
    pub fn add_sheet(&mut self, name: &str, rows: Vec<Vec<String>>) -> Result<usize> {
        self.validate_sheet_name(name)?;
        self.sheets.push(Sheet::new(name, rows));
        Ok(self.sheets.len() - 1)
    }

    /// Builder-style variant of [`Workbook::add_sheet`] taking string slices
    pub fn with_sheet(mut self, name: &str, rows: &[&[&str]]) -> Result<Self> {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        self.add_sheet(name, rows)?;
        Ok(self)
    }

    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Rows of the named sheet, `None` when the sheet is absent
    pub fn rows(&self, name: &str) -> Option<&[Vec<String>]> {
        self.sheet(name).map(Sheet::rows)
    }

    /// Iterate over all sheets
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter()
    }

    /// Names of all sheets, in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName(name.to_string()));
        }
        if self.sheet(name).is_some() {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }
        Ok(())
    }
}
