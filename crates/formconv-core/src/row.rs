//! Row types
//!
//! A [`Row`] maps column keys to cell text and remembers the 1-based line it
//! was read from. [`SurveyRow`], [`ChoicesRow`] and [`SettingsRow`] wrap it
//! with typed accessors for the columns of their sheet.

use std::collections::BTreeMap;
use std::fmt;

use crate::language::{split_lang, FALLBACK_LANG, LANG_SEPARATOR};

/// Column names used by the xlsform sheets
pub mod columns {
    pub const TYPE: &str = "type";
    pub const NAME: &str = "name";
    pub const LABEL: &str = "label";
    pub const HINT: &str = "hint";
    pub const RELEVANT: &str = "relevant";
    pub const CONSTRAINT: &str = "constraint";
    pub const CONSTRAINT_MESSAGE: &str = "constraint_message";
    pub const CALCULATION: &str = "calculation";
    pub const REQUIRED: &str = "required";
    pub const REQUIRED_MESSAGE: &str = "required_message";
    pub const REPEAT_COUNT: &str = "repeat_count";
    pub const READONLY: &str = "readonly";
    pub const DEFAULT: &str = "default";
    pub const APPEARANCE: &str = "appearance";
    pub const CHOICE_FILTER: &str = "choice_filter";
    pub const PARAMETERS: &str = "parameters";

    pub const LIST_NAME: &str = "list name";

    pub const TAG_LABEL: &str = "tag label";
    pub const TAG_VALUE: &str = "tag value";
}

/// A column name together with its language (empty for the default one)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey {
    name: String,
    lang: String,
}

impl ColumnKey {
    /// Create a key from its parts
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }

    /// Parse a header cell such as `label::Italian (it)`
    pub fn parse(header: &str) -> Self {
        let (name, lang) = split_lang(header);
        Self::new(name, lang)
    }

    /// Column name without language
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Language, empty for the default one
    pub fn lang(&self) -> &str {
        &self.lang
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lang.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}{}{}", self.name, LANG_SEPARATOR, self.lang)
        }
    }
}

/// A sheet record
///
/// Empty cells are not stored, so two rows compare equal when their
/// non-empty cells and line numbers are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<ColumnKey, String>,
    line: usize,
}

impl Row {
    /// Create an empty row read from `line` (1-based, 0 for synthetic rows)
    pub fn new(line: usize) -> Self {
        Self {
            cells: BTreeMap::new(),
            line,
        }
    }

    /// Create a synthetic row from `(header, value)` pairs
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut row = Self::new(0);
        for (header, value) in pairs {
            row.set(header, *value);
        }
        row
    }

    /// Set the line number
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Source line (1-based)
    pub fn line(&self) -> usize {
        self.line
    }

    /// Set a cell by header text; empty values clear the cell
    pub fn set(&mut self, header: &str, value: impl Into<String>) {
        let key = ColumnKey::parse(header);
        let value = value.into();
        if value.is_empty() {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, value);
        }
    }

    /// Cell of the default language
    pub fn get(&self, name: &str) -> &str {
        self.get_lang(name, "")
    }

    /// Cell of a given language
    ///
    /// The default language falls back to the `English` column when the
    /// untagged one is absent.
    pub fn get_lang(&self, name: &str, lang: &str) -> &str {
        let lookup = |lang: &str| {
            self.cells
                .get(&ColumnKey::new(name, lang))
                .map(String::as_str)
        };
        let found = if lang.is_empty() {
            lookup("").or_else(|| lookup(FALLBACK_LANG))
        } else {
            lookup(lang)
        };
        found.unwrap_or("")
    }

    /// Iterate over the non-empty cells
    pub fn cells(&self) -> impl Iterator<Item = (&ColumnKey, &str)> {
        self.cells.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Check if the row has no non-empty cell
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A row of the `survey` sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyRow(Row);

impl SurveyRow {
    pub fn new(row: Row) -> Self {
        Self(row)
    }

    /// Synthetic survey row, see [`Row::from_pairs`]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(Row::from_pairs(pairs))
    }

    pub fn row(&self) -> &Row {
        &self.0
    }

    pub fn line(&self) -> usize {
        self.0.line()
    }

    pub fn row_type(&self) -> &str {
        self.0.get(columns::TYPE)
    }

    pub fn name(&self) -> &str {
        self.0.get(columns::NAME)
    }

    pub fn label(&self, lang: &str) -> &str {
        self.0.get_lang(columns::LABEL, lang)
    }

    pub fn hint(&self, lang: &str) -> &str {
        self.0.get_lang(columns::HINT, lang)
    }

    pub fn relevant(&self) -> &str {
        self.0.get(columns::RELEVANT)
    }

    pub fn constraint(&self) -> &str {
        self.0.get(columns::CONSTRAINT)
    }

    pub fn constraint_message(&self, lang: &str) -> &str {
        self.0.get_lang(columns::CONSTRAINT_MESSAGE, lang)
    }

    pub fn calculation(&self) -> &str {
        self.0.get(columns::CALCULATION)
    }

    pub fn required(&self) -> &str {
        self.0.get(columns::REQUIRED)
    }

    pub fn required_message(&self, lang: &str) -> &str {
        self.0.get_lang(columns::REQUIRED_MESSAGE, lang)
    }

    pub fn repeat_count(&self) -> &str {
        self.0.get(columns::REPEAT_COUNT)
    }

    pub fn readonly(&self) -> &str {
        self.0.get(columns::READONLY)
    }

    pub fn default_value(&self) -> &str {
        self.0.get(columns::DEFAULT)
    }

    pub fn appearance(&self) -> &str {
        self.0.get(columns::APPEARANCE)
    }

    pub fn choice_filter(&self) -> &str {
        self.0.get(columns::CHOICE_FILTER)
    }

    pub fn parameters(&self) -> &str {
        self.0.get(columns::PARAMETERS)
    }
}

/// A row of the `choices` sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoicesRow(Row);

impl ChoicesRow {
    pub fn new(row: Row) -> Self {
        Self(row)
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(Row::from_pairs(pairs))
    }

    pub fn row(&self) -> &Row {
        &self.0
    }

    pub fn line(&self) -> usize {
        self.0.line()
    }

    pub fn list_name(&self) -> &str {
        self.0.get(columns::LIST_NAME)
    }

    pub fn name(&self) -> &str {
        self.0.get(columns::NAME)
    }

    pub fn label(&self, lang: &str) -> &str {
        self.0.get_lang(columns::LABEL, lang)
    }

    /// Cells of columns the xlsform convention doesn't define, keyed by
    /// their header text
    pub fn user_defined_cells(&self) -> impl Iterator<Item = (String, &str)> {
        self.0
            .cells()
            .filter(|(key, _)| {
                !matches!(
                    key.name(),
                    columns::LIST_NAME | columns::NAME | columns::LABEL
                )
            })
            .map(|(key, value)| (key.to_string(), value))
    }
}

/// A row of the optional `settings` sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsRow(Row);

impl SettingsRow {
    pub fn new(row: Row) -> Self {
        Self(row)
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(Row::from_pairs(pairs))
    }

    pub fn line(&self) -> usize {
        self.0.line()
    }

    pub fn tag_label(&self) -> &str {
        self.0.get(columns::TAG_LABEL)
    }

    pub fn tag_value(&self) -> &str {
        self.0.get(columns::TAG_VALUE)
    }
}
