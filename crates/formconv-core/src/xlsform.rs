//! xlsform decoding: from a [`Workbook`] grid to typed rows
//!
//! Which sheets and columns are read is described by the static
//! [`SheetInfo`] tables below. A mandatory column is satisfied by its plain
//! header or by its `::English` variant (`label::English (en)`). Survey and
//! settings columns missing from the tables are ignored with a warning.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::language::{has_default_label, header_languages, split_lang, FALLBACK_LANG};
use crate::row::{columns, ChoicesRow, Row, SettingsRow, SurveyRow};
use crate::workbook::Workbook;

pub const SURVEY_SHEET: &str = "survey";
pub const CHOICES_SHEET: &str = "choices";
pub const SETTINGS_SHEET: &str = "settings";

/// A column read from a sheet
#[derive(Debug, Clone, Copy)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub mandatory: bool,
}

/// A sheet read from the workbook
#[derive(Debug, Clone, Copy)]
pub struct SheetInfo {
    pub name: &'static str,
    pub mandatory: bool,
    pub columns: &'static [ColumnInfo],
    /// Other columns carry data too (choice filter keys)
    pub extra_columns: bool,
}

const fn column(name: &'static str, mandatory: bool) -> ColumnInfo {
    ColumnInfo { name, mandatory }
}

pub static SURVEY_COLUMNS: SheetInfo = SheetInfo {
    name: SURVEY_SHEET,
    mandatory: true,
    columns: &[
        column(columns::TYPE, true),
        column(columns::NAME, true),
        column(columns::LABEL, true),
        column(columns::HINT, false),
        column(columns::RELEVANT, false),
        column(columns::CONSTRAINT, false),
        column(columns::CONSTRAINT_MESSAGE, false),
        column(columns::CALCULATION, false),
        column(columns::REQUIRED, false),
        column(columns::REQUIRED_MESSAGE, false),
        column(columns::REPEAT_COUNT, false),
        column(columns::READONLY, false),
        column(columns::DEFAULT, false),
        column(columns::APPEARANCE, false),
        column(columns::CHOICE_FILTER, false),
        column(columns::PARAMETERS, false),
    ],
    extra_columns: false,
};

pub static CHOICES_COLUMNS: SheetInfo = SheetInfo {
    name: CHOICES_SHEET,
    mandatory: true,
    columns: &[
        column(columns::LIST_NAME, true),
        column(columns::NAME, true),
        column(columns::LABEL, true),
    ],
    extra_columns: true,
};

pub static SETTINGS_COLUMNS: SheetInfo = SheetInfo {
    name: SETTINGS_SHEET,
    mandatory: false,
    columns: &[
        column(columns::TAG_LABEL, false),
        column(columns::TAG_VALUE, false),
    ],
    extra_columns: false,
};

/// The decoded content of an xlsform workbook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XlsForm {
    pub survey: Vec<SurveyRow>,
    pub choices: Vec<ChoicesRow>,
    pub settings: Vec<SettingsRow>,
    /// Grids of the sheets backing `table` fields, keyed by field name
    pub tables: HashMap<String, Vec<Vec<String>>>,
    /// Translation languages found in the survey and choices headers
    pub languages: BTreeSet<String>,
}

/// Decode the survey, choices and settings sheets of a workbook
pub fn decode(workbook: &Workbook) -> Result<XlsForm> {
    let mut form = XlsForm::default();

    if let Some(sheet) = read_sheet(workbook, &SURVEY_COLUMNS, &mut form.languages)? {
        form.survey = sheet.into_iter().map(SurveyRow::new).collect();
    }
    if let Some(sheet) = read_sheet(workbook, &CHOICES_COLUMNS, &mut form.languages)? {
        form.choices = sheet.into_iter().map(ChoicesRow::new).collect();
    }
    let mut ignored = BTreeSet::new();
    if let Some(sheet) = read_sheet(workbook, &SETTINGS_COLUMNS, &mut ignored)? {
        form.settings = sheet.into_iter().map(SettingsRow::new).collect();
    }

    for row in &form.survey {
        if row.row_type() != "table" {
            continue;
        }
        if let Some(rows) = workbook.rows(row.name()) {
            form.tables.insert(row.name().to_string(), rows.to_vec());
        }
    }

    debug!(
        survey = form.survey.len(),
        choices = form.choices.len(),
        settings = form.settings.len(),
        tables = form.tables.len(),
        "decoded xlsform"
    );
    Ok(form)
}

fn read_sheet(
    workbook: &Workbook,
    info: &SheetInfo,
    languages: &mut BTreeSet<String>,
) -> Result<Option<Vec<Row>>> {
    let Some(rows) = workbook.rows(info.name) else {
        if info.mandatory {
            return Err(Error::MissingSheet(info.name.to_string()));
        }
        return Ok(None);
    };

    let head_index = first_nonempty(rows).ok_or_else(|| Error::EmptySheet(info.name.to_string()))?;
    let head: Vec<String> = rows[head_index]
        .iter()
        .map(|cell| canonical_header(cell).to_string())
        .collect();

    for col in info.columns.iter().filter(|c| c.mandatory) {
        if !head.iter().any(|cell| satisfies(cell, col.name)) {
            return Err(Error::MissingColumn {
                column: col.name.to_string(),
                sheet: info.name.to_string(),
            });
        }
    }
    for header in unknown_columns(info, &head) {
        warn!(sheet = info.name, column = header, "ignoring unknown column");
    }
    let mut found = header_languages(&head);
    if !has_default_label(&head) {
        // `label::English` is the default language here, not a translation
        found.remove(FALLBACK_LANG);
    }
    languages.extend(found);

    let mut out = Vec::new();
    for (i, cells) in rows.iter().enumerate().skip(head_index + 1) {
        if is_empty(cells) {
            continue;
        }
        let mut row = Row::new(i + 1);
        for (header, cell) in head.iter().zip(cells) {
            if header.is_empty() {
                continue;
            }
            if split_lang(header).0 == columns::TYPE {
                row.set(header, canonical_type(cell));
            } else {
                row.set(header, cell.as_str());
            }
        }
        out.push(row);
    }
    Ok(Some(out))
}

/// A header fills a mandatory column in the default language
fn satisfies(header: &str, column: &str) -> bool {
    let (name, lang) = split_lang(header);
    name == column && (lang.is_empty() || lang == FALLBACK_LANG)
}

/// Non-empty headers naming no column of the sheet
fn unknown_columns<'h>(info: &SheetInfo, head: &'h [String]) -> Vec<&'h str> {
    if info.extra_columns {
        return Vec::new();
    }
    head.iter()
        .map(String::as_str)
        .filter(|header| !header.is_empty())
        .filter(|header| {
            let name = split_lang(header).0;
            !info.columns.iter().any(|col| col.name == name)
        })
        .collect()
}

fn canonical_header(cell: &str) -> &str {
    match cell {
        "list_name" => columns::LIST_NAME,
        _ => cell,
    }
}

/// Normalize legacy spellings of survey types
fn canonical_type(cell: &str) -> String {
    let cell = cell.trim();
    match cell {
        "begin_group" => return "begin group".to_string(),
        "end_group" => return "end group".to_string(),
        "begin_repeat" => return "begin repeat".to_string(),
        "end_repeat" => return "end repeat".to_string(),
        _ => {}
    }
    for (legacy, canonical) in [
        ("select one ", "select_one "),
        ("select multiple ", "select_multiple "),
    ] {
        if let Some(rest) = cell.strip_prefix(legacy) {
            return format!("{canonical}{rest}");
        }
    }
    cell.to_string()
}

fn is_empty(row: &[String]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

fn first_nonempty(rows: &[Vec<String>]) -> Option<usize> {
    rows.iter().position(|row| !is_empty(row))
}
