//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, warn};

use crate::error::{XlsxError, XlsxResult};
use formconv_core::Workbook;

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("_x") {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match decode_escape(candidate) {
            Some(c) => {
                result.push(c);
                // "_x" + 4 hex digits + "_"
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Decode a single `_xHHHH_` at the start of `s`
fn decode_escape(s: &str) -> Option<char> {
    let hex = s.get(2..6)?;
    if s.get(6..7)? != "_" || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Parse an A1-style reference into 0-based `(row, col)`
fn parse_cell_reference(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    let mut col: usize = 0;
    for b in letters.bytes() {
        let digit = usize::from(b.to_ascii_uppercase() - b'A') + 1;
        col = col.checked_mul(26)?.checked_add(digit)?;
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

/// A `<c>` element being read
struct PendingCell {
    row: usize,
    col: usize,
    kind: Option<String>,
    text: String,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::new();
        for (name, r_id) in &sheet_info {
            // Chart sheets and macro sheets have no worksheet relationship
            let Some(path) = sheet_paths.get(r_id) else {
                debug!(sheet = %name, "skipping non-worksheet sheet");
                continue;
            };
            let rows = Self::read_worksheet(&mut archive, name, path, &shared_strings)?;
            debug!(sheet = %name, rows = rows.len(), "read worksheet");
            workbook.add_sheet(name, rows)?;
        }

        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic hints repeat part of the text
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
                Event::End(e) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Event::Text(e) if in_t => current_string.push_str(&e.unescape()?),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds, in tab order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                    let name = attribute(&e, b"name");
                    let r_id = attribute(&e, b"r:id");
                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get worksheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attribute(&e, b"Id");
                    let target = attribute(&e, b"Target");
                    let rel_type = attribute(&e, b"Type");

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read a worksheet into rows of cell texts
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        sheet: &str,
        path: &str,
        shared_strings: &[String],
    ) -> XlsxResult<Vec<Vec<String>>> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut cells: Vec<(usize, usize, String)> = Vec::new();

        // Position used by cells and rows without an `r` attribute
        let mut row_idx = 0;
        let mut next_col = 0;

        let mut current: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"row" => {
                        row_idx = row_number(&e).unwrap_or(row_idx);
                        next_col = 0;
                    }
                    b"c" => current = Some(start_cell(&e, sheet, row_idx, next_col)?),
                    b"v" if current.is_some() => in_value = true,
                    b"t" if current.is_some() => in_inline_text = true,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"row" => {
                        row_idx = row_number(&e).unwrap_or(row_idx) + 1;
                        next_col = 0;
                    }
                    b"c" => next_col = start_cell(&e, sheet, row_idx, next_col)?.col + 1,
                    _ => {}
                },
                Event::Text(e) if in_value || in_inline_text => {
                    if let Some(cell) = current.as_mut() {
                        cell.text.push_str(&e.unescape()?);
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"v" => in_value = false,
                    b"t" => in_inline_text = false,
                    b"c" => {
                        if let Some(cell) = current.take() {
                            next_col = cell.col + 1;
                            let text = cell_text(&cell, shared_strings);
                            if !text.is_empty() {
                                cells.push((cell.row, cell.col, text));
                            }
                        }
                    }
                    b"row" => row_idx += 1,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(into_grid(cells))
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

/// 0-based index of a `<row r="…">`
fn row_number(e: &BytesStart<'_>) -> Option<usize> {
    attribute(e, b"r")
        .and_then(|r| r.parse::<usize>().ok())
        .map(|r| r.saturating_sub(1))
}

fn start_cell(
    e: &BytesStart<'_>,
    sheet: &str,
    row: usize,
    col: usize,
) -> XlsxResult<PendingCell> {
    let (row, col) = match attribute(e, b"r") {
        Some(reference) => {
            parse_cell_reference(&reference).ok_or_else(|| XlsxError::CellReference {
                sheet: sheet.to_string(),
                reference,
            })?
        }
        None => (row, col),
    };
    Ok(PendingCell {
        row,
        col,
        kind: attribute(e, b"t"),
        text: String::new(),
    })
}

/// Text of a cell according to its `t` attribute
fn cell_text(cell: &PendingCell, shared_strings: &[String]) -> String {
    let value = cell.text.as_str();
    match cell.kind.as_deref() {
        // Shared string
        Some("s") => {
            let found = value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| shared_strings.get(idx));
            match found {
                Some(s) => s.clone(),
                None => {
                    warn!(index = value, row = cell.row, col = cell.col, "invalid shared string index");
                    String::new()
                }
            }
        }

        // Boolean
        Some("b") => match value {
            "1" => "true".to_string(),
            "0" => "false".to_string(),
            other => other.to_ascii_lowercase(),
        },

        // Inline or formula string - decode Excel escape sequences
        Some("inlineStr") | Some("str") => decode_excel_escapes(value),

        // Numbers, errors and dates keep their stored text
        _ => value.to_string(),
    }
}

/// Lay `(row, col, text)` triples out as rows, each as long as its last
/// non-empty cell
fn into_grid(cells: Vec<(usize, usize, String)>) -> Vec<Vec<String>> {
    let rows = cells.iter().map(|(r, _, _)| r + 1).max().unwrap_or(0);

    let mut grid = vec![Vec::new(); rows];
    for (r, c, text) in cells {
        let row: &mut Vec<String> = &mut grid[r];
        if row.len() <= c {
            row.resize(c + 1, String::new());
        }
        row[c] = text;
    }
    grid
}
