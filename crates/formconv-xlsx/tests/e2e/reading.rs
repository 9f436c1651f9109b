//! Reading workbooks from files on disk.

use crate::Fixture;
use formconv_xlsx::{XlsxError, XlsxReader};
use pretty_assertions::assert_eq;

#[test]
fn test_sheets_in_workbook_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = Fixture::new()
        .sheet("survey", &[&["type", "name", "label"]])
        .sheet("choices", &[&["list_name", "name", "label"]])
        .sheet("settings", &[&["tag label", "tag value"]])
        .write(&dir, "form.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["survey", "choices", "settings"]);
    assert_eq!(workbook.rows("choices").unwrap()[0][0], "list_name");
}

#[test]
fn test_sparse_cells_and_markup() {
    let dir = tempfile::tempdir().unwrap();
    let path = Fixture::new()
        .sheet(
            "survey",
            &[
                &["type", "name", "label", "relevant"],
                &[],
                &["integer", "age", "Age <years>", "${x} > 1 & ${y} < 2"],
            ],
        )
        .write(&dir, "form.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let rows = workbook.rows("survey").unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].iter().all(String::is_empty));
    assert_eq!(rows[2][2], "Age <years>");
    assert_eq!(rows[2][3], "${x} > 1 & ${y} < 2");
}

#[test]
fn test_wide_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let mut header: Vec<String> = (0..30).map(|i| format!("col{i}")).collect();
    header[29] = "last".into();
    let header: Vec<&str> = header.iter().map(String::as_str).collect();
    let path = Fixture::new()
        .sheet("grid", &[header.as_slice()])
        .write(&dir, "wide.xlsx");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let rows = workbook.rows("grid").unwrap();
    assert_eq!(rows[0].len(), 30);
    assert_eq!(rows[0][29], "last");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = XlsxReader::read_file(dir.path().join("absent.xlsx"));
    assert!(matches!(result, Err(XlsxError::Io(_))));
}
