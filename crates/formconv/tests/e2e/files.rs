//! Conversion of XLSX files on disk.

use crate::write_xlsx;
use formconv::{convert_file, open_form, ConvertError, JsonWriter, WriteOptions};
use pretty_assertions::assert_eq;

#[test]
fn test_convert_xlsx_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_xlsx(
        &dir,
        "survey.xlsx",
        &[
            (
                "survey",
                &[
                    &["type", "name", "label", "relevant"],
                    &["begin_group", "intro", "Intro", ""],
                    &["select one colors", "color", "Color", ""],
                    &["text", "why", "Why?", "selected(${color}, 'red')"],
                    &["end_group", "", "", ""],
                ],
            ),
            (
                "choices",
                &[&["list_name", "name", "label"], &["colors", "red", "Red"]],
            ),
        ],
    );

    let doc = convert_file(&path).unwrap();
    assert_eq!(doc.nodes[0].name, "intro");
    assert_eq!(doc.origin("colors").unwrap().choices.len(), 1);
    let why = doc.find("why").unwrap();
    assert_eq!(
        why.visibility.as_ref().unwrap().condition,
        "valueInChoice(color, 'red')"
    );

    let out = dir.path().join("survey.json");
    JsonWriter::write_file(&doc, &out, &WriteOptions::default()).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["nodes"][0]["nodes"][1]["id"], 1002);
}

#[test]
fn test_languages_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_xlsx(
        &dir,
        "survey.xlsx",
        &[
            ("survey", &[&["type", "name", "label", "label::German (de)"]]),
            ("choices", &[&["list name", "name", "label", "label::Dutch (nl)"]]),
        ],
    );
    let form = open_form(&path).unwrap();
    assert_eq!(
        form.languages.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["Dutch", "German"]
    );
}

#[test]
fn test_missing_choices_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_xlsx(&dir, "survey.xlsx", &[("survey", &[&["type", "name", "label"]])]);
    assert!(matches!(convert_file(&path), Err(ConvertError::Decode(_))));
}

#[test]
fn test_not_a_spreadsheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.xlsx");
    std::fs::write(&path, b"type,name,label\n").unwrap();
    assert!(matches!(convert_file(&path), Err(ConvertError::Xlsx(_))));

    let csv = dir.path().join("survey.csv");
    std::fs::write(&csv, b"type,name,label\n").unwrap();
    assert!(matches!(convert_file(&csv), Err(ConvertError::UnsupportedFormat(_))));
}
