//! JSON shape of converted documents, settings and translations.

use crate::{convert, workbook, NO_CHOICES};
use formconv::{convert_workbook, JsonWriter, WriteOptions};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn to_value(doc: &formconv::Document) -> Value {
    let text = JsonWriter::to_string(doc, &WriteOptions::default()).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_document_json() {
    let doc = convert(
        &[
            &["type", "name", "label", "hint", "required", "required_message"],
            &["select_one yes_no", "ok", "OK?", "Be honest", "yes", "Answer please"],
        ],
        &[
            &["list name", "name", "label"],
            &["yes_no", "yes", "Yes"],
            &["yes_no", "no", "No"],
        ],
    )
    .unwrap();

    assert_eq!(
        to_value(&doc),
        json!({
            "choicesOrigins": [{
                "type": "fixed",
                "name": "yes_no",
                "choicesType": "string",
                "choices": [
                    { "value": "yes", "label": "Yes" },
                    { "value": "no", "label": "No" },
                ],
            }],
            "nodes": [{
                "parent": 0,
                "id": 1,
                "name": "form",
                "label": "Form",
                "nodeType": 3,
                "nodes": [{
                    "parent": 1,
                    "id": 1001,
                    "name": "ok",
                    "label": "OK?",
                    "nodeType": 0,
                    "fieldType": 4,
                    "hint": "Be honest",
                    "validation": {
                        "notEmpty": true,
                        "notEmptyMessage": "Answer please",
                    },
                    "choicesOriginRef": "yes_no",
                }],
            }],
        })
    );
}

#[test]
fn test_integer_validation_json() {
    let doc = convert(&[&["type", "name", "label"], &["integer", "n", "N"]], NO_CHOICES).unwrap();
    let value = to_value(&doc);
    assert_eq!(
        value["nodes"][0]["nodes"][0]["validation"],
        json!({
            "conditions": [{
                "condition": "!notEmpty(n) || isInt(n)",
                "clientValidation": true,
                "errorMessage": "The field value must be an integer.",
            }],
        })
    );
    assert_eq!(value["nodes"][0]["nodes"][0]["fieldType"], 2);
}

#[test]
fn test_settings_tags() {
    let wb = workbook(&[&["type", "name", "label"], &["text", "name", "Name"]], NO_CHOICES)
        .with_sheet(
            "settings",
            &[&["tag label", "tag value"], &["Name", "name"], &["", ""], &["Id", "id"]],
        )
        .unwrap();
    let value = to_value(&convert_workbook(&wb).unwrap());
    assert_eq!(
        value["stringIdentifier"],
        json!([
            { "label": "Name", "value": ["name"] },
            { "label": "Id", "value": ["id"] },
        ])
    );

    let wb = workbook(&[&["type", "name", "label"]], NO_CHOICES)
        .with_sheet("settings", &[&["tag label", "tag value"], &["Name", "first name"]])
        .unwrap();
    let err = convert_workbook(&wb).unwrap_err();
    assert_eq!(err.to_string(), "line 2: Tag value \"first name\" is not a valid identifier.");
}

#[test]
fn test_translations() {
    let doc = convert(
        &[
            &["type", "name", "label", "label::Italian (it)", "label::French (fr)"],
            &["select_one c", "q", "Color", "Colore", "Couleur"],
        ],
        &[
            &["list name", "name", "label", "label::Italian (it)"],
            &["c", "r", "Red", "Rosso"],
        ],
    )
    .unwrap();

    assert_eq!(
        to_value(&doc)["translations"],
        json!({
            "French": { "Color": "Couleur" },
            "Italian": { "Color": "Colore", "Red": "Rosso" },
        })
    );
}

#[test]
fn test_english_as_default_language() {
    let doc = convert(
        &[
            &["type", "name", "label::English (en)", "label::Spanish (es)"],
            &["text", "q", "Question", "Pregunta"],
        ],
        &[&["list name", "name", "label::English (en)"]],
    )
    .unwrap();

    assert_eq!(doc.find("q").unwrap().label, "Question");
    let value = to_value(&doc);
    assert_eq!(value["translations"], json!({ "Spanish": { "Question": "Pregunta" } }));
}

#[test]
fn test_absent_attributes_omitted() {
    let doc = convert(&[&["type", "name", "label"], &["text", "t", "T"]], NO_CHOICES).unwrap();
    let value = to_value(&doc);
    assert!(value.get("choicesOrigins").is_none());
    assert!(value.get("translations").is_none());
    assert!(value.get("stringIdentifier").is_none());

    let field = value["nodes"][0]["nodes"][0].as_object().unwrap();
    let keys: Vec<&str> = field.keys().map(String::as_str).collect();
    let mut expected = vec!["fieldType", "id", "label", "name", "nodeType", "parent"];
    expected.sort_unstable();
    let mut keys = keys;
    keys.sort_unstable();
    assert_eq!(keys, expected);
}
