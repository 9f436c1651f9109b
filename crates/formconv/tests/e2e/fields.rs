//! Field attributes: formulas, validation, tables and friends.

use crate::{convert, error, NO_CHOICES};
use formconv::{
    Condition, ConvertError, Formula, FieldType, TableCell, ValidationCondition, Workbook,
};
use pretty_assertions::assert_eq;

#[test]
fn test_formulas_compiled() {
    let doc = convert(
        &[
            &["type", "name", "label", "relevant", "constraint", "constraint_message", "calculation", "default"],
            &["integer", "age", "Age", "", ". >= 0 and . < 150", "Really?", "", "18"],
            &["calculate", "decade", "", "${age} != ''", "", "", "int(${age} div 10)", ""],
        ],
        NO_CHOICES,
    )
    .unwrap();

    let age = doc.find("age").unwrap().field.as_ref().unwrap();
    assert_eq!(age.default_value, Some(Formula::new("18")));
    let conditions = &age.validation.as_ref().unwrap().conditions;
    assert_eq!(
        conditions[1],
        ValidationCondition {
            condition: "age >= 0 && age < 150".into(),
            client_validation: true,
            error_message: "Really?".into(),
        }
    );

    let decade = doc.find("decade").unwrap();
    assert_eq!(decade.visibility, Some(Condition::new("age !== ''")));
    let field = decade.field.as_ref().unwrap();
    assert_eq!(field.field_type, FieldType::Formula);
    assert_eq!(field.formula, Some(Formula::new("Math.floor(age/10)")));
}

#[test]
fn test_formula_error_located() {
    let err = convert(
        &[&["type", "name", "label", "relevant"], &["text", "a", "A", "${b} == 1"]],
        NO_CHOICES,
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::Compile { line: 2, .. }));
    assert!(err.to_string().starts_with("line 2: formula relevant:1:6: "));
}

#[test]
fn test_js_escape_hatch() {
    let doc = convert(
        &[&["type", "name", "label", "relevant"], &["text", "a", "A", "js: window.x > 1"]],
        NO_CHOICES,
    )
    .unwrap();
    assert_eq!(doc.find("a").unwrap().visibility, Some(Condition::new("window.x > 1")));
}

#[test]
fn test_choice_filter() {
    let doc = convert(
        &[
            &["type", "name", "label", "choice_filter", "appearance"],
            &["select_one countries", "country", "Country", "", ""],
            &["select_one cities", "city", "City", "country = ${country}", "minimal"],
        ],
        &[
            &["list name", "name", "label", "country"],
            &["countries", "it", "Italy", ""],
            &["cities", "rome", "Rome", "it"],
        ],
    )
    .unwrap();

    let city = doc.find("city").unwrap().field.as_ref().unwrap();
    assert_eq!(city.field_type, FieldType::SingleChoice);
    assert_eq!(city.choices_filter, Some(Formula::new("$choice.country === country")));
    assert!(city.force_narrow);
    let rome = &doc.origin("cities").unwrap().choices[0];
    assert_eq!(rome.extra.get("country").map(String::as_str), Some("it"));
}

#[test]
fn test_readonly() {
    let doc = convert(
        &[
            &["type", "name", "label", "readonly"],
            &["begin group", "g", "G", "yes"],
            &["text", "a", "A", "true"],
            &["text", "b", "B", "no"],
            &["end group", "", "", ""],
            &["begin group", "h", "H", "${x} = 1"],
            &["end group", "", "", ""],
        ],
        NO_CHOICES,
    )
    .unwrap();

    assert_eq!(doc.find("g").unwrap().readonly, Some(Condition::new("true")));
    assert_eq!(doc.find("h").unwrap().readonly, Some(Condition::new("x === 1")));
    assert_eq!(doc.find("a").unwrap().field.as_ref().unwrap().editable, Some(false));
    assert_eq!(doc.find("b").unwrap().field.as_ref().unwrap().editable, None);

    let message = error(
        &[&["type", "name", "label", "readonly"], &["text", "a", "A", "${x} = 1"]],
        NO_CHOICES,
    );
    assert_eq!(message, "line 2: readonly of field can't be a formula");
}

#[test]
fn test_notes() {
    let doc = convert(
        &[&["type", "name", "label"], &["note", "", "<h1>Welcome</h1>"]],
        NO_CHOICES,
    )
    .unwrap();
    let note = &doc.nodes[0].nodes[0];
    assert_eq!(note.name, "");
    assert_eq!(note.label, "");
    let field = note.field.as_ref().unwrap();
    assert_eq!(field.field_type, FieldType::Empty);
    assert_eq!(field.html, "<h1>Welcome</h1>");
}

#[test]
fn test_range() {
    let doc = convert(
        &[
            &["type", "name", "label", "parameters"],
            &["range", "r", "R", "start=1 end=5"],
        ],
        NO_CHOICES,
    )
    .unwrap();
    let r = doc.find("r").unwrap().field.as_ref().unwrap();
    assert_eq!(r.field_type, FieldType::Range);
    assert_eq!((r.range_start, r.range_end, r.range_step), (Some(1), Some(5), Some(1)));

    let message = error(
        &[&["type", "name", "label", "parameters"], &["range", "r", "R", "step=0.5"]],
        NO_CHOICES,
    );
    assert_eq!(message, "line 2: Invalid integer value in \"parameters\" column.");
}

#[test]
fn test_repeat_count() {
    let doc = convert(
        &[
            &["type", "name", "label", "repeat_count"],
            &["begin repeat", "r", "R", "1.23e2"],
            &["end repeat", "", "", ""],
        ],
        NO_CHOICES,
    )
    .unwrap();
    assert_eq!(doc.nodes[0].max_reps, Some(123));

    let message = error(
        &[
            &["type", "name", "label", "repeat_count"],
            &["begin repeat", "r", "R", "2.5"],
            &["end repeat", "", "", ""],
        ],
        NO_CHOICES,
    );
    assert_eq!(message, "line 2: repeat_count is not an unsigned integer.");
}

fn table_workbook(grid: &[&[&str]]) -> Workbook {
    crate::workbook(&[&["type", "name", "label"], &["table", "fruit", "Fruit"]], NO_CHOICES)
        .with_sheet("fruit", grid)
        .unwrap()
}

#[test]
fn test_table() {
    let wb = table_workbook(&[
        &["", "number Kg", "date Picked"],
        &["apples", "", "${today}"],
        &["pears", "2 * 3", ""],
    ]);
    let doc = formconv::convert_workbook(&wb).unwrap();
    let table = doc.find("fruit").unwrap().field.as_ref().unwrap();

    assert_eq!(table.field_type, FieldType::Table);
    assert_eq!(table.editable, Some(true));
    assert_eq!(table.column_types, vec!["number", "date"]);
    assert_eq!(table.column_labels, vec!["Kg", "Picked"]);
    assert_eq!(table.row_labels, vec!["apples", "pears"]);
    assert_eq!(table.rows[0][0], TableCell::Input("fruit__0__0".into()));
    assert_eq!(
        table.rows[0][1],
        TableCell::Formula(Formula {
            formula: "today".into(),
            editable: Some(false),
        })
    );
    assert_eq!(
        table.rows[1][0],
        TableCell::Formula(Formula {
            formula: "2*3".into(),
            editable: Some(false),
        })
    );
}

#[test]
fn test_table_errors() {
    let message = |grid: &[&[&str]]| {
        formconv::convert_workbook(&table_workbook(grid))
            .unwrap_err()
            .to_string()
    };
    assert_eq!(message(&[&["", "number Kg"]]), "Table fruit: no rows.");
    assert_eq!(message(&[&[""], &["apples"]]), "Table fruit: no columns.");
    assert_eq!(
        message(&[&["", "bool Ripe"], &["apples"]]),
        "Table fruit: invalid column type \"bool\""
    );

    let err = crate::convert(&[&["type", "name", "label"], &["table", "veg", "Veg"]], NO_CHOICES)
        .unwrap_err();
    assert!(matches!(err, ConvertError::Resource { ref table, .. } if table == "veg"));
}

#[test]
fn test_field_kinds() {
    let doc = convert(
        &[
            &["type", "name", "label", "appearance"],
            &["text", "t", "T", "multiline"],
            &["boolean", "b", "B", ""],
            &["geopoint", "g", "G", ""],
            &["image", "sig", "Sign here", "signature"],
            &["video", "v", "V", ""],
            &["select_multiple colors", "m", "M", ""],
        ],
        &[&["list name", "name", "label"], &["colors", "red", "Red"]],
    )
    .unwrap();

    let kinds: Vec<Option<FieldType>> = doc.nodes[0].nodes.iter().map(|n| n.field_type()).collect();
    assert_eq!(
        kinds,
        vec![
            Some(FieldType::Text),
            Some(FieldType::Boolean),
            Some(FieldType::Geolocation),
            Some(FieldType::Signature),
            Some(FieldType::VideoUrl),
            Some(FieldType::MultipleChoice),
        ]
    );
}

#[test]
fn test_invalid_cells() {
    assert_eq!(
        error(&[&["type", "name", "label"], &["audio", "a", "A"]], NO_CHOICES),
        "line 2: Questions of type \"audio\" are not supported."
    );
    assert_eq!(
        error(&[&["type", "name", "label"], &["", "a", "A"]], NO_CHOICES),
        "line 2: Empty type in non-empty survey row."
    );
    assert_eq!(
        error(&[&["type", "name", "label"], &["text", "a b", "A"]], NO_CHOICES),
        "line 2: Name \"a b\" is not a valid identifier."
    );
    assert_eq!(
        error(
            &[&["type", "name", "label", "required"], &["text", "a", "A", "sometimes"]],
            NO_CHOICES
        ),
        "line 2: Invalid value \"sometimes\" in \"required\" column."
    );
    assert_eq!(
        error(
            &[&["type", "name", "label"], &["select_one colors", "c", "C"]],
            &[&["list name", "name", "label"], &["colors", "red", ""]]
        ),
        "line 2: Choice list \"colors\" contains a choice with no label."
    );
}
