//! Tree shape: slides, groups, ids and choice references.

use crate::{convert, error, NO_CHOICES};
use formconv::{ConvertError, Node, NodeType};
use pretty_assertions::assert_eq;

const COLORS: &[&[&str]] = &[
    &["list name", "name", "label"],
    &["colors", "red", "Red"],
    &["sizes", "s", "Small"],
    &["colors", "green", "Green"],
];

fn names(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}

#[test]
fn test_ungrouped_questions_become_slides() {
    let doc = convert(
        &[
            &["type", "name", "label"],
            &["text", "a", "A"],
            &["begin group", "g", "G"],
            &["text", "b", "B"],
            &["end group", "", ""],
            &["text", "c", "C"],
        ],
        NO_CHOICES,
    )
    .unwrap();

    assert_eq!(names(&doc.nodes), vec!["form", "g", "form1"]);
    assert_eq!(doc.nodes[2].label, "Form 1");
    assert!(doc.nodes.iter().all(|n| n.node_type == NodeType::Slide));
    assert_eq!(names(&doc.nodes[2].nodes), vec!["c"]);
}

#[test]
fn test_nested_groups_stay_groups() {
    let doc = convert(
        &[
            &["type", "name", "label"],
            &["begin repeat", "people", "People"],
            &["begin group", "person", "Person"],
            &["text", "name", "Name"],
            &["end group", "", ""],
            &["end repeat", "", ""],
        ],
        NO_CHOICES,
    )
    .unwrap();

    assert_eq!(doc.nodes[0].node_type, NodeType::RepeatingSlide);
    assert_eq!(doc.nodes[0].nodes[0].node_type, NodeType::Group);
}

#[test]
fn test_id_law() {
    let doc = convert(
        &[
            &["type", "name", "label"],
            &["begin group", "s1", "S1"],
            &["text", "a", "A"],
            &["begin group", "inner", "Inner"],
            &["text", "b", "B"],
            &["text", "c", "C"],
            &["end group", "", ""],
            &["text", "d", "D"],
            &["end group", "", ""],
            &["begin group", "s2", "S2"],
            &["text", "e", "E"],
            &["end group", "", ""],
        ],
        NO_CHOICES,
    )
    .unwrap();

    fn check(nodes: &[Node], parent: u64) {
        for (i, node) in nodes.iter().enumerate() {
            if i == 0 {
                assert_eq!(node.id, parent * 1000 + 1, "{}", node.name);
                assert_eq!(node.parent, parent, "{}", node.name);
            } else {
                assert_eq!(node.id, nodes[i - 1].id + 1, "{}", node.name);
                assert_eq!(node.parent, nodes[i - 1].id, "{}", node.name);
            }
            check(&node.nodes, node.id);
        }
    }
    check(&doc.nodes, 0);

    let inner = doc.find("inner").unwrap();
    assert_eq!((inner.id, inner.parent), (1002, 1001));
    assert_eq!(doc.find("c").unwrap().id, 1002002);
    assert_eq!(doc.find("e").unwrap().id, 2001);
}

#[test]
fn test_choice_origins_sorted() {
    let doc = convert(
        &[&["type", "name", "label"], &["select_one colors", "c", "Color"]],
        COLORS,
    )
    .unwrap();

    let origins: Vec<(&str, Vec<&str>)> = doc
        .choices_origins
        .iter()
        .map(|o| (o.name.as_str(), o.choices.iter().map(|c| c.value.as_str()).collect()))
        .collect();
    assert_eq!(
        origins,
        vec![("colors", vec!["red", "green"]), ("sizes", vec!["s"])]
    );
}

#[test]
fn test_choice_reference_closure() {
    let survey: &[&[&str]] = &[&["type", "name", "label"], &["select_multiple sizes", "s", "Size"]];
    assert!(convert(survey, COLORS).is_ok());

    let without_sizes: Vec<&[&str]> = COLORS.iter().copied().filter(|r| r[0] != "sizes").collect();
    let err = convert(survey, &without_sizes).unwrap_err();
    assert!(matches!(err, ConvertError::Validation { line: 2, .. }));
    assert_eq!(err.to_string(), "line 2: Undefined single or multiple choice \"sizes\".");
}

#[test]
fn test_structural_errors() {
    let message = error(
        &[&["type", "name", "label"], &["text", "a", "A"], &["end group", "", ""]],
        NO_CHOICES,
    );
    assert_eq!(message, "line 3: Unexpected end of group/repeat.");

    let message = error(
        &[
            &["type", "name", "label"],
            &["begin repeat", "r", "R"],
            &["begin group", "g", "G"],
            &["end repeat", "", ""],
            &["end group", "", ""],
        ],
        NO_CHOICES,
    );
    assert_eq!(message, "line 4: Unexpected end of group/repeat.");

    let message = error(
        &[
            &["type", "name", "label"],
            &["begin group", "g", "G"],
            &["begin repeat", "r", "R"],
            &["end repeat", "", ""],
            &["end group", "", ""],
        ],
        NO_CHOICES,
    );
    assert_eq!(message, "line 3: Repeats can't be nested.");

    let message = error(&[&["type", "name", "label"], &["begin group", "g", "G"]], NO_CHOICES);
    assert_eq!(message, "line 2: Unclosed group/repeat.");
}

#[test]
fn test_metadata_rows_dropped() {
    let doc = convert(
        &[
            &["type", "name", "label"],
            &["start", "start", ""],
            &["deviceid", "device", ""],
            &["text", "a", "A"],
        ],
        NO_CHOICES,
    )
    .unwrap();
    assert_eq!(names(&doc.nodes), vec!["form"]);
    assert_eq!(names(&doc.nodes[0].nodes), vec!["a"]);
}

#[test]
fn test_empty_survey() {
    let doc = convert(&[&["type", "name", "label"]], NO_CHOICES).unwrap();
    assert!(doc.nodes.is_empty());
}
