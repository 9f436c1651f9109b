//! The AJF form document
//!
//! Serialized with serde into the JSON read by the form engine: camelCase
//! keys, absent attributes omitted, node and field types as integers.

use std::collections::BTreeMap;

use serde::Serialize;

/// Map from default-language text to its translation
pub type TranslationMap = BTreeMap<String, String>;

/// A converted form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices_origins: Vec<ChoicesOrigin>,
    /// Slides and repeating slides
    pub nodes: Vec<Node>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub string_identifier: Vec<Tag>,
    /// Translations keyed by language name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, TranslationMap>,
}

impl Document {
    /// Find a node anywhere in the tree by name
    pub fn find(&self, name: &str) -> Option<&Node> {
        fn walk<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Node> {
            nodes.iter().find_map(|node| {
                if node.name == name {
                    Some(node)
                } else {
                    walk(&node.nodes, name)
                }
            })
        }
        walk(&self.nodes, name)
    }

    /// Look up a choices origin by name
    pub fn origin(&self, name: &str) -> Option<&ChoicesOrigin> {
        self.choices_origins.iter().find(|o| o.name == name)
    }
}

/// A named list of choices
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoicesOrigin {
    #[serde(rename = "type")]
    pub origin_type: OriginType,
    pub name: String,
    pub choices_type: ChoicesType,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginType {
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoicesType {
    String,
}

/// A choice; user-defined columns of the choices sheet are kept as
/// extra string attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Settings tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub label: String,
    pub value: [String; 1],
}

/// Node kinds, serialized as the form engine's integer codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum NodeType {
    Field,
    Group,
    Slide,
    RepeatingSlide,
}

impl From<NodeType> for u8 {
    fn from(t: NodeType) -> u8 {
        match t {
            NodeType::Field => 0,
            NodeType::Group => 2,
            NodeType::Slide => 3,
            NodeType::RepeatingSlide => 4,
        }
    }
}

/// Field kinds, serialized as the form engine's integer codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "u8")]
pub enum FieldType {
    #[default]
    String,
    Text,
    Number,
    Boolean,
    SingleChoice,
    MultipleChoice,
    Formula,
    /// Notes: only HTML content, no input
    Empty,
    DateInput,
    Time,
    Table,
    Geolocation,
    Barcode,
    File,
    Image,
    VideoUrl,
    Range,
    Signature,
}

impl From<FieldType> for u8 {
    fn from(t: FieldType) -> u8 {
        match t {
            FieldType::String => 0,
            FieldType::Text => 1,
            FieldType::Number => 2,
            FieldType::Boolean => 3,
            FieldType::SingleChoice => 4,
            FieldType::MultipleChoice => 5,
            FieldType::Formula => 6,
            FieldType::Empty => 7,
            FieldType::DateInput => 9,
            FieldType::Time => 10,
            FieldType::Table => 11,
            FieldType::Geolocation => 12,
            FieldType::Barcode => 13,
            FieldType::File => 14,
            FieldType::Image => 15,
            FieldType::VideoUrl => 16,
            FieldType::Range => 17,
            FieldType::Signature => 18,
        }
    }
}

/// A boolean expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub condition: String,
}

impl Condition {
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
        }
    }
}

/// A value expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Formula {
    pub formula: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
}

impl Formula {
    pub fn new(formula: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            editable: None,
        }
    }
}

/// Validation rules of a field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(skip_serializing_if = "is_false")]
    pub not_empty: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub not_empty_message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ValidationCondition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationCondition {
    pub condition: String,
    pub client_validation: bool,
    pub error_message: String,
}

/// A table cell: the name of a free input, or a computed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TableCell {
    Input(String),
    Formula(Formula),
}

/// A node of the form tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Id of the previous node in tree order (not the enclosing group)
    pub parent: u64,
    pub id: u64,
    pub name: String,
    pub label: String,
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Condition>,
    #[serde(rename = "readonly", skip_serializing_if = "Option::is_none")]
    pub readonly: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reps: Option<u32>,
    /// Field attributes, `None` for groups and slides
    #[serde(flatten)]
    pub field: Option<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
    /// Survey line the node was built from, 0 for synthetic groups
    #[serde(skip)]
    pub line: usize,
}

impl Node {
    /// A group with no children yet
    pub fn group(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            parent: 0,
            id: 0,
            name: name.into(),
            label: label.into(),
            node_type: NodeType::Group,
            visibility: None,
            readonly: None,
            max_reps: None,
            field: None,
            nodes: Vec::new(),
            line: 0,
        }
    }

    /// A field node
    pub fn field(name: impl Into<String>, label: impl Into<String>, field: Field) -> Self {
        Self {
            node_type: NodeType::Field,
            field: Some(field),
            ..Self::group(name, label)
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn is_field(&self) -> bool {
        self.node_type == NodeType::Field
    }

    /// Field type of a field node
    pub fn field_type(&self) -> Option<FieldType> {
        self.field.as_ref().map(|f| f.field_type)
    }
}

/// Attributes specific to field nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Formula>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<Formula>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub choices_origin_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices_filter: Option<Formula>,
    #[serde(skip_serializing_if = "is_false")]
    pub force_narrow: bool,
    #[serde(rename = "HTML", skip_serializing_if = "String::is_empty")]
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_step: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub column_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub column_labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub row_labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Vec<TableCell>>,
}

impl Field {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Self::default()
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
