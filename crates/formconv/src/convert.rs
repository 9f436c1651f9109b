//! From a decoded xlsform to an AJF document

use formconv_core::{decode, Workbook, XlsForm};
use tracing::debug;

use crate::builder::NodeBuilder;
use crate::choices::build_origins;
use crate::document::{Document, NodeType};
use crate::error::ConvertResult;
use crate::ids::assign_ids;
use crate::preprocess::preprocess_groups;
use crate::settings::process_settings;
use crate::translation::build_translations;
use crate::validate::{check_choices, check_names, check_types};

/// Convert a decoded xlsform
///
/// Stops at the first error.
///
/// # Example
/// ```rust
/// use formconv::{convert, decode, Workbook};
///
/// let workbook = Workbook::new()
///     .with_sheet("survey", &[&["type", "name", "label"], &["text", "q1", "Name?"]])
///     .unwrap()
///     .with_sheet("choices", &[&["list name", "name", "label"]])
///     .unwrap();
///
/// let doc = convert(&decode(&workbook).unwrap()).unwrap();
/// assert_eq!(doc.nodes[0].name, "form");
/// assert_eq!(doc.nodes[0].nodes[0].id, 1001);
/// ```
pub fn convert(form: &XlsForm) -> ConvertResult<Document> {
    check_types(&form.survey)?;
    check_names(&form.survey)?;

    let (choices_origins, choices) = build_origins(&form.choices);
    check_choices(&form.survey, &form.choices, &choices)?;

    let survey = preprocess_groups(&form.survey)?;
    let global = NodeBuilder::new(&form.tables).build_group(&survey)?;

    let mut nodes = global.nodes;
    for node in &mut nodes {
        if node.node_type == NodeType::Group {
            node.node_type = NodeType::Slide;
        }
    }
    assign_ids(&mut nodes, 0)?;

    let doc = Document {
        choices_origins,
        nodes,
        string_identifier: process_settings(&form.settings)?,
        translations: build_translations(form)?,
    };
    debug!(
        slides = doc.nodes.len(),
        origins = doc.choices_origins.len(),
        languages = doc.translations.len(),
        "converted form"
    );
    Ok(doc)
}

/// Decode and convert a workbook
pub fn convert_workbook(workbook: &Workbook) -> ConvertResult<Document> {
    convert(&decode(workbook)?)
}
