//! Checks on the survey rows, run before the tree is built

use std::collections::HashMap;

use formconv_core::{ChoicesRow, SurveyRow};

use crate::choices::{is_placeholder, ChoicesMap};
use crate::error::{ConvertError, ConvertResult};
use crate::row_type::{FieldKind, RowType};

/// Reject rows whose type can't be converted
pub fn check_types(survey: &[SurveyRow]) -> ConvertResult<()> {
    for row in survey {
        let message = match RowType::parse(row.row_type()) {
            RowType::Unsupported => {
                format!("Questions of type {:?} are not supported.", row.row_type())
            }
            RowType::Empty => "Empty type in non-empty survey row.".to_string(),
            RowType::Unknown => format!("Invalid type {:?} in survey.", row.row_type()),
            _ => continue,
        };
        return Err(ConvertError::validation(row.line(), message));
    }
    Ok(())
}

/// Check that names are identifiers and that field names are unique
///
/// A name may be reused when every row using it has a `relevant`
/// condition, so that at most one of them is visible at a time.
pub fn check_names(survey: &[SurveyRow]) -> ConvertResult<()> {
    let mut has_relevant: HashMap<&str, bool> = HashMap::new();
    for row in survey {
        let name = row.name();
        let row_type = RowType::parse(row.row_type());
        if row_type.is_end() {
            if !name.is_empty() {
                return Err(ConvertError::validation(
                    row.line(),
                    "End of group/repeat can't have a name.",
                ));
            }
            continue;
        }
        // notes may be anonymous
        if row_type == RowType::Field(FieldKind::Note) && name.is_empty() {
            continue;
        }
        if !is_identifier(name) {
            return Err(ConvertError::validation(
                row.line(),
                format!("Name {name:?} is not a valid identifier."),
            ));
        }
        let relevant = !row.relevant().is_empty();
        if let Some(&first_relevant) = has_relevant.get(name) {
            if !first_relevant || !relevant {
                return Err(ConvertError::validation(
                    row.line(),
                    format!("Field name {name:?} is already used."),
                ));
            }
        }
        has_relevant.insert(name, relevant);
    }
    Ok(())
}

/// Letters, digits and underscores, not starting with a digit
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphabetic() || c.is_numeric())
}

/// Check choice labels, and that every select field names a declared list
pub fn check_choices(
    survey: &[SurveyRow],
    rows: &[ChoicesRow],
    choices: &ChoicesMap,
) -> ConvertResult<()> {
    for row in rows {
        let list = row.list_name();
        if !row.label("").is_empty() || choices.get(list).is_some_and(|c| is_placeholder(c)) {
            continue;
        }
        return Err(ConvertError::validation(
            row.line(),
            format!("Choice list {list:?} contains a choice with no label."),
        ));
    }
    for row in survey {
        if let Some(list) = RowType::parse(row.row_type()).choice_list() {
            if !choices.contains_key(list) {
                return Err(ConvertError::validation(
                    row.line(),
                    format!("Undefined single or multiple choice {list:?}."),
                ));
            }
        }
    }
    Ok(())
}
