//! Settings sheet tags

use formconv_core::SettingsRow;
use tracing::warn;

use crate::document::Tag;
use crate::error::{ConvertError, ConvertResult};
use crate::validate::is_identifier;

/// Turn the rows of the settings sheet into string identifier tags
pub fn process_settings(settings: &[SettingsRow]) -> ConvertResult<Vec<Tag>> {
    let mut tags = Vec::new();
    for row in settings {
        let (label, value) = (row.tag_label(), row.tag_value());
        if label.is_empty() && value.is_empty() {
            continue;
        }
        if !is_identifier(value) {
            if value.is_empty() {
                warn!(line = row.line(), label, "settings tag without value");
            }
            return Err(ConvertError::validation(
                row.line(),
                format!("Tag value {value:?} is not a valid identifier."),
            ));
        }
        tags.push(Tag {
            label: label.to_string(),
            value: [value.to_string()],
        });
    }
    Ok(tags)
}
