//! Choice lists

use std::collections::BTreeMap;

use formconv_core::ChoicesRow;

use crate::document::{Choice, ChoicesOrigin, ChoicesType, OriginType};

/// Declared choice lists by name
pub type ChoicesMap = BTreeMap<String, Vec<Choice>>;

/// Group the rows of the choices sheet by list name
///
/// Choices keep the order of the sheet; origins are sorted by name. A list
/// made of a single choice with no value and no label only declares the
/// name: it's left out of the origins but kept in the map.
pub fn build_origins(rows: &[ChoicesRow]) -> (Vec<ChoicesOrigin>, ChoicesMap) {
    let mut map = ChoicesMap::new();
    for row in rows {
        let extra = row
            .user_defined_cells()
            .filter(|(key, _)| key != "value" && key != "label")
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        map.entry(row.list_name().to_string())
            .or_default()
            .push(Choice {
                value: row.name().to_string(),
                label: row.label("").to_string(),
                extra,
            });
    }

    let origins = map
        .iter()
        .filter(|(_, choices)| !is_placeholder(choices))
        .map(|(name, choices)| ChoicesOrigin {
            origin_type: OriginType::Fixed,
            name: name.clone(),
            choices_type: ChoicesType::String,
            choices: choices.clone(),
        })
        .collect();
    (origins, map)
}

/// A list declared by a single empty choice
pub fn is_placeholder(choices: &[Choice]) -> bool {
    matches!(choices, [only] if only.value.is_empty() && only.label.is_empty())
}
