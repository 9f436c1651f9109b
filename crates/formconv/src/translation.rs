//! Translations
//!
//! For each language found in the sheet headers, a map from the text of the
//! default language to the translated text.

use std::collections::BTreeMap;

use formconv_core::XlsForm;

use crate::document::TranslationMap;
use crate::error::{ConvertError, ConvertResult};

/// Build the translation maps of all the languages of the form
pub fn build_translations(form: &XlsForm) -> ConvertResult<BTreeMap<String, TranslationMap>> {
    form.languages
        .iter()
        .map(|lang| Ok((lang.clone(), build_translation(form, lang)?)))
        .collect()
}

/// Build the translation map of one language
///
/// Keys come from the `label`, `hint`, `constraint_message` and
/// `required_message` columns of the survey and the `label` column of the
/// choices. A key can't contain square brackets.
pub fn build_translation(form: &XlsForm, lang: &str) -> ConvertResult<TranslationMap> {
    let mut map = TranslationMap::new();
    for row in &form.survey {
        let columns = [
            (row.label(""), row.label(lang)),
            (row.hint(""), row.hint(lang)),
            (row.constraint_message(""), row.constraint_message(lang)),
            (row.required_message(""), row.required_message(lang)),
        ];
        for (key, text) in columns {
            insert(&mut map, key, text, row.line(), "")?;
        }
    }
    for row in &form.choices {
        insert(&mut map, row.label(""), row.label(lang), row.line(), " (choices sheet)")?;
    }
    Ok(map)
}

fn insert(
    map: &mut TranslationMap,
    key: &str,
    text: &str,
    line: usize,
    sheet: &str,
) -> ConvertResult<()> {
    if key.is_empty() || text.is_empty() {
        return Ok(());
    }
    if key.contains(['[', ']']) {
        return Err(ConvertError::validation(
            line,
            format!("Translation key cannot contain square brackets{sheet}."),
        ));
    }
    map.insert(key.to_string(), text.to_string());
    Ok(())
}
