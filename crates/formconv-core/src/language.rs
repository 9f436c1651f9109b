//! Language-tagged column headers
//!
//! xlsform translations live in columns named `<column>::<language>`, where
//! the language may be followed by a parenthesized code:
//! `label::Italian (it)`. Columns without `::` belong to the default language,
//! represented here by the empty string.

use std::collections::BTreeSet;

/// Separator between a column name and its language
pub const LANG_SEPARATOR: &str = "::";

/// Language used in place of the default one when a sheet has no untagged
/// `label` column.
pub const FALLBACK_LANG: &str = "English";

/// Split a header cell into column name and language
///
/// ```text
/// "label::English"      -> ("label", "English")
/// "label::English (en)" -> ("label", "English")
/// "label"               -> ("label", "")
/// ```
pub fn split_lang(header: &str) -> (&str, &str) {
    let Some(i) = header.find(LANG_SEPARATOR) else {
        return (header, "");
    };
    let rest = &header[i + LANG_SEPARATOR.len()..];
    let lang = match rest.rfind('(') {
        Some(end) => &rest[..end],
        None => rest,
    };
    (&header[..i], lang.trim())
}

/// Languages appearing in a header row, excluding the default language
pub fn header_languages<'a, I>(header: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    header
        .into_iter()
        .map(|cell| split_lang(cell).1)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether the header has an untagged `label` column
///
/// When it doesn't, `label::English` acts as the default language.
pub fn has_default_label<'a, I>(header: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    header.into_iter().any(|cell| cell == "label")
}
