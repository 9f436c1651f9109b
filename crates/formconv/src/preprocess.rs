//! Group/repeat balancing and slide wrapping

use formconv_core::SurveyRow;
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::row_type::RowType;

/// Name of the synthetic group enclosing the whole survey
pub const GLOBAL_GROUP: &str = "global";

/// Check the nesting of groups and repeats, then wrap the survey
///
/// The result is a single `global` group. Runs of questions outside any
/// group are wrapped in synthetic groups (`form`, `form1`, `form2`, ...)
/// so that every top-level node can become a slide.
pub fn preprocess_groups(survey: &[SurveyRow]) -> ConvertResult<Vec<SurveyRow>> {
    check_balance(survey)?;

    let mut out = Vec::with_capacity(survey.len() + 4);
    out.push(begin_group(GLOBAL_GROUP, ""));
    let mut depth = 0usize;
    let mut wrapping = false;
    let mut slides = 0usize;
    for row in survey {
        let row_type = RowType::parse(row.row_type());
        if row_type.is_begin() {
            if wrapping {
                out.push(end_group());
                wrapping = false;
            }
            depth += 1;
        } else if row_type.is_end() {
            depth -= 1;
        } else if depth == 0 && !wrapping && row_type != RowType::Ignored {
            out.push(slide_group(slides));
            slides += 1;
            wrapping = true;
        }
        out.push(row.clone());
    }
    if wrapping {
        out.push(end_group());
    }
    out.push(end_group());

    debug!(rows = survey.len(), slides, "preprocessed groups");
    Ok(out)
}

fn check_balance(survey: &[SurveyRow]) -> ConvertResult<()> {
    let mut stack: Vec<(RowType<'_>, usize)> = Vec::new();
    for row in survey {
        let row_type = RowType::parse(row.row_type());
        match row_type {
            RowType::BeginRepeat if !stack.is_empty() => {
                return Err(ConvertError::structure(row.line(), "Repeats can't be nested."));
            }
            RowType::BeginGroup | RowType::BeginRepeat => stack.push((row_type, row.line())),
            RowType::EndGroup | RowType::EndRepeat => {
                let matching = match stack.pop() {
                    Some((RowType::BeginGroup, _)) => row_type == RowType::EndGroup,
                    Some((RowType::BeginRepeat, _)) => row_type == RowType::EndRepeat,
                    _ => false,
                };
                if !matching {
                    return Err(ConvertError::structure(
                        row.line(),
                        "Unexpected end of group/repeat.",
                    ));
                }
            }
            _ => {}
        }
    }
    match stack.last() {
        Some(&(_, line)) => Err(ConvertError::structure(line, "Unclosed group/repeat.")),
        None => Ok(()),
    }
}

fn begin_group(name: &str, label: &str) -> SurveyRow {
    SurveyRow::from_pairs(&[("type", "begin group"), ("name", name), ("label", label)])
}

fn end_group() -> SurveyRow {
    SurveyRow::from_pairs(&[("type", "end group")])
}

fn slide_group(n: usize) -> SurveyRow {
    if n == 0 {
        begin_group("form", "Form")
    } else {
        begin_group(&format!("form{n}"), &format!("Form {n}"))
    }
}
