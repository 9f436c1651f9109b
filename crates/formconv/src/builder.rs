//! Survey tree construction
//!
//! [`NodeBuilder::build_group`] takes a preprocessed block of survey rows,
//! from a begin marker to its matching end marker, and turns it into a
//! group node. Nested blocks are found with [`RowCursor::consume_block`]
//! and built recursively.

use std::collections::HashMap;

use formconv_core::SurveyRow;
use formconv_formula::{Compiler, FormulaContext};
use tracing::trace;

use crate::document::{
    Condition, Field, FieldType, FieldValidation, Formula, Node, NodeType, TableCell,
    ValidationCondition,
};
use crate::error::{ConvertError, ConvertResult};
use crate::row_type::{FieldKind, RowType};

/// Table sheet grids by field name
pub type Tables = HashMap<String, Vec<Vec<String>>>;

const TABLE_COLUMN_TYPES: &[&str] = &["number", "text", "date"];

const INTEGER_MESSAGE: &str = "The field value must be an integer.";

/// Walks a slice of rows, one row or one nested block at a time
#[derive(Debug)]
pub struct RowCursor<'r> {
    rows: &'r [SurveyRow],
    pos: usize,
}

impl<'r> RowCursor<'r> {
    pub fn new(rows: &'r [SurveyRow]) -> Self {
        Self { rows, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'r SurveyRow> {
        self.rows.get(self.pos)
    }

    pub fn next_row(&mut self) -> Option<&'r SurveyRow> {
        let row = self.rows.get(self.pos)?;
        self.pos += 1;
        Some(row)
    }

    /// Consume the block opened by the begin marker under the cursor, up to
    /// and including its matching end marker
    ///
    /// # Panics
    /// If the cursor is not on a begin marker, or the block is not closed.
    pub fn consume_block(&mut self) -> &'r [SurveyRow] {
        let rows = self.rows;
        let start = self.pos;
        let mut depth = 0usize;
        for (i, row) in rows[start..].iter().enumerate() {
            let row_type = RowType::parse(row.row_type());
            if row_type.is_begin() {
                depth += 1;
            } else if row_type.is_end() {
                assert!(depth > 0, "not a group");
                depth -= 1;
                if depth == 0 {
                    self.pos = start + i + 1;
                    return &rows[start..self.pos];
                }
            } else {
                assert!(depth > 0, "not a group");
            }
        }
        panic!("group end not found");
    }
}

/// Builds nodes from survey rows, compiling their formulas
#[derive(Debug)]
pub struct NodeBuilder<'t> {
    compiler: Compiler,
    tables: &'t Tables,
}

impl<'t> NodeBuilder<'t> {
    pub fn new(tables: &'t Tables) -> Self {
        Self {
            compiler: Compiler::new(),
            tables,
        }
    }

    /// Build a group or repeating slide from a balanced block
    ///
    /// # Panics
    /// If `block` doesn't start with a begin marker and end with its
    /// matching end marker.
    pub fn build_group(&mut self, block: &[SurveyRow]) -> ConvertResult<Node> {
        let header = match block.first() {
            Some(row) if RowType::parse(row.row_type()).is_begin() => row,
            _ => panic!("not a group"),
        };
        let mut group =
            Node::group(header.name(), header.label("")).with_line(header.line());
        group.visibility = self.visibility(header)?;
        group.readonly = self.group_readonly(header)?;
        if RowType::parse(header.row_type()) == RowType::BeginRepeat {
            group.node_type = NodeType::RepeatingSlide;
            if !header.repeat_count().is_empty() {
                let reps = parse_excel_uint(header.repeat_count()).ok_or_else(|| {
                    ConvertError::validation(
                        header.line(),
                        "repeat_count is not an unsigned integer.",
                    )
                })?;
                group.max_reps = Some(reps);
            }
        }

        let mut cursor = RowCursor::new(&block[1..]);
        while let Some(row) = cursor.peek() {
            let row_type = RowType::parse(row.row_type());
            if row_type.is_begin() {
                let child = cursor.consume_block();
                group.nodes.push(self.build_group(child)?);
                continue;
            }
            cursor.next_row();
            if row_type.is_end() {
                assert!(cursor.peek().is_none(), "unexpected end of group");
            } else if row_type.is_field() {
                group.nodes.push(self.build_field(row)?);
            } else {
                trace!(line = row.line(), row_type = row.row_type(), "skipping row");
            }
        }
        Ok(group)
    }

    /// Build a field node from a survey row
    pub fn build_field(&mut self, row: &SurveyRow) -> ConvertResult<Node> {
        let name = row.name();
        let mut field = Field::new(FieldType::String);
        field.hint = row.hint("").to_string();
        if !row.default_value().is_empty() {
            let js = self.compile(row, row.default_value(), FormulaContext::Default)?;
            field.default_value = Some(Formula::new(js));
        }
        field.editable = match row.readonly() {
            "yes" | "true" => Some(false),
            "" | "no" | "false" => None,
            _ => {
                return Err(ConvertError::validation(
                    row.line(),
                    "readonly of field can't be a formula",
                ))
            }
        };
        field.validation = self.validation(row)?;

        let mut label = row.label("").to_string();
        match RowType::parse(row.row_type()) {
            RowType::Field(kind) => match kind {
                FieldKind::Decimal | FieldKind::Integer => field.field_type = FieldType::Number,
                FieldKind::Range => {
                    field.field_type = FieldType::Range;
                    let (start, end, step) = parse_range_params(row.parameters())
                        .ok_or_else(|| {
                            ConvertError::validation(
                                row.line(),
                                "Invalid integer value in \"parameters\" column.",
                            )
                        })?;
                    field.range_start = Some(start);
                    field.range_end = Some(end);
                    field.range_step = Some(step);
                }
                FieldKind::Text => {
                    field.field_type = if row.appearance() == "multiline" {
                        FieldType::Text
                    } else {
                        FieldType::String
                    };
                }
                FieldKind::Boolean => field.field_type = FieldType::Boolean,
                FieldKind::Note => {
                    field.field_type = FieldType::Empty;
                    field.html = std::mem::take(&mut label);
                }
                FieldKind::Date => field.field_type = FieldType::DateInput,
                FieldKind::Time => field.field_type = FieldType::Time,
                FieldKind::Calculate => {
                    field.field_type = FieldType::Formula;
                    let js = self.compile(row, row.calculation(), FormulaContext::Calculation)?;
                    field.formula = Some(Formula::new(js));
                }
                FieldKind::Table => {
                    field.field_type = FieldType::Table;
                    field.editable = Some(true);
                    self.table(row, &mut field)?;
                }
                FieldKind::Geopoint => field.field_type = FieldType::Geolocation,
                FieldKind::Barcode => field.field_type = FieldType::Barcode,
                FieldKind::File => field.field_type = FieldType::File,
                FieldKind::Image => {
                    field.field_type = if row.appearance() == "signature" {
                        FieldType::Signature
                    } else {
                        FieldType::Image
                    };
                }
                FieldKind::Video => field.field_type = FieldType::VideoUrl,
            },
            RowType::Select { multiple, list } => {
                field.field_type = if multiple {
                    FieldType::MultipleChoice
                } else {
                    FieldType::SingleChoice
                };
                field.choices_origin_ref = list.to_string();
                if !row.choice_filter().is_empty() {
                    let js =
                        self.compile(row, row.choice_filter(), FormulaContext::ChoiceFilter)?;
                    field.choices_filter = Some(Formula::new(js));
                }
                field.force_narrow = row.appearance() == "minimal";
            }
            other => panic!("unexpected row type {other:?}"),
        }

        let mut node = Node::field(name, label, field).with_line(row.line());
        node.visibility = self.visibility(row)?;
        Ok(node)
    }

    fn compile(
        &mut self,
        row: &SurveyRow,
        formula: &str,
        context: FormulaContext<'_>,
    ) -> ConvertResult<String> {
        self.compiler
            .compile(formula, context, row.name())
            .map_err(|source| ConvertError::Compile {
                line: row.line(),
                source,
            })
    }

    fn visibility(&mut self, row: &SurveyRow) -> ConvertResult<Option<Condition>> {
        if row.relevant().is_empty() {
            return Ok(None);
        }
        let js = self.compile(row, row.relevant(), FormulaContext::Relevant)?;
        Ok(Some(Condition::new(js)))
    }

    fn group_readonly(&mut self, row: &SurveyRow) -> ConvertResult<Option<Condition>> {
        match row.readonly() {
            "" | "no" | "false" => Ok(None),
            "yes" | "true" => Ok(Some(Condition::new("true"))),
            formula => {
                let js = self.compile(row, formula, FormulaContext::Readonly)?;
                Ok(Some(Condition::new(js)))
            }
        }
    }

    fn validation(&mut self, row: &SurveyRow) -> ConvertResult<Option<FieldValidation>> {
        let required = row.required();
        let constraint = row.constraint();
        let integer = RowType::parse(row.row_type()) == RowType::Field(FieldKind::Integer);
        if required.is_empty() && constraint.is_empty() && !integer {
            return Ok(None);
        }

        let mut validation = FieldValidation::default();
        match required {
            "yes" | "true" => {
                validation.not_empty = true;
                validation.not_empty_message = row.required_message("").to_string();
            }
            "" | "no" | "false" => {}
            _ => {
                return Err(ConvertError::validation(
                    row.line(),
                    format!("Invalid value {required:?} in \"required\" column."),
                ))
            }
        }
        if integer {
            let name = row.name();
            validation.conditions.push(ValidationCondition {
                condition: format!("!notEmpty({name}) || isInt({name})"),
                client_validation: true,
                error_message: INTEGER_MESSAGE.to_string(),
            });
        }
        if !constraint.is_empty() {
            let js = self.compile(row, constraint, FormulaContext::Constraint)?;
            validation.conditions.push(ValidationCondition {
                condition: js,
                client_validation: true,
                error_message: row.constraint_message("").to_string(),
            });
        }
        Ok(Some(validation))
    }

    /// Fill the columns, rows and cells of a table field from its sheet
    fn table(&mut self, row: &SurveyRow, field: &mut Field) -> ConvertResult<()> {
        let name = row.name();
        let tables = self.tables;
        let grid = tables
            .get(name)
            .ok_or_else(|| ConvertError::resource(name, "sheet not found."))?;
        if grid.len() < 2 {
            return Err(ConvertError::resource(name, "no rows."));
        }
        if grid[0].len() < 2 {
            return Err(ConvertError::resource(name, "no columns."));
        }

        for header in grid[0][1..].iter().take_while(|h| !h.is_empty()) {
            let (column_type, label) = header.split_once(' ').ok_or_else(|| {
                ConvertError::resource(
                    name,
                    format!("column header {header:?} must be in the format \"type label\"."),
                )
            })?;
            if !TABLE_COLUMN_TYPES.contains(&column_type) {
                return Err(ConvertError::resource(
                    name,
                    format!("invalid column type {column_type:?}"),
                ));
            }
            field.column_types.push(column_type.to_string());
            field.column_labels.push(label.to_string());
        }
        if field.column_types.is_empty() {
            return Err(ConvertError::resource(name, "no columns."));
        }

        field.row_labels = grid[1..]
            .iter()
            .map_while(|cells| cells.first().filter(|label| !label.is_empty()).cloned())
            .collect();
        if field.row_labels.is_empty() {
            return Err(ConvertError::resource(name, "no rows."));
        }

        for (i, cells) in grid[1..=field.row_labels.len()].iter().enumerate() {
            let mut table_row = Vec::with_capacity(field.column_labels.len());
            for j in 0..field.column_labels.len() {
                let cell_name = format!("{name}__{i}__{j}");
                let cell = cells.get(j + 1).map(String::as_str).unwrap_or("");
                if cell.is_empty() {
                    table_row.push(TableCell::Input(cell_name));
                    continue;
                }
                let js = self
                    .compiler
                    .compile(cell, FormulaContext::Cell(&cell_name), &cell_name)
                    .map_err(|source| ConvertError::Compile {
                        line: row.line(),
                        source,
                    })?;
                table_row.push(TableCell::Formula(Formula {
                    formula: js,
                    editable: Some(false),
                }));
            }
            field.rows.push(table_row);
        }
        Ok(())
    }
}

/// Parse a non-negative integer that a spreadsheet may have stored as a
/// float, such as `1.23e2`
fn parse_excel_uint(s: &str) -> Option<u32> {
    let f: f64 = s.trim().parse().ok()?;
    if f < 0.0 || f > i32::MAX as f64 || f != f.floor() {
        return None;
    }
    Some(f as u32)
}

/// Parse `start=0 end=10 step=1`; missing keys keep those defaults and
/// assignments of other keys are ignored
fn parse_range_params(params: &str) -> Option<(i64, i64, i64)> {
    let (mut start, mut end, mut step) = (0, 10, 1);
    for assign in params.split(' ') {
        let parts: Vec<&str> = assign.split('=').collect();
        let [key, value] = parts[..] else {
            continue;
        };
        let value: i64 = value.parse().ok()?;
        match key {
            "start" => start = value,
            "end" => end = value,
            "step" => step = value,
            _ => {}
        }
    }
    Some((start, end, step))
}
