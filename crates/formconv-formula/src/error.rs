//! Formula error types

use std::fmt;

use thiserror::Error;

/// Result type for formula compilation
pub type CompileResult<T> = std::result::Result<T, CompileError>;

/// The survey column (or table cell) a formula was read from
///
/// Only [`FormulaContext::ChoiceFilter`] changes how a formula compiles;
/// the others are used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaContext<'a> {
    Relevant,
    Constraint,
    Calculation,
    ChoiceFilter,
    Readonly,
    Default,
    /// A cell of a table field, named `<field>__<row>__<col>`
    Cell(&'a str),
}

impl fmt::Display for FormulaContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormulaContext::Relevant => "relevant",
            FormulaContext::Constraint => "constraint",
            FormulaContext::Calculation => "calculation",
            FormulaContext::ChoiceFilter => "choice_filter",
            FormulaContext::Readonly => "readonly",
            FormulaContext::Default => "default",
            FormulaContext::Cell(name) => *name,
        };
        f.write_str(name)
    }
}

/// 1-based position of a token in the formula text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// What went wrong while compiling a formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    #[error("Unexpected token {0}.")]
    UnexpectedToken(String),

    #[error("Expected {expected}, found {found}.")]
    Expected { expected: String, found: String },

    #[error("Unexpected token \"==\". (did you mean \"=\"?)")]
    DoubleEquals,

    #[error("Unary operator \"!\" not supported, use not().")]
    UnaryNot,

    #[error("\"..\" is not supported in formulas.")]
    ParentReference,

    #[error("Consecutive \"+\"/\"-\" signs are not supported.")]
    ConsecutiveSigns,

    #[error("Unknown function \"{0}\".")]
    UnknownFunction(String),

    #[error("Function \"{function}\" expects {expected} arguments, found {actual}.")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("Identifier \"{0}\" is not allowed here, did you mean \"${{{0}}}\"?")]
    BareIdentifier(String),

    #[error("Invalid escape sequence in string literal.")]
    InvalidEscape,

    #[error("String literal not terminated.")]
    UnterminatedString,

    #[error("Invalid character {0:?}.")]
    InvalidChar(char),

    #[error("Formula nested too deeply (more than {0} levels).")]
    TooDeep(usize),
}

/// A formula compilation error, located in the formula text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("formula {context}:{line}:{column}: {kind}")]
pub struct CompileError {
    /// Display form of the [`FormulaContext`]
    pub context: String,
    pub line: usize,
    pub column: usize,
    pub kind: CompileErrorKind,
}

impl CompileError {
    pub fn new(context: FormulaContext<'_>, pos: Position, kind: CompileErrorKind) -> Self {
        Self {
            context: context.to_string(),
            line: pos.line,
            column: pos.column,
            kind,
        }
    }
}
