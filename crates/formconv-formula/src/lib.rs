//! # formconv-formula
//!
//! Compiler for the xlsform formula language.
//!
//! This crate provides:
//! - Formula tokenizing and parsing (one pass, no AST)
//! - Translation to the JavaScript-like expressions evaluated by the form engine
//! - The fixed table of supported xlsform functions
//!
//! ## Example
//!
//! ```rust
//! use formconv_formula::{compile, FormulaContext};
//!
//! let js = compile("${age} >= 18 and selected(${consent}, 'yes')", FormulaContext::Relevant, "q1").unwrap();
//! assert_eq!(js, "age >= 18 && valueInChoice(consent, 'yes')");
//! ```

pub mod compiler;
pub mod error;
pub mod functions;
mod scanner;

pub use compiler::{compile, Compiler, JS_PREFIX, MAX_DEPTH};
pub use error::{CompileError, CompileErrorKind, CompileResult, FormulaContext, Position};
pub use functions::{FunctionDef, Translation};
