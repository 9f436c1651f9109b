//! Supported xlsform functions and their translations

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// How a call is rewritten, given its already compiled arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    /// `f(a, b)` becomes `name(a, b)`
    Rename(&'static str),
    /// `f(a, b, c)` becomes `(a).name(b, c)`
    Method(&'static str),
    /// `if(c, t, e)` becomes `(c ? t : e)`
    Ternary,
    /// `regex(s, re)` becomes `((s).match(re) !== null)`
    RegexMatch,
    /// `f(s)` becomes `(s).length`
    Length,
    /// `exp10(x)` becomes `Math.pow(10, x)`
    Exp10,
    /// `f()` becomes a constant expression
    Constant(&'static str),
}

impl Translation {
    /// Append the translated call to `out`
    pub fn emit(self, out: &mut String, args: &[String]) {
        match self {
            Translation::Rename(name) => {
                out.push_str(name);
                out.push('(');
                out.push_str(&args.join(", "));
                out.push(')');
            }
            Translation::Method(name) => {
                let (receiver, rest) = args.split_first().map_or(("", &[][..]), |(r, rest)| {
                    (r.as_str(), rest)
                });
                out.push('(');
                out.push_str(receiver);
                out.push_str(").");
                out.push_str(name);
                out.push('(');
                out.push_str(&rest.join(", "));
                out.push(')');
            }
            Translation::Ternary => {
                out.push('(');
                out.push_str(arg(args, 0));
                out.push_str(" ? ");
                out.push_str(arg(args, 1));
                out.push_str(" : ");
                out.push_str(arg(args, 2));
                out.push(')');
            }
            Translation::RegexMatch => {
                out.push_str("((");
                out.push_str(arg(args, 0));
                out.push_str(").match(");
                out.push_str(arg(args, 1));
                out.push_str(") !== null)");
            }
            Translation::Length => {
                out.push('(');
                out.push_str(arg(args, 0));
                out.push_str(").length");
            }
            Translation::Exp10 => {
                out.push_str("Math.pow(10, ");
                out.push_str(arg(args, 0));
                out.push(')');
            }
            Translation::Constant(js) => out.push_str(js),
        }
    }
}

fn arg(args: &[String], i: usize) -> &str {
    args.get(i).map_or("", String::as_str)
}

/// Function definition
#[derive(Debug, Clone, Copy)]
pub struct FunctionDef {
    /// Function name as written in xlsform
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    pub translation: Translation,
}

impl FunctionDef {
    /// Check if `count` arguments are accepted
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.map_or(true, |max| count <= max)
    }

    /// Human readable argument count, for error messages
    pub fn expected_args(&self) -> String {
        match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{} to {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        }
    }
}

const fn def(
    name: &'static str,
    min_args: usize,
    max_args: Option<usize>,
    translation: Translation,
) -> FunctionDef {
    FunctionDef {
        name,
        min_args,
        max_args,
        translation,
    }
}

use Translation::*;

const BUILTINS: &[FunctionDef] = &[
    // Math
    def("max", 1, None, Rename("Math.max")),
    def("min", 1, None, Rename("Math.min")),
    def("floor", 1, Some(1), Rename("Math.floor")),
    def("int", 1, Some(1), Rename("Math.floor")),
    def("ceiling", 1, Some(1), Rename("Math.ceil")),
    def("pow", 1, Some(2), Rename("Math.pow")),
    def("log", 1, Some(1), Rename("Math.log")),
    def("log10", 1, Some(1), Rename("Math.log10")),
    def("abs", 1, Some(1), Rename("Math.abs")),
    def("sin", 1, Some(1), Rename("Math.sin")),
    def("cos", 1, Some(1), Rename("Math.cos")),
    def("tan", 1, Some(1), Rename("Math.tan")),
    def("asin", 1, Some(1), Rename("Math.asin")),
    def("acos", 1, Some(1), Rename("Math.acos")),
    def("atan", 1, Some(1), Rename("Math.atan")),
    def("atan2", 2, Some(2), Rename("Math.atan2")),
    def("sqrt", 1, Some(1), Rename("Math.sqrt")),
    def("exp", 1, Some(1), Rename("Math.exp")),
    def("exp10", 1, Some(1), Exp10),
    def("random", 0, Some(0), Rename("Math.random")),
    def("pi", 0, Some(0), Constant("Math.PI")),
    def("round", 1, Some(2), Rename("round")),
    // Conversions
    def("string", 1, Some(1), Rename("String")),
    def("number", 1, Some(1), Rename("Number")),
    def("boolean", 1, Some(1), Rename("Boolean")),
    // Logic
    def("if", 3, Some(3), Ternary),
    def("not", 1, Some(1), Rename("!")),
    def("true", 0, Some(0), Constant("true")),
    def("false", 0, Some(0), Constant("false")),
    // Text
    def("regex", 2, Some(2), RegexMatch),
    def("contains", 2, Some(2), Method("includes")),
    def("starts-with", 2, Some(2), Method("startsWith")),
    def("ends-with", 2, Some(2), Method("endsWith")),
    def("substr", 2, Some(3), Method("substring")),
    def("concat", 1, None, Method("concat")),
    def("string-length", 1, Some(1), Length),
    // Choices
    def("selected", 2, Some(2), Rename("valueInChoice")),
    def("count-selected", 1, Some(1), Length),
];

static FUNCTIONS: Lazy<HashMap<&'static str, FunctionDef>> =
    Lazy::new(|| BUILTINS.iter().map(|f| (f.name, *f)).collect());

/// Look up a function by its xlsform name
pub fn lookup(name: &str) -> Option<&'static FunctionDef> {
    FUNCTIONS.get(name)
}
