//! Formula compiler
//!
//! A recursive descent translator from xlsform formulas to the expression
//! syntax of the form engine. There is no AST: each production writes its
//! translation to the output buffer as soon as it is recognized. Operators
//! have no precedence of their own, so an expression is a flat sequence of
//! terms and binary operators, copied in order.

use tracing::trace;

use crate::error::{CompileError, CompileErrorKind, CompileResult, FormulaContext, Position};
use crate::functions;
use crate::scanner::{ScanError, Scanner, Spanned, Token};

/// Prefix marking a formula as raw JavaScript, copied without parsing
pub const JS_PREFIX: &str = "js:";

/// Deepest nesting of parentheses and function calls accepted
pub const MAX_DEPTH: usize = 100;

/// Formula compiler
///
/// Keeps an output buffer reused across calls. Every [`Compiler::compile`]
/// call builds its own parser, so a compiler can be used for any number of
/// formulas in sequence.
#[derive(Debug, Default)]
pub struct Compiler {
    out: String,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `formula`, replacing the self reference `.` with `field_name`
    ///
    /// # Example
    /// ```rust
    /// use formconv_formula::{Compiler, FormulaContext};
    ///
    /// let mut compiler = Compiler::new();
    /// let js = compiler.compile(". > ${min}", FormulaContext::Constraint, "age").unwrap();
    /// assert_eq!(js, "age > min");
    /// ```
    pub fn compile(
        &mut self,
        formula: &str,
        context: FormulaContext<'_>,
        field_name: &str,
    ) -> CompileResult<String> {
        if let Some(js) = formula.trim_start().strip_prefix(JS_PREFIX) {
            return Ok(js.trim_start().to_string());
        }

        self.out.clear();
        Parser::new(formula, context, field_name, &mut self.out).parse_formula()?;
        trace!(%context, formula, js = %self.out, "compiled formula");
        Ok(self.out.clone())
    }
}

/// Compile a single formula with a throwaway [`Compiler`]
pub fn compile(
    formula: &str,
    context: FormulaContext<'_>,
    field_name: &str,
) -> CompileResult<String> {
    Compiler::new().compile(formula, context, field_name)
}

/// Per-call parser state
struct Parser<'a, 'o> {
    scanner: Scanner<'a>,
    peeked: Option<Spanned<'a>>,
    context: FormulaContext<'a>,
    field_name: &'a str,
    out: &'o mut String,
    depth: usize,
}

impl<'a, 'o> Parser<'a, 'o> {
    fn new(
        formula: &'a str,
        context: FormulaContext<'a>,
        field_name: &'a str,
        out: &'o mut String,
    ) -> Self {
        Self {
            scanner: Scanner::new(formula),
            peeked: None,
            context,
            field_name,
            out,
            depth: 0,
        }
    }

    // === Token stream ===

    fn peek(&mut self) -> CompileResult<Spanned<'a>> {
        if let Some(spanned) = self.peeked {
            return Ok(spanned);
        }
        let spanned = self
            .scanner
            .next_token()
            .map_err(|e| self.scan_error(e))?;
        self.peeked = Some(spanned);
        Ok(spanned)
    }

    fn next(&mut self) -> CompileResult<Spanned<'a>> {
        let spanned = self.peek()?;
        self.peeked = None;
        Ok(spanned)
    }

    fn expect(&mut self, expected: Token<'static>) -> CompileResult<Spanned<'a>> {
        let spanned = self.next()?;
        if spanned.token != expected {
            return Err(self.error(
                spanned.pos,
                CompileErrorKind::Expected {
                    expected: expected.to_string(),
                    found: spanned.token.to_string(),
                },
            ));
        }
        Ok(spanned)
    }

    /// Enter a parenthesized expression or call argument list
    fn nest(&mut self, pos: Position) -> CompileResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(pos, CompileErrorKind::TooDeep(MAX_DEPTH)));
        }
        Ok(())
    }

    fn error(&self, pos: Position, kind: CompileErrorKind) -> CompileError {
        CompileError::new(self.context, pos, kind)
    }

    fn scan_error(&self, (pos, kind): ScanError) -> CompileError {
        self.error(pos, kind)
    }

    // === Grammar ===

    fn parse_formula(&mut self) -> CompileResult<()> {
        self.parse_expression()?;
        let end = self.next()?;
        if end.token != Token::Eof {
            return Err(self.unexpected(end));
        }
        Ok(())
    }

    /// expr := term (binop term)*
    ///
    /// Stops before the first token that is not a binary operator; the
    /// caller decides whether that token may end the expression.
    fn parse_expression(&mut self) -> CompileResult<()> {
        loop {
            self.parse_term()?;

            let op = self.peek()?;
            let js = match op.token {
                Token::Punct("+") => " + ",
                Token::Punct("-") => " - ",
                Token::Punct("*") => "*",
                Token::Punct("=") => " === ",
                Token::Punct("!=") => " !== ",
                Token::Punct("<") => " < ",
                Token::Punct("<=") => " <= ",
                Token::Punct(">") => " > ",
                Token::Punct(">=") => " >= ",
                Token::Punct("==") => {
                    return Err(self.error(op.pos, CompileErrorKind::DoubleEquals))
                }
                Token::Punct("!") => return Err(self.error(op.pos, CompileErrorKind::UnaryNot)),
                Token::Ident("and") => " && ",
                Token::Ident("or") => " || ",
                Token::Ident("div") => "/",
                Token::Ident("mod") => "%",
                _ => return Ok(()),
            };
            self.next()?;
            self.out.push_str(js);

            if matches!(op.token, Token::Punct("+" | "-")) {
                let following = self.peek()?;
                if is_sign(following.token) {
                    return Err(self.error(following.pos, CompileErrorKind::ConsecutiveSigns));
                }
            }
        }
    }

    /// term := sign? (literal | '${' ident '}' | '.' | '(' expr ')' | call | ident)
    fn parse_term(&mut self) -> CompileResult<()> {
        let mut tok = self.next()?;
        if let Token::Punct(sign @ ("+" | "-")) = tok.token {
            self.out.push_str(sign);
            tok = self.next()?;
            if is_sign(tok.token) {
                return Err(self.error(tok.pos, CompileErrorKind::ConsecutiveSigns));
            }
        }

        match tok.token {
            Token::Number(text) | Token::Str(text) => self.out.push_str(text),
            Token::Punct("$") => {
                self.expect(Token::Punct("{"))?;
                let ident = self.next()?;
                let Token::Ident(name) = ident.token else {
                    return Err(self.error(
                        ident.pos,
                        CompileErrorKind::Expected {
                            expected: "identifier".to_string(),
                            found: ident.token.to_string(),
                        },
                    ));
                };
                self.out.push_str(name);
                self.expect(Token::Punct("}"))?;
            }
            Token::Punct(".") => self.out.push_str(self.field_name),
            Token::Punct("..") => {
                return Err(self.error(tok.pos, CompileErrorKind::ParentReference))
            }
            Token::Punct("!") => return Err(self.error(tok.pos, CompileErrorKind::UnaryNot)),
            Token::Punct("(") => {
                self.nest(tok.pos)?;
                self.out.push('(');
                self.parse_expression()?;
                self.expect(Token::Punct(")"))?;
                self.out.push(')');
                self.depth -= 1;
            }
            Token::Ident("True") => self.out.push_str("true"),
            Token::Ident("False") => self.out.push_str("false"),
            Token::Ident(name) => {
                if self.peek()?.token == Token::Punct("(") {
                    self.parse_call(name, tok.pos)?;
                } else {
                    self.parse_identifier(name, tok.pos)?;
                }
            }
            _ => return Err(self.unexpected(tok)),
        }
        Ok(())
    }

    fn parse_call(&mut self, name: &'a str, pos: Position) -> CompileResult<()> {
        let def = functions::lookup(name)
            .ok_or_else(|| self.error(pos, CompileErrorKind::UnknownFunction(name.to_string())))?;
        self.nest(pos)?;
        self.expect(Token::Punct("("))?;

        let mut args = Vec::new();
        if self.peek()?.token == Token::Punct(")") {
            self.next()?;
        } else {
            loop {
                let start = self.out.len();
                self.parse_expression()?;
                args.push(self.out.split_off(start));

                let sep = self.next()?;
                match sep.token {
                    Token::Punct(",") => continue,
                    Token::Punct(")") => break,
                    _ => {
                        return Err(self.error(
                            sep.pos,
                            CompileErrorKind::Expected {
                                expected: "\",\" or \")\"".to_string(),
                                found: sep.token.to_string(),
                            },
                        ))
                    }
                }
            }
        }

        if !def.accepts(args.len()) {
            return Err(self.error(
                pos,
                CompileErrorKind::ArgumentCount {
                    function: name.to_string(),
                    expected: def.expected_args(),
                    actual: args.len(),
                },
            ));
        }
        def.translation.emit(self.out, &args);
        self.depth -= 1;
        Ok(())
    }

    /// Plain identifiers only name columns of the choice being filtered
    fn parse_identifier(&mut self, name: &str, pos: Position) -> CompileResult<()> {
        if self.context != FormulaContext::ChoiceFilter {
            return Err(self.error(pos, CompileErrorKind::BareIdentifier(name.to_string())));
        }
        let member = match name {
            "name" => "value",
            other => other,
        };
        self.out.push_str("$choice.");
        self.out.push_str(member);
        Ok(())
    }

    fn unexpected(&self, spanned: Spanned<'_>) -> CompileError {
        self.error(
            spanned.pos,
            CompileErrorKind::UnexpectedToken(spanned.token.to_string()),
        )
    }
}

fn is_sign(token: Token<'_>) -> bool {
    matches!(token, Token::Punct("+" | "-"))
}
