//! Formula tokenizer
//!
//! Tokens borrow from the formula text: numbers and string literals are
//! copied to the output verbatim, so the scanner only checks their shape.

use std::fmt;

use crate::error::{CompileErrorKind, Position};

/// Token types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Identifier; function names may contain `-` between words (`string-length`)
    Ident(&'a str),
    /// Integer or float literal, as written
    Number(&'a str),
    /// String literal including its quotes
    Str(&'a str),
    /// Operator or delimiter
    Punct(&'static str),
    /// End of input
    Eof,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "identifier \"{s}\""),
            Token::Number(s) => write!(f, "number {s}"),
            Token::Str(s) => write!(f, "string {s}"),
            Token::Punct(s) => write!(f, "\"{s}\""),
            Token::Eof => f.write_str("end of formula"),
        }
    }
}

/// A token together with the position of its first character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Spanned<'a> {
    pub token: Token<'a>,
    pub pos: Position,
}

/// Scanner error: what and where
pub(crate) type ScanError = (Position, CompileErrorKind);

const TWO_CHAR_PUNCT: [&str; 5] = ["==", "!=", "<=", ">=", ".."];
const ONE_CHAR_PUNCT: [&str; 14] = [
    "(", ")", ",", "$", "{", "}", ".", "+", "-", "*", "=", "!", "<", ">",
];

pub(crate) struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan the next token
    pub fn next_token(&mut self) -> Result<Spanned<'a>, ScanError> {
        self.skip_whitespace();
        let pos = self.position();

        let Some(c) = self.peek_char() else {
            return Ok(Spanned {
                token: Token::Eof,
                pos,
            });
        };

        let token = if c.is_alphabetic() || c == '_' {
            Token::Ident(self.scan_identifier())
        } else if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            Token::Number(self.scan_number())
        } else if c == '"' || c == '\'' {
            Token::Str(self.scan_string(c).map_err(|kind| (self.position(), kind))?)
        } else {
            Token::Punct(self.scan_punct().ok_or((pos, CompileErrorKind::InvalidChar(c)))?)
        };
        Ok(Spanned { token, pos })
    }

    /// Scan a word; dashed words (`string-length`) only name functions, so
    /// the dash is kept only when the word is followed by `(`
    fn scan_identifier(&mut self) -> &'a str {
        let start = self.pos;
        self.skip_word();

        let input = self.input;
        let rest = &input[self.pos..];
        let dashed = dashed_len(rest);
        if dashed > 0 && rest[dashed..].trim_start().starts_with('(') {
            let end = self.pos + dashed;
            while self.pos < end {
                self.advance();
            }
        }
        &self.input[start..self.pos]
    }

    fn skip_word(&mut self) {
        while self.peek_char().is_some_and(is_word_char) {
            self.advance();
        }
    }

    fn scan_number(&mut self) -> &'a str {
        let start = self.pos;
        self.skip_digits();
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let sign = matches!(self.peek_char_at(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_char_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.advance();
                }
                self.skip_digits();
            }
        }
        &self.input[start..self.pos]
    }

    fn skip_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Scan a quoted literal, validating its escape sequences
    fn scan_string(&mut self, quote: char) -> Result<&'a str, CompileErrorKind> {
        let start = self.pos;
        self.advance();
        loop {
            match self.peek_char() {
                None | Some('\n') => return Err(CompileErrorKind::UnterminatedString),
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(&self.input[start..self.pos]);
                }
                Some('\\') => {
                    self.advance();
                    self.scan_escape(quote)?;
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn scan_escape(&mut self, quote: char) -> Result<(), CompileErrorKind> {
        let Some(c) = self.peek_char() else {
            return Err(CompileErrorKind::UnterminatedString);
        };
        match c {
            'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' => {
                self.advance();
                Ok(())
            }
            c if c == quote => {
                self.advance();
                Ok(())
            }
            '0'..='7' => {
                let value = self.scan_digits(3, 8)?;
                if value > 255 {
                    return Err(CompileErrorKind::InvalidEscape);
                }
                Ok(())
            }
            'x' | 'u' | 'U' => {
                self.advance();
                let count = match c {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let value = self.scan_digits(count, 16)?;
                if c != 'x' && char::from_u32(value).is_none() {
                    return Err(CompileErrorKind::InvalidEscape);
                }
                Ok(())
            }
            _ => Err(CompileErrorKind::InvalidEscape),
        }
    }

    /// Consume exactly `count` digits in `radix`
    fn scan_digits(&mut self, count: usize, radix: u32) -> Result<u32, CompileErrorKind> {
        let mut value: u32 = 0;
        for _ in 0..count {
            let digit = self
                .peek_char()
                .and_then(|c| c.to_digit(radix))
                .ok_or(CompileErrorKind::InvalidEscape)?;
            value = value
                .checked_mul(radix)
                .and_then(|v| v.checked_add(digit))
                .ok_or(CompileErrorKind::InvalidEscape)?;
            self.advance();
        }
        Ok(value)
    }

    fn scan_punct(&mut self) -> Option<&'static str> {
        let rest = &self.input[self.pos..];
        let punct = TWO_CHAR_PUNCT
            .iter()
            .chain(ONE_CHAR_PUNCT.iter())
            .find(|p| rest.starts_with(**p))?;
        for _ in 0..punct.len() {
            self.advance();
        }
        Some(*punct)
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte length of the `-word` segments at the start of `rest`
fn dashed_len(rest: &str) -> usize {
    let mut len = 0;
    loop {
        let Some(segment) = rest[len..].strip_prefix('-') else {
            return len;
        };
        if !segment.starts_with(char::is_alphabetic) {
            return len;
        }
        let word = segment.find(|c: char| !is_word_char(c)).unwrap_or(segment.len());
        len += 1 + word;
    }
}
