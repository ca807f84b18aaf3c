//! Number literal lexing.
//!
//! This module handles lexing of integer and floating-point literals.
//!
//! Numbers are runs of decimal digits optionally containing a single `.`;
//! a second `.` inside the same literal is a lexical error rather than the
//! start of a new token (there is no method-call or range syntax here for
//! it to introduce).

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a number literal.
    ///
    /// # Number Formats
    ///
    /// - Integer: `42`, `123`, `0`
    /// - Float: `3.14`, `0.5`
    ///
    /// # Returns
    ///
    /// Either `Token::Number(i64)` or `Token::Float(f64)`.
    pub fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();
        let mut is_float = false;

        loop {
            let c = self.cursor.current_char();
            if c.is_ascii_digit() {
                self.cursor.advance();
            } else if c == '.' {
                if is_float {
                    self.report_error("multiple dots in float number".to_string());
                    self.cursor.advance();
                    continue;
                }
                is_float = true;
                self.cursor.advance();
            } else {
                break;
            }
        }

        let text = self.cursor.slice_from(start);

        if is_float {
            match text.parse::<f64>() {
                Ok(value) => Token::Float(value),
                Err(e) => {
                    self.report_error(format!("invalid floating point literal '{}': {}", text, e));
                    Token::Float(0.0)
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => Token::Number(value),
                Err(e) => {
                    self.report_error(format!("integer literal overflow: {}", e));
                    Token::Number(0)
                }
            }
        }
    }
}
