//! Operator lexing.
//!
//! This module handles lexing of operators, each of which may carry a `.`
//! suffix selecting the float-typed variant (e.g. `+` vs `+.`).

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes `+` or `+.`.
    pub fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            Token::PlusDot
        } else {
            Token::Plus
        }
    }

    /// Lexes `-` or `-.`.
    pub fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            Token::MinusDot
        } else {
            Token::Minus
        }
    }

    /// Lexes `*` or `*.`.
    pub fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            Token::StarDot
        } else {
            Token::Star
        }
    }

    /// Lexes `/`, `/.`, or the start of a `//` line comment (handled by the
    /// caller before dispatch reaches here).
    pub fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            Token::SlashDot
        } else {
            Token::Slash
        }
    }

    /// Lexes `%` or `%.`.
    pub fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            Token::PercentDot
        } else {
            Token::Percent
        }
    }

    /// Lexes `=` or `==`.
    pub fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::EqEq
        } else {
            Token::Eq
        }
    }

    /// Lexes `!` or `!=`.
    pub fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::NotEq
        } else {
            Token::Bang
        }
    }

    /// Lexes `<` or `<=`.
    pub fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::LtEq
        } else {
            Token::Lt
        }
    }

    /// Lexes `>` or `>=`.
    pub fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::GtEq
        } else {
            Token::Gt
        }
    }

    /// Lexes `&` or `&&`.
    pub fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            Token::AmpAmp
        } else {
            Token::Amp
        }
    }

    /// Lexes `|` or `||`.
    pub fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            Token::PipePipe
        } else {
            Token::Pipe
        }
    }

    /// Lexes `^`.
    pub fn lex_caret(&mut self) -> Token {
        self.cursor.advance();
        Token::Caret
    }

    /// Lexes `:` or `:=`.
    pub fn lex_colon(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::ColonEq
        } else {
            Token::Colon
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_util::Handler;

    fn lex_op(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.next_token()
    }

    #[test]
    fn test_int_arith_ops() {
        assert_eq!(lex_op("+"), Token::Plus);
        assert_eq!(lex_op("-"), Token::Minus);
        assert_eq!(lex_op("*"), Token::Star);
        assert_eq!(lex_op("/"), Token::Slash);
        assert_eq!(lex_op("%"), Token::Percent);
    }

    #[test]
    fn test_float_arith_ops() {
        assert_eq!(lex_op("+."), Token::PlusDot);
        assert_eq!(lex_op("-."), Token::MinusDot);
        assert_eq!(lex_op("*."), Token::StarDot);
        assert_eq!(lex_op("/."), Token::SlashDot);
        assert_eq!(lex_op("%."), Token::PercentDot);
    }

    #[test]
    fn test_eq_and_eq_eq() {
        assert_eq!(lex_op("="), Token::Eq);
        assert_eq!(lex_op("=="), Token::EqEq);
    }

    #[test]
    fn test_bang_and_not_eq() {
        assert_eq!(lex_op("!"), Token::Bang);
        assert_eq!(lex_op("!="), Token::NotEq);
    }

    #[test]
    fn test_relational() {
        assert_eq!(lex_op("<"), Token::Lt);
        assert_eq!(lex_op("<="), Token::LtEq);
        assert_eq!(lex_op(">"), Token::Gt);
        assert_eq!(lex_op(">="), Token::GtEq);
    }

    #[test]
    fn test_bitwise_logical() {
        assert_eq!(lex_op("&"), Token::Amp);
        assert_eq!(lex_op("&&"), Token::AmpAmp);
        assert_eq!(lex_op("|"), Token::Pipe);
        assert_eq!(lex_op("||"), Token::PipePipe);
        assert_eq!(lex_op("^"), Token::Caret);
    }

    #[test]
    fn test_colon_and_ptr_assign() {
        assert_eq!(lex_op(":"), Token::Colon);
        assert_eq!(lex_op(":="), Token::ColonEq);
    }
}
