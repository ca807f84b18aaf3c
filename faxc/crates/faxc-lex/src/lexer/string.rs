//! String literal lexing.
//!
//! This module handles lexing of double-quoted string literals.

use crate::token::Token;
use crate::unicode::parse_hex_codepoint;
use crate::Lexer;
use faxc_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes a string literal.
    ///
    /// Parses a string enclosed in double quotes, handling escape sequences.
    ///
    /// # Returns
    ///
    /// `Token::String(symbol)` with the processed string content
    pub fn lex_string(&mut self) -> Token {
        self.cursor.advance();

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            let c = self.cursor.current_char();

            if c == '"' {
                self.cursor.advance();
                break;
            }

            if c == '\n' {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                if let Some(escaped) = self.parse_escape() {
                    content.push(escaped);
                }
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        Token::String(Symbol::intern(&content))
    }

    /// Parses an escape sequence.
    ///
    /// Handles: `\n`, `\t`, `\r`, `\\`, `\"`, `\'`, `\0`, `\xNN`, `\u{NNNN}`
    ///
    /// # Returns
    ///
    /// The escaped character, or None on error
    pub fn parse_escape(&mut self) -> Option<char> {
        if self.cursor.is_at_end() {
            self.report_error("unterminated escape sequence".to_string());
            return None;
        }

        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '\'' => Some('\''),
            '0' => Some('\0'),
            'x' => {
                let mut hex = String::new();
                for _ in 0..2 {
                    let h = self.cursor.current_char();
                    if h.is_ascii_hexdigit() {
                        hex.push(h);
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
                if hex.len() == 2 {
                    u8::from_str_radix(&hex, 16).ok().map(|b| b as char)
                } else {
                    self.report_error("invalid hex escape sequence".to_string());
                    None
                }
            },
            'u' => {
                if self.cursor.current_char() != '{' {
                    self.report_error("expected {{ after \\u".to_string());
                    return None;
                }
                self.cursor.advance();
                let mut hex = String::new();
                while self.cursor.current_char() != '}' && !self.cursor.is_at_end() {
                    let h = self.cursor.current_char();
                    if h.is_ascii_hexdigit() {
                        hex.push(h);
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
                if self.cursor.current_char() == '}' {
                    self.cursor.advance();
                }
                parse_hex_codepoint(&hex).and_then(|cp| char::from_u32(cp))
            },
            _ => {
                self.report_error(format!("unknown escape sequence: \\{}", c));
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;
    use faxc_util::Handler;

    fn lex_str(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.lex_string()
    }

    #[test]
    fn test_simple_string() {
        let token = lex_str("\"hello\"");
        assert_eq!(token, Token::String(Symbol::intern("hello")));
    }

    #[test]
    fn test_string_with_escape() {
        let token = lex_str("\"hello\\nworld\"");
        assert_eq!(token, Token::String(Symbol::intern("hello\nworld")));
    }

    #[test]
    fn test_string_with_tab() {
        let token = lex_str("\"hello\\tworld\"");
        assert_eq!(token, Token::String(Symbol::intern("hello\tworld")));
    }

    #[test]
    fn test_string_with_hex_escape() {
        let token = lex_str("\"\\x41\"");
        assert_eq!(token, Token::String(Symbol::intern("A")));
    }

    #[test]
    fn test_empty_string() {
        let token = lex_str("\"\"");
        assert_eq!(token, Token::String(Symbol::intern("")));
    }
}
