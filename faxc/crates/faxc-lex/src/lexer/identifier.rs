//! Identifier and keyword lexing.
//!
//! This module handles lexing of identifiers and keywords.

use crate::token::{keyword_from_ident, Token};
use crate::unicode::is_ascii_ident_continue;
use crate::Lexer;
use faxc_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword.
    ///
    /// Identifiers start with a letter or underscore, followed by
    /// alphanumeric characters or underscores. After reading the identifier,
    /// checks if it matches a reserved keyword.
    ///
    /// # Returns
    ///
    /// Either a keyword token (e.g., `Token::Let`) or `Token::Ident(symbol)`
    pub fn lex_identifier(&mut self) -> Token {
        while is_ascii_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);

        keyword_from_ident(text).unwrap_or_else(|| Token::Ident(Symbol::intern(text)))
    }
}
