//! Edge case tests for faxc-lex

#[cfg(test)]
mod tests {
    use crate::{Lexer, Token};
    use faxc_util::Handler;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token == Token::Eof { break; }
            tokens.push(token);
        }
        tokens
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_empty_source() {
        assert!(lex_all("").is_empty());
    }

    #[test]
    fn test_edge_single_char_ident() {
        let t = lex_all("x");
        assert_eq!(t[0], Token::Ident(faxc_util::Symbol::intern("x")));
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(10000);
        let t = lex_all(&format!("let {} = 1 in {}", name, name));
        assert!(t.contains(&Token::Ident(faxc_util::Symbol::intern(&name))));
    }

    #[test]
    fn test_edge_keywords_not_idents() {
        let t = lex_all("extern let if");
        assert_eq!(t[0], Token::Extern);
        assert_eq!(t[1], Token::Let);
    }

    #[test]
    fn test_edge_empty_string() {
        let t = lex_all("\"\"");
        if let Token::String(s) = &t[0] {
            assert_eq!(s.as_str(), "");
        } else { panic!(); }
    }

    #[test]
    fn test_edge_all_operators() {
        let t = lex_all("+ - * / % == != < > <= >= && || !");
        assert!(t.contains(&Token::Plus));
        assert!(t.contains(&Token::EqEq));
    }

    #[test]
    fn test_edge_float_operators() {
        let t = lex_all("+. -. *. /. %.");
        assert_eq!(
            t,
            vec![
                Token::PlusDot,
                Token::MinusDot,
                Token::StarDot,
                Token::SlashDot,
                Token::PercentDot,
            ]
        );
    }

    #[test]
    fn test_edge_all_delimiters() {
        let t = lex_all("( ) { } , ; :");
        assert!(t.contains(&Token::LParen));
        assert!(t.contains(&Token::RBrace));
        assert!(t.contains(&Token::Colon));
    }

    #[test]
    fn test_edge_nested_delimiters() {
        let t = lex_all("((()))");
        assert_eq!(t.iter().filter(|x| **x == Token::LParen).count(), 3);
    }

    #[test]
    fn test_edge_case_sensitivity() {
        let t = lex_all("If if");
        assert_eq!(t[0], Token::Ident(faxc_util::Symbol::intern("If")));
        assert_eq!(t[1], Token::If);
    }

    #[test]
    fn test_edge_bools() {
        let t = lex_all("true false");
        assert_eq!(t[0], Token::True);
        assert_eq!(t[1], Token::False);
    }

    #[test]
    fn test_edge_max_int() {
        let t = lex_all("9223372036854775807");
        assert!(matches!(t[0], Token::Number(_)));
    }

    #[test]
    fn test_edge_all_keywords() {
        let t = lex_all("if then else let in extern new");
        assert_eq!(
            t,
            vec![
                Token::If,
                Token::Then,
                Token::Else,
                Token::Let,
                Token::In,
                Token::Extern,
                Token::New,
            ]
        );
    }

    #[test]
    fn test_edge_whitespace_variations() {
        let t = lex_all("let\tx\n=\n1");
        assert!(t.contains(&Token::Let));
        assert!(t.contains(&Token::Number(1)));
    }

    #[test]
    fn test_edge_leading_zeros() {
        assert!(!lex_all("007").is_empty());
    }

    // ==================== ERROR CASES ====================

    #[test]
    fn test_err_unterminated_string() {
        let mut h = Handler::new();
        let _ = Lexer::new("\"unterminated", &mut h).next_token();
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_invalid_chars() {
        let mut h = Handler::new();
        let mut lex = Lexer::new("@$", &mut h);
        while lex.next_token() != Token::Eof {}
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_mixed_valid_invalid() {
        let mut h = Handler::new();
        let mut lex = Lexer::new("let x = @ 1 in x", &mut h);
        while lex.next_token() != Token::Eof {}
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_multiple_dots() {
        let mut h = Handler::new();
        let _ = Lexer::new("1.2.3", &mut h).next_token();
        assert!(h.has_errors());
    }

    #[test]
    fn test_edge_consec_ops() {
        assert!(lex_all("+++").len() >= 2);
    }
}
