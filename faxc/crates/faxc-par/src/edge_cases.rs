//! Edge case tests for faxc-par

#[cfg(test)]
mod tests {
    use crate::{Node, Parser};
    use faxc_lex::{Lexer, Token};
    use faxc_util::Handler;

    fn parse_source(source: &str) -> (Vec<Node>, bool) {
        let mut handler = Handler::new();
        let tokens: Vec<Token> = Lexer::new(source, &mut handler).collect();
        let mut parser = Parser::new(tokens, &mut handler);
        let nodes = parser.parse_program();
        let had_errors = parser.has_errors();
        (nodes, had_errors)
    }

    #[test]
    fn test_edge_empty_source() {
        let (nodes, errors) = parse_source("");
        assert!(nodes.is_empty());
        assert!(!errors);
    }

    #[test]
    fn test_edge_whitespace_only() {
        let (nodes, errors) = parse_source("   \n\t  \n  ");
        assert!(nodes.is_empty());
        assert!(!errors);
    }

    #[test]
    fn test_edge_single_number() {
        let (nodes, errors) = parse_source("42");
        assert!(!errors);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_edge_nested_if() {
        let (nodes, errors) = parse_source("if true then if false then 1 else 2 else 3");
        assert!(!errors);
        assert_eq!(nodes.len(), 1);
        assert!(matches!(nodes[0], Node::If { .. }));
    }

    #[test]
    fn test_edge_deeply_nested_parens() {
        let (nodes, errors) = parse_source("((((1))))");
        assert!(!errors);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_edge_nested_let() {
        let (nodes, errors) = parse_source("let x = 1 in let y = 2 in x + y");
        assert!(!errors);
        assert!(matches!(nodes[0], Node::LetIn { .. }));
    }

    #[test]
    fn test_edge_recursive_function() {
        let (nodes, errors) =
            parse_source("let fib n = if n < 2 then n else fib(n - 1) + fib(n - 2)");
        assert!(!errors);
        assert!(matches!(nodes[0], Node::LetFun { .. }));
    }

    #[test]
    fn test_edge_zero_arg_call() {
        let (nodes, errors) = parse_source("f()");
        assert!(!errors);
        match &nodes[0] {
            Node::App { args, .. } => assert!(args.is_empty()),
            _ => panic!("expected App"),
        }
    }

    #[test]
    fn test_edge_deeply_nested_calls() {
        let (nodes, errors) = parse_source("f(g(h(1)))");
        assert!(!errors);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_edge_chained_sequence() {
        let (nodes, errors) = parse_source("1; 2; 3; 4; 5");
        assert!(!errors);
        assert_eq!(nodes.len(), 5);
    }

    #[test]
    fn test_edge_empty_compound() {
        let (nodes, errors) = parse_source("{ }");
        assert!(!errors);
        match &nodes[0] {
            Node::Compound { exprs, .. } => assert!(exprs.is_empty()),
            _ => panic!("expected Compound"),
        }
    }

    #[test]
    fn test_edge_nested_compound() {
        let (nodes, errors) = parse_source("{ { 1 } }");
        assert!(!errors);
        match &nodes[0] {
            Node::Compound { exprs, .. } => {
                assert_eq!(exprs.len(), 1);
                assert!(matches!(exprs[0], Node::Compound { .. }));
            }
            _ => panic!("expected Compound"),
        }
    }

    #[test]
    fn test_edge_mixed_precedence_chain() {
        let (nodes, errors) = parse_source("1 + 2 * 3 - 4 / 2 == 3 && true || false");
        assert!(!errors);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_edge_all_comparison_ops() {
        for op in ["<", "<=", ">", ">=", "==", "!="] {
            let source = format!("1 {} 2", op);
            let (nodes, errors) = parse_source(&source);
            assert!(!errors, "failed to parse comparison with {}", op);
            assert_eq!(nodes.len(), 1);
        }
    }

    #[test]
    fn test_edge_float_arith_ops() {
        for op in ["+.", "-.", "*.", "/.", "%."] {
            let source = format!("1.0 {} 2.0", op);
            let (nodes, errors) = parse_source(&source);
            assert!(!errors, "failed to parse float op {}", op);
        }
    }

    #[test]
    fn test_edge_extern_no_params() {
        let (nodes, errors) = parse_source("let extern exit : void");
        assert!(!errors);
        match &nodes[0] {
            Node::LetExtern { param_types, .. } => assert!(param_types.is_empty()),
            _ => panic!("expected LetExtern"),
        }
    }

    #[test]
    fn test_edge_extern_multi_params() {
        let (nodes, errors) = parse_source("let extern printf (fmt: string) (n: int) : void");
        assert!(!errors);
        match &nodes[0] {
            Node::LetExtern { param_types, .. } => assert_eq!(param_types.len(), 2),
            _ => panic!("expected LetExtern"),
        }
    }

    #[test]
    fn test_edge_new_pointer_deref() {
        let (nodes, errors) = parse_source("let p = new int in #p");
        assert!(!errors);
        match &nodes[0] {
            Node::LetIn { value, body, .. } => {
                assert!(matches!(**value, Node::New { .. }));
                assert!(matches!(**body, Node::Unary { .. }));
            }
            _ => panic!("expected LetIn"),
        }
    }

    #[test]
    fn test_edge_ptr_assign_chain() {
        let (nodes, errors) = parse_source("let p = new int in p := p := 1");
        assert!(!errors);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_err_unexpected_token() {
        let (_nodes, errors) = parse_source("+ 1");
        assert!(errors);
    }

    #[test]
    fn test_err_unclosed_paren() {
        let (_nodes, errors) = parse_source("(1 + 2");
        assert!(errors);
    }

    #[test]
    fn test_err_unclosed_brace() {
        let (_nodes, errors) = parse_source("{ 1; 2");
        assert!(errors);
    }

    #[test]
    fn test_err_if_missing_then() {
        let (_nodes, errors) = parse_source("if true 1 else 2");
        assert!(errors);
    }

    #[test]
    fn test_err_let_missing_eq_or_args() {
        let (_nodes, errors) = parse_source("let x in x");
        assert!(errors);
    }

    #[test]
    fn test_edge_single_char_identifiers() {
        let (nodes, errors) = parse_source("let f x = x");
        assert!(!errors);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_edge_long_chain_of_additions() {
        let source = (0..50)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        let (nodes, errors) = parse_source(&source);
        assert!(!errors);
        assert_eq!(nodes.len(), 1);
    }
}
