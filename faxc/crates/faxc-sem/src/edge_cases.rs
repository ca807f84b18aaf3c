//! Edge case tests for faxc-sem

use faxc_lex::Lexer;
use faxc_par::{Node, Parser};
use faxc_util::{Handler, Type};

use crate::infer;

fn infer_source(source: &str) -> (Vec<Node>, Result<(), crate::TypeError>) {
    let mut handler = Handler::new();
    let tokens = Lexer::new(source, &mut handler).collect();
    let mut parser = Parser::new(tokens, &mut handler);
    let nodes = parser.parse_program();
    let result = infer(&nodes);
    (nodes, result)
}

#[test]
fn test_infer_int_arithmetic() {
    let (nodes, result) = infer_source("1 + 2 * 3");
    assert!(result.is_ok());
    assert_eq!(nodes[0].ty(), Type::Int);
}

#[test]
fn test_infer_float_arithmetic() {
    let (nodes, result) = infer_source("1.0 +. 2.0");
    assert!(result.is_ok());
    assert_eq!(nodes[0].ty(), Type::Float);
}

#[test]
fn test_infer_comparison_is_bool() {
    let (nodes, result) = infer_source("1 < 2");
    assert!(result.is_ok());
    assert_eq!(nodes[0].ty(), Type::Bool);
}

#[test]
fn test_infer_if_unifies_branches() {
    let (nodes, result) = infer_source("if 1 < 2 then 10 else 20");
    assert!(result.is_ok());
    assert_eq!(nodes[0].ty(), Type::Int);
}

#[test]
fn test_infer_let_in() {
    let (nodes, result) = infer_source("let x = 5 in x + 1");
    assert!(result.is_ok());
    assert_eq!(nodes[0].ty(), Type::Int);
}

#[test]
fn test_infer_recursive_function_and_call() {
    let (nodes, result) = infer_source(
        "let fib n = if n < 2 then n else fib(n - 1) + fib(n - 2); fib(5)",
    );
    assert!(result.is_ok());
    assert_eq!(
        nodes[0].ty(),
        Type::Fun(vec![Type::Int], Box::new(Type::Int))
    );
    assert_eq!(nodes[1].ty(), Type::Int);
}

#[test]
fn test_infer_typed_params_fix_the_signature() {
    let (nodes, result) = infer_source("let add (x: int) (y: int) = x + y");
    assert!(result.is_ok());
    assert_eq!(
        nodes[0].ty(),
        Type::Fun(vec![Type::Int, Type::Int], Box::new(Type::Int))
    );
}

#[test]
fn test_infer_extern_call() {
    let (nodes, result) =
        infer_source("let extern puts (s: string): int; puts(\"hi\")");
    assert!(result.is_ok());
    assert_eq!(nodes[1].ty(), Type::Int);
}

#[test]
fn test_infer_pointer_roundtrip() {
    let (nodes, result) = infer_source("let p = new int in p := 1 + #p");
    assert!(result.is_ok());
    assert_eq!(nodes[0].ty(), Type::Int);
}

#[test]
fn test_infer_compound_inherits_last_type() {
    let (nodes, result) = infer_source("{ 1 2.0 +. 3.0 }");
    assert!(result.is_ok());
    assert_eq!(nodes[0].ty(), Type::Float);
}

#[test]
fn test_infer_logical_not() {
    let (nodes, result) = infer_source("!(1 < 2)");
    assert!(result.is_ok());
    assert_eq!(nodes[0].ty(), Type::Bool);
}

#[test]
fn test_infer_unbound_variable_errors() {
    let (_, result) = infer_source("x + 1");
    assert!(matches!(
        result,
        Err(crate::TypeError::UnboundVariable { .. })
    ));
}

#[test]
fn test_infer_unbound_callee_errors() {
    let (_, result) = infer_source("ghost(1)");
    assert!(matches!(
        result,
        Err(crate::TypeError::UnboundVariable { .. })
    ));
}

#[test]
fn test_infer_arity_mismatch_errors() {
    let (_, result) = infer_source("let f (x: int) = x; f(1, 2)");
    assert!(matches!(
        result,
        Err(crate::TypeError::ArityMismatch { .. })
    ));
}

#[test]
fn test_infer_unification_mismatch_errors() {
    let (_, result) = infer_source("1 + true");
    assert!(matches!(
        result,
        Err(crate::TypeError::UnificationFailed { .. })
    ));
}

#[test]
fn test_infer_occurs_check_self_application() {
    let (_, result) = infer_source("let f x = x(x)");
    assert!(matches!(result, Err(crate::TypeError::OccursCheck { .. })));
}

#[test]
fn test_infer_unknown_type_name_errors() {
    let (_, result) = infer_source("let extern foo (x: widget): int");
    assert!(matches!(
        result,
        Err(crate::TypeError::UnknownTypeName { .. })
    ));
}

#[test]
fn test_infer_nested_let_shadowing() {
    let (nodes, result) = infer_source("let x = 1 in let x = x + 1 in x + 1");
    assert!(result.is_ok());
    assert_eq!(nodes[0].ty(), Type::Int);
}

#[test]
fn test_infer_empty_program_is_ok() {
    let (nodes, result) = infer_source("");
    assert!(result.is_ok());
    assert!(nodes.is_empty());
}
