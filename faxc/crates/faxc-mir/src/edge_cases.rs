//! End-to-end tests: lex -> parse -> infer -> lower -> interpret.
//!
//! `main`'s tail is always `PUSH 0; RET` regardless of the top-level
//! expressions it concatenates, so tests that want a meaningful return
//! value wrap the expression in a one-parameter function and invoke it
//! through `call_function` instead of `run_main`.

use faxc_lex::Lexer;
use faxc_par::Parser;
use faxc_sem::infer;
use faxc_util::{Handler, Symbol};

use crate::builder::lower_program;
use crate::interp::{Interpreter, RuntimeError};
use crate::ir::{Obj, Program};

fn build(source: &str) -> Program {
    let mut handler = Handler::new();
    let tokens = Lexer::new(source, &mut handler).collect();
    let mut parser = Parser::new(tokens, &mut handler);
    let nodes = parser.parse_program();
    infer(&nodes).expect("source should type-check");
    lower_program(&nodes)
}

fn run_main_int(source: &str) -> i64 {
    let program = build(source);
    match Interpreter::new(&program).run_main() {
        Ok(Obj::Int(n)) => n,
        Ok(other) => panic!("expected Int, got {}", other.kind_name()),
        Err(e) => panic!("interpreter error: {e}"),
    }
}

fn call_int(source: &str, func: &str, args: Vec<Obj>) -> i64 {
    let program = build(source);
    match Interpreter::new(&program).call_function(Symbol::intern(func), args) {
        Ok(Obj::Int(n)) => n,
        Ok(other) => panic!("expected Int, got {}", other.kind_name()),
        Err(e) => panic!("interpreter error: {e}"),
    }
}

#[test]
fn test_call_returns_argument_plus_one() {
    assert_eq!(call_int("let f x = x + 1; 0", "f", vec![Obj::Int(41)]), 42);
}

#[test]
fn test_identity_composes_left_to_right() {
    let source = "let id x = x; let combo d = id(7) + id(10); 0";
    assert_eq!(call_int(source, "combo", vec![Obj::Int(0)]), 17);
}

#[test]
fn test_two_argument_call_keeps_declaration_order() {
    // If the popped-argument reversal were wrong this would compute 3 - 7 = -4.
    let source = "let sub a b = a - b; 0";
    assert_eq!(call_int(source, "sub", vec![Obj::Int(7), Obj::Int(3)]), 4);
}

#[test]
fn test_if_true_branch() {
    let source = "let choose d = if 1 < 2 then 10 else 20; 0";
    assert_eq!(call_int(source, "choose", vec![Obj::Int(0)]), 10);
}

#[test]
fn test_if_false_branch() {
    let source = "let choose d = if 2 < 1 then 10 else 20; 0";
    assert_eq!(call_int(source, "choose", vec![Obj::Int(0)]), 20);
}

#[test]
fn test_recursive_function_calls_itself_by_name() {
    let source = "let fact n = if n < 2 then 1 else n * fact(n - 1); 0";
    assert_eq!(call_int(source, "fact", vec![Obj::Int(5)]), 120);
}

#[test]
fn test_pointer_alloc_store_load_roundtrip() {
    let source = "let test d = let p = new int in { p := 99 #p }; 0";
    assert_eq!(call_int(source, "test", vec![Obj::Int(0)]), 99);
}

#[test]
fn test_extern_function_is_declared_but_not_runnable() {
    let program = build("let extern puts (s: string): int; 0");

    let puts = program
        .functions
        .get(&Symbol::intern("puts"))
        .expect("puts should be registered");
    assert!(puts.is_extern);
    assert!(puts.body.is_empty());

    match Interpreter::new(&program).call_function(Symbol::intern("puts"), vec![]) {
        Err(RuntimeError::ExternCallUnsupported(_)) => {}
        other => panic!("expected ExternCallUnsupported, got {other:?}"),
    }

    // main still runs fine since it never calls puts.
    assert_eq!(run_main_int("let extern puts (s: string): int; 0"), 0);
}

#[test]
fn test_logical_and_or_behave_bitwise() {
    let source = "let and_test d = 1 && 0; let or_test d = 1 || 0; 0";
    assert_eq!(call_int(source, "and_test", vec![Obj::Int(0)]), 0);
    assert_eq!(call_int(source, "or_test", vec![Obj::Int(0)]), 1);
}

#[test]
fn test_compound_sequences_and_drops_intermediate_values() {
    let source = "let test d = { 1 + 1 2 + 2 3 + 3 }; 0";
    assert_eq!(call_int(source, "test", vec![Obj::Int(0)]), 6);
}

#[test]
fn test_nested_let_shadowing_at_runtime() {
    let source = "let test d = let x = 1 in let x = x + 1 in x + 1; 0";
    assert_eq!(call_int(source, "test", vec![Obj::Int(0)]), 3);
}

#[test]
fn test_main_tail_is_always_zero_regardless_of_top_level_expressions() {
    assert_eq!(run_main_int("1 + 1; 2 + 2; 3 + 3"), 0);
}

#[test]
fn test_missing_main_is_reported() {
    let mut program = Program::new();
    program.functions.clear();
    match Interpreter::new(&program).run_main() {
        Err(RuntimeError::MissingMain) => {}
        other => panic!("expected MissingMain, got {other:?}"),
    }
}
