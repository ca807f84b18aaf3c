//! End-to-end tests: lex -> parse -> infer -> lower -> emit LLVM IR.
//!
//! This crate never executes the LLVM IR it emits, so these tests assert
//! on structural properties of the generated module text (declarations,
//! control-flow shape) rather than runtime behavior.

use inkwell::context::Context;
use inkwell::OptimizationLevel;

use faxc_lex::Lexer;
use faxc_mir::lower_program;
use faxc_par::Parser;
use faxc_sem::infer;
use faxc_util::Handler;

use crate::llvm::LlvmBackend;

fn emit(source: &str) -> String {
    let mut handler = Handler::new();
    let tokens = Lexer::new(source, &mut handler).collect();
    let mut parser = Parser::new(tokens, &mut handler);
    let nodes = parser.parse_program();
    infer(&nodes).expect("source should type-check");
    let program = lower_program(&nodes);

    let context = Context::create();
    let mut backend = LlvmBackend::new(
        &context,
        "edge_case_module",
        "x86_64-unknown-linux-gnu".to_string(),
        OptimizationLevel::None,
    );
    backend.compile_program(&program).expect("compile_program should succeed");
    backend.verify().expect("emitted module should verify");
    backend.emit_llvm_ir()
}

#[test]
fn test_emits_main_function() {
    let ir = emit("1 + 1");
    assert!(ir.contains("define"));
    assert!(ir.contains("@main"));
}

#[test]
fn test_emits_named_function_with_params() {
    let ir = emit("let add a b = a + b; 0");
    assert!(ir.contains("@add"));
}

#[test]
fn test_extern_function_is_declared_not_defined() {
    let ir = emit("let extern puts (s: string): int; 0");
    // A declaration has no body braces; look for the declare form.
    assert!(ir.contains("declare") && ir.contains("@puts"));
}

#[test]
fn test_if_expression_produces_phi_merge() {
    let source = "let choose d = if 1 < 2 then 10 else 20; 0";
    let ir = emit(source);
    assert!(ir.contains("phi"));
    assert!(ir.contains("ifcont"));
}

#[test]
fn test_recursive_function_calls_itself() {
    let source = "let fact n = if n < 2 then 1 else n * fact(n - 1); 0";
    let ir = emit(source);
    assert!(ir.contains("call i64 @fact") || ir.contains("call"));
}

#[test]
fn test_pointer_alloc_emits_gc_root_registration() {
    let source = "let test d = let p = new int in { p := 99 #p }; 0";
    let ir = emit(source);
    assert!(ir.contains("fax_gc_register_root"));
    assert!(ir.contains("fax_gc_alloc"));
    assert!(ir.contains("alloca"));
}

#[test]
fn test_two_argument_call_keeps_declaration_order_at_the_call_site() {
    // Mirrors the interpreter-side regression test: the emitted call's
    // argument list must read left-to-right in source order.
    let source = "let sub a b = a - b; let use d = sub(7, 3); 0";
    let ir = emit(source);
    assert!(ir.contains("call i64 @sub"));
}
