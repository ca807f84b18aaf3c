//! Parser benchmarks.
//!
//! Run with `cargo bench --package faxc-par`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use faxc_lex::{Lexer, Token};
use faxc_par::Parser;
use faxc_util::Handler;

fn parse_source(source: &str) -> usize {
    let mut handler = Handler::new();
    let tokens: Vec<Token> = Lexer::new(source, &mut handler).collect();
    let mut parser = Parser::new(tokens, &mut handler);
    parser.parse_program().len()
}

fn bench_parser_let_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_let_in");

    let source = "let x = 42 in x + 1";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("let_in", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_recursive_function(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_recursive_function");

    let source = "let fib n = if n < 2 then n else fib(n - 1) + fib(n - 2)";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("fib", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_extern_decls(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_extern_decls");

    let source = r#"
        let extern print_int (n: int) : void
        let extern print_float (n: float) : void
        let extern malloc (size: int) : int
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("externs", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_pointer_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_pointer_ops");

    let source = "let p = new int in p := 1 + #p; #p";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("pointer_ops", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_mixed_precedence(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_mixed_precedence");

    let source = "1 + 2 * 3 - 4 / 2 == 3 && true || false & 1 | 2 ^ 3";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("precedence_chain", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

fn bench_parser_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_complex");

    let source = r#"
        let extern print_int (n: int) : void

        let rec_fact n acc =
            if n == 0 then acc else rec_fact(n - 1, acc * n)

        let main () = {
            let p = new int in
            p := 0;
            let x = rec_fact(5, 1) in
            print_int(x);
            let y = if x > 100 then x - 100 else x in
            print_int(y)
        }
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("complex_source", |b| {
        b.iter(|| parse_source(black_box(source)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_let_in,
    bench_parser_recursive_function,
    bench_parser_extern_decls,
    bench_parser_pointer_ops,
    bench_parser_mixed_precedence,
    bench_parser_complex
);
criterion_main!(benches);
