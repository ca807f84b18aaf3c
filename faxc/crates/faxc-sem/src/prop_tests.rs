//! Property tests: arithmetic-inference completeness and the occurs check.

use faxc_par::Node;
use faxc_util::{Span, Symbol, Type};
use proptest::prelude::*;
use quickcheck::{Arbitrary, Gen};

use crate::infer::Infer;

/// Builds a random integer-only arithmetic expression tree out of
/// literals and `+ - * / %`, to feed the proptest below.
fn arb_int_expr() -> impl Strategy<Value = Node> {
    let leaf = any::<i64>().prop_map(|n| Node::number(n.abs(), Span::DUMMY));
    leaf.prop_recursive(4, 64, 4, |inner| {
        (inner.clone(), inner, 0..5u8).prop_map(|(lhs, rhs, op)| {
            let op = match op {
                0 => faxc_par::BinOp::Add,
                1 => faxc_par::BinOp::Sub,
                2 => faxc_par::BinOp::Mul,
                3 => faxc_par::BinOp::Div,
                _ => faxc_par::BinOp::Mod,
            };
            Node::binary(op, lhs, rhs, Span::DUMMY)
        })
    })
}

proptest! {
    /// Any tree built purely from integer literals and the integer
    /// arithmetic operators must infer to `Int` with no error, whatever
    /// its shape.
    #[test]
    fn prop_integer_arithmetic_always_infers_int(node in arb_int_expr()) {
        let nodes = vec![node];
        let result = crate::infer(&nodes);
        prop_assert!(result.is_ok());
        prop_assert_eq!(nodes[0].ty(), Type::Int);
    }
}

/// A small `Type` tree, bounded so generation terminates, used to drive
/// the occurs-check property below.
#[derive(Debug, Clone)]
struct SmallType(Type);

impl Arbitrary for SmallType {
    fn arbitrary(g: &mut Gen) -> Self {
        SmallType(gen_type(g, 3))
    }
}

fn gen_type(g: &mut Gen, depth: u32) -> Type {
    let base = [Type::Int, Type::Float, Type::Bool, Type::String, Type::Void];
    if depth == 0 {
        return g.choose(&base).unwrap().clone();
    }
    match u32::arbitrary(g) % 4 {
        0 => Type::Ptr(Box::new(gen_type(g, depth - 1))),
        1 => Type::Fun(
            vec![gen_type(g, depth - 1)],
            Box::new(gen_type(g, depth - 1)),
        ),
        2 => Type::Var(Symbol::intern("probe")),
        _ => g.choose(&base).unwrap().clone(),
    }
}

/// Whether `var` appears anywhere in `ty`'s structure, computed directly
/// (not through `Infer`) as the ground truth the occurs check is checked
/// against.
fn contains_var(var: Symbol, ty: &Type) -> bool {
    match ty {
        Type::Var(name) => *name == var,
        Type::Ptr(inner) => contains_var(var, inner),
        Type::Fun(args, ret) => args.iter().any(|a| contains_var(var, a)) || contains_var(var, ret),
        _ => false,
    }
}

#[quickcheck_macros::quickcheck]
fn prop_occurs_check_matches_structural_containment(ty: SmallType) -> bool {
    let probe = Symbol::intern("probe");
    let engine = Infer::new();
    engine.occurs_check(probe, &ty.0) == contains_var(probe, &ty.0)
}
