//! faxc-mir - flat stack-machine IR, lowering, and the tree-walking
//! interpreter.
//!
//! `lower_program` turns a type-checked `faxc_par::Node` slice into a
//! `Program`; `Interpreter::run_main` executes it directly. The LLVM
//! backend (`faxc-gen`) consumes the same `Program`.

pub mod builder;
pub mod interp;
pub mod ir;

#[cfg(test)]
mod edge_cases;

pub use builder::{lower_program, Builder};
pub use interp::{Interpreter, RuntimeError};
pub use ir::{IRFunc, IRInstr, Obj, Program};
