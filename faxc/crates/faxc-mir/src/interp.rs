//! The tree-walking, stack-based IR interpreter.
//!
//! Each `run` call owns one evaluation stack of `Obj` and one lexical
//! environment; a function call gets a fresh root environment (functions
//! are not closures over the caller's frame), while an `if` arm gets a
//! child of the current environment so a `let` bound before the branch
//! is still visible inside it.

use std::rc::Rc;

use faxc_util::{Env, Symbol};
use thiserror::Error;

use crate::ir::{IRInstr, Obj, Program};

#[derive(Debug, Error, Clone)]
pub enum RuntimeError {
    #[error("unbound variable '{0}'")]
    UnboundVariable(Symbol),

    #[error("call to unknown function '{0}'")]
    UnknownFunction(Symbol),

    #[error("call to extern function '{0}' has no runtime implementation linked")]
    ExternCallUnsupported(Symbol),

    #[error("expected a {expected} operand, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("popped an empty stack")]
    EmptyStack,

    #[error("program has no 'main' function")]
    MissingMain,

    #[error("internal interpreter error: {0}")]
    Internal(String),
}

type EvalEnv = Rc<Env<Obj>>;

pub struct Interpreter<'a> {
    program: &'a Program,
}

impl<'a> Interpreter<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self { program }
    }

    /// Runs `main` with no arguments, per SPEC_FULL's `-vm` contract.
    pub fn run_main(&self) -> Result<Obj, RuntimeError> {
        let main = self
            .program
            .functions
            .get(&faxc_util::ID_MAIN)
            .ok_or(RuntimeError::MissingMain)?;
        let env = Env::root();
        self.run(&main.body, &env)
    }

    /// Calls a named function directly, bypassing `main` — used by the
    /// `-vm` driver for `--entry`-style invocation and by tests that want
    /// a function's return value without threading it through `main`'s
    /// fixed `PUSH 0; RET` tail.
    pub fn call_function(&self, name: Symbol, args: Vec<Obj>) -> Result<Obj, RuntimeError> {
        self.call(name, args)
    }

    fn call(&self, name: Symbol, args: Vec<Obj>) -> Result<Obj, RuntimeError> {
        let func = self
            .program
            .functions
            .get(&name)
            .ok_or(RuntimeError::UnknownFunction(name))?;
        if func.is_extern {
            return Err(RuntimeError::ExternCallUnsupported(name));
        }
        if args.len() != func.params.len() {
            return Err(RuntimeError::Internal("arity mismatch at call".into()));
        }
        let env = Env::root();
        // `args` already arrives in left-to-right declaration order (the
        // `Call` instruction reversed its own popped values), so pair it
        // directly against `params` rather than popping again.
        for (param, arg) in func.params.iter().zip(args.into_iter()) {
            env.bind(*param, arg);
        }
        self.run(&func.body, &env)
    }

    /// Executes `instrs` against a fresh evaluation stack, returning the
    /// single value left behind at `Ret` (or at the end of the list).
    fn run(&self, instrs: &[IRInstr], env: &EvalEnv) -> Result<Obj, RuntimeError> {
        let mut stack: Vec<Obj> = Vec::new();
        for instr in instrs {
            match instr {
                IRInstr::Push(obj) => stack.push(obj.clone()),
                IRInstr::Pop => {
                    pop(&mut stack)?;
                }
                IRInstr::Add => int_binop(&mut stack, |a, b| Ok(a + b))?,
                IRInstr::Sub => int_binop(&mut stack, |a, b| Ok(a - b))?,
                IRInstr::Mul => int_binop(&mut stack, |a, b| Ok(a * b))?,
                IRInstr::Div => int_binop(&mut stack, checked_div)?,
                IRInstr::Mod => int_binop(&mut stack, checked_rem)?,
                IRInstr::AddF => float_binop(&mut stack, |a, b| a + b)?,
                IRInstr::SubF => float_binop(&mut stack, |a, b| a - b)?,
                IRInstr::MulF => float_binop(&mut stack, |a, b| a * b)?,
                IRInstr::DivF => float_binop(&mut stack, |a, b| a / b)?,
                IRInstr::ModF => float_binop(&mut stack, |a, b| a % b)?,
                IRInstr::Eq => cmp_binop(&mut stack, |a, b| a == b)?,
                IRInstr::Ne => cmp_binop(&mut stack, |a, b| a != b)?,
                IRInstr::Gt => cmp_binop(&mut stack, |a, b| a > b)?,
                IRInstr::Lt => cmp_binop(&mut stack, |a, b| a < b)?,
                IRInstr::Ge => cmp_binop(&mut stack, |a, b| a >= b)?,
                IRInstr::Le => cmp_binop(&mut stack, |a, b| a <= b)?,
                IRInstr::LogAnd | IRInstr::BitAnd => int_binop(&mut stack, |a, b| Ok(a & b))?,
                IRInstr::LogOr | IRInstr::BitOr => int_binop(&mut stack, |a, b| Ok(a | b))?,
                IRInstr::BitXor => int_binop(&mut stack, |a, b| Ok(a ^ b))?,
                IRInstr::Not => {
                    let v = pop_bool(&mut stack)?;
                    stack.push(Obj::Bool(!v));
                }
                IRInstr::Store(name) => {
                    let v = pop(&mut stack)?;
                    env.bind(*name, v);
                }
                IRInstr::Load(name) => {
                    let v = env
                        .lookup(*name)
                        .ok_or(RuntimeError::UnboundVariable(*name))?;
                    stack.push(v);
                }
                IRInstr::StorePtr => {
                    let value = pop(&mut stack)?;
                    let ptr = pop_ptr(&mut stack)?;
                    *ptr.borrow_mut() = value.clone();
                    stack.push(value);
                }
                IRInstr::LoadPtr => {
                    let ptr = pop_ptr(&mut stack)?;
                    let value = ptr.borrow().clone();
                    stack.push(value);
                }
                IRInstr::Alloc(ty) => {
                    stack.push(Obj::Ptr(std::rc::Rc::new(std::cell::RefCell::new(
                        Obj::zero_for(ty),
                    ))));
                }
                IRInstr::Call(name, arity) => {
                    let mut args = Vec::with_capacity(*arity);
                    for _ in 0..*arity {
                        args.push(pop(&mut stack)?);
                    }
                    // Popped in reverse order; reversing recovers
                    // left-to-right argument order for the callee.
                    args.reverse();
                    let result = self.call(*name, args)?;
                    stack.push(result);
                }
                IRInstr::Br => {
                    let else_code = pop_code(&mut stack)?;
                    let then_code = pop_code(&mut stack)?;
                    let cond = pop_truthy(&mut stack)?;
                    let chosen = if cond { then_code } else { else_code };
                    let child = Env::child(env);
                    stack.push(self.run(&chosen, &child)?);
                }
                IRInstr::Ret => break,
            }
        }
        pop(&mut stack)
    }
}

fn pop(stack: &mut Vec<Obj>) -> Result<Obj, RuntimeError> {
    stack.pop().ok_or(RuntimeError::EmptyStack)
}

fn pop_int(stack: &mut Vec<Obj>) -> Result<i64, RuntimeError> {
    match pop(stack)? {
        Obj::Int(n) => Ok(n),
        other => Err(RuntimeError::TypeMismatch {
            expected: "int",
            found: other.kind_name(),
        }),
    }
}

fn pop_float(stack: &mut Vec<Obj>) -> Result<f64, RuntimeError> {
    match pop(stack)? {
        Obj::Float(f) => Ok(f),
        other => Err(RuntimeError::TypeMismatch {
            expected: "float",
            found: other.kind_name(),
        }),
    }
}

fn pop_bool(stack: &mut Vec<Obj>) -> Result<bool, RuntimeError> {
    match pop(stack)? {
        Obj::Bool(b) => Ok(b),
        other => Err(RuntimeError::TypeMismatch {
            expected: "bool",
            found: other.kind_name(),
        }),
    }
}

/// A branch condition may be a plain `Bool` or an `Int` 0/1 left by a
/// comparison (comparisons yield `Int` in this interpreter).
fn pop_truthy(stack: &mut Vec<Obj>) -> Result<bool, RuntimeError> {
    match pop(stack)? {
        Obj::Bool(b) => Ok(b),
        Obj::Int(n) => Ok(n != 0),
        other => Err(RuntimeError::TypeMismatch {
            expected: "bool",
            found: other.kind_name(),
        }),
    }
}

fn pop_code(stack: &mut Vec<Obj>) -> Result<Vec<IRInstr>, RuntimeError> {
    match pop(stack)? {
        Obj::Code(instrs) => Ok(instrs),
        other => Err(RuntimeError::TypeMismatch {
            expected: "code",
            found: other.kind_name(),
        }),
    }
}

fn pop_ptr(stack: &mut Vec<Obj>) -> Result<crate::ir::Cell, RuntimeError> {
    match pop(stack)? {
        Obj::Ptr(cell) => Ok(cell),
        other => Err(RuntimeError::TypeMismatch {
            expected: "ptr",
            found: other.kind_name(),
        }),
    }
}

fn int_binop(
    stack: &mut Vec<Obj>,
    f: impl FnOnce(i64, i64) -> Result<i64, RuntimeError>,
) -> Result<(), RuntimeError> {
    let rhs = pop_int(stack)?;
    let lhs = pop_int(stack)?;
    stack.push(Obj::Int(f(lhs, rhs)?));
    Ok(())
}

fn float_binop(stack: &mut Vec<Obj>, f: impl FnOnce(f64, f64) -> f64) -> Result<(), RuntimeError> {
    let rhs = pop_float(stack)?;
    let lhs = pop_float(stack)?;
    stack.push(Obj::Float(f(lhs, rhs)));
    Ok(())
}

/// Comparisons yield `Int` 0/1, not `Bool` — see SPEC_FULL §4.4.
fn cmp_binop(stack: &mut Vec<Obj>, f: impl FnOnce(i64, i64) -> bool) -> Result<(), RuntimeError> {
    let rhs = pop_int(stack)?;
    let lhs = pop_int(stack)?;
    stack.push(Obj::Int(if f(lhs, rhs) { 1 } else { 0 }));
    Ok(())
}

fn checked_div(a: i64, b: i64) -> Result<i64, RuntimeError> {
    a.checked_div(b)
        .ok_or_else(|| RuntimeError::Internal("division by zero".into()))
}

fn checked_rem(a: i64, b: i64) -> Result<i64, RuntimeError> {
    a.checked_rem(b)
        .ok_or_else(|| RuntimeError::Internal("division by zero".into()))
}
