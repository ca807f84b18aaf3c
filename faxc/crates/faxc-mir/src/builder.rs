//! Lowering from the typed AST (`faxc_par::Node`) into the flat IR.
//!
//! `Builder` owns one function's instruction buffer and grows it through
//! incremental `emit`-style methods, mirroring the teacher's basic-block
//! builder but flattened: this IR has no control-flow graph, so there is
//! no `new_block`/`set_current_block` pair, just a single `Vec<IRInstr>`
//! that `if` branches fork sub-buffers out of.

use faxc_par::{BinOp, Node, UnOp};
use faxc_util::{Type, ID_MAIN};

use crate::ir::{IRFunc, IRInstr, Obj, Program};

/// Accumulates one function's instruction list.
pub struct Builder {
    instrs: Vec<IRInstr>,
}

impl Builder {
    pub fn new() -> Self {
        Self { instrs: Vec::new() }
    }

    pub fn emit(&mut self, instr: IRInstr) {
        self.instrs.push(instr);
    }

    pub fn build(self) -> Vec<IRInstr> {
        self.instrs
    }

    /// Lowers `node`, leaving exactly one value on the stack.
    pub fn lower(&mut self, node: &Node) {
        match node {
            Node::Number(n, _, _) => self.emit(IRInstr::Push(Obj::Int(*n))),
            Node::Float(f, _, _) => self.emit(IRInstr::Push(Obj::Float(*f))),
            Node::String(s, _, _) => self.emit(IRInstr::Push(Obj::String(*s))),
            Node::Bool(b, _, _) => self.emit(IRInstr::Push(Obj::Bool(*b))),
            Node::Var(name, _, _) => self.emit(IRInstr::Load(*name)),
            Node::Binary { op, lhs, rhs, .. } => self.lower_binary(*op, lhs, rhs),
            Node::Unary { op, expr, .. } => {
                self.lower(expr);
                match op {
                    UnOp::Deref => self.emit(IRInstr::LoadPtr),
                    UnOp::Not => self.emit(IRInstr::Not),
                }
            }
            Node::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.lower(cond);
                let mut then_builder = Builder::new();
                then_builder.lower(then_branch);
                let mut else_builder = Builder::new();
                else_builder.lower(else_branch);
                self.emit(IRInstr::Push(Obj::Code(then_builder.build())));
                self.emit(IRInstr::Push(Obj::Code(else_builder.build())));
                self.emit(IRInstr::Br);
            }
            Node::LetIn {
                name, value, body, ..
            } => {
                self.lower(value);
                self.emit(IRInstr::Store(*name));
                self.lower(body);
            }
            Node::App { callee, args, .. } => {
                for arg in args {
                    self.lower(arg);
                }
                self.emit(IRInstr::Call(*callee, args.len()));
            }
            Node::Compound { exprs, .. } => {
                if exprs.is_empty() {
                    self.emit(IRInstr::Push(Obj::Int(0)));
                    return;
                }
                for (i, expr) in exprs.iter().enumerate() {
                    self.lower(expr);
                    if i + 1 != exprs.len() {
                        self.emit(IRInstr::Pop);
                    }
                }
            }
            Node::New { .. } => {
                let inner = match node.ty() {
                    Type::Ptr(inner) => *inner,
                    other => unreachable!("New always types to Ptr(_), got {other}"),
                };
                self.emit(IRInstr::Alloc(inner));
            }
            Node::LetFun { .. } | Node::LetExtern { .. } => {
                unreachable!("LetFun/LetExtern are lowered at the top level, never nested in a buffer")
            }
        }
    }

    fn lower_binary(&mut self, op: BinOp, lhs: &Node, rhs: &Node) {
        if op == BinOp::PtrAssign {
            self.lower(lhs);
            self.lower(rhs);
            self.emit(IRInstr::StorePtr);
            return;
        }
        self.lower(lhs);
        self.lower(rhs);
        self.emit(match op {
            BinOp::Add => IRInstr::Add,
            BinOp::Sub => IRInstr::Sub,
            BinOp::Mul => IRInstr::Mul,
            BinOp::Div => IRInstr::Div,
            BinOp::Mod => IRInstr::Mod,
            BinOp::AddF => IRInstr::AddF,
            BinOp::SubF => IRInstr::SubF,
            BinOp::MulF => IRInstr::MulF,
            BinOp::DivF => IRInstr::DivF,
            BinOp::ModF => IRInstr::ModF,
            BinOp::Eq => IRInstr::Eq,
            BinOp::Ne => IRInstr::Ne,
            BinOp::Lt => IRInstr::Lt,
            BinOp::Le => IRInstr::Le,
            BinOp::Gt => IRInstr::Gt,
            BinOp::Ge => IRInstr::Ge,
            BinOp::LogAnd => IRInstr::LogAnd,
            BinOp::LogOr => IRInstr::LogOr,
            BinOp::BitAnd => IRInstr::BitAnd,
            BinOp::BitOr => IRInstr::BitOr,
            BinOp::BitXor => IRInstr::BitXor,
            BinOp::PtrAssign => unreachable!("handled above"),
        });
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowers a whole typed top-level program into a `Program`: every
/// `LetFun`/`LetExtern` becomes an `IRFunc`, and every remaining
/// expression is concatenated into a synthesized `main`.
pub fn lower_program(nodes: &[Node]) -> Program {
    let mut program = Program::new();
    let mut main_builder = Builder::new();

    for node in nodes {
        match node {
            Node::LetFun {
                name, params, body, ..
            } => {
                let (param_types, ret_type) = match node.ty() {
                    Type::Fun(params, ret) => (params, *ret),
                    other => unreachable!("LetFun always types to Fun(_, _), got {other}"),
                };
                let mut body_builder = Builder::new();
                body_builder.lower(body);
                body_builder.emit(IRInstr::Ret);
                program.functions.insert(
                    *name,
                    IRFunc {
                        name: *name,
                        params: params.clone(),
                        param_types,
                        ret_type,
                        body: body_builder.build(),
                        is_extern: false,
                    },
                );
            }
            Node::LetExtern { name, .. } => {
                let (arg_types, ret_type) = match node.ty() {
                    Type::Fun(args, ret) => (args, *ret),
                    other => unreachable!("LetExtern always types to Fun(_, _), got {other}"),
                };
                program.functions.insert(
                    *name,
                    IRFunc {
                        name: *name,
                        params: Vec::new(),
                        param_types: arg_types,
                        ret_type,
                        body: Vec::new(),
                        is_extern: true,
                    },
                );
            }
            other => {
                main_builder.lower(other);
                main_builder.emit(IRInstr::Pop);
            }
        }
    }

    main_builder.emit(IRInstr::Push(Obj::Int(0)));
    main_builder.emit(IRInstr::Ret);
    program.functions.insert(
        ID_MAIN,
        IRFunc {
            name: ID_MAIN,
            params: Vec::new(),
            param_types: Vec::new(),
            ret_type: Type::Int,
            body: main_builder.build(),
            is_extern: false,
        },
    );
    program
}
