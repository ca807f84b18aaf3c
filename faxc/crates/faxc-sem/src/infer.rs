//! Hindley-Milner type inference.
//!
//! Three passes over the AST, matching classic HM presentations: annotate
//! every node with a type slot, walk again to collect equations between
//! those slots, then solve the equations by unification and back-patch
//! the resolved type onto each node. Monomorphic — no let-generalization.

use std::rc::Rc;

use faxc_par::{BinOp, Node, UnOp};
use faxc_util::{Env, Span, Symbol, Type};
use indexmap::IndexMap;

use crate::error::TypeError;

type TypingEnv = Rc<Env<Type>>;

/// One `(lhs, rhs)` equation to be unified, carrying the span that
/// produced it for error reporting.
type Equation = (Type, Type, Span);

pub struct Infer {
    next_var: u32,
    equations: Vec<Equation>,
    /// Substitution built by `unify`: type-variable name -> resolved type.
    subst: IndexMap<Symbol, Type>,
}

impl Infer {
    pub fn new() -> Self {
        Self {
            next_var: 0,
            equations: Vec::new(),
            subst: IndexMap::new(),
        }
    }

    fn fresh_var(&mut self) -> Type {
        let name = Symbol::intern(&format!("t{}", self.next_var));
        self.next_var += 1;
        Type::Var(name)
    }

    fn concrete_type(&self, name: Symbol, span: Span) -> Result<Type, TypeError> {
        Type::from_name(name.as_str()).ok_or(TypeError::UnknownTypeName { name, span })
    }

    // ------------------------------------------------------------------
    // Pass 1 - annotate
    // ------------------------------------------------------------------

    fn annotate(&mut self, node: &Node, env: &TypingEnv) -> Result<(), TypeError> {
        match node {
            Node::Number(_, _, _) => node.set_ty(Type::Int),
            Node::Float(_, _, _) => node.set_ty(Type::Float),
            Node::String(_, _, _) => node.set_ty(Type::String),
            Node::Bool(_, _, _) => node.set_ty(Type::Bool),
            Node::Var(name, span, _) => {
                let ty = env.lookup(*name).ok_or(TypeError::UnboundVariable {
                    name: *name,
                    span: *span,
                })?;
                node.set_ty(ty);
            }
            Node::Binary { lhs, rhs, .. } => {
                self.annotate(lhs, env)?;
                self.annotate(rhs, env)?;
                let ty = self.fresh_var();
                node.set_ty(ty);
            }
            Node::Unary { expr, .. } => {
                self.annotate(expr, env)?;
                let ty = self.fresh_var();
                node.set_ty(ty);
            }
            Node::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.annotate(cond, env)?;
                self.annotate(then_branch, env)?;
                self.annotate(else_branch, env)?;
                let ty = self.fresh_var();
                node.set_ty(ty);
            }
            Node::LetIn {
                name, value, body, ..
            } => {
                self.annotate(value, env)?;
                let child = Env::child(env);
                child.bind(*name, value.ty());
                self.annotate(body, &child)?;
                node.set_ty(body.ty());
            }
            Node::LetFun {
                name,
                params,
                param_types,
                body,
                span,
                ..
            } => {
                let child = Env::child(env);
                let mut param_tys = Vec::with_capacity(params.len());
                for (param, annotation) in params.iter().zip(param_types.iter()) {
                    let ty = match annotation {
                        Some(ty_name) => self.concrete_type(*ty_name, *span)?,
                        None => self.fresh_var(),
                    };
                    child.bind(*param, ty.clone());
                    param_tys.push(ty);
                }
                let ret_ty = self.fresh_var();
                let fun_ty = Type::Fun(param_tys, Box::new(ret_ty));
                // Bound in the enclosing env so siblings (and the function
                // itself, for recursion) can call it; bound again in the
                // child so a recursive call inside the body resolves too.
                env.bind(*name, fun_ty.clone());
                child.bind(*name, fun_ty.clone());
                self.annotate(body, &child)?;
                node.set_ty(fun_ty);
            }
            Node::LetExtern {
                name,
                param_types,
                ret_type,
                span,
                ..
            } => {
                let mut ptys = Vec::with_capacity(param_types.len());
                for ty_name in param_types {
                    ptys.push(self.concrete_type(*ty_name, *span)?);
                }
                let rty = self.concrete_type(*ret_type, *span)?;
                let fun_ty = Type::Fun(ptys, Box::new(rty));
                env.bind(*name, fun_ty.clone());
                node.set_ty(fun_ty);
            }
            Node::App { args, .. } => {
                for arg in args {
                    self.annotate(arg, env)?;
                }
                let ty = self.fresh_var();
                node.set_ty(ty);
            }
            Node::Compound { exprs, .. } => {
                for expr in exprs {
                    self.annotate(expr, env)?;
                }
                let ty = exprs.last().map(Node::ty).unwrap_or(Type::Void);
                node.set_ty(ty);
            }
            Node::New { ty_name, span, .. } => {
                let inner = self.concrete_type(*ty_name, *span)?;
                node.set_ty(Type::Ptr(Box::new(inner)));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Pass 2 - collect equations
    // ------------------------------------------------------------------

    fn collect_equations(&mut self, node: &Node, env: &TypingEnv) -> Result<(), TypeError> {
        match node {
            Node::Number(_, _, _)
            | Node::Float(_, _, _)
            | Node::String(_, _, _)
            | Node::Bool(_, _, _)
            | Node::Var(_, _, _) => {}
            Node::Binary {
                op,
                lhs,
                rhs,
                span,
                ..
            } => {
                self.collect_equations(lhs, env)?;
                self.collect_equations(rhs, env)?;
                self.equate_binary(*op, lhs, rhs, node, *span);
            }
            Node::Unary {
                op, expr, span, ..
            } => {
                self.collect_equations(expr, env)?;
                match op {
                    UnOp::Not => {
                        self.equations.push((expr.ty(), Type::Bool, *span));
                        self.equations.push((node.ty(), Type::Bool, *span));
                    }
                    UnOp::Deref => {
                        let alpha = self.fresh_var();
                        self.equations
                            .push((expr.ty(), Type::Ptr(Box::new(alpha.clone())), *span));
                        self.equations.push((node.ty(), alpha, *span));
                    }
                }
            }
            Node::If {
                cond,
                then_branch,
                else_branch,
                span,
                ..
            } => {
                self.collect_equations(cond, env)?;
                self.collect_equations(then_branch, env)?;
                self.collect_equations(else_branch, env)?;
                self.equations.push((cond.ty(), Type::Bool, *span));
                self.equations
                    .push((then_branch.ty(), else_branch.ty(), *span));
                self.equations.push((node.ty(), then_branch.ty(), *span));
            }
            Node::LetIn {
                name, value, body, ..
            } => {
                self.collect_equations(value, env)?;
                let child = Env::child(env);
                child.bind(*name, value.ty());
                self.collect_equations(body, &child)?;
            }
            Node::LetFun {
                name,
                params,
                body,
                span,
                ..
            } => {
                let child = Env::child(env);
                let (param_tys, ret_ty) = match node.ty() {
                    Type::Fun(p, r) => (p, *r),
                    other => unreachable!("LetFun always annotates to Type::Fun, got {other}"),
                };
                for (param, ty) in params.iter().zip(param_tys.iter()) {
                    child.bind(*param, ty.clone());
                }
                child.bind(*name, node.ty());
                self.collect_equations(body, &child)?;
                self.equations.push((body.ty(), ret_ty, *span));
            }
            Node::LetExtern { .. } => {}
            Node::App {
                callee,
                args,
                span,
                ..
            } => {
                for arg in args {
                    self.collect_equations(arg, env)?;
                }
                let arg_tys = args.iter().map(Node::ty).collect();
                let fun_ty = Type::Fun(arg_tys, Box::new(node.ty()));
                let callee_ty = env.lookup(*callee).ok_or(TypeError::UnboundVariable {
                    name: *callee,
                    span: *span,
                })?;
                self.equations.push((fun_ty, callee_ty, *span));
            }
            Node::Compound { exprs, .. } => {
                for expr in exprs {
                    self.collect_equations(expr, env)?;
                }
            }
            Node::New { .. } => {}
        }
        Ok(())
    }

    fn equate_binary(&mut self, op: BinOp, lhs: &Node, rhs: &Node, node: &Node, span: Span) {
        use BinOp::*;
        match op {
            Add | Sub | Mul | Div | Mod | BitOr | BitXor | BitAnd | LogOr | LogAnd => {
                self.equations.push((lhs.ty(), Type::Int, span));
                self.equations.push((rhs.ty(), Type::Int, span));
                self.equations.push((node.ty(), Type::Int, span));
            }
            AddF | SubF | MulF | DivF | ModF => {
                self.equations.push((lhs.ty(), Type::Float, span));
                self.equations.push((rhs.ty(), Type::Float, span));
                self.equations.push((node.ty(), Type::Float, span));
            }
            Eq | Ne | Lt | Le | Gt | Ge => {
                self.equations.push((lhs.ty(), Type::Int, span));
                self.equations.push((rhs.ty(), Type::Int, span));
                self.equations.push((node.ty(), Type::Bool, span));
            }
            PtrAssign => {
                let alpha = self.fresh_var();
                self.equations
                    .push((lhs.ty(), Type::Ptr(Box::new(alpha.clone())), span));
                self.equations.push((rhs.ty(), alpha, span));
                self.equations.push((node.ty(), rhs.ty(), span));
            }
        }
    }

    // ------------------------------------------------------------------
    // Pass 3 - unify
    // ------------------------------------------------------------------

    /// Follows one level of the substitution chain; does not recurse into
    /// `Fun`/`Ptr` structure (that happens structurally in `unify` itself).
    fn shallow_resolve(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(name) => match self.subst.get(name) {
                Some(bound) => self.shallow_resolve(bound),
                None => ty.clone(),
            },
            _ => ty.clone(),
        }
    }

    fn unify(&mut self, t1: &Type, t2: &Type, span: Span) -> Result<(), TypeError> {
        let t1 = self.shallow_resolve(t1);
        let t2 = self.shallow_resolve(t2);
        match (&t1, &t2) {
            (Type::Var(a), Type::Var(b)) if a == b => Ok(()),
            (Type::Var(v), other) | (other, Type::Var(v)) => {
                if self.occurs_check(*v, other) {
                    return Err(TypeError::OccursCheck {
                        var: *v,
                        ty: other.clone(),
                        span,
                    });
                }
                self.subst.insert(*v, other.clone());
                Ok(())
            }
            (Type::Int, Type::Int)
            | (Type::Float, Type::Float)
            | (Type::Bool, Type::Bool)
            | (Type::String, Type::String)
            | (Type::Void, Type::Void) => Ok(()),
            (Type::Ptr(a), Type::Ptr(b)) => self.unify(a, b, span),
            (Type::Fun(a1, r1), Type::Fun(a2, r2)) => {
                if a1.len() != a2.len() {
                    return Err(TypeError::ArityMismatch {
                        expected: a1.len(),
                        found: a2.len(),
                        span,
                    });
                }
                for (x, y) in a1.iter().zip(a2.iter()) {
                    self.unify(x, y, span)?;
                }
                self.unify(r1, r2, span)
            }
            _ => Err(TypeError::UnificationFailed {
                expected: t1.clone(),
                found: t2.clone(),
                span,
            }),
        }
    }

    /// Iterative occurs check — an explicit work-stack rather than
    /// recursive call frames, so a pathologically deep function type
    /// can't overflow the host stack.
    pub(crate) fn occurs_check(&self, var: Symbol, ty: &Type) -> bool {
        let mut stack = vec![ty.clone()];
        while let Some(current) = stack.pop() {
            match current {
                Type::Var(name) => {
                    if name == var {
                        return true;
                    }
                    if let Some(bound) = self.subst.get(&name) {
                        stack.push(bound.clone());
                    }
                }
                Type::Ptr(inner) => stack.push(*inner),
                Type::Fun(args, ret) => {
                    stack.extend(args);
                    stack.push(*ret);
                }
                _ => {}
            }
        }
        false
    }

    /// Fully resolves `ty` through the substitution, recursing into `Fun`
    /// and `Ptr` structure. Post-condition: the result contains no `Var`.
    fn resolve(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(name) => match self.subst.get(name) {
                Some(bound) => self.resolve(bound),
                None => ty.clone(),
            },
            Type::Ptr(inner) => Type::Ptr(Box::new(self.resolve(inner))),
            Type::Fun(args, ret) => Type::Fun(
                args.iter().map(|a| self.resolve(a)).collect(),
                Box::new(self.resolve(ret)),
            ),
            _ => ty.clone(),
        }
    }

    fn backpatch(&self, node: &Node) {
        match node {
            Node::Number(_, _, _)
            | Node::Float(_, _, _)
            | Node::String(_, _, _)
            | Node::Bool(_, _, _)
            | Node::Var(_, _, _) => {
                node.set_ty(self.resolve(&node.ty()));
            }
            Node::Binary { lhs, rhs, .. } => {
                self.backpatch(lhs);
                self.backpatch(rhs);
                node.set_ty(self.resolve(&node.ty()));
            }
            Node::Unary { expr, .. } => {
                self.backpatch(expr);
                node.set_ty(self.resolve(&node.ty()));
            }
            Node::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.backpatch(cond);
                self.backpatch(then_branch);
                self.backpatch(else_branch);
                node.set_ty(self.resolve(&node.ty()));
            }
            Node::LetIn { value, body, .. } => {
                self.backpatch(value);
                self.backpatch(body);
                node.set_ty(self.resolve(&node.ty()));
            }
            Node::LetFun { body, .. } => {
                self.backpatch(body);
                node.set_ty(self.resolve(&node.ty()));
            }
            Node::LetExtern { .. } => {
                node.set_ty(self.resolve(&node.ty()));
            }
            Node::App { args, .. } => {
                for arg in args {
                    self.backpatch(arg);
                }
                node.set_ty(self.resolve(&node.ty()));
            }
            Node::Compound { exprs, .. } => {
                for expr in exprs {
                    self.backpatch(expr);
                }
                node.set_ty(self.resolve(&node.ty()));
            }
            Node::New { .. } => {
                node.set_ty(self.resolve(&node.ty()));
            }
        }
    }
}

impl Default for Infer {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs all three passes over a top-level program, back-patching every
/// node's type slot in place. Returns the first error encountered in
/// each pass; later passes don't run once an earlier one fails, since
/// their equations would be built over incompletely-annotated nodes.
pub fn infer(nodes: &[Node]) -> Result<(), TypeError> {
    let mut engine = Infer::new();
    let root: TypingEnv = Env::root();

    for node in nodes {
        engine.annotate(node, &root)?;
    }
    for node in nodes {
        engine.collect_equations(node, &root)?;
    }
    let equations = std::mem::take(&mut engine.equations);
    for (lhs, rhs, span) in equations {
        engine.unify(&lhs, &rhs, span)?;
    }
    for node in nodes {
        engine.backpatch(node);
    }
    Ok(())
}
