//! LLVM IR emitter: lowers a `faxc_mir::Program` directly into an LLVM
//! module, replaying each function's flat `IRInstr` stream against a
//! compile-time value stack instead of re-walking the AST.

use std::collections::HashMap;
use std::path::Path;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::types::{BasicMetadataTypeEnum, BasicTypeEnum, FunctionType};
use inkwell::values::{BasicMetadataValueEnum, BasicValueEnum, FunctionValue, PointerValue};
use inkwell::{AddressSpace, FloatPredicate, IntPredicate, OptimizationLevel};

use faxc_mir::{IRFunc, IRInstr, Obj, Program};
use faxc_util::{Env, Symbol, Type};
use std::rc::Rc;

use crate::error::{CodeGenError, Result};
use crate::types::TypeMapper;

/// A compile-time operand: either a concrete SSA value, a pointer carrying
/// the LLVM type of its pointee (needed to `LOAD_PTR` through it later), or
/// an un-compiled nested block pending a `BR`.
#[derive(Clone)]
enum StackVal<'ctx> {
    Value(BasicValueEnum<'ctx>),
    Ptr(PointerValue<'ctx>, BasicTypeEnum<'ctx>),
    Code(Vec<IRInstr>),
}

impl<'ctx> StackVal<'ctx> {
    fn into_basic(self) -> Result<BasicValueEnum<'ctx>> {
        match self {
            StackVal::Value(v) => Ok(v),
            StackVal::Ptr(p, _) => Ok(p.into()),
            StackVal::Code(_) => Err(CodeGenError::Internal(
                "attempted to use a nested code block as a value".into(),
            )),
        }
    }

    fn into_code(self) -> Result<Vec<IRInstr>> {
        match self {
            StackVal::Code(c) => Ok(c),
            _ => Err(CodeGenError::Internal(
                "expected a nested code block operand".into(),
            )),
        }
    }

    fn into_ptr(self) -> Result<(PointerValue<'ctx>, BasicTypeEnum<'ctx>)> {
        match self {
            StackVal::Ptr(p, ty) => Ok((p, ty)),
            _ => Err(CodeGenError::Internal("expected a pointer operand".into())),
        }
    }
}

type EmitEnv<'ctx> = Rc<Env<StackVal<'ctx>>>;

pub struct LlvmBackend<'ctx> {
    pub context: &'ctx Context,
    pub module: Module<'ctx>,
    pub builder: Builder<'ctx>,
    pub target_triple: String,
    pub opt_level: OptimizationLevel,
    type_mapper: TypeMapper<'ctx>,
    functions: HashMap<Symbol, FunctionValue<'ctx>>,
}

impl<'ctx> LlvmBackend<'ctx> {
    pub fn new(
        context: &'ctx Context,
        module_name: &str,
        target_triple: String,
        opt_level: OptimizationLevel,
    ) -> Self {
        let module = context.create_module(module_name);

        let triple = inkwell::targets::TargetTriple::create(&target_triple);
        module.set_triple(&triple);

        if let Ok(target) = inkwell::targets::Target::from_triple(&triple) {
            if let Some(target_machine) = target.create_target_machine(
                &triple,
                "generic",
                "",
                opt_level,
                inkwell::targets::RelocMode::Default,
                inkwell::targets::CodeModel::Default,
            ) {
                let data_layout = target_machine.get_target_data().get_data_layout();
                module.set_data_layout(&data_layout);
            }
        }

        let mut backend = Self {
            context,
            module,
            builder: context.create_builder(),
            target_triple,
            opt_level,
            type_mapper: TypeMapper::new(context),
            functions: HashMap::new(),
        };
        backend.declare_runtime_functions();
        backend
    }

    /// Declares the minimal GC runtime contract the emitter calls into:
    /// `alloc`, `collect`, and shadow-stack root registration. Nothing
    /// else is assumed to exist at link time.
    fn declare_runtime_functions(&mut self) {
        let i8_ptr_type = self.context.ptr_type(AddressSpace::default());
        let i64_type = self.context.i64_type();
        let bool_type = self.context.bool_type();

        let alloc_fn_type = i8_ptr_type.fn_type(&[i64_type.into()], false);
        self.module
            .add_function("fax_gc_alloc", alloc_fn_type, Some(Linkage::External));

        let collect_fn_type = self.context.void_type().fn_type(&[], false);
        self.module
            .add_function("fax_gc_collect", collect_fn_type, Some(Linkage::External));

        let register_root_fn_type = bool_type.fn_type(&[i8_ptr_type.into()], false);
        self.module.add_function(
            "fax_gc_register_root",
            register_root_fn_type,
            Some(Linkage::External),
        );
    }

    fn map_type(&self, ty: &Type) -> Result<BasicTypeEnum<'ctx>> {
        self.type_mapper.map_to_basic(ty)
    }

    fn function_type(&self, func: &IRFunc) -> Result<FunctionType<'ctx>> {
        let param_types: Vec<BasicMetadataTypeEnum<'ctx>> = func
            .param_types
            .iter()
            .map(|ty| self.map_type(ty).map(Into::into))
            .collect::<Result<_>>()?;
        Ok(match func.ret_type {
            Type::Void => self.context.void_type().fn_type(&param_types, false),
            ref ret => self.map_type(ret)?.fn_type(&param_types, false),
        })
    }

    /// Forward-declares every function, then compiles every non-extern
    /// body. `Program::functions` is an `IndexMap`, so both passes see
    /// functions in source declaration order.
    pub fn compile_program(&mut self, program: &Program) -> Result<()> {
        for (name, func) in &program.functions {
            let fn_type = self.function_type(func)?;
            let linkage = if func.is_extern {
                Some(Linkage::External)
            } else {
                None
            };
            let llvm_fn = self.module.add_function(name.as_str(), fn_type, linkage);
            self.functions.insert(*name, llvm_fn);
        }

        for func in program.functions.values() {
            if !func.is_extern {
                self.compile_function(func)?;
            }
        }
        Ok(())
    }

    fn compile_function(&mut self, func: &IRFunc) -> Result<()> {
        let llvm_fn = *self
            .functions
            .get(&func.name)
            .ok_or_else(|| CodeGenError::FunctionNotFound(func.name.to_string()))?;

        let entry = self.context.append_basic_block(llvm_fn, "entry");
        self.builder.position_at_end(entry);

        let env = Env::root();
        for (i, param_name) in func.params.iter().enumerate() {
            let param_val = llvm_fn
                .get_nth_param(i as u32)
                .ok_or_else(|| CodeGenError::AbiError(format!("missing param {i}")))?;
            env.bind(*param_name, StackVal::Value(param_val));
        }

        let mut stack: Vec<StackVal<'ctx>> = Vec::new();
        self.run(&func.body, &env, &mut stack, llvm_fn)
    }

    /// Replays one function's flat instruction stream against a
    /// compile-time value stack, mirroring `faxc_mir::interp::Interpreter`
    /// but emitting LLVM instructions instead of computing values.
    fn run(
        &mut self,
        instrs: &[IRInstr],
        env: &EmitEnv<'ctx>,
        stack: &mut Vec<StackVal<'ctx>>,
        function: FunctionValue<'ctx>,
    ) -> Result<()> {
        for instr in instrs {
            match instr {
                IRInstr::Push(obj) => stack.push(self.emit_const(obj)?),
                IRInstr::Pop => {
                    pop(stack)?;
                }
                IRInstr::Add => self.int_binop(stack, |b, l, r| b.build_int_add(l, r, "add"))?,
                IRInstr::Sub => self.int_binop(stack, |b, l, r| b.build_int_sub(l, r, "sub"))?,
                IRInstr::Mul => self.int_binop(stack, |b, l, r| b.build_int_mul(l, r, "mul"))?,
                IRInstr::Div => {
                    self.int_binop(stack, |b, l, r| b.build_int_signed_div(l, r, "div"))?
                }
                IRInstr::Mod => {
                    self.int_binop(stack, |b, l, r| b.build_int_signed_rem(l, r, "mod"))?
                }
                IRInstr::AddF => {
                    self.float_binop(stack, |b, l, r| b.build_float_add(l, r, "addf"))?
                }
                IRInstr::SubF => {
                    self.float_binop(stack, |b, l, r| b.build_float_sub(l, r, "subf"))?
                }
                IRInstr::MulF => {
                    self.float_binop(stack, |b, l, r| b.build_float_mul(l, r, "mulf"))?
                }
                IRInstr::DivF => {
                    self.float_binop(stack, |b, l, r| b.build_float_div(l, r, "divf"))?
                }
                IRInstr::ModF => {
                    self.float_binop(stack, |b, l, r| b.build_float_rem(l, r, "modf"))?
                }
                IRInstr::Eq => self.int_cmp(stack, IntPredicate::EQ)?,
                IRInstr::Ne => self.int_cmp(stack, IntPredicate::NE)?,
                IRInstr::Gt => self.int_cmp(stack, IntPredicate::SGT)?,
                IRInstr::Lt => self.int_cmp(stack, IntPredicate::SLT)?,
                IRInstr::Ge => self.int_cmp(stack, IntPredicate::SGE)?,
                IRInstr::Le => self.int_cmp(stack, IntPredicate::SLE)?,
                IRInstr::LogAnd | IRInstr::BitAnd => {
                    self.int_binop(stack, |b, l, r| b.build_and(l, r, "and"))?
                }
                IRInstr::LogOr | IRInstr::BitOr => {
                    self.int_binop(stack, |b, l, r| b.build_or(l, r, "or"))?
                }
                IRInstr::BitXor => self.int_binop(stack, |b, l, r| b.build_xor(l, r, "xor"))?,
                IRInstr::Not => {
                    let v = pop(stack)?.into_basic()?.into_int_value();
                    let result = self
                        .builder
                        .build_not(v, "not")
                        .map_err(llvm_err("not"))?;
                    stack.push(StackVal::Value(result.into()));
                }
                IRInstr::Store(name) => {
                    let v = pop(stack)?;
                    env.bind(*name, v);
                }
                IRInstr::Load(name) => {
                    let v = env
                        .lookup(*name)
                        .ok_or_else(|| CodeGenError::Internal(format!("unbound '{name}'")))?;
                    stack.push(v);
                }
                IRInstr::StorePtr => {
                    let value = pop(stack)?;
                    let (ptr, _) = pop(stack)?.into_ptr()?;
                    let basic = value.clone().into_basic()?;
                    self.builder
                        .build_store(ptr, basic)
                        .map_err(llvm_err("store_ptr"))?;
                    stack.push(value);
                }
                IRInstr::LoadPtr => {
                    let (ptr, pointee_ty) = pop(stack)?.into_ptr()?;
                    let loaded = self
                        .builder
                        .build_load(pointee_ty, ptr, "load_ptr")
                        .map_err(llvm_err("load_ptr"))?;
                    stack.push(StackVal::Value(loaded));
                }
                IRInstr::Alloc(ty) => {
                    let pointee = self.map_type(ty)?;
                    let cell = self
                        .builder
                        .build_alloca(
                            self.context.ptr_type(AddressSpace::default()),
                            "alloc_cell",
                        )
                        .map_err(llvm_err("alloca"))?;
                    let heap_ptr = self.emit_gc_alloc(ty)?;
                    self.builder
                        .build_store(cell, heap_ptr)
                        .map_err(llvm_err("alloc_store"))?;
                    self.emit_gc_root(cell)?;
                    stack.push(StackVal::Ptr(heap_ptr, pointee));
                }
                IRInstr::Call(name, arity) => {
                    let mut args = Vec::with_capacity(*arity);
                    for _ in 0..*arity {
                        args.push(pop(stack)?);
                    }
                    args.reverse();
                    let result = self.emit_call(*name, args)?;
                    stack.push(result);
                }
                IRInstr::Br => {
                    let else_code = pop(stack)?.into_code()?;
                    let then_code = pop(stack)?.into_code()?;
                    let cond = self.truthy(pop(stack)?)?;

                    let then_block = self.context.append_basic_block(function, "then");
                    let else_block = self.context.append_basic_block(function, "else");
                    let merge_block = self.context.append_basic_block(function, "ifcont");

                    self.builder
                        .build_conditional_branch(cond, then_block, else_block)
                        .map_err(llvm_err("br"))?;

                    self.builder.position_at_end(then_block);
                    let mut then_stack = Vec::new();
                    self.run(&then_code, &Env::child(env), &mut then_stack, function)?;
                    let then_val = then_stack.pop();
                    let then_end_block = self.builder.get_insert_block().unwrap();
                    self.builder
                        .build_unconditional_branch(merge_block)
                        .map_err(llvm_err("br"))?;

                    self.builder.position_at_end(else_block);
                    let mut else_stack = Vec::new();
                    self.run(&else_code, &Env::child(env), &mut else_stack, function)?;
                    let else_val = else_stack.pop();
                    let else_end_block = self.builder.get_insert_block().unwrap();
                    self.builder
                        .build_unconditional_branch(merge_block)
                        .map_err(llvm_err("br"))?;

                    self.builder.position_at_end(merge_block);
                    match (then_val, else_val) {
                        (Some(then_val), Some(else_val)) => {
                            let then_basic = then_val.into_basic()?;
                            let phi = self
                                .builder
                                .build_phi(then_basic.get_type(), "if_result")
                                .map_err(llvm_err("phi"))?;
                            phi.add_incoming(&[
                                (&then_basic, then_end_block),
                                (&else_val.into_basic()?, else_end_block),
                            ]);
                            stack.push(StackVal::Value(phi.as_basic_value()));
                        }
                        _ => {
                            // Either arm produced no value; nothing to merge.
                        }
                    }
                }
                IRInstr::Ret => {
                    let v = pop(stack)?;
                    match v {
                        StackVal::Code(_) => {
                            return Err(CodeGenError::Internal(
                                "cannot return a nested code block".into(),
                            ))
                        }
                        other => {
                            let basic = other.into_basic()?;
                            self.builder
                                .build_return(Some(&basic))
                                .map_err(llvm_err("ret"))?;
                        }
                    }
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn emit_const(&self, obj: &Obj) -> Result<StackVal<'ctx>> {
        Ok(match obj {
            Obj::Int(n) => StackVal::Value(
                self.context
                    .i64_type()
                    .const_int(*n as u64, true)
                    .into(),
            ),
            Obj::Float(f) => StackVal::Value(self.context.f64_type().const_float(*f).into()),
            Obj::Bool(b) => StackVal::Value(
                self.context
                    .bool_type()
                    .const_int(*b as u64, false)
                    .into(),
            ),
            Obj::String(s) => {
                let global = self
                    .builder
                    .build_global_string_ptr(s.as_str(), "str_const")
                    .map_err(llvm_err("global_string"))?;
                StackVal::Value(global.as_pointer_value().into())
            }
            Obj::Code(instrs) => StackVal::Code(instrs.clone()),
            Obj::Name(_, _) | Obj::TypeOperand(_) | Obj::Ptr(_) => {
                return Err(CodeGenError::Internal(
                    "this Obj kind never appears as a PUSH operand from the builder".into(),
                ))
            }
        })
    }

    /// Calls `fax_gc_alloc(sizeof(ty))` and returns the heap pointer it
    /// hands back.
    fn emit_gc_alloc(&self, ty: &Type) -> Result<PointerValue<'ctx>> {
        let size = self.type_mapper.size_of_bytes(ty)?;
        let size_val = self.context.i64_type().const_int(size, false);
        let alloc_fn = self
            .module
            .get_function("fax_gc_alloc")
            .ok_or_else(|| CodeGenError::FunctionNotFound("fax_gc_alloc".into()))?;
        let call_site = self
            .builder
            .build_call(alloc_fn, &[size_val.into()], "gc_alloc_call")
            .map_err(llvm_err("gc_alloc_call"))?;
        let heap_ptr = call_site
            .try_as_basic_value()
            .left()
            .ok_or_else(|| CodeGenError::Internal("fax_gc_alloc returned void".into()))?
            .into_pointer_value();
        Ok(heap_ptr)
    }

    /// Opaque pointers (LLVM 20) carry no pointee type at the IR level, so
    /// `ptr` can be passed to the `i8*`-typed GC contract directly — no
    /// bitcast needed.
    fn emit_gc_root(&self, ptr: PointerValue<'ctx>) -> Result<()> {
        let register_root = self
            .module
            .get_function("fax_gc_register_root")
            .ok_or_else(|| CodeGenError::FunctionNotFound("fax_gc_register_root".into()))?;
        self.builder
            .build_call(register_root, &[ptr.into()], "gcroot_call")
            .map_err(llvm_err("gcroot_call"))?;
        Ok(())
    }

    fn emit_call(&mut self, name: Symbol, args: Vec<StackVal<'ctx>>) -> Result<StackVal<'ctx>> {
        let callee = *self
            .functions
            .get(&name)
            .ok_or_else(|| CodeGenError::FunctionNotFound(name.to_string()))?;
        let arg_values: Vec<BasicMetadataValueEnum<'ctx>> = args
            .into_iter()
            .map(|v| v.into_basic().map(Into::into))
            .collect::<Result<_>>()?;
        let call_site = self
            .builder
            .build_call(callee, &arg_values, "call_tmp")
            .map_err(llvm_err("call"))?;
        match call_site.try_as_basic_value().left() {
            Some(value) => Ok(StackVal::Value(value)),
            // A void extern call; callers are expected to discard this.
            None => Ok(StackVal::Value(self.context.i64_type().const_int(0, false).into())),
        }
    }

    fn truthy(&self, v: StackVal<'ctx>) -> Result<inkwell::values::IntValue<'ctx>> {
        let basic = v.into_basic()?;
        let int_val = basic.into_int_value();
        if int_val.get_type().get_bit_width() == 1 {
            Ok(int_val)
        } else {
            self.builder
                .build_int_compare(
                    IntPredicate::NE,
                    int_val,
                    int_val.get_type().const_int(0, false),
                    "truthy",
                )
                .map_err(llvm_err("truthy"))
        }
    }

    fn int_binop(
        &self,
        stack: &mut Vec<StackVal<'ctx>>,
        f: impl FnOnce(
            &Builder<'ctx>,
            inkwell::values::IntValue<'ctx>,
            inkwell::values::IntValue<'ctx>,
        ) -> std::result::Result<inkwell::values::IntValue<'ctx>, inkwell::builder::BuilderError>,
    ) -> Result<()> {
        let rhs = pop(stack)?.into_basic()?.into_int_value();
        let lhs = pop(stack)?.into_basic()?.into_int_value();
        let result = f(&self.builder, lhs, rhs).map_err(llvm_err("int_binop"))?;
        stack.push(StackVal::Value(result.into()));
        Ok(())
    }

    fn float_binop(
        &self,
        stack: &mut Vec<StackVal<'ctx>>,
        f: impl FnOnce(
            &Builder<'ctx>,
            inkwell::values::FloatValue<'ctx>,
            inkwell::values::FloatValue<'ctx>,
        ) -> std::result::Result<
            inkwell::values::FloatValue<'ctx>,
            inkwell::builder::BuilderError,
        >,
    ) -> Result<()> {
        let rhs = pop(stack)?.into_basic()?.into_float_value();
        let lhs = pop(stack)?.into_basic()?.into_float_value();
        let result = f(&self.builder, lhs, rhs).map_err(llvm_err("float_binop"))?;
        stack.push(StackVal::Value(result.into()));
        Ok(())
    }

    /// Comparisons yield `i64` 0/1, matching the interpreter's `Obj::Int`
    /// encoding (§4.4) so both back-ends agree on comparison results.
    fn int_cmp(&self, stack: &mut Vec<StackVal<'ctx>>, pred: IntPredicate) -> Result<()> {
        let rhs = pop(stack)?.into_basic()?.into_int_value();
        let lhs = pop(stack)?.into_basic()?.into_int_value();
        let cmp = self
            .builder
            .build_int_compare(pred, lhs, rhs, "cmp")
            .map_err(llvm_err("cmp"))?;
        let widened = self
            .builder
            .build_int_z_extend(cmp, self.context.i64_type(), "cmp_zext")
            .map_err(llvm_err("cmp_zext"))?;
        stack.push(StackVal::Value(widened.into()));
        Ok(())
    }

    #[allow(dead_code)]
    fn float_cmp(&self, stack: &mut Vec<StackVal<'ctx>>, pred: FloatPredicate) -> Result<()> {
        let rhs = pop(stack)?.into_basic()?.into_float_value();
        let lhs = pop(stack)?.into_basic()?.into_float_value();
        let cmp = self
            .builder
            .build_float_compare(pred, lhs, rhs, "fcmp")
            .map_err(llvm_err("fcmp"))?;
        let widened = self
            .builder
            .build_int_z_extend(cmp, self.context.i64_type(), "fcmp_zext")
            .map_err(llvm_err("fcmp_zext"))?;
        stack.push(StackVal::Value(widened.into()));
        Ok(())
    }

    pub fn emit_llvm_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    pub fn write_ir_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fs::File;
        use std::io::Write;
        let ir = self.emit_llvm_ir();
        let mut file = File::create(path)?;
        file.write_all(ir.as_bytes())?;
        Ok(())
    }

    pub fn get_module(&self) -> &Module<'ctx> {
        &self.module
    }

    pub fn verify(&self) -> Result<()> {
        self.module
            .verify()
            .map_err(|e| CodeGenError::CompilationError(e.to_string()))
    }
}

fn pop<'ctx>(stack: &mut Vec<StackVal<'ctx>>) -> Result<StackVal<'ctx>> {
    stack
        .pop()
        .ok_or_else(|| CodeGenError::Internal("popped an empty compile-time stack".into()))
}

fn llvm_err(op: &'static str) -> impl FnOnce(inkwell::builder::BuilderError) -> CodeGenError {
    move |e| CodeGenError::LlvmOperationFailed(format!("{op}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llvm_backend_creation() {
        let context = Context::create();
        let backend = LlvmBackend::new(
            &context,
            "test",
            "x86_64-unknown-linux-gnu".to_string(),
            OptimizationLevel::None,
        );
        assert_eq!(backend.target_triple, "x86_64-unknown-linux-gnu");
    }

    #[test]
    fn test_declares_gc_contract_functions() {
        let context = Context::create();
        let backend = LlvmBackend::new(
            &context,
            "test",
            "x86_64-unknown-linux-gnu".to_string(),
            OptimizationLevel::None,
        );
        assert!(backend.module.get_function("fax_gc_alloc").is_some());
        assert!(backend.module.get_function("fax_gc_collect").is_some());
        assert!(backend
            .module
            .get_function("fax_gc_register_root")
            .is_some());
    }
}
