//! Maps the shared `faxc_util::Type` onto inkwell's LLVM type system.

use inkwell::context::Context;
use inkwell::types::BasicTypeEnum;

use faxc_util::Type;

use crate::error::{CodeGenError, Result};

pub struct TypeMapper<'ctx> {
    context: &'ctx Context,
}

impl<'ctx> TypeMapper<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }

    /// Maps a type into an LLVM basic type. `Void` has no `BasicTypeEnum`
    /// representation — function-return handling checks for it separately
    /// before calling this.
    pub fn map_to_basic(&self, ty: &Type) -> Result<BasicTypeEnum<'ctx>> {
        Ok(match ty {
            Type::Int => self.context.i64_type().into(),
            Type::Float => self.context.f64_type().into(),
            Type::Bool => self.context.bool_type().into(),
            Type::String => self.context.ptr_type(inkwell::AddressSpace::default()).into(),
            Type::Ptr(_) => self.context.ptr_type(inkwell::AddressSpace::default()).into(),
            Type::Void | Type::Fun(_, _) | Type::Var(_) | Type::Unknown => {
                return Err(CodeGenError::TypeMappingError(format!(
                    "type {ty} has no direct LLVM basic-type mapping"
                )))
            }
        })
    }

    /// Byte size of a type's LLVM representation, for sizing `fax_gc_alloc`
    /// calls. Fixed widths rather than a target-dependent `size_of` constant
    /// expression, since every mapped type here has a known, layout-stable
    /// size on every target triple this crate emits for.
    pub fn size_of_bytes(&self, ty: &Type) -> Result<u64> {
        Ok(match ty {
            Type::Int => 8,
            Type::Float => 8,
            Type::Bool => 1,
            Type::String | Type::Ptr(_) => 8,
            Type::Void | Type::Fun(_, _) | Type::Var(_) | Type::Unknown => {
                return Err(CodeGenError::TypeMappingError(format!(
                    "type {ty} has no known size"
                )))
            }
        })
    }
}
