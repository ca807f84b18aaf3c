//! Type inference error taxonomy.

use faxc_util::{Span, Symbol, Type};
use thiserror::Error;

/// Errors `infer` can report. Every variant carries the `Span` of the node
/// that triggered it, so the diagnostic can point at source.
#[derive(Debug, Error, Clone)]
pub enum TypeError {
    #[error("unbound variable '{name}'")]
    UnboundVariable { name: Symbol, span: Span },

    #[error("cannot unify {expected} with {found}")]
    UnificationFailed {
        expected: Type,
        found: Type,
        span: Span,
    },

    #[error("occurs check failed: '{var}' occurs in {ty}")]
    OccursCheck { var: Symbol, ty: Type, span: Span },

    #[error("expected {expected} argument(s), found {found}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("unknown type name '{name}'")]
    UnknownTypeName { name: Symbol, span: Span },
}
