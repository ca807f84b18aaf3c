//! faxc-util - Core Utilities and Foundation Types
//!
//! This crate provides the foundation types shared by every phase of the
//! compiler pipeline: symbol interning, source spans, diagnostic reporting,
//! typed vector indices, and global definition identifiers.
//!
//! Nothing in this crate depends on any other `faxc-*` crate; everything
//! else depends on this one.

pub mod def_id;
pub mod diagnostic;
pub mod env;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;
pub mod ty;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Level};
pub use env::Env;
pub use error::{
    DiagnosticError, DiagnosticResult, IndexVecError, IndexVecResult, SourceMapError,
    SourceMapResult, SymbolError, SymbolResult,
};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, Span};
pub use symbol::{
    InternerStats, Symbol, SymbolPretty, ID_MAIN, KW_ELSE, KW_EXTERN, KW_FALSE, KW_IF, KW_IN,
    KW_LET, KW_NEW, KW_THEN, KW_TRUE, TY_BOOL, TY_FLOAT, TY_INT, TY_STRING, TY_VOID,
};
pub use ty::Type;

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
