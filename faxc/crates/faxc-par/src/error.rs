//! Parser error taxonomy.

use faxc_util::Span;
use thiserror::Error;

/// Errors the parser can report. These are always fatal: the parser makes
/// no attempt at resynchronization.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found:?} at {span:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("invalid type name '{0}'")]
    UnknownTypeName(String),
}
