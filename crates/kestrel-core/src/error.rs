//! Error types for table registration and call lowering.
//!
//! ```text
//! RegistrationError - building the class/function/ABI tables before lowering
//! LoweringError     - one call site that could not be lowered
//! ```
//!
//! Lowering errors never abort the pass. They are converted into
//! [`Diagnostic`](crate::Diagnostic)s at the call-site boundary and the call
//! is replaced by a placeholder; [`LoweringError::is_fatal`] marks the ones
//! that poison the whole unit.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while declaration tables are being built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    #[error("class '{0}' is already declared")]
    DuplicateClass(String),

    #[error("class '{class}' cannot extend '{parent}': inheritance cycle")]
    CircularInheritance { class: String, parent: String },

    #[error("function '{0}' is already declared")]
    DuplicateFunction(String),

    #[error("'{receiver}.{name}' is already in the ABI table")]
    DuplicateAbiEntry { receiver: String, name: String },

    #[error("runtime symbol '{name}' re-requested with a different signature")]
    SignatureConflict { name: String },
}

// ============================================================================
// Lowering Errors
// ============================================================================

/// Errors raised while lowering a single call site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoweringError {
    #[error("at {span}: unresolved callee '{name}'")]
    UnresolvedCallee { name: String, span: Span },

    #[error("at {span}: '{name}' is not bound")]
    UnresolvedName { name: String, span: Span },

    #[error("at {span}: no method '{method}' on '{receiver}'")]
    UnresolvedMethod {
        receiver: String,
        method: String,
        span: Span,
    },

    #[error("at {span}: '{function}' captures '{name}', which is not bound at the call site")]
    MissingCapturedBinding {
        function: String,
        name: String,
        span: Span,
    },

    #[error("at {span}: '{callee}' expects {expected} argument(s), found {found}")]
    ArityMismatch {
        callee: String,
        expected: String,
        found: usize,
        span: Span,
    },

    #[error("at {span}: 'super' used outside of a class")]
    SuperOutsideClass { span: Span },

    #[error("at {span}: class '{class}' has no parent class")]
    NoParentClass { class: String, span: Span },

    #[error("at {span}: runtime symbol '{name}' re-requested with a different signature")]
    SignatureConflict { name: String, span: Span },

    #[error("at {span}: expression cannot be called")]
    UnsupportedCallee { span: Span },

    #[error("at {span}: internal error: {message}")]
    Internal { message: String, span: Span },
}

impl LoweringError {
    pub fn span(&self) -> Span {
        match self {
            LoweringError::UnresolvedCallee { span, .. }
            | LoweringError::UnresolvedName { span, .. }
            | LoweringError::UnresolvedMethod { span, .. }
            | LoweringError::MissingCapturedBinding { span, .. }
            | LoweringError::ArityMismatch { span, .. }
            | LoweringError::SuperOutsideClass { span }
            | LoweringError::NoParentClass { span, .. }
            | LoweringError::SignatureConflict { span, .. }
            | LoweringError::UnsupportedCallee { span }
            | LoweringError::Internal { span, .. } => *span,
        }
    }

    /// Fatal errors mean the declaration tables disagree with the code being
    /// lowered; the unit must not reach code generation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LoweringError::MissingCapturedBinding { .. } | LoweringError::Internal { .. }
        )
    }

    /// Attach a call-site span to a registration failure.
    pub fn from_registration(err: RegistrationError, span: Span) -> Self {
        match err {
            RegistrationError::SignatureConflict { name } => {
                LoweringError::SignatureConflict { name, span }
            }
            other => LoweringError::Internal {
                message: other.to_string(),
                span,
            },
        }
    }
}
