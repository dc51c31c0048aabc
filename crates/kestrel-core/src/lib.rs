//! Core types shared by every stage of the Kestrel call-lowering pipeline.
//!
//! This crate has no knowledge of the AST or the HIR builder. It holds the
//! vocabulary the other crates agree on: source spans, symbol identities,
//! static type and result tags, HIR value types, and the error/diagnostic
//! types reported by registration and lowering.

pub mod diagnostics;
pub mod error;
pub mod flags;
pub mod hir_type;
pub mod span;
pub mod symbol_hash;
pub mod tags;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{LoweringError, RegistrationError};
pub use flags::FunctionFlags;
pub use hir_type::HirType;
pub use span::Span;
pub use symbol_hash::SymbolHash;
pub use tags::{
    BuiltinModule, HandleKind, Namespace, PrimitiveKind, ReceiverKind, ResultTag, TypeTag,
    TypedArrayKind,
};
