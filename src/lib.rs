//! Kestrel: call lowering for an ahead-of-time compiler of a dynamic
//! scripting language.
//!
//! The [`Unit`] facade ties the workspace crates together:
//!
//! - `kestrel-core`: spans, tags, HIR value types, errors and diagnostics
//! - `kestrel-ast`: the AST consumed by lowering
//! - `kestrel-registry`: class, closure, function, import and ABI tables
//! - `kestrel-modules`: the runtime ABI catalog
//! - `kestrel-compiler`: the lowering pass and the HIR it produces

mod unit;

pub use unit::Unit;

pub use kestrel_ast as ast;
pub use kestrel_compiler as compiler;
pub use kestrel_registry as registry;

pub use kestrel_compiler::{
    BuildError, CallPlan, CallTarget, Declarations, HirFunction, HirModule, Instruction,
    LoweringConfig, Recognizer,
};
pub use kestrel_core::{
    Diagnostic, Diagnostics, FunctionFlags, LoweringError, RegistrationError, ResultTag, Span,
    TypeTag,
};
