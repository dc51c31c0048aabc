//! Kestrel call lowering
//!
//! Lowers the call sites of a unit of scripting-language code to HIR, given
//! declaration tables that were built beforehand.
//!
//! ## Architecture
//!
//! - **Resolution**: every call site is turned into one [`CallPlan`] by a
//!   fixed-priority chain of recognizers
//! - **Emission**: the plan is emitted immediately into the enclosing
//!   function; runtime symbols are declared on first use
//!
//! ## Modules
//!
//! - [`config`]: Lowering options
//! - [`context`]: Declaration tables and the per-unit lowering session
//! - [`hir`]: The HIR, its builder, and a straight-line trace evaluator
//! - [`scope`]: Lexical scope of the function being lowered
//! - [`plan`]: Call plans produced by the resolver
//! - [`fold`]: Compile-time evaluation of foldable reserved globals
//! - [`passes`]: The lowering pass
//!
//! Call resolution, closure environments, generator construction and
//! statement lowering live on [`FunctionLowerer`].

mod calls;
mod closure;
pub mod config;
pub mod context;
mod emit;
mod expr;
pub mod fold;
mod function_lowerer;
pub mod generator;
pub mod hir;
pub mod passes;
pub mod plan;
pub mod scope;
mod stmt;

pub use config::LoweringConfig;
pub use context::{BuildError, Declarations, DefaultParams, LoweringSession};
pub use expr::{Operand, Referent};
pub use function_lowerer::FunctionLowerer;
pub use generator::{ASYNC_GENERATOR_FACTORY, GENERATOR_FACTORY, GeneratorKind, STORE_LOCAL};
pub use hir::{Constant, EnvRecordType, FunctionBuilder, HirFunction, HirModule, Instruction, ValueId};
pub use passes::LoweringPass;
pub use plan::{CallPlan, CallTarget, Recognizer};
pub use scope::{Binding, BindingKind, LexicalScope};

// Re-export the error types from core for convenience
pub use kestrel_core::{Diagnostics, LoweringError};

type Result<T> = std::result::Result<T, LoweringError>;
