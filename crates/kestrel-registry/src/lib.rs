//! Declaration tables read by the call resolver.
//!
//! Everything here is built before lowering starts and is read-only while
//! call sites are lowered, with one exception: the [`RuntimeSymbolTable`],
//! which grows as calls request external runtime functions.
//!
//! - [`RuntimeSymbolTable`] / [`SharedRuntimeSymbols`]: external functions
//! - [`ClassTable`]: classes, their methods, and the acyclic parent graph
//! - [`ObjectLiteralTable`]: methods synthesized for object literals
//! - [`ClosureTable`]: captured-variable lists per function
//! - [`FunctionTable`]: module function signatures and generator flags
//! - [`ImportTable`]: builtin-module import aliases
//! - [`AbiTable`]: `(ReceiverKind, operation) -> AbiEntry` catalog

pub mod abi;
pub mod class_table;
pub mod closures;
pub mod functions;
pub mod imports;
pub mod objects;
pub mod runtime_symbols;

pub use abi::{
    AbiEntry, AbiKey, AbiModule, AbiTable, Arity, FoldOp, RUNTIME_PREFIX, runtime_symbol_name,
};
pub use class_table::{ClassEntry, ClassTable};
pub use closures::{ClosureDescriptor, ClosureTable, ENV_PARAM, ENV_RECORD_PREFIX};
pub use functions::{FunctionEntry, FunctionTable};
pub use imports::{ImportTable, ImportedFunction};
pub use objects::ObjectLiteralTable;
pub use runtime_symbols::{
    Linkage, RuntimeSymbol, RuntimeSymbolTable, SharedRuntimeSymbols, SymbolConflictPolicy,
    SymbolId,
};
