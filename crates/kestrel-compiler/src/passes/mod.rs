//! Compiler passes.
//!
//! - [`lowering`]: lower every function body of a unit to HIR, resolving each
//!   call site against the declaration tables

pub mod lowering;

pub use lowering::LoweringPass;
