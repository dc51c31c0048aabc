//! Compilation context: the read-only declaration tables and the per-unit
//! lowering session.

mod declarations;
mod session;

pub use declarations::{Declarations, DefaultParams};
pub use session::{BuildError, LoweringSession};
