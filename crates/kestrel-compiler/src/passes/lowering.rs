//! Lowering pass - lower function bodies of one unit to HIR.
//!
//! The declaration tables are complete and read-only before this pass
//! starts. The pass is a single-threaded batch over the unit's functions in
//! the order given; each function is lowered independently.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ LoweringPass                                                    │
//! │   - Walks the unit's function declarations                      │
//! │   - Dispatches to FunctionLowerer for each one                  │
//! │   - Appends the finished functions to the session module        │
//! └─────────────────────────────────────────────────────────────────┘
//!                             │
//!                             ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ FunctionLowerer                                                 │
//! │   - Sets up `this`, parameters and the environment record       │
//! │   - Lowers statements; every call site goes through the         │
//! │     resolver and is emitted as soon as it is planned            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use kestrel_ast::FunctionDecl;
use kestrel_core::LoweringError;

use crate::context::{Declarations, LoweringSession};
use crate::function_lowerer::FunctionLowerer;

/// Lowers every function of a unit into the session's module.
pub struct LoweringPass<'a, 'ast> {
    decls: &'a Declarations<'ast>,
    session: &'a mut LoweringSession,
}

impl<'a, 'ast> LoweringPass<'a, 'ast> {
    pub fn new(decls: &'a Declarations<'ast>, session: &'a mut LoweringSession) -> Self {
        Self { decls, session }
    }

    /// Lower `functions` in order. Errors are recorded in the session's
    /// diagnostics; the pass itself never stops early.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self, functions: &[&'ast FunctionDecl<'ast>]) {
        for &decl in functions {
            let name = decl.symbol_name();
            if self.session.module.function(&name).is_some() {
                self.session.report(&LoweringError::Internal {
                    message: format!("function '{}' lowered twice", name),
                    span: decl.span,
                });
                continue;
            }
            log::debug!("lowering {}", name);
            let function = FunctionLowerer::new(self.decls, &mut *self.session, decl).lower(decl);
            self.session.module.functions.push(function);
        }
        log::debug!(
            "lowered {} function(s) of {}, {} diagnostic(s)",
            self.session.module.functions.len(),
            self.session.module.name,
            self.session.diagnostics.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoweringConfig;
    use bumpalo::Bump;
    use kestrel_ast::AstBuilder;
    use kestrel_core::FunctionFlags;

    #[test]
    fn lowers_in_order_and_rejects_duplicates() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let a = ast.function("a", &[], &[], FunctionFlags::empty());
        let b = ast.function("b", &[], &[ast.expr_stmt(ast.call_named("a", &[]))], FunctionFlags::empty());
        let mut decls = Declarations::new();
        decls.declare_function(a).unwrap();
        decls.declare_function(b).unwrap();

        let mut session = LoweringSession::new("unit", LoweringConfig::default());
        LoweringPass::new(&decls, &mut session).run(&[a, b, a]);

        let names: Vec<&str> = session.module.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(session.diagnostics.error_count(), 1);
        assert!(session.diagnostics.has_fatal());
        assert_eq!(session.module.function("b").unwrap().calls_to("a").count(), 1);
    }
}
