//! Compilation unit API.
//!
//! A unit collects the lifted function declarations of one source unit
//! together with the declaration tables they are lowered against, then
//! lowers every function body in one pass.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use kestrel::ast::AstBuilder;
//! use kestrel::{FunctionFlags, Unit};
//!
//! let arena = Bump::new();
//! let ast = AstBuilder::new(&arena);
//!
//! // function main() { console.log("hi"); }
//! let body = [ast.expr_stmt(ast.method_call(ast.name("console"), "log", &[ast.string("hi")]))];
//! let main = ast.function("main", &[], &body, FunctionFlags::empty());
//!
//! let mut unit = Unit::with_standard_library("main").unwrap();
//! unit.add_function(main).unwrap();
//!
//! let module = unit.build().unwrap();
//! assert!(module.externals.contains("kestrel_console_log"));
//! ```

use kestrel_ast::FunctionDecl;
use kestrel_compiler::{BuildError, Declarations, HirModule, LoweringConfig, LoweringPass, LoweringSession};
use kestrel_core::{Diagnostics, RegistrationError};
use kestrel_registry::ClassEntry;

/// A compilation unit ready for lowering.
///
/// Users:
/// 1. Create a unit with `Unit::new()` or `Unit::with_standard_library()`
/// 2. Register classes, imports and closures through `declarations_mut()`
/// 3. Add function declarations with `add_function()`
/// 4. Lower the unit with `build()`
pub struct Unit<'ast> {
    name: String,
    config: LoweringConfig,
    decls: Declarations<'ast>,
    /// Functions to lower, in the order they were added.
    functions: Vec<&'ast FunctionDecl<'ast>>,
}

impl<'ast> Unit<'ast> {
    /// Create a unit with no ABI catalog. Only user-declared functions and
    /// classes resolve.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: LoweringConfig::default(),
            decls: Declarations::new(),
            functions: Vec::new(),
        }
    }

    /// Create a unit that lowers against the full runtime catalog.
    pub fn with_standard_library(name: impl Into<String>) -> Result<Self, BuildError> {
        let abi = kestrel_modules::standard_library()?;
        Ok(Self {
            decls: Declarations::with_abi(abi),
            ..Self::new(name)
        })
    }

    pub fn with_config(mut self, config: LoweringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &LoweringConfig {
        &self.config
    }

    pub fn declarations(&self) -> &Declarations<'ast> {
        &self.decls
    }

    /// Declaration tables, for registering imports, object literals and
    /// closure descriptors before the build.
    pub fn declarations_mut(&mut self) -> &mut Declarations<'ast> {
        &mut self.decls
    }

    /// Register `decl` and queue its body for lowering.
    ///
    /// # Errors
    ///
    /// Returns an error if a function with the same symbol name was already
    /// added.
    pub fn add_function(&mut self, decl: &'ast FunctionDecl<'ast>) -> Result<(), RegistrationError> {
        self.decls.declare_function(decl)?;
        self.functions.push(decl);
        Ok(())
    }

    pub fn add_class(&mut self, class: ClassEntry) -> Result<(), RegistrationError> {
        self.decls.classes.register(class)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Lower every function and return the module together with all
    /// diagnostics, whether or not lowering succeeded.
    pub fn lower(&self) -> (HirModule, Diagnostics) {
        self.run().into_parts()
    }

    /// Lower every function. A module is returned only if no call site
    /// produced an error.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&self) -> Result<HirModule, BuildError> {
        let session = self.run();
        log::debug!(
            "built unit {}: {} function(s), {} runtime symbol(s)",
            self.name,
            session.module.functions.len(),
            session.module.externals.len()
        );
        session.finish()
    }

    fn run(&self) -> LoweringSession {
        let mut session = LoweringSession::new(self.name.clone(), self.config);
        LoweringPass::new(&self.decls, &mut session).run(&self.functions);
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use kestrel_ast::AstBuilder;
    use kestrel_core::FunctionFlags;

    #[test]
    fn duplicate_functions_are_rejected_at_registration() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let f = ast.function("f", &[], &[], FunctionFlags::empty());
        let mut unit = Unit::new("u");
        unit.add_function(f).unwrap();
        assert!(unit.add_function(f).is_err());
        assert_eq!(unit.function_count(), 1);
    }

    #[test]
    fn lower_returns_module_even_with_errors() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [ast.expr_stmt(ast.call_named("missing", &[]))];
        let main = ast.function("main", &[], &body, FunctionFlags::empty());
        let mut unit = Unit::new("u");
        unit.add_function(main).unwrap();

        let (module, diagnostics) = unit.lower();
        assert!(module.function("main").is_some());
        assert_eq!(diagnostics.error_count(), 1);
        assert!(matches!(unit.build(), Err(BuildError::Lowering(_))));
    }
}
