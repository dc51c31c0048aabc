//! Mutable state shared by every function lowered in one unit.

use kestrel_core::{Diagnostics, HirType, LoweringError, RegistrationError, Span};
use kestrel_registry::{RuntimeSymbolTable, SymbolId};
use thiserror::Error;

use crate::config::LoweringConfig;
use crate::hir::HirModule;

/// Why a unit did not produce a module for code generation.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    #[error("declaration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("lowering failed with {} error(s)", .0.error_count())]
    Lowering(Diagnostics),
}

impl BuildError {
    /// Diagnostics of a failed lowering pass.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            BuildError::Lowering(diagnostics) => Some(diagnostics),
            BuildError::Registration(_) => None,
        }
    }
}

/// The module under construction plus the diagnostics sink.
#[derive(Debug)]
pub struct LoweringSession {
    pub module: HirModule,
    pub diagnostics: Diagnostics,
    pub config: LoweringConfig,
}

impl LoweringSession {
    pub fn new(name: impl Into<String>, config: LoweringConfig) -> Self {
        let externals = RuntimeSymbolTable::with_policy(config.symbol_conflicts);
        Self {
            module: HirModule::new(name, externals),
            diagnostics: Diagnostics::new(),
            config,
        }
    }

    /// Record a lowering error. Never interrupts the pass.
    pub fn report(&mut self, err: &LoweringError) {
        log::warn!("{}", err);
        self.diagnostics.report(err);
    }

    /// Declare (or re-use) the runtime symbol `name`.
    pub fn declare_external(
        &mut self,
        name: &str,
        params: &[HirType],
        return_type: HirType,
        variadic: bool,
        span: Span,
    ) -> Result<SymbolId, LoweringError> {
        let externals = &mut self.module.externals;
        let result = if variadic {
            externals.get_or_create_variadic(name, params, return_type)
        } else {
            externals.get_or_create_external(name, params, return_type)
        };
        result.map_err(|err| LoweringError::from_registration(err, span))
    }

    /// The build gate: a module is only handed out when lowering recorded no
    /// errors.
    pub fn finish(self) -> Result<HirModule, BuildError> {
        if self.diagnostics.has_errors() {
            log::debug!(
                "unit {} rejected: {} error(s){}",
                self.module.name,
                self.diagnostics.error_count(),
                if self.diagnostics.has_fatal() { ", fatal" } else { "" }
            );
            return Err(BuildError::Lowering(self.diagnostics));
        }
        Ok(self.module)
    }

    /// Module and diagnostics without the gate, for inspection.
    pub fn into_parts(self) -> (HirModule, Diagnostics) {
        (self.module, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_registry::SymbolConflictPolicy;

    #[test]
    fn gate_rejects_any_error() {
        let mut session = LoweringSession::new("m", LoweringConfig::default());
        session.report(&LoweringError::UnresolvedCallee {
            name: "foo".into(),
            span: Span::point(1, 1),
        });
        let err = session.finish().unwrap_err();
        assert_eq!(err.diagnostics().map(Diagnostics::error_count), Some(1));
        assert_eq!(err.to_string(), "lowering failed with 1 error(s)");
    }

    #[test]
    fn clean_session_yields_module() {
        let mut session = LoweringSession::new("m", LoweringConfig::default());
        session
            .declare_external("kestrel_math_abs", &[HirType::F64], HirType::F64, false, Span::default())
            .unwrap();
        let module = session.finish().unwrap();
        assert!(module.externals.contains("kestrel_math_abs"));
    }

    #[test]
    fn strict_conflicts_surface_as_lowering_errors() {
        let config = LoweringConfig::default().with_symbol_conflicts(SymbolConflictPolicy::Strict);
        let mut session = LoweringSession::new("m", config);
        session
            .declare_external("kestrel_x", &[HirType::F64], HirType::F64, false, Span::default())
            .unwrap();
        let err = session
            .declare_external("kestrel_x", &[HirType::Ptr], HirType::F64, false, Span::point(2, 1))
            .unwrap_err();
        assert!(matches!(err, LoweringError::SignatureConflict { .. }));
    }
}
