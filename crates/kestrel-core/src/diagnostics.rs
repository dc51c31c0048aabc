//! Diagnostic sink for the lowering pass.
//!
//! Lowering records problems here instead of returning early, so one bad call
//! site never hides the others. The unit build checks [`Diagnostics::has_errors`]
//! before handing a module to code generation.

use std::collections::VecDeque;
use std::fmt;

use crate::{LoweringError, Span};

/// A single message produced while lowering.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
    /// Set when the problem makes the whole unit unusable.
    pub fatal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Error,
    Warning,
    Info,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            message: message.into(),
            span,
            fatal: false,
        }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            message: message.into(),
            span,
            fatal: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }
}

impl From<&LoweringError> for Diagnostic {
    fn from(err: &LoweringError) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            message: err.to_string(),
            span: err.span(),
            fatal: err.is_fatal(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Info => "info",
        };
        write!(f, "{}: {}", kind, self.message)
    }
}

/// Ordered collection of diagnostics for one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: VecDeque<Diagnostic>,
    error_count: usize,
    fatal: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.fatal |= diagnostic.fatal;
        self.items.push_back(diagnostic);
    }

    pub fn report(&mut self, err: &LoweringError) {
        self.push(Diagnostic::from(err));
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Whether any recorded error was fatal to the unit.
    pub fn has_fatal(&self) -> bool {
        self.fatal
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.kind == DiagnosticKind::Warning)
    }

    /// Append everything from `other`, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        for diagnostic in other.items {
            self.push(diagnostic);
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.items {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::collections::vec_deque::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
