//! Function declarations.

use kestrel_core::{FunctionFlags, Span};

use crate::{Expr, Ident, Stmt};

/// A formal parameter, with its default value expression if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub name: Ident<'ast>,
    pub default: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

/// A function, method, or constructor after lifting.
///
/// Methods carry their owning class; their lowered symbol is
/// `<Owner>_<name>` (constructors are named `constructor`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDecl<'ast> {
    pub name: Ident<'ast>,
    pub owner: Option<Ident<'ast>>,
    pub params: &'ast [Param<'ast>],
    pub body: &'ast [Stmt<'ast>],
    pub flags: FunctionFlags,
    pub span: Span,
}

impl<'ast> FunctionDecl<'ast> {
    /// Name of the HIR function this declaration lowers to.
    pub fn symbol_name(&self) -> String {
        match self.owner {
            Some(owner) => format!("{}_{}", owner.name, self.name.name),
            None => self.name.name.to_string(),
        }
    }

    pub fn has_defaults(&self) -> bool {
        self.params.iter().any(|p| p.default.is_some())
    }

    pub fn param_names(&self) -> impl Iterator<Item = &'ast str> + '_ {
        self.params.iter().map(|p| p.name.name)
    }
}
