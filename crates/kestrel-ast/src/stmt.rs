//! Statement nodes.
//!
//! Just enough structure to walk a function body in source order: bindings,
//! reassignment, expression statements, returns and nested blocks.

use kestrel_core::Span;

use crate::{Expr, Ident};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    Let(LetStmt<'ast>),
    Assign(AssignStmt<'ast>),
    Expr(ExprStmt<'ast>),
    Return(ReturnStmt<'ast>),
    Block(Block<'ast>),
}

impl Stmt<'_> {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Block(s) => s.span,
        }
    }
}

/// `let name = init;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetStmt<'ast> {
    pub name: Ident<'ast>,
    pub init: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

/// `name = value;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    pub target: Ident<'ast>,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub value: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

/// `{ ... }` with its own lexical scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
}
