//! Arena-backed construction helpers.
//!
//! Upstream passes and tests build AST fragments through [`AstBuilder`]
//! instead of writing nested struct literals by hand. Every node gets a
//! distinct synthetic span (one line per node) so diagnostics can be told
//! apart.

use std::cell::Cell;

use bumpalo::Bump;
use kestrel_core::{FunctionFlags, Span};

use crate::{
    Argument, AssignStmt, Block, CallExpr, Expr, ExprStmt, FunctionDecl, Ident, LetStmt,
    LiteralExpr, LiteralKind, MemberExpr, NewExpr, Param, ParenExpr, ReturnStmt, Stmt,
};

pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    next_line: Cell<u32>,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            next_line: Cell::new(1),
        }
    }

    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    fn span(&self, len: usize) -> Span {
        let line = self.next_line.get();
        self.next_line.set(line + 1);
        Span::new(line, 1, len as u32)
    }

    fn alloc(&self, expr: Expr<'ast>) -> &'ast Expr<'ast> {
        self.arena.alloc(expr)
    }

    fn args(&self, args: &[&'ast Expr<'ast>]) -> &'ast [Argument<'ast>] {
        let args: Vec<Argument<'ast>> = args
            .iter()
            .map(|&value| Argument {
                value,
                span: value.span(),
            })
            .collect();
        self.arena.alloc_slice_copy(&args)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn ident(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.arena.alloc_str(name), self.span(name.len()))
    }

    /// A bare-name expression.
    pub fn name(&self, name: &str) -> &'ast Expr<'ast> {
        let ident = self.ident(name);
        self.alloc(Expr::Ident(ident))
    }

    fn literal(&self, kind: LiteralKind<'ast>) -> &'ast Expr<'ast> {
        let span = self.span(1);
        self.alloc(Expr::Literal(LiteralExpr { kind, span }))
    }

    pub fn num(&self, value: f64) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Number(value))
    }

    pub fn string(&self, value: &str) -> &'ast Expr<'ast> {
        let value = self.arena.alloc_str(value);
        self.literal(LiteralKind::String(value))
    }

    pub fn boolean(&self, value: bool) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Bool(value))
    }

    pub fn null(&self) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Null)
    }

    pub fn undefined(&self) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Undefined)
    }

    pub fn regex(&self, pattern: &str, flags: &str) -> &'ast Expr<'ast> {
        let pattern = self.arena.alloc_str(pattern);
        let flags = self.arena.alloc_str(flags);
        self.literal(LiteralKind::Regex { pattern, flags })
    }

    pub fn this(&self) -> &'ast Expr<'ast> {
        let span = self.span(4);
        self.alloc(Expr::This(span))
    }

    pub fn super_(&self) -> &'ast Expr<'ast> {
        let span = self.span(5);
        self.alloc(Expr::Super(span))
    }

    pub fn member(&self, object: &'ast Expr<'ast>, property: &str) -> &'ast Expr<'ast> {
        let property = self.ident(property);
        let span = object.span().to(property.span);
        let member = self.arena.alloc(MemberExpr {
            object,
            property,
            span,
        });
        self.alloc(Expr::Member(member))
    }

    pub fn call(&self, callee: &'ast Expr<'ast>, args: &[&'ast Expr<'ast>]) -> &'ast Expr<'ast> {
        let args = self.args(args);
        let span = self.span(2);
        let call = self.arena.alloc(CallExpr { callee, args, span });
        self.alloc(Expr::Call(call))
    }

    /// `name(args)`
    pub fn call_named(&self, name: &str, args: &[&'ast Expr<'ast>]) -> &'ast Expr<'ast> {
        let callee = self.name(name);
        self.call(callee, args)
    }

    /// `receiver.method(args)`
    pub fn method_call(
        &self,
        receiver: &'ast Expr<'ast>,
        method: &str,
        args: &[&'ast Expr<'ast>],
    ) -> &'ast Expr<'ast> {
        let callee = self.member(receiver, method);
        self.call(callee, args)
    }

    pub fn new_(&self, callee: &'ast Expr<'ast>, args: &[&'ast Expr<'ast>]) -> &'ast Expr<'ast> {
        let args = self.args(args);
        let span = self.span(3);
        let new = self.arena.alloc(NewExpr { callee, args, span });
        self.alloc(Expr::New(new))
    }

    pub fn function_ref(&self, name: &str) -> &'ast Expr<'ast> {
        let ident = self.ident(name);
        self.alloc(Expr::FunctionRef(ident))
    }

    pub fn object(&self) -> &'ast Expr<'ast> {
        let span = self.span(2);
        self.alloc(Expr::Object(span))
    }

    pub fn paren(&self, expr: &'ast Expr<'ast>) -> &'ast Expr<'ast> {
        let span = self.span(2);
        let paren = self.arena.alloc(ParenExpr { expr, span });
        self.alloc(Expr::Paren(paren))
    }

    /// Unwrap a call expression built by this builder.
    pub fn as_call(expr: &'ast Expr<'ast>) -> Option<&'ast CallExpr<'ast>> {
        match expr {
            Expr::Call(call) => Some(*call),
            _ => None,
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn let_(&self, name: &str, init: &'ast Expr<'ast>) -> Stmt<'ast> {
        let name = self.ident(name);
        Stmt::Let(LetStmt {
            name,
            init: Some(init),
            span: name.span,
        })
    }

    pub fn let_uninit(&self, name: &str) -> Stmt<'ast> {
        let name = self.ident(name);
        Stmt::Let(LetStmt {
            name,
            init: None,
            span: name.span,
        })
    }

    pub fn assign(&self, target: &str, value: &'ast Expr<'ast>) -> Stmt<'ast> {
        let target = self.ident(target);
        Stmt::Assign(AssignStmt {
            target,
            value,
            span: target.span,
        })
    }

    pub fn expr_stmt(&self, expr: &'ast Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr,
            span: expr.span(),
        })
    }

    pub fn ret(&self, value: Option<&'ast Expr<'ast>>) -> Stmt<'ast> {
        let span = self.span(6);
        Stmt::Return(ReturnStmt { value, span })
    }

    pub fn block(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        let stmts = self.arena.alloc_slice_copy(stmts);
        let span = self.span(2);
        Stmt::Block(Block { stmts, span })
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub fn param(&self, name: &str) -> Param<'ast> {
        let name = self.ident(name);
        Param {
            name,
            default: None,
            span: name.span,
        }
    }

    pub fn param_default(&self, name: &str, default: &'ast Expr<'ast>) -> Param<'ast> {
        let name = self.ident(name);
        Param {
            name,
            default: Some(default),
            span: name.span,
        }
    }

    pub fn function(
        &self,
        name: &str,
        params: &[Param<'ast>],
        body: &[Stmt<'ast>],
        flags: FunctionFlags,
    ) -> &'ast FunctionDecl<'ast> {
        self.declare(None, name, params, body, flags)
    }

    /// A class member. Use `"constructor"` as the name for constructors.
    pub fn method(
        &self,
        owner: &str,
        name: &str,
        params: &[Param<'ast>],
        body: &[Stmt<'ast>],
        flags: FunctionFlags,
    ) -> &'ast FunctionDecl<'ast> {
        let owner = self.ident(owner);
        self.declare(Some(owner), name, params, body, flags)
    }

    fn declare(
        &self,
        owner: Option<Ident<'ast>>,
        name: &str,
        params: &[Param<'ast>],
        body: &[Stmt<'ast>],
        flags: FunctionFlags,
    ) -> &'ast FunctionDecl<'ast> {
        let name = self.ident(name);
        let params = self.arena.alloc_slice_copy(params);
        let body = self.arena.alloc_slice_copy(body);
        self.arena.alloc(FunctionDecl {
            name,
            owner,
            params,
            body,
            flags,
            span: name.span,
        })
    }
}
