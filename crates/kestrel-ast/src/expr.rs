//! Expression nodes.

use std::fmt;

use kestrel_core::Span;

/// An identifier with its location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr<'ast>),
    /// Bare name
    Ident(Ident<'ast>),
    /// `this`
    This(Span),
    /// `super`, only meaningful as a callee or member receiver
    Super(Span),
    /// `object.property`
    Member(&'ast MemberExpr<'ast>),
    /// `callee(args)`
    Call(&'ast CallExpr<'ast>),
    /// `new Callee(args)`
    New(&'ast NewExpr<'ast>),
    /// A function expression, already lifted to a named declaration.
    FunctionRef(Ident<'ast>),
    /// `{ ... }`; methods are looked up in the object-literal table.
    Object(Span),
    /// `(expr)`
    Paren(&'ast ParenExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::This(span) | Self::Super(span) | Self::Object(span) => *span,
            Self::Member(e) => e.span,
            Self::Call(e) => e.span,
            Self::New(e) => e.span,
            Self::FunctionRef(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr<'ast> {
        let mut expr = self;
        while let Expr::Paren(inner) = expr {
            expr = inner.expr;
        }
        expr
    }

    /// The identifier if this is a bare name (parentheses ignored).
    pub fn as_ident(&self) -> Option<Ident<'ast>> {
        match self.unparen() {
            Expr::Ident(ident) => Some(*ident),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&LiteralKind<'ast>> {
        match self.unparen() {
            Expr::Literal(lit) => Some(&lit.kind),
            _ => None,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    Number(f64),
    String(&'ast str),
    Bool(bool),
    Null,
    Undefined,
    Regex { pattern: &'ast str, flags: &'ast str },
}

/// Member access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberExpr<'ast> {
    pub object: &'ast Expr<'ast>,
    pub property: Ident<'ast>,
    pub span: Span,
}

/// A function or method call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub callee: &'ast Expr<'ast>,
    pub args: &'ast [Argument<'ast>],
    pub span: Span,
}

/// A single call argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Argument<'ast> {
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// `new` expression. The callee is a bare name or a namespaced name such
/// as `Intl.NumberFormat`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewExpr<'ast> {
    pub callee: &'ast Expr<'ast>,
    pub args: &'ast [Argument<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparen_strips_nested_parens() {
        let inner = Expr::Ident(Ident::new("x", Span::point(1, 3)));
        let once = ParenExpr { expr: &inner, span: Span::point(1, 2) };
        let once_expr = Expr::Paren(&once);
        let twice = ParenExpr { expr: &once_expr, span: Span::point(1, 1) };
        let expr = Expr::Paren(&twice);

        assert_eq!(expr.unparen(), &inner);
        assert_eq!(expr.as_ident().map(|i| i.name), Some("x"));
        assert_eq!(expr.span(), Span::point(1, 1));
    }

    #[test]
    fn as_literal_sees_through_parens() {
        let lit = Expr::Literal(LiteralExpr {
            kind: LiteralKind::String("42"),
            span: Span::point(1, 2),
        });
        let paren = ParenExpr { expr: &lit, span: Span::point(1, 1) };
        assert_eq!(Expr::Paren(&paren).as_literal(), Some(&LiteralKind::String("42")));
        assert_eq!(Expr::This(Span::default()).as_literal(), None);
    }
}
