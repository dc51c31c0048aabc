//! AST nodes consumed by call lowering.
//!
//! Nodes are allocated in a [`bumpalo::Bump`] arena and borrowed for `'ast`.
//! Only the shapes the lowering pass inspects are modelled: calls, member
//! accesses, `new`, literals, and a small statement layer so whole function
//! bodies can be walked in order.
//!
//! ```
//! use bumpalo::Bump;
//! use kestrel_ast::{AstBuilder, Expr};
//!
//! let arena = Bump::new();
//! let ast = AstBuilder::new(&arena);
//! // dog.speak()
//! let call = ast.call(ast.member(ast.name("dog"), "speak"), &[]);
//! assert!(matches!(call, Expr::Call(_)));
//! ```

pub mod builder;
pub mod decl;
pub mod expr;
pub mod stmt;

pub use builder::AstBuilder;
pub use decl::{FunctionDecl, Param};
pub use expr::{
    Argument, CallExpr, Expr, Ident, LiteralExpr, LiteralKind, MemberExpr, NewExpr, ParenExpr,
};
pub use stmt::{AssignStmt, Block, ExprStmt, LetStmt, ReturnStmt, Stmt};
