//! Statement lowering.
//!
//! Statements are lowered in source order so call sites are processed in
//! traversal order. An error in one statement is reported and lowering
//! continues with the next one.

use kestrel_ast::{AssignStmt, LetStmt, Stmt};
use kestrel_core::{LoweringError, TypeTag};

use crate::Result;
use crate::expr::{Operand, Referent};
use crate::function_lowerer::FunctionLowerer;
use crate::hir::ValueId;
use crate::scope::{Binding, BindingKind};

impl<'a, 'ast> FunctionLowerer<'a, 'ast> {
    pub(crate) fn lower_stmts(&mut self, stmts: &'ast [Stmt<'ast>]) {
        for stmt in stmts {
            if self.builder.is_terminated() {
                log::debug!("{}: unreachable statement at {}", self.builder.name(), stmt.span());
                break;
            }
            self.builder.set_span(stmt.span());
            if let Err(err) = self.lower_stmt(stmt) {
                self.session.report(&err);
            }
        }
    }

    fn lower_stmt(&mut self, stmt: &'ast Stmt<'ast>) -> Result<()> {
        match stmt {
            Stmt::Let(s) => {
                self.lower_let(s);
                Ok(())
            }
            Stmt::Assign(s) => self.lower_assign(s),
            Stmt::Expr(s) => self.lower_expr(s.expr).map(drop),
            Stmt::Return(s) => {
                let value = s.value.map(|expr| self.lower_expr(expr)).transpose()?;
                self.builder.ret(value.map(|operand| operand.value));
                Ok(())
            }
            Stmt::Block(block) => {
                self.scope.push_scope();
                self.lower_stmts(block.stmts);
                self.scope.pop_scope();
                Ok(())
            }
        }
    }

    /// The binding is declared even when its initializer fails, so later
    /// uses of the name do not cascade into more diagnostics.
    fn lower_let(&mut self, stmt: &LetStmt<'ast>) {
        let operand = match stmt.init.map(|init| self.lower_expr(init)).transpose() {
            Ok(Some(operand)) => operand,
            Ok(None) => Operand::new(self.builder.undefined(), TypeTag::Unknown),
            Err(err) => {
                self.session.report(&err);
                Operand::new(self.builder.undefined(), TypeTag::Unknown)
            }
        };
        let name = stmt.name.name;
        let slot = self.builder.local(name, operand.value);
        let binding = self.binding_for(slot, &operand);
        self.scope.declare(name, binding);
    }

    /// Reassignment replaces what is statically known about the variable.
    /// Captured variables are written through the environment record.
    fn lower_assign(&mut self, stmt: &AssignStmt<'ast>) -> Result<()> {
        let operand = self.lower_expr(stmt.value)?;
        let name = stmt.target.name;

        if let Some(slot) = self.scope.lookup(name).map(|binding| binding.slot) {
            self.builder.store(slot, operand.value);
            let updated = self.binding_for(slot, &operand);
            if let Some(binding) = self.scope.lookup_mut(name) {
                *binding = updated;
            }
            return Ok(());
        }

        let field = self
            .env
            .and_then(|env| env.descriptor.field_index(name).map(|index| (env.value, index)));
        match field {
            Some((record, index)) => {
                self.builder.set_field(record, index as u32, operand.value);
                Ok(())
            }
            None => Err(LoweringError::UnresolvedName {
                name: name.to_string(),
                span: stmt.target.span,
            }),
        }
    }

    fn binding_for(&self, slot: ValueId, operand: &Operand) -> Binding {
        let kind = match &operand.refers_to {
            Some(Referent::Function(function)) if self.decls.closures.captures(function) => {
                BindingKind::Closure(function.clone())
            }
            Some(Referent::Function(function)) => BindingKind::FunctionRef(function.clone()),
            Some(Referent::Class(class)) => BindingKind::ClassRef(class.clone()),
            None => BindingKind::Value,
        };
        Binding {
            slot,
            kind,
            ty: operand.ty.clone(),
            tag: operand.tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoweringConfig;
    use crate::context::{Declarations, LoweringSession};
    use crate::hir::Instruction;
    use bumpalo::Bump;
    use kestrel_ast::AstBuilder;
    use kestrel_core::FunctionFlags;

    #[test]
    fn failed_initializer_still_binds() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [
            ast.let_("x", ast.name("missing")),
            ast.expr_stmt(ast.name("x")),
        ];
        let main = ast.function("main", &[], &body, FunctionFlags::empty());
        let decls = Declarations::new();
        let mut session = LoweringSession::new("test", LoweringConfig::default());
        FunctionLowerer::new(&decls, &mut session, main).lower(main);
        assert_eq!(session.diagnostics.error_count(), 1);
    }

    #[test]
    fn block_bindings_do_not_leak() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [
            ast.block(&[ast.let_("inner", ast.num(1.0))]),
            ast.expr_stmt(ast.name("inner")),
        ];
        let main = ast.function("main", &[], &body, FunctionFlags::empty());
        let decls = Declarations::new();
        let mut session = LoweringSession::new("test", LoweringConfig::default());
        FunctionLowerer::new(&decls, &mut session, main).lower(main);
        assert_eq!(session.diagnostics.error_count(), 1);
    }

    #[test]
    fn statements_after_return_are_skipped() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let body = [ast.ret(None), ast.expr_stmt(ast.name("never"))];
        let main = ast.function("main", &[], &body, FunctionFlags::empty());
        let decls = Declarations::new();
        let mut session = LoweringSession::new("test", LoweringConfig::default());
        let function = FunctionLowerer::new(&decls, &mut session, main).lower(main);
        assert!(session.diagnostics.is_empty());
        assert_eq!(function.instructions, [Instruction::Return(None)]);
    }
}
