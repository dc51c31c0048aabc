//! Member calls `<receiver>.<name>(...)`.
//!
//! Sub-checks, in order:
//!
//! - namespace object or imported module namespace (`Math.max`, `path.join`)
//! - declared class or class-reference variable (static dispatch)
//! - primitive receiver (`"a".toUpperCase()`, `xs.map(f)`)
//! - runtime handle (`set.union(other)`, `p.then(f)`)
//! - object-literal variable with a synthesized method
//! - class instance, resolved through the inheritance chain

use kestrel_ast::{CallExpr, Expr, MemberExpr};
use kestrel_core::{LoweringError, Namespace, ReceiverKind, TypeTag};
use kestrel_registry::runtime_symbol_name;

use super::{abi_call, declared_arguments, generic_call, returned_function};
use crate::Result;
use crate::function_lowerer::FunctionLowerer;
use crate::plan::{CallPlan, Recognizer};
use crate::scope::BindingKind;

pub(super) fn resolve_member_call<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    member: &'ast MemberExpr<'ast>,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    let decls = lowerer.decls;
    let method = member.property.name;

    if let Some(ident) = member.object.as_ident() {
        let name = ident.name;
        if !lowerer.is_local(name) {
            if let Some(ns) = Namespace::from_name(name) {
                return namespace_call(lowerer, ReceiverKind::Namespace(ns), method, call);
            }
            if let Some(module) = decls.imports.namespace(name) {
                return namespace_call(lowerer, ReceiverKind::Module(module), method, call);
            }
            if decls.classes.contains(name) {
                return class_static_call(lowerer, name, method, call);
            }
        } else if let Some(BindingKind::ClassRef(class)) = lowerer.scope.lookup(name).map(|b| b.kind.clone()) {
            return class_static_call(lowerer, &class, method, call);
        }
    }

    let receiver = lowerer.lower_expr(member.object)?;

    if let Some(kind) = receiver.ty.primitive() {
        let key = ReceiverKind::Primitive(kind);
        let entry = decls
            .abi
            .lookup(key, method)
            .ok_or_else(|| unresolved(key.to_string(), method, call))?;
        return abi_call(
            lowerer,
            Recognizer::Primitive,
            key,
            entry,
            vec![receiver.value],
            call.args,
            call.span,
        );
    }

    if let Some(kind) = receiver.ty.handle() {
        let key = ReceiverKind::Handle(kind);
        return match decls.abi.lookup(key, method) {
            Some(entry) => abi_call(
                lowerer,
                Recognizer::Handle,
                key,
                entry,
                vec![receiver.value],
                call.args,
                call.span,
            ),
            None => generic_call(
                lowerer,
                Recognizer::Handle,
                runtime_symbol_name(kind.stem(), method),
                vec![receiver.value],
                call.args,
                call.span,
            ),
        };
    }

    if let Some(object) = member.object.as_ident() {
        if let Some(function) = decls.objects.method_function(object.name, method) {
            let args = declared_arguments(lowerer, function, vec![receiver.value], call.args)?;
            let returns = returned_function(lowerer, function);
            return Ok(CallPlan::direct(Recognizer::ObjectLiteral, function, args).returning(returns));
        }
    }

    if let TypeTag::Instance(class) = &receiver.ty {
        let owner = decls
            .classes
            .resolve_method_to_class(class, method)
            .ok_or_else(|| unresolved(class.clone(), method, call))?;
        let symbol = format!("{}_{}", owner, method);
        let args = declared_arguments(lowerer, &symbol, vec![receiver.value], call.args)?;
        let returns = returned_function(lowerer, &symbol);
        return Ok(CallPlan::direct(Recognizer::Instance, symbol, args).returning(returns));
    }

    Err(unresolved(describe_receiver(member.object), method, call))
}

/// `Math.max(...)`, or `path.join(...)` after `import * as path from "path"`.
fn namespace_call<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    receiver: ReceiverKind,
    method: &str,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    let decls = lowerer.decls;
    match decls.abi.lookup(receiver, method) {
        Some(entry) => abi_call(
            lowerer,
            Recognizer::Namespace,
            receiver,
            entry,
            Vec::new(),
            call.args,
            call.span,
        ),
        None if matches!(receiver, ReceiverKind::Module(_)) => generic_call(
            lowerer,
            Recognizer::Namespace,
            runtime_symbol_name(receiver.stem(), method),
            Vec::new(),
            call.args,
            call.span,
        ),
        None => Err(unresolved(receiver.to_string(), method, call)),
    }
}

/// Static methods are inherited: `Dog.create()` may land on `Animal_create`.
fn class_static_call<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    class: &str,
    method: &str,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    let decls = lowerer.decls;
    let owner = decls
        .classes
        .resolve_static_to_class(class, method)
        .ok_or_else(|| unresolved(class.to_string(), method, call))?;
    let symbol = format!("{}_{}", owner, method);
    let args = declared_arguments(lowerer, &symbol, Vec::new(), call.args)?;
    let returns = returned_function(lowerer, &symbol);
    Ok(CallPlan::direct(Recognizer::ClassStatic, symbol, args).returning(returns))
}

fn unresolved(receiver: String, method: &str, call: &CallExpr<'_>) -> LoweringError {
    LoweringError::UnresolvedMethod {
        receiver,
        method: method.to_string(),
        span: call.span,
    }
}

fn describe_receiver(expr: &Expr<'_>) -> String {
    match expr.unparen() {
        Expr::Ident(ident) => ident.name.to_string(),
        Expr::This(_) => "this".to_string(),
        Expr::Member(member) => format!("{}.{}", describe_receiver(member.object), member.property.name),
        _ => "value".to_string(),
    }
}
