//! Calls through a plain identifier, and through computed callees.
//!
//! A local binding decides first: a function-reference variable calls its
//! function directly, a closure variable forwards its environment. Otherwise
//! the name must be a declared function: generators build a handle, anything
//! else is a direct call with defaults and, for functions with captures, an
//! environment populated from the caller's scope.

use kestrel_ast::{CallExpr, Expr, Ident};
use kestrel_core::LoweringError;

use super::{declared_arguments, returned_function};
use crate::Result;
use crate::function_lowerer::FunctionLowerer;
use crate::generator::GeneratorKind;
use crate::hir::ValueId;
use crate::plan::{CallPlan, Recognizer};
use crate::scope::BindingKind;

pub(super) fn resolve_identifier_call<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    ident: Ident<'ast>,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    let decls = lowerer.decls;
    let name = ident.name;

    if let Some(binding) = lowerer.scope.lookup(name).cloned() {
        return match binding.kind {
            BindingKind::FunctionRef(function) => call_function_ref(lowerer, &function, call),
            BindingKind::Closure(function) => {
                let handle = lowerer.builder.load(binding.slot);
                call_closure(lowerer, &function, handle, call)
            }
            BindingKind::ClassRef(_) | BindingKind::Value => Err(unresolved(name, call)),
        };
    }
    if lowerer.is_local(name) {
        return Err(unresolved(name, call));
    }

    if decls.functions.is_generator(name) {
        return lowerer.construct_generator(name, GeneratorKind::Sync, call.args, call.span);
    }
    if decls.functions.is_async_generator(name) {
        return lowerer.construct_generator(name, GeneratorKind::Async, call.args, call.span);
    }
    if decls.functions.contains(name) {
        return call_declared(lowerer, name, call);
    }
    Err(unresolved(name, call))
}

/// `outer()(5)`, `(f)(1)` and other callees that are not a bare name or a
/// member: callable only when the value is a known function.
pub(super) fn resolve_computed_call<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    callee: &'ast Expr<'ast>,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    let decls = lowerer.decls;
    let operand = lowerer.lower_expr(callee)?;
    let Some(function) = operand.function().map(str::to_string) else {
        return Err(LoweringError::UnsupportedCallee { span: call.span });
    };
    if decls.closures.captures(&function) {
        call_closure(lowerer, &function, operand.value, call)
    } else {
        call_function_ref(lowerer, &function, call)
    }
}

/// A capture-free function called through a variable. Defaults apply as
/// for a call by name.
fn call_function_ref<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    function: &str,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    let decls = lowerer.decls;
    if decls.functions.is_generator(function) {
        return lowerer.construct_generator(function, GeneratorKind::Sync, call.args, call.span);
    }
    if decls.functions.is_async_generator(function) {
        return lowerer.construct_generator(function, GeneratorKind::Async, call.args, call.span);
    }
    let args = declared_arguments(lowerer, function, Vec::new(), call.args)?;
    let returns = returned_function(lowerer, function);
    Ok(CallPlan::direct(Recognizer::FunctionRef, function, args).returning(returns))
}

/// A created closure: the environment it was built with is forwarded as
/// the last argument, after the declared parameters.
fn call_closure<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    function: &str,
    handle: ValueId,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    let mut args = declared_arguments(lowerer, function, Vec::new(), call.args)?;
    lowerer.fit_to_arity(function, &mut args, 0);
    args.push(handle);
    let returns = returned_function(lowerer, function);
    Ok(CallPlan::indirect(function, args).returning(returns))
}

/// A declared function called by name. A function with captures gets a
/// fresh environment from the caller's scope as of this call.
fn call_declared<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    function: &str,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    let decls = lowerer.decls;
    let mut args = declared_arguments(lowerer, function, Vec::new(), call.args)?;
    if let Some(descriptor) = decls.closures.get(function) {
        lowerer.fit_to_arity(function, &mut args, 0);
        let env = lowerer.populate_env(descriptor, call.span)?;
        args.push(env);
    }
    let returns = returned_function(lowerer, function);
    Ok(CallPlan::direct(Recognizer::Declared, function, args).returning(returns))
}

fn unresolved(name: &str, call: &CallExpr<'_>) -> LoweringError {
    LoweringError::UnresolvedCallee {
        name: name.to_string(),
        span: call.span,
    }
}
