//! Call target resolution.
//!
//! [`resolve_call`] turns one call expression into one [`CallPlan`]. The
//! recognizers run in a fixed priority order and the first match wins:
//!
//! 1. `super(...)`
//! 2. `super.m(...)`
//! 3. a bare name imported from a builtin module
//! 4. a reserved global (`parseInt`, `setTimeout`, ...), folded when possible
//! 5. member calls: namespace, class static, primitive, handle, object
//!    literal, class instance
//! 6. any other bare name (generators, function and closure variables,
//!    declared functions)
//!
//! A name bound in the local scope is never taken for an import, a reserved
//! global, a namespace or a class.

mod constructors;
mod globals;
mod idents;
mod members;
mod super_calls;

use kestrel_ast::{Argument, CallExpr, Expr};
use kestrel_core::{HirType, LoweringError, ReceiverKind, Span, TypeTag};
use kestrel_registry::{AbiEntry, AbiKey};

use crate::Result;
use crate::function_lowerer::FunctionLowerer;
use crate::hir::ValueId;
use crate::plan::{CallPlan, Recognizer};

/// Resolve the target of `call`, evaluating its arguments on the way.
pub(crate) fn resolve_call<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    match call.callee.unparen() {
        Expr::Super(_) => super_calls::resolve_super_constructor(lowerer, call),
        Expr::Member(member) if matches!(member.object.unparen(), Expr::Super(_)) => {
            super_calls::resolve_super_method(lowerer, *member, call)
        }
        Expr::Ident(ident) => {
            if !lowerer.is_local(ident.name) {
                if let Some(plan) = globals::resolve_imported_function(lowerer, *ident, call)? {
                    return Ok(plan);
                }
                if let Some(plan) = globals::resolve_reserved_global(lowerer, *ident, call)? {
                    return Ok(plan);
                }
            }
            idents::resolve_identifier_call(lowerer, *ident, call)
        }
        Expr::Member(member) => members::resolve_member_call(lowerer, *member, call),
        callee => idents::resolve_computed_call(lowerer, callee, call),
    }
}

// ============================================================================
// Shared argument handling
// ============================================================================

/// Call a catalog entry: check the argument count, evaluate the arguments
/// after `prefix` (receiver or element code), pad optional parameters, and
/// declare the runtime symbol.
pub(crate) fn abi_call<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    recognizer: Recognizer,
    receiver: ReceiverKind,
    entry: &AbiEntry,
    prefix: Vec<ValueId>,
    args: &'ast [Argument<'ast>],
    span: Span,
) -> Result<CallPlan> {
    let counted = args.len() + if entry.this_injection { 0 } else { prefix.len() };
    if !entry.arity.accepts(counted) {
        return Err(LoweringError::ArityMismatch {
            callee: describe(receiver, &entry.operation),
            expected: entry.arity.to_string(),
            found: counted,
            span,
        });
    }

    let mut values = prefix;
    values.reserve(args.len());
    for arg in args {
        values.push(lowerer.lower_expr(arg.value)?.value);
    }
    if lowerer.session.config.pad_missing_arguments {
        while values.len() < entry.params.len() {
            let undefined = lowerer.builder.undefined();
            values.push(undefined);
        }
    }

    lowerer.session.declare_external(
        &entry.symbol,
        &entry.params,
        entry.return_type,
        entry.arity.is_variadic(),
        span,
    )?;
    Ok(CallPlan::direct(recognizer, entry.symbol.as_str(), values)
        .typed(TypeTag::from_hir_type(entry.return_type))
        .tagged(entry.result_tag.into_option()))
}

/// Call a runtime symbol the catalog does not describe: variadic, returning
/// a boxed value.
pub(crate) fn generic_call<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    recognizer: Recognizer,
    symbol: String,
    prefix: Vec<ValueId>,
    args: &'ast [Argument<'ast>],
    span: Span,
) -> Result<CallPlan> {
    let params = vec![HirType::Ptr; prefix.len()];
    let mut values = prefix;
    values.extend(lowerer.lower_args(args)?);
    lowerer
        .session
        .declare_external(&symbol, &params, HirType::Any, true, span)?;
    log::trace!("generic runtime call {}", symbol);
    Ok(CallPlan::direct(recognizer, symbol, values))
}

/// Arguments for a call to a lowered function: `prefix`, the evaluated call
/// arguments, then the defaults of any omitted parameters, evaluated in the
/// caller's scope. Omitted parameters without a default become `undefined`
/// when padding is on, or when a later parameter has a default.
pub(crate) fn declared_arguments<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    function: &str,
    prefix: Vec<ValueId>,
    args: &'ast [Argument<'ast>],
) -> Result<Vec<ValueId>> {
    let decls = lowerer.decls;
    let mut values = prefix;
    values.extend(lowerer.lower_args(args)?);

    let Some(entry) = decls.functions.get(function) else {
        return Ok(values);
    };
    let declared = entry.arity();
    if args.len() >= declared {
        return Ok(values);
    }

    let defaults = decls.defaults(function).unwrap_or_default();
    let fill_to = if lowerer.session.config.pad_missing_arguments {
        declared
    } else {
        defaults
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| (last + 1).min(declared))
    };
    for index in args.len()..fill_to {
        let value = match defaults.get(index).copied().flatten() {
            Some(default) => lowerer.lower_expr(default)?.value,
            None => lowerer.builder.undefined(),
        };
        values.push(value);
    }
    Ok(values)
}

/// The function `function` statically returns, as an owned name.
pub(crate) fn returned_function(lowerer: &FunctionLowerer<'_, '_>, function: &str) -> Option<String> {
    lowerer.decls.returned_function(function).map(str::to_string)
}

fn describe(receiver: ReceiverKind, operation: &str) -> String {
    match receiver {
        ReceiverKind::Global => operation.to_string(),
        receiver => AbiKey {
            receiver,
            operation: operation.to_string(),
        }
        .to_string(),
    }
}
