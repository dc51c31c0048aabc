//! Imported builtin-module functions and reserved globals.

use kestrel_ast::{CallExpr, Ident};
use kestrel_core::ReceiverKind;
use kestrel_registry::runtime_symbol_name;

use super::{abi_call, generic_call};
use crate::Result;
use crate::fold;
use crate::function_lowerer::FunctionLowerer;
use crate::plan::{CallPlan, Recognizer};

/// `read(...)` after `import { readFileSync as read } from "fs"`.
///
/// Exports missing from the catalog still lower, to a variadic runtime
/// function named after the module and export.
pub(super) fn resolve_imported_function<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    ident: Ident<'ast>,
    call: &'ast CallExpr<'ast>,
) -> Result<Option<CallPlan>> {
    let decls = lowerer.decls;
    let Some(import) = decls.imports.function(ident.name) else {
        return Ok(None);
    };
    let receiver = ReceiverKind::Module(import.module);
    let plan = match decls.abi.lookup(receiver, &import.export) {
        Some(entry) => abi_call(
            lowerer,
            Recognizer::ImportedFunction,
            receiver,
            entry,
            Vec::new(),
            call.args,
            call.span,
        )?,
        None => generic_call(
            lowerer,
            Recognizer::ImportedFunction,
            runtime_symbol_name(receiver.stem(), &import.export),
            Vec::new(),
            call.args,
            call.span,
        )?,
    };
    Ok(Some(plan))
}

/// `parseInt(...)`, `setTimeout(...)` and the other reserved globals.
/// Foldable ones with literal arguments become constants.
pub(super) fn resolve_reserved_global<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    ident: Ident<'ast>,
    call: &'ast CallExpr<'ast>,
) -> Result<Option<CallPlan>> {
    let decls = lowerer.decls;
    let Some(entry) = decls.abi.global(ident.name) else {
        return Ok(None);
    };

    if lowerer.session.config.fold_constants && entry.arity.accepts(call.args.len()) {
        if let Some(value) = entry.fold.and_then(|op| fold::try_fold(op, call.args)) {
            log::trace!("folded {}(...) to {}", ident.name, value);
            return Ok(Some(CallPlan::fold(Recognizer::ReservedGlobal, value)));
        }
    }

    abi_call(
        lowerer,
        Recognizer::ReservedGlobal,
        ReceiverKind::Global,
        entry,
        Vec::new(),
        call.args,
        call.span,
    )
    .map(Some)
}
