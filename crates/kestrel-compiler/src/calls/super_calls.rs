//! `super(...)` and `super.m(...)`.

use kestrel_ast::{CallExpr, MemberExpr};
use kestrel_core::{LoweringError, TypeTag};

use super::constructors::{allocate_object, nearest_constructor};
use super::{declared_arguments, returned_function};
use crate::Result;
use crate::function_lowerer::FunctionLowerer;
use crate::plan::{CallPlan, Recognizer};

/// The nearest constructor from the parent upwards, with the call arguments
/// only. Its result becomes the enclosing `this`. Without a constructor in
/// the chain the instance is a plain runtime object.
pub(super) fn resolve_super_constructor<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    let decls = lowerer.decls;
    let class = lowerer.current_class_or_err(call.span)?;
    let parent = decls
        .classes
        .parent_of(class)
        .ok_or_else(|| LoweringError::NoParentClass {
            class: class.to_string(),
            span: call.span,
        })?;

    let instance = TypeTag::Instance(class.to_string());
    let plan = match nearest_constructor(decls, parent) {
        Some(symbol) => {
            let args = declared_arguments(lowerer, &symbol, Vec::new(), call.args)?;
            CallPlan::direct(Recognizer::SuperConstructor, symbol, args).typed(instance)
        }
        None => {
            lowerer.lower_args(call.args)?;
            allocate_object(lowerer, Recognizer::SuperConstructor, instance, call.span)?
        }
    };
    Ok(plan.rebinding_this())
}

/// `super.m(...)` dispatches from the parent class, never from the class
/// being lowered, so an override does not call itself.
pub(super) fn resolve_super_method<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    member: &'ast MemberExpr<'ast>,
    call: &'ast CallExpr<'ast>,
) -> Result<CallPlan> {
    let decls = lowerer.decls;
    let method = member.property.name;
    let class = lowerer.current_class_or_err(call.span)?;
    let parent = decls
        .classes
        .parent_of(class)
        .ok_or_else(|| LoweringError::NoParentClass {
            class: class.to_string(),
            span: call.span,
        })?;
    let owner = decls
        .classes
        .resolve_method_to_class(parent, method)
        .ok_or_else(|| LoweringError::UnresolvedMethod {
            receiver: format!("super ({})", parent),
            method: method.to_string(),
            span: call.span,
        })?;

    let symbol = format!("{}_{}", owner, method);
    let this = lowerer.this_or_sentinel();
    let args = declared_arguments(lowerer, &symbol, vec![this], call.args)?;
    let returns = returned_function(lowerer, &symbol);
    Ok(CallPlan::direct(Recognizer::SuperMethod, symbol, args).returning(returns))
}
