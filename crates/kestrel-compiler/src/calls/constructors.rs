//! `new` expressions.
//!
//! ```text
//! new Dog(...)              -> Dog_constructor (nearest declared in the chain)
//! new Map() / new URL(...)  -> catalog constructor of the handle kind
//! new Float64Array(n)       -> typed-array constructor, element code first
//! new Intl.NumberFormat()   -> catalog constructor of the Intl handle
//! ```
//!
//! The result is typed so that later member calls on it are dispatched
//! statically.

use kestrel_ast::{Expr, NewExpr};
use kestrel_core::{HandleKind, HirType, LoweringError, PrimitiveKind, ReceiverKind, Span, TypeTag, TypedArrayKind};

use super::{abi_call, declared_arguments};
use crate::Result;
use crate::context::Declarations;
use crate::expr::Operand;
use crate::function_lowerer::{FunctionLowerer, OBJECT_CREATE};
use crate::hir::ValueId;
use crate::plan::{CallPlan, Recognizer};
use crate::scope::BindingKind;

impl<'a, 'ast> FunctionLowerer<'a, 'ast> {
    pub(crate) fn lower_new(&mut self, new: &'ast NewExpr<'ast>) -> Operand {
        self.builder.set_span(new.span);
        let plan = self.resolve_or_placeholder(new.span, |lowerer| resolve_new(lowerer, new));
        self.emit_plan(plan)
    }
}

fn resolve_new<'ast>(lowerer: &mut FunctionLowerer<'_, 'ast>, new: &'ast NewExpr<'ast>) -> Result<CallPlan> {
    match new.callee.unparen() {
        Expr::Ident(ident) => {
            let name = ident.name;
            if let Some(class) = class_named(lowerer, name) {
                return construct_class(lowerer, &class, new);
            }
            if lowerer.is_local(name) {
                return Err(LoweringError::UnresolvedCallee {
                    name: name.to_string(),
                    span: new.span,
                });
            }
            if let Some(kind) = HandleKind::from_constructor(name).filter(|kind| !kind.is_intl()) {
                return construct_builtin(lowerer, ReceiverKind::Handle(kind), TypeTag::Handle(kind), Vec::new(), new);
            }
            if let Some(kind) = TypedArrayKind::from_constructor(name) {
                let code = lowerer.builder.int(i64::from(u8::from(kind)));
                let receiver = ReceiverKind::Primitive(PrimitiveKind::TypedArray);
                return construct_builtin(lowerer, receiver, TypeTag::TypedArray(kind), vec![code], new);
            }
            match name {
                "Array" => construct_builtin(
                    lowerer,
                    ReceiverKind::Primitive(PrimitiveKind::Array),
                    TypeTag::Array,
                    Vec::new(),
                    new,
                ),
                "RegExp" => construct_builtin(
                    lowerer,
                    ReceiverKind::Primitive(PrimitiveKind::Regex),
                    TypeTag::Regex,
                    Vec::new(),
                    new,
                ),
                "Object" => {
                    lowerer.lower_args(new.args)?;
                    allocate_object(lowerer, Recognizer::Constructor, TypeTag::Object, new.span)
                }
                _ => Err(LoweringError::UnresolvedCallee {
                    name: name.to_string(),
                    span: new.span,
                }),
            }
        }
        Expr::Member(member) => {
            let intl = member
                .object
                .as_ident()
                .is_some_and(|ns| ns.name == "Intl" && !lowerer.is_local(ns.name));
            match HandleKind::from_constructor(member.property.name).filter(|kind| intl && kind.is_intl()) {
                Some(kind) => construct_builtin(lowerer, ReceiverKind::Handle(kind), TypeTag::Handle(kind), Vec::new(), new),
                None => Err(LoweringError::UnsupportedCallee { span: new.span }),
            }
        }
        _ => Err(LoweringError::UnsupportedCallee { span: new.span }),
    }
}

/// The class `name` refers to, directly or through a class-reference
/// variable.
fn class_named(lowerer: &FunctionLowerer<'_, '_>, name: &str) -> Option<String> {
    match lowerer.scope.lookup(name) {
        Some(binding) => match &binding.kind {
            BindingKind::ClassRef(class) => Some(class.clone()),
            _ => None,
        },
        None if !lowerer.is_local(name) && lowerer.decls.classes.contains(name) => Some(name.to_string()),
        None => None,
    }
}

/// A class without a constructor of its own runs the nearest inherited one;
/// with none in the chain the instance is a plain runtime object.
fn construct_class<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    class: &str,
    new: &'ast NewExpr<'ast>,
) -> Result<CallPlan> {
    let instance = TypeTag::Instance(class.to_string());
    match nearest_constructor(lowerer.decls, class) {
        Some(symbol) => {
            let args = declared_arguments(lowerer, &symbol, Vec::new(), new.args)?;
            Ok(CallPlan::direct(Recognizer::Constructor, symbol, args).typed(instance))
        }
        None => {
            lowerer.lower_args(new.args)?;
            allocate_object(lowerer, Recognizer::Constructor, instance, new.span)
        }
    }
}

/// `<X>_constructor` for the nearest class from `class` upwards that
/// defines one.
pub(super) fn nearest_constructor(decls: &Declarations<'_>, class: &str) -> Option<String> {
    decls
        .classes
        .ancestry(class)
        .map(|entry| format!("{}_constructor", entry.name))
        .find(|symbol| decls.functions.contains(symbol))
}

fn construct_builtin<'ast>(
    lowerer: &mut FunctionLowerer<'_, 'ast>,
    receiver: ReceiverKind,
    ty: TypeTag,
    prefix: Vec<ValueId>,
    new: &'ast NewExpr<'ast>,
) -> Result<CallPlan> {
    let decls = lowerer.decls;
    let entry = decls
        .abi
        .constructor(receiver)
        .ok_or_else(|| LoweringError::UnresolvedCallee {
            name: format!("new {}", receiver),
            span: new.span,
        })?;
    let plan = abi_call(lowerer, Recognizer::Constructor, receiver, entry, prefix, new.args, new.span)?;
    Ok(plan.typed(ty).tagged(entry.result_tag.into_option()))
}

pub(super) fn allocate_object(
    lowerer: &mut FunctionLowerer<'_, '_>,
    recognizer: Recognizer,
    ty: TypeTag,
    span: Span,
) -> Result<CallPlan> {
    lowerer
        .session
        .declare_external(OBJECT_CREATE, &[], HirType::Ptr, false, span)?;
    Ok(CallPlan::direct(recognizer, OBJECT_CREATE, Vec::new()).typed(ty))
}
