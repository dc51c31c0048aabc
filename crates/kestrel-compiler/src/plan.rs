//! Call plans: the resolved description of how to lower one call site.
//!
//! The resolver produces exactly one [`CallPlan`] per call expression and the
//! emitter turns it into instructions immediately. Plans are never stored.

use std::fmt;

use kestrel_core::{ResultTag, TypeTag};

use crate::hir::{Constant, ValueId};

#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget {
    /// A statically known lowered function or runtime symbol.
    Direct(String),
    /// A created closure: the underlying function is known, the environment
    /// comes from the binding and is the last argument.
    Indirect { function: String },
    /// A generator call: build a handle and seed its argument slots.
    HandleConstruct {
        factory: String,
        store_local: String,
        body: String,
        slot_base: u32,
    },
    /// Evaluated at compile time; no call is emitted.
    ConstantFold(Constant),
}

/// Which recognizer produced a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognizer {
    SuperConstructor,
    SuperMethod,
    ImportedFunction,
    ReservedGlobal,
    Namespace,
    ClassStatic,
    Primitive,
    Handle,
    ObjectLiteral,
    Instance,
    Generator,
    AsyncGenerator,
    FunctionRef,
    Closure,
    Declared,
    Constructor,
    Placeholder,
}

impl fmt::Display for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Recognizer::SuperConstructor => "super-constructor",
            Recognizer::SuperMethod => "super-method",
            Recognizer::ImportedFunction => "imported-function",
            Recognizer::ReservedGlobal => "reserved-global",
            Recognizer::Namespace => "namespace",
            Recognizer::ClassStatic => "class-static",
            Recognizer::Primitive => "primitive",
            Recognizer::Handle => "handle",
            Recognizer::ObjectLiteral => "object-literal",
            Recognizer::Instance => "instance",
            Recognizer::Generator => "generator",
            Recognizer::AsyncGenerator => "async-generator",
            Recognizer::FunctionRef => "function-ref",
            Recognizer::Closure => "closure",
            Recognizer::Declared => "declared",
            Recognizer::Constructor => "constructor",
            Recognizer::Placeholder => "placeholder",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallPlan {
    pub recognizer: Recognizer,
    pub target: CallTarget,
    /// Evaluated arguments in call order, receiver and environment included.
    pub args: Vec<ValueId>,
    pub result_tag: Option<ResultTag>,
    /// Static type of the call result.
    pub result_type: TypeTag,
    /// The function the call result refers to, when statically known.
    pub returns_function: Option<String>,
    /// Store the result into the enclosing `this` (`super(...)`).
    pub rebind_this: bool,
}

impl CallPlan {
    pub fn direct(recognizer: Recognizer, symbol: impl Into<String>, args: Vec<ValueId>) -> Self {
        Self::new(recognizer, CallTarget::Direct(symbol.into()), args)
    }

    pub fn indirect(function: impl Into<String>, args: Vec<ValueId>) -> Self {
        Self::new(
            Recognizer::Closure,
            CallTarget::Indirect {
                function: function.into(),
            },
            args,
        )
    }

    /// A generator call seeding `args` into slots from `slot_base` on.
    pub fn construct(
        recognizer: Recognizer,
        factory: impl Into<String>,
        store_local: impl Into<String>,
        body: impl Into<String>,
        slot_base: u32,
        args: Vec<ValueId>,
    ) -> Self {
        let target = CallTarget::HandleConstruct {
            factory: factory.into(),
            store_local: store_local.into(),
            body: body.into(),
            slot_base,
        };
        Self::new(recognizer, target, args)
    }

    pub fn fold(recognizer: Recognizer, value: Constant) -> Self {
        let result_type = value.type_tag();
        Self::new(recognizer, CallTarget::ConstantFold(value), Vec::new()).typed(result_type)
    }

    /// The neutral plan substituted for a call site that failed to resolve.
    pub fn placeholder() -> Self {
        Self::fold(Recognizer::Placeholder, Constant::Undefined)
    }

    fn new(recognizer: Recognizer, target: CallTarget, args: Vec<ValueId>) -> Self {
        Self {
            recognizer,
            target,
            args,
            result_tag: None,
            result_type: TypeTag::Unknown,
            returns_function: None,
            rebind_this: false,
        }
    }

    pub fn tagged(mut self, tag: Option<ResultTag>) -> Self {
        self.result_tag = tag;
        if let Some(tag) = tag {
            let ty = TypeTag::from_result_tag(tag);
            if ty != TypeTag::Unknown {
                self.result_type = ty;
            }
        }
        self
    }

    pub fn typed(mut self, ty: TypeTag) -> Self {
        self.result_type = ty;
        self
    }

    pub fn returning(mut self, function: Option<String>) -> Self {
        if function.is_some() {
            self.result_type = TypeTag::Function;
        }
        self.returns_function = function;
        self
    }

    pub fn rebinding_this(mut self) -> Self {
        self.rebind_this = true;
        self
    }

    /// Symbol called by a direct or indirect plan.
    pub fn callee(&self) -> Option<&str> {
        match &self.target {
            CallTarget::Direct(symbol) => Some(symbol),
            CallTarget::Indirect { function } => Some(function),
            CallTarget::HandleConstruct { factory, .. } => Some(factory),
            CallTarget::ConstantFold(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::HandleKind;

    #[test]
    fn placeholder_folds_to_undefined() {
        let plan = CallPlan::placeholder();
        assert_eq!(plan.target, CallTarget::ConstantFold(Constant::Undefined));
        assert_eq!(plan.recognizer, Recognizer::Placeholder);
        assert!(plan.args.is_empty());
        assert_eq!(plan.callee(), None);
    }

    #[test]
    fn tags_imply_static_type() {
        let plan = CallPlan::direct(Recognizer::Handle, "kestrel_set_union", vec![])
            .tagged(Some(ResultTag::Set));
        assert_eq!(plan.result_type, TypeTag::Handle(HandleKind::Set));

        let plan = CallPlan::direct(Recognizer::Handle, "kestrel_iterator_next", vec![])
            .typed(TypeTag::String)
            .tagged(Some(ResultTag::IteratorResult));
        assert_eq!(plan.result_type, TypeTag::String);
    }
}
