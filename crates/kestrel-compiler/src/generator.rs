//! Generator and async-generator invocation.
//!
//! Calling a generator function never runs its body. The call builds a
//! handle from the body's function reference and an initial resume state of
//! zero, then writes each call argument into the handle's local slots,
//! starting at the configured slot base. Slots below the base belong to the
//! body's own locals.

use kestrel_ast::Argument;
use kestrel_core::{HirType, ResultTag, Span};

use crate::Result;
use crate::function_lowerer::FunctionLowerer;
use crate::plan::{CallPlan, Recognizer};

pub const GENERATOR_FACTORY: &str = "kestrel_generator_function_create";
pub const ASYNC_GENERATOR_FACTORY: &str = "kestrel_async_generator_function_create";
/// `(handle, slot, value)`; shared by both generator kinds.
pub const STORE_LOCAL: &str = "kestrel_generator_store_local";

/// Which kind of generator handle a call constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Sync,
    Async,
}

impl GeneratorKind {
    pub fn factory(&self) -> &'static str {
        match self {
            GeneratorKind::Sync => GENERATOR_FACTORY,
            GeneratorKind::Async => ASYNC_GENERATOR_FACTORY,
        }
    }

    pub fn result_tag(&self) -> ResultTag {
        match self {
            GeneratorKind::Sync => ResultTag::Generator,
            GeneratorKind::Async => ResultTag::AsyncGenerator,
        }
    }

    fn recognizer(&self) -> Recognizer {
        match self {
            GeneratorKind::Sync => Recognizer::Generator,
            GeneratorKind::Async => Recognizer::AsyncGenerator,
        }
    }
}

impl<'a, 'ast> FunctionLowerer<'a, 'ast> {
    pub(crate) fn construct_generator(
        &mut self,
        body: &str,
        kind: GeneratorKind,
        args: &'ast [Argument<'ast>],
        span: Span,
    ) -> Result<CallPlan> {
        self.session.declare_external(
            kind.factory(),
            &[HirType::Ptr, HirType::I64],
            HirType::Ptr,
            false,
            span,
        )?;
        self.session.declare_external(
            STORE_LOCAL,
            &[HirType::Ptr, HirType::I64, HirType::Any],
            HirType::Void,
            false,
            span,
        )?;

        let values = self.lower_args(args)?;
        let slot_base = self.session.config.generator_slot_base;
        Ok(CallPlan::construct(
            kind.recognizer(),
            kind.factory(),
            STORE_LOCAL,
            body,
            slot_base,
            values,
        )
        .tagged(Some(kind.result_tag())))
    }
}
