//! Closure environments.
//!
//! A function with a [`ClosureDescriptor`] takes one extra, final parameter:
//! an environment record with one field per captured name, in descriptor
//! order. The record is populated in one of two places:
//!
//! - when a closure is created (the function is used as a value), from the
//!   scope active at creation; the call site later only forwards it;
//! - when the function is called directly by name, from the caller's scope
//!   at the call.
//!
//! The two are kept separate: a created closure never re-reads its captures.

use kestrel_core::{LoweringError, Span};
use kestrel_registry::ClosureDescriptor;

use crate::Result;
use crate::function_lowerer::FunctionLowerer;
use crate::hir::ValueId;

impl<'a, 'ast> FunctionLowerer<'a, 'ast> {
    /// Allocate an environment record for `descriptor` and copy the current
    /// value of every captured name into it.
    ///
    /// A captured name with no binding in scope means the closure tables and
    /// the code disagree; that is fatal to the unit.
    pub(crate) fn populate_env(&mut self, descriptor: &ClosureDescriptor, span: Span) -> Result<ValueId> {
        let record = self.session.module.declare_env_record(descriptor).name.clone();

        let mut values = Vec::with_capacity(descriptor.captures.len());
        for name in &descriptor.captures {
            let value = self
                .read_binding(name)
                .ok_or_else(|| LoweringError::MissingCapturedBinding {
                    function: descriptor.function.clone(),
                    name: name.clone(),
                    span,
                })?;
            values.push(value);
        }

        let env = self.builder.alloc_env(record.as_str());
        for (index, value) in values.into_iter().enumerate() {
            self.builder.set_field(env, index as u32, value);
        }
        log::trace!(
            "populate {} for {} with {:?}",
            record,
            descriptor.function,
            descriptor.captures
        );
        Ok(env)
    }

    /// Make `args[offset..]` exactly as long as `function`'s declared
    /// parameter list: extras are dropped, missing ones become `undefined`.
    /// Keeps an appended environment in the last parameter position.
    pub(crate) fn fit_to_arity(&mut self, function: &str, args: &mut Vec<ValueId>, offset: usize) {
        let decls = self.decls;
        let Some(entry) = decls.functions.get(function) else {
            return;
        };
        let expected = offset + entry.arity();
        if args.len() > expected {
            log::debug!(
                "{}: dropping {} extra argument(s)",
                function,
                args.len() - expected
            );
            args.truncate(expected);
        }
        while args.len() < expected {
            let undefined = self.builder.undefined();
            args.push(undefined);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoweringConfig;
    use crate::context::{Declarations, LoweringSession};
    use crate::hir::Instruction;
    use crate::scope::Binding;
    use bumpalo::Bump;
    use kestrel_ast::AstBuilder;
    use kestrel_core::{FunctionFlags, TypeTag};

    #[test]
    fn env_fields_follow_descriptor_order() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let main = ast.function("main", &[], &[], FunctionFlags::empty());
        let decls = Declarations::new();
        let mut session = LoweringSession::new("test", LoweringConfig::default());
        let mut lowerer = FunctionLowerer::new(&decls, &mut session, main);

        let a = lowerer.builder.int(1);
        let slot_a = lowerer.builder.local("a", a);
        lowerer.scope.declare("a", Binding::value(slot_a, TypeTag::Number));
        let b = lowerer.builder.int(2);
        let slot_b = lowerer.builder.local("b", b);
        lowerer.scope.declare("b", Binding::value(slot_b, TypeTag::Number));

        let descriptor = ClosureDescriptor::new("f", ["b", "a"]);
        let env = lowerer.populate_env(&descriptor, Span::default()).unwrap();
        let fields: Vec<(u32, ValueId)> = lowerer
            .builder
            .instructions()
            .iter()
            .filter_map(|inst| match inst {
                Instruction::SetField { record, index, value } if *record == env => Some((*index, *value)),
                _ => None,
            })
            .collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, 0);
        assert_eq!(fields[1].0, 1);
    }

    #[test]
    fn missing_capture_is_fatal() {
        let arena = Bump::new();
        let ast = AstBuilder::new(&arena);
        let main = ast.function("main", &[], &[], FunctionFlags::empty());
        let decls = Declarations::new();
        let mut session = LoweringSession::new("test", LoweringConfig::default());
        let mut lowerer = FunctionLowerer::new(&decls, &mut session, main);

        let descriptor = ClosureDescriptor::new("f", ["nowhere"]);
        let err = lowerer.populate_env(&descriptor, Span::point(3, 1)).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, LoweringError::MissingCapturedBinding { ref name, .. } if name == "nowhere"));
    }
}
