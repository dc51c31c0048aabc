//! Turning a [`CallPlan`] into instructions.

use kestrel_core::TypeTag;

use crate::expr::{Operand, Referent};
use crate::function_lowerer::FunctionLowerer;
use crate::hir::{Constant, ValueId};
use crate::plan::{CallPlan, CallTarget};

impl<'a, 'ast> FunctionLowerer<'a, 'ast> {
    /// Emit `plan` at the current position and return its result.
    pub(crate) fn emit_plan(&mut self, plan: CallPlan) -> Operand {
        let CallPlan {
            target,
            args,
            result_tag,
            result_type,
            returns_function,
            rebind_this,
            ..
        } = plan;

        let value = match target {
            CallTarget::Direct(symbol) => self.builder.call(symbol, args),
            CallTarget::Indirect { function } => self.builder.call(function, args),
            CallTarget::HandleConstruct {
                factory,
                store_local,
                body,
                slot_base,
            } => self.emit_handle_construct(&factory, &store_local, body, slot_base, args),
            CallTarget::ConstantFold(value) => self.builder.constant(value),
        };

        if let Some(tag) = result_tag {
            self.builder.tag(value, tag);
        }
        if rebind_this {
            if let Some(slot) = self.this_slot {
                self.builder.store(slot, value);
            }
        }

        Operand {
            value,
            ty: if returns_function.is_some() { TypeTag::Function } else { result_type },
            tag: result_tag,
            refers_to: returns_function.map(Referent::Function),
        }
    }

    /// `handle = factory(body, 0)`, then one `store_local(handle, base + i,
    /// arg_i)` per argument.
    fn emit_handle_construct(
        &mut self,
        factory: &str,
        store_local: &str,
        body: String,
        slot_base: u32,
        args: Vec<ValueId>,
    ) -> ValueId {
        let body = self.builder.constant(Constant::FunctionRef(body));
        let state = self.builder.int(0);
        let handle = self.builder.call(factory, vec![body, state]);
        for (offset, arg) in args.into_iter().enumerate() {
            let slot = self.builder.int(i64::from(slot_base) + offset as i64);
            self.builder.call(store_local, vec![handle, slot, arg]);
        }
        handle
    }
}
