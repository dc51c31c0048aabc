//! Instruction emission for a single function.

use kestrel_core::{ResultTag, Span};
use rustc_hash::FxHashMap;

use super::{Constant, HirFunction, Instruction, ValueId};

/// Emits HIR instructions for one function.
///
/// Each `FunctionBuilder` produces exactly one [`HirFunction`]. Values are
/// numbered in emission order.
pub struct FunctionBuilder {
    name: String,
    param_count: u32,
    has_env: bool,
    instructions: Vec<Instruction>,
    spans: Vec<Span>,
    tags: FxHashMap<ValueId, ResultTag>,
    next_value: u32,
    current_span: Span,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>, param_count: u32, has_env: bool) -> Self {
        Self {
            name: name.into(),
            param_count,
            has_env,
            instructions: Vec::new(),
            spans: Vec::new(),
            tags: FxHashMap::default(),
            next_value: 0,
            current_span: Span::default(),
        }
    }

    /// All subsequent instructions are attributed to `span`.
    pub fn set_span(&mut self, span: Span) {
        self.current_span = span;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_count(&self) -> u32 {
        self.param_count
    }

    pub fn has_env(&self) -> bool {
        self.has_env
    }

    fn fresh(&mut self) -> ValueId {
        let id = ValueId(self.next_value);
        self.next_value += 1;
        id
    }

    fn push(&mut self, inst: Instruction) {
        self.instructions.push(inst);
        self.spans.push(self.current_span);
    }

    // ==========================================================================
    // Values
    // ==========================================================================

    pub fn constant(&mut self, value: Constant) -> ValueId {
        let dest = self.fresh();
        self.push(Instruction::Const { dest, value });
        dest
    }

    pub fn undefined(&mut self) -> ValueId {
        self.constant(Constant::Undefined)
    }

    pub fn int(&mut self, value: i64) -> ValueId {
        self.constant(Constant::Int(value))
    }

    pub fn param(&mut self, index: u32) -> ValueId {
        let dest = self.fresh();
        self.push(Instruction::Param { dest, index });
        dest
    }

    // ==========================================================================
    // Memory
    // ==========================================================================

    pub fn alloca(&mut self, name: impl Into<String>) -> ValueId {
        let dest = self.fresh();
        self.push(Instruction::Alloca {
            dest,
            name: name.into(),
        });
        dest
    }

    pub fn store(&mut self, ptr: ValueId, value: ValueId) {
        self.push(Instruction::Store { ptr, value });
    }

    pub fn load(&mut self, ptr: ValueId) -> ValueId {
        let dest = self.fresh();
        self.push(Instruction::Load { dest, ptr });
        dest
    }

    /// A slot for `name` initialized to `value`.
    pub fn local(&mut self, name: impl Into<String>, value: ValueId) -> ValueId {
        let slot = self.alloca(name);
        self.store(slot, value);
        slot
    }

    pub fn alloc_env(&mut self, record: impl Into<String>) -> ValueId {
        let dest = self.fresh();
        self.push(Instruction::AllocEnv {
            dest,
            record: record.into(),
        });
        dest
    }

    pub fn set_field(&mut self, record: ValueId, index: u32, value: ValueId) {
        self.push(Instruction::SetField {
            record,
            index,
            value,
        });
    }

    pub fn get_field(&mut self, record: ValueId, index: u32) -> ValueId {
        let dest = self.fresh();
        self.push(Instruction::GetField {
            dest,
            record,
            index,
        });
        dest
    }

    // ==========================================================================
    // Control
    // ==========================================================================

    pub fn call(&mut self, callee: impl Into<String>, args: Vec<ValueId>) -> ValueId {
        let dest = self.fresh();
        self.push(Instruction::Call {
            dest,
            callee: callee.into(),
            args,
        });
        dest
    }

    pub fn ret(&mut self, value: Option<ValueId>) {
        self.push(Instruction::Return(value));
    }

    /// Whether the last emitted instruction ends the function.
    pub fn is_terminated(&self) -> bool {
        self.instructions.last().is_some_and(Instruction::is_terminator)
    }

    pub fn tag(&mut self, value: ValueId, tag: ResultTag) {
        if !tag.is_none() {
            self.tags.insert(value, tag);
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn finish(mut self) -> HirFunction {
        if !self.is_terminated() {
            self.ret(None);
        }
        HirFunction {
            name: self.name,
            param_count: self.param_count,
            has_env: self.has_env,
            instructions: self.instructions,
            spans: self.spans,
            tags: self.tags,
        }
    }
}
