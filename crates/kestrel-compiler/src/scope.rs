//! Lexical scope for the function being lowered.
//!
//! Every local (parameters included) lives in a stack slot. A [`Binding`]
//! records the slot plus what lowering statically knows about the value in
//! it: its [`TypeTag`], a handle [`ResultTag`], and whether it holds a
//! function identity, a closure environment, or a class reference. Call
//! resolution keys several recognizers off this information.

use kestrel_core::{ResultTag, TypeTag};
use rustc_hash::FxHashMap;

use crate::hir::ValueId;

// ============================================================================
// Types
// ============================================================================

/// What a local holds, as far as call resolution is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// Any other value.
    Value,
    /// The identity of a capture-free function.
    FunctionRef(String),
    /// The environment record of a created closure over the named function.
    Closure(String),
    /// A declared class (`const K = Dog`).
    ClassRef(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub slot: ValueId,
    pub kind: BindingKind,
    pub ty: TypeTag,
    pub tag: Option<ResultTag>,
}

impl Binding {
    pub fn value(slot: ValueId, ty: TypeTag) -> Self {
        Self {
            slot,
            kind: BindingKind::Value,
            ty,
            tag: None,
        }
    }

    /// The function this binding calls, for function-ref and closure
    /// bindings.
    pub fn function(&self) -> Option<&str> {
        match &self.kind {
            BindingKind::FunctionRef(name) | BindingKind::Closure(name) => Some(name),
            _ => None,
        }
    }
}

// ============================================================================
// LexicalScope
// ============================================================================

/// Nested block scopes of one function. The outermost frame holds the
/// parameters.
#[derive(Debug)]
pub struct LexicalScope {
    frames: Vec<FxHashMap<String, Binding>>,
}

impl LexicalScope {
    pub fn new() -> Self {
        Self {
            frames: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Leave the innermost block. The function frame is never popped.
    pub fn pop_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Bind `name` in the innermost frame, shadowing any outer binding.
    pub fn declare(&mut self, name: impl Into<String>, binding: Binding) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), binding);
        }
    }

    /// The nearest binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.frames.iter_mut().rev().find_map(|frame| frame.get_mut(name))
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

impl Default for LexicalScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_binding_shadows_and_is_restored() {
        let mut scope = LexicalScope::new();
        scope.declare("x", Binding::value(ValueId(0), TypeTag::Number));

        scope.push_scope();
        scope.declare("x", Binding::value(ValueId(1), TypeTag::String));
        assert_eq!(scope.lookup("x").map(|b| b.slot), Some(ValueId(1)));
        assert_eq!(scope.depth(), 1);

        scope.pop_scope();
        assert_eq!(scope.lookup("x").map(|b| b.slot), Some(ValueId(0)));
        assert_eq!(scope.lookup("x").map(|b| b.ty.clone()), Some(TypeTag::Number));
    }

    #[test]
    fn function_frame_survives_extra_pops() {
        let mut scope = LexicalScope::new();
        scope.declare("p", Binding::value(ValueId(0), TypeTag::Unknown));
        scope.pop_scope();
        scope.pop_scope();
        assert!(scope.is_bound("p"));
    }

    #[test]
    fn assignment_updates_static_info() {
        let mut scope = LexicalScope::new();
        scope.declare("s", Binding::value(ValueId(0), TypeTag::Unknown));
        scope.push_scope();
        if let Some(binding) = scope.lookup_mut("s") {
            binding.ty = TypeTag::Handle(kestrel_core::HandleKind::Set);
        }
        scope.pop_scope();
        assert_eq!(
            scope.lookup("s").unwrap().ty.handle(),
            Some(kestrel_core::HandleKind::Set)
        );
    }

    #[test]
    fn closure_bindings_know_their_function() {
        let binding = Binding {
            slot: ValueId(2),
            kind: BindingKind::Closure("adder".into()),
            ty: TypeTag::Function,
            tag: None,
        };
        assert_eq!(binding.function(), Some("adder"));
        assert_eq!(Binding::value(ValueId(0), TypeTag::Unknown).function(), None);
    }
}
