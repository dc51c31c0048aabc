//! Lowering options.

use kestrel_registry::SymbolConflictPolicy;

/// Options for one lowering session.
///
/// ```
/// use kestrel_compiler::LoweringConfig;
/// use kestrel_registry::SymbolConflictPolicy;
///
/// let config = LoweringConfig::new()
///     .with_symbol_conflicts(SymbolConflictPolicy::Strict)
///     .with_fold_constants(false);
/// assert_eq!(config.generator_slot_base, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoweringConfig {
    /// First generator local slot that receives call arguments. Lower slots
    /// belong to the generator body.
    pub generator_slot_base: u32,
    /// Evaluate foldable reserved globals over literal arguments at compile
    /// time.
    pub fold_constants: bool,
    pub symbol_conflicts: SymbolConflictPolicy,
    /// Fill parameters that have neither an argument nor a default with
    /// `undefined`.
    pub pad_missing_arguments: bool,
}

impl LoweringConfig {
    pub const DEFAULT_GENERATOR_SLOT_BASE: u32 = 100;

    pub fn new() -> Self {
        Self {
            generator_slot_base: Self::DEFAULT_GENERATOR_SLOT_BASE,
            fold_constants: true,
            symbol_conflicts: SymbolConflictPolicy::TrustFirst,
            pad_missing_arguments: true,
        }
    }

    pub fn with_generator_slot_base(mut self, base: u32) -> Self {
        self.generator_slot_base = base;
        self
    }

    pub fn with_fold_constants(mut self, fold: bool) -> Self {
        self.fold_constants = fold;
        self
    }

    pub fn with_symbol_conflicts(mut self, policy: SymbolConflictPolicy) -> Self {
        self.symbol_conflicts = policy;
        self
    }

    pub fn with_pad_missing_arguments(mut self, pad: bool) -> Self {
        self.pad_missing_arguments = pad;
        self
    }
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self::new()
    }
}
