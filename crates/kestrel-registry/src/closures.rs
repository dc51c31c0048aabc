//! Free-variable captures per function.
//!
//! A function that reads variables from an enclosing scope has a
//! [`ClosureDescriptor`] listing them in order. Lowering passes a pointer to
//! an environment record with one field per captured name as the function's
//! last argument.

use rustc_hash::FxHashMap;

/// Prefix of synthesized environment record type names.
pub const ENV_RECORD_PREFIX: &str = "__closure_env_";

/// Name of the trailing environment parameter.
pub const ENV_PARAM: &str = "__env";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureDescriptor {
    pub function: String,
    pub captures: Vec<String>,
}

impl ClosureDescriptor {
    pub fn new<I, S>(function: impl Into<String>, captures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function: function.into(),
            captures: captures.into_iter().map(Into::into).collect(),
        }
    }

    /// Name of the environment record type for this function.
    pub fn record_name(&self) -> String {
        format!("{}{}", ENV_RECORD_PREFIX, self.function)
    }

    /// Field index of `name`, if it is captured.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.captures.iter().position(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ClosureTable {
    descriptors: FxHashMap<String, ClosureDescriptor>,
}

impl ClosureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record captures for a function. A descriptor with no captures is
    /// dropped, so [`get`](Self::get) only returns non-empty ones.
    pub fn register(&mut self, descriptor: ClosureDescriptor) {
        if descriptor.is_empty() {
            return;
        }
        self.descriptors.insert(descriptor.function.clone(), descriptor);
    }

    pub fn get(&self, function: &str) -> Option<&ClosureDescriptor> {
        self.descriptors.get(function)
    }

    pub fn captures(&self, function: &str) -> bool {
        self.descriptors.contains_key(function)
    }
}
