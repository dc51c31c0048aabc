//! Signatures of functions defined in the module being lowered.

use kestrel_core::{FunctionFlags, RegistrationError};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    /// Lowered name (`<Class>_<method>` for class members).
    pub name: String,
    pub params: Vec<String>,
    pub flags: FunctionFlags,
}

impl FunctionEntry {
    pub fn new<I, S>(name: impl Into<String>, params: I, flags: FunctionFlags) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            flags,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Default)]
pub struct FunctionTable {
    functions: FxHashMap<String, FunctionEntry>,
    order: Vec<String>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: FunctionEntry) -> Result<(), RegistrationError> {
        if self.functions.contains_key(&entry.name) {
            return Err(RegistrationError::DuplicateFunction(entry.name));
        }
        self.order.push(entry.name.clone());
        self.functions.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn is_generator(&self, name: &str) -> bool {
        self.get(name).is_some_and(|f| f.flags.is_generator())
    }

    pub fn is_async_generator(&self, name: &str) -> bool {
        self.get(name).is_some_and(|f| f.flags.is_async_generator())
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionEntry> {
        self.order.iter().filter_map(|name| self.functions.get(name))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
