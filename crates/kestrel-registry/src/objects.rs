//! Methods declared inside object literals.
//!
//! `const counter = { inc() { ... } }` lifts `inc` to a synthesized module
//! function. The table maps the variable holding the literal and the method
//! name to that function.

use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct ObjectLiteralTable {
    methods: FxHashMap<String, FxHashMap<String, String>>,
}

impl ObjectLiteralTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `object.method` is implemented by `function`.
    pub fn register(
        &mut self,
        object: impl Into<String>,
        method: impl Into<String>,
        function: impl Into<String>,
    ) {
        self.methods
            .entry(object.into())
            .or_default()
            .insert(method.into(), function.into());
    }

    pub fn method_function(&self, object: &str, method: &str) -> Option<&str> {
        self.methods.get(object)?.get(method).map(String::as_str)
    }

    pub fn is_object(&self, object: &str) -> bool {
        self.methods.contains_key(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_variable_and_method() {
        let mut table = ObjectLiteralTable::new();
        table.register("counter", "inc", "__obj_counter_inc");
        table.register("counter", "reset", "__obj_counter_reset");

        assert_eq!(table.method_function("counter", "inc"), Some("__obj_counter_inc"));
        assert_eq!(table.method_function("counter", "dec"), None);
        assert_eq!(table.method_function("other", "inc"), None);
        assert!(table.is_object("counter"));
    }
}
