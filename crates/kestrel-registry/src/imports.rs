//! Import aliases for builtin modules.
//!
//! ```text
//! import { readFileSync as read } from "fs";  // function alias "read"
//! import * as path from "node:path";          // namespace alias "path"
//! ```

use kestrel_core::BuiltinModule;
use rustc_hash::FxHashMap;

/// The module export a local function alias refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedFunction {
    pub module: BuiltinModule,
    pub export: String,
}

#[derive(Debug, Default)]
pub struct ImportTable {
    functions: FxHashMap<String, ImportedFunction>,
    namespaces: FxHashMap<String, BuiltinModule>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn import_function(
        &mut self,
        alias: impl Into<String>,
        module: BuiltinModule,
        export: impl Into<String>,
    ) {
        self.functions.insert(
            alias.into(),
            ImportedFunction {
                module,
                export: export.into(),
            },
        );
    }

    pub fn import_namespace(&mut self, alias: impl Into<String>, module: BuiltinModule) {
        self.namespaces.insert(alias.into(), module);
    }

    pub fn function(&self, alias: &str) -> Option<&ImportedFunction> {
        self.functions.get(alias)
    }

    pub fn namespace(&self, alias: &str) -> Option<BuiltinModule> {
        self.namespaces.get(alias).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_module_exports() {
        let mut imports = ImportTable::new();
        imports.import_function("read", BuiltinModule::Fs, "readFileSync");
        imports.import_namespace("p", BuiltinModule::Path);

        let read = imports.function("read").unwrap();
        assert_eq!(read.module, BuiltinModule::Fs);
        assert_eq!(read.export, "readFileSync");
        assert_eq!(imports.namespace("p"), Some(BuiltinModule::Path));
        assert_eq!(imports.namespace("read"), None);
    }
}
