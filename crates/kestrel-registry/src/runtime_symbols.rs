//! Externally linked runtime functions.
//!
//! Every call that lowers to a runtime function goes through
//! [`RuntimeSymbolTable::get_or_create_external`]. The first request for a
//! name declares the symbol; later requests get the same [`SymbolId`] back.
//! Symbols are never removed.
//!
//! The table is a plain owned map. Lowering is single-threaded; when several
//! lowering jobs share one module, wrap it in [`SharedRuntimeSymbols`] so all
//! registrations are serialized through one lock.

use std::sync::{Arc, Mutex, PoisonError};

use kestrel_core::{HirType, RegistrationError, SymbolHash};
use rustc_hash::FxHashMap;

/// Index of a symbol in its table. Stable for the table's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    External,
}

/// What to do when a name is requested again with a different signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolConflictPolicy {
    /// Keep the first declaration and return it.
    #[default]
    TrustFirst,
    /// Keep the first declaration but report the request as an error.
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSymbol {
    pub name: String,
    pub hash: SymbolHash,
    pub params: Vec<HirType>,
    pub return_type: HirType,
    /// Accepts arguments beyond `params`.
    pub variadic: bool,
    pub linkage: Linkage,
    signature: SymbolHash,
}

impl RuntimeSymbol {
    fn new(name: &str, params: &[HirType], return_type: HirType, variadic: bool) -> Self {
        Self {
            name: name.to_string(),
            hash: SymbolHash::from_external(name),
            params: params.to_vec(),
            return_type,
            variadic,
            linkage: Linkage::External,
            signature: SymbolHash::from_signature(params, return_type),
        }
    }

    /// Whether a request for `params -> return_type` matches this symbol.
    pub fn matches(&self, params: &[HirType], return_type: HirType) -> bool {
        self.signature == SymbolHash::from_signature(params, return_type)
    }
}

#[derive(Debug, Default)]
pub struct RuntimeSymbolTable {
    symbols: Vec<RuntimeSymbol>,
    by_name: FxHashMap<String, SymbolId>,
    policy: SymbolConflictPolicy,
}

impl RuntimeSymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: SymbolConflictPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> SymbolConflictPolicy {
        self.policy
    }

    /// Return the symbol named `name`, declaring it first if needed.
    ///
    /// An existing symbol is returned unchanged. Under
    /// [`SymbolConflictPolicy::Strict`] a request whose signature differs
    /// from the existing declaration fails; the table is not modified.
    pub fn get_or_create_external(
        &mut self,
        name: &str,
        params: &[HirType],
        return_type: HirType,
    ) -> Result<SymbolId, RegistrationError> {
        self.get_or_create(name, params, return_type, false)
    }

    /// Like [`get_or_create_external`](Self::get_or_create_external) for
    /// runtime functions taking trailing extra arguments.
    pub fn get_or_create_variadic(
        &mut self,
        name: &str,
        params: &[HirType],
        return_type: HirType,
    ) -> Result<SymbolId, RegistrationError> {
        self.get_or_create(name, params, return_type, true)
    }

    fn get_or_create(
        &mut self,
        name: &str,
        params: &[HirType],
        return_type: HirType,
        variadic: bool,
    ) -> Result<SymbolId, RegistrationError> {
        if let Some(&id) = self.by_name.get(name) {
            let existing = &self.symbols[id.0 as usize];
            if !existing.matches(params, return_type) {
                match self.policy {
                    SymbolConflictPolicy::TrustFirst => {
                        log::debug!("runtime symbol '{}' re-requested with another signature; keeping first", name);
                    }
                    SymbolConflictPolicy::Strict => {
                        return Err(RegistrationError::SignatureConflict {
                            name: name.to_string(),
                        });
                    }
                }
            }
            return Ok(id);
        }

        let id = SymbolId(self.symbols.len() as u32);
        log::trace!("declare runtime symbol {} {:?} -> {}", name, params, return_type);
        self.symbols
            .push(RuntimeSymbol::new(name, params, return_type, variadic));
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn get(&self, id: SymbolId) -> Option<&RuntimeSymbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn lookup(&self, name: &str) -> Option<&RuntimeSymbol> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RuntimeSymbol> {
        self.symbols.iter()
    }
}

/// A [`RuntimeSymbolTable`] shared between lowering jobs.
#[derive(Debug, Clone, Default)]
pub struct SharedRuntimeSymbols {
    inner: Arc<Mutex<RuntimeSymbolTable>>,
}

impl SharedRuntimeSymbols {
    pub fn new(table: RuntimeSymbolTable) -> Self {
        Self {
            inner: Arc::new(Mutex::new(table)),
        }
    }

    pub fn get_or_create_external(
        &self,
        name: &str,
        params: &[HirType],
        return_type: HirType,
    ) -> Result<SymbolId, RegistrationError> {
        // A panic in another job cannot leave the table half-updated.
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        table.get_or_create_external(name, params, return_type)
    }

    /// Run `f` with exclusive access to the table.
    pub fn with<R>(&self, f: impl FnOnce(&mut RuntimeSymbolTable) -> R) -> R {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut table)
    }

    /// Take the table out if this is the last handle.
    pub fn try_unwrap(self) -> Result<RuntimeSymbolTable, Self> {
        Arc::try_unwrap(self.inner)
            .map(|m| m.into_inner().unwrap_or_else(PoisonError::into_inner))
            .map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_identity() {
        let mut table = RuntimeSymbolTable::new();
        let a = table
            .get_or_create_external("kestrel_set_add", &[HirType::Ptr, HirType::Any], HirType::Ptr)
            .unwrap();
        let b = table
            .get_or_create_external("kestrel_set_add", &[HirType::Ptr, HirType::Any], HirType::Ptr)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn n_requests_m_names_yield_m_symbols() {
        let mut table = RuntimeSymbolTable::new();
        let names = ["a", "b", "a", "c", "b", "a"];
        for name in names {
            table
                .get_or_create_external(name, &[], HirType::Void)
                .unwrap();
        }
        assert_eq!(table.len(), 3);
        let order: Vec<_> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn first_registration_wins_by_default() {
        let mut table = RuntimeSymbolTable::new();
        let first = table
            .get_or_create_external("kestrel_math_abs", &[HirType::F64], HirType::F64)
            .unwrap();
        let second = table
            .get_or_create_external("kestrel_math_abs", &[HirType::I64], HirType::I64)
            .unwrap();
        assert_eq!(first, second);
        let symbol = table.lookup("kestrel_math_abs").unwrap();
        assert_eq!(symbol.params, [HirType::F64]);
        assert_eq!(symbol.return_type, HirType::F64);
        assert_eq!(symbol.linkage, Linkage::External);
    }

    #[test]
    fn strict_policy_rejects_conflicting_signature() {
        let mut table = RuntimeSymbolTable::with_policy(SymbolConflictPolicy::Strict);
        table
            .get_or_create_external("kestrel_math_abs", &[HirType::F64], HirType::F64)
            .unwrap();
        let err = table
            .get_or_create_external("kestrel_math_abs", &[HirType::I64], HirType::I64)
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::SignatureConflict {
                name: "kestrel_math_abs".into()
            }
        );
        // Identical re-request is still fine.
        assert!(
            table
                .get_or_create_external("kestrel_math_abs", &[HirType::F64], HirType::F64)
                .is_ok()
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn variadic_flag_is_recorded() {
        let mut table = RuntimeSymbolTable::new();
        let id = table
            .get_or_create_variadic("kestrel_console_log", &[], HirType::Void)
            .unwrap();
        assert!(table.get(id).unwrap().variadic);
    }

    #[test]
    fn shared_table_serializes_registrations() {
        let shared = SharedRuntimeSymbols::default();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        let name = format!("kestrel_fn_{}", (i * 50 + j) % 60);
                        shared
                            .get_or_create_external(&name, &[HirType::Ptr], HirType::Void)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let table = shared.try_unwrap().unwrap();
        assert_eq!(table.len(), 60);
    }
}
