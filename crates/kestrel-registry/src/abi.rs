//! The runtime ABI catalog.
//!
//! Standard-library calls are dispatched by a typed key
//! `(ReceiverKind, operation)` instead of string matching in the resolver.
//! Each [`AbiEntry`] says which runtime symbol implements the operation,
//! its HIR signature, whether the receiver is passed as argument 0, and the
//! [`ResultTag`] to attach to the result.
//!
//! The catalog itself is data. It is assembled from [`AbiModule`]s (see the
//! `kestrel-modules` crate) and installed into an [`AbiTable`].

use std::fmt;

use kestrel_core::{HirType, PrimitiveKind, ReceiverKind, RegistrationError, ResultTag};
use rustc_hash::{FxHashMap, FxHashSet};

/// Prefix shared by every runtime function.
pub const RUNTIME_PREFIX: &str = "kestrel_";

/// `kestrel_<stem>_<operation in snake_case>`.
///
/// ```
/// use kestrel_registry::runtime_symbol_name;
///
/// assert_eq!(runtime_symbol_name("string", "toUpperCase"), "kestrel_string_to_upper_case");
/// assert_eq!(runtime_symbol_name("date", "getUTCDate"), "kestrel_date_get_utc_date");
/// assert_eq!(runtime_symbol_name("json", "toJSON"), "kestrel_json_to_json");
/// ```
pub fn runtime_symbol_name(stem: &str, operation: &str) -> String {
    let mut name = String::with_capacity(RUNTIME_PREFIX.len() + stem.len() + operation.len() + 6);
    name.push_str(RUNTIME_PREFIX);
    name.push_str(stem);
    name.push('_');
    push_snake_case(&mut name, operation);
    name
}

fn push_snake_case(out: &mut String, ident: &str) {
    let chars: Vec<char> = ident.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_uppercase() {
            out.push(c);
            continue;
        }
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        let boundary = prev.is_some_and(|p| {
            p.is_ascii_lowercase()
                || p.is_ascii_digit()
                || (p.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase()))
        });
        if boundary {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
}

// ============================================================================
// Entries
// ============================================================================

/// Compile-time evaluation available for literal arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldOp {
    ParseInt,
    ParseFloat,
    ToNumber,
    ToString,
    ToBoolean,
    IsNaN,
    IsFinite,
}

/// Number of script-visible arguments an operation accepts (the injected
/// receiver is not counted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub fn fixed(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }

    pub fn is_variadic(&self) -> bool {
        self.max.is_none()
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", max),
            Some(max) => write!(f, "{} to {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbiEntry {
    pub operation: String,
    pub symbol: String,
    /// Full parameter list of the runtime symbol, receiver first when
    /// `this_injection` is set.
    pub params: Vec<HirType>,
    pub return_type: HirType,
    pub this_injection: bool,
    pub result_tag: ResultTag,
    pub arity: Arity,
    pub fold: Option<FoldOp>,
}

impl AbiEntry {
    /// A free function or namespace member.
    pub fn function(
        operation: impl Into<String>,
        symbol: impl Into<String>,
        params: &[HirType],
        return_type: HirType,
    ) -> Self {
        Self {
            operation: operation.into(),
            symbol: symbol.into(),
            params: params.to_vec(),
            return_type,
            this_injection: false,
            result_tag: ResultTag::None,
            arity: Arity::fixed(params.len()),
            fold: None,
        }
    }

    /// A method whose receiver of type `receiver` is passed first.
    pub fn method(
        operation: impl Into<String>,
        symbol: impl Into<String>,
        receiver: HirType,
        params: &[HirType],
        return_type: HirType,
    ) -> Self {
        let mut full = Vec::with_capacity(params.len() + 1);
        full.push(receiver);
        full.extend_from_slice(params);
        Self {
            operation: operation.into(),
            symbol: symbol.into(),
            params: full,
            return_type,
            this_injection: true,
            result_tag: ResultTag::None,
            arity: Arity::fixed(params.len()),
            fold: None,
        }
    }

    /// The last `n` parameters may be omitted.
    pub fn optional(&mut self, n: usize) -> &mut Self {
        self.arity.min = self.arity.min.saturating_sub(n);
        self
    }

    /// Extra arguments after the declared parameters are allowed.
    pub fn variadic(&mut self) -> &mut Self {
        self.arity.max = None;
        self
    }

    pub fn tagged(&mut self, tag: ResultTag) -> &mut Self {
        self.result_tag = tag;
        self
    }

    pub fn folds(&mut self, op: FoldOp) -> &mut Self {
        self.fold = Some(op);
        self
    }

    pub fn symbol(&mut self, symbol: impl Into<String>) -> &mut Self {
        self.symbol = symbol.into();
        self
    }

    /// Parameters seen by the script, without the injected receiver.
    pub fn script_params(&self) -> &[HirType] {
        if self.this_injection {
            &self.params[1..]
        } else {
            &self.params
        }
    }
}

/// Owned form of an ABI lookup key, used for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiKey {
    pub receiver: ReceiverKind,
    pub operation: String,
}

impl fmt::Display for AbiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.receiver, self.operation)
    }
}

// ============================================================================
// Modules
// ============================================================================

/// A named group of catalog entries, installed as a unit.
#[derive(Debug, Clone)]
pub struct AbiModule {
    pub name: &'static str,
    entries: Vec<(ReceiverKind, AbiEntry)>,
}

impl AbiModule {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, receiver: ReceiverKind, entry: AbiEntry) -> &mut AbiEntry {
        self.entries.push((receiver, entry));
        let last = self.entries.len() - 1;
        &mut self.entries[last].1
    }

    /// Add a non-receiver entry with the conventional symbol name.
    pub fn function(
        &mut self,
        receiver: ReceiverKind,
        operation: &str,
        params: &[HirType],
        return_type: HirType,
    ) -> &mut AbiEntry {
        let symbol = runtime_symbol_name(receiver.stem(), operation);
        self.push(receiver, AbiEntry::function(operation, symbol, params, return_type))
    }

    /// Add a receiver-injected entry with the conventional symbol name.
    pub fn method(
        &mut self,
        receiver: ReceiverKind,
        operation: &str,
        params: &[HirType],
        return_type: HirType,
    ) -> &mut AbiEntry {
        let symbol = runtime_symbol_name(receiver.stem(), operation);
        let receiver_type = match receiver {
            ReceiverKind::Primitive(kind) => kind.hir_type(),
            _ => HirType::Ptr,
        };
        self.push(
            receiver,
            AbiEntry::method(operation, symbol, receiver_type, params, return_type),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (ReceiverKind, &AbiEntry)> {
        self.entries.iter().map(|(receiver, entry)| (*receiver, entry))
    }
}

// ============================================================================
// Table
// ============================================================================

#[derive(Debug, Default)]
pub struct AbiTable {
    entries: FxHashMap<ReceiverKind, FxHashMap<String, AbiEntry>>,
    modules: Vec<&'static str>,
}

impl AbiTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install every entry of `module`. Fails without installing anything
    /// if an entry collides with one already present or repeats a key
    /// within the module.
    pub fn install(&mut self, module: AbiModule) -> Result<(), RegistrationError> {
        let mut seen = FxHashSet::default();
        for (receiver, entry) in &module.entries {
            let fresh = seen.insert((*receiver, entry.operation.as_str()));
            if !fresh || self.lookup(*receiver, &entry.operation).is_some() {
                return Err(RegistrationError::DuplicateAbiEntry {
                    receiver: receiver.to_string(),
                    name: entry.operation.clone(),
                });
            }
        }
        log::trace!("install ABI module {} ({} entries)", module.name, module.entries.len());
        for (receiver, entry) in module.entries {
            self.entries
                .entry(receiver)
                .or_default()
                .insert(entry.operation.clone(), entry);
        }
        self.modules.push(module.name);
        Ok(())
    }

    pub fn lookup(&self, receiver: ReceiverKind, operation: &str) -> Option<&AbiEntry> {
        self.entries.get(&receiver)?.get(operation)
    }

    /// A reserved global free function.
    pub fn global(&self, name: &str) -> Option<&AbiEntry> {
        self.lookup(ReceiverKind::Global, name)
    }

    pub fn is_reserved_global(&self, name: &str) -> bool {
        self.global(name).is_some()
    }

    /// The constructor entry for `receiver` (operation `"constructor"`).
    pub fn constructor(&self, receiver: ReceiverKind) -> Option<&AbiEntry> {
        self.lookup(receiver, "constructor")
    }

    pub fn primitive(&self, kind: PrimitiveKind, operation: &str) -> Option<&AbiEntry> {
        self.lookup(ReceiverKind::Primitive(kind), operation)
    }

    pub fn modules(&self) -> &[&'static str] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
