//! The runtime ABI catalog.
//!
//! Each module returns an [`AbiModule`] describing how one area of the
//! standard library maps onto runtime functions:
//!
//! - **globals** - reserved global functions (`parseInt`, `setTimeout`, ...)
//! - **console** - `console.*`
//! - **math** - `Math.*`
//! - **json** - `JSON.*`
//! - **object** - `Object.*` and `Reflect.*`
//! - **string** - string methods and `String.*`
//! - **number** - number/boolean methods and `Number.*`
//! - **array** - arrays, typed arrays, `Array.*`, `ArrayBuffer.*`
//! - **regex** - regular expressions
//! - **collections** - Map, Set, weak collections, FinalizationRegistry
//! - **promise** - `Promise.*` and promise handles
//! - **iteration** - iterators and generators
//! - **builtins** - Date, BigInt, Symbol, Error, Function, DataView,
//!   disposable stacks, `Atomics.*`
//! - **web** - URL, URLSearchParams, text codecs, Headers, Response
//! - **intl** - `Intl.*` formatting handles
//! - **node** - builtin modules (`fs`, `path`, `os`, ...)
//!
//! ```
//! use kestrel_core::{Namespace, ReceiverKind};
//!
//! let table = kestrel_modules::standard_library().unwrap();
//! let sqrt = table.lookup(ReceiverKind::Namespace(Namespace::Math), "sqrt").unwrap();
//! assert_eq!(sqrt.symbol, "kestrel_math_sqrt");
//! ```

use kestrel_core::RegistrationError;
use kestrel_registry::{AbiModule, AbiTable};

pub mod array;
pub mod builtins;
pub mod collections;
pub mod console;
pub mod globals;
pub mod intl;
pub mod iteration;
pub mod json;
pub mod math;
pub mod node;
pub mod number;
pub mod object;
pub mod promise;
pub mod regex;
pub mod string;
pub mod web;

/// Every catalog module, in installation order.
pub fn modules() -> Vec<AbiModule> {
    vec![
        globals::module(),
        console::module(),
        math::module(),
        json::module(),
        object::module(),
        string::module(),
        number::module(),
        array::module(),
        regex::module(),
        collections::module(),
        promise::module(),
        iteration::module(),
        builtins::module(),
        web::module(),
        intl::module(),
        node::module(),
    ]
}

/// An [`AbiTable`] with the whole catalog installed.
pub fn standard_library() -> Result<AbiTable, RegistrationError> {
    let mut table = AbiTable::new();
    for module in modules() {
        table.install(module)?;
    }
    Ok(table)
}

/// Shorthands shared by the catalog modules.
mod prelude {
    pub(crate) use kestrel_core::{
        BuiltinModule, HandleKind, HirType, Namespace, PrimitiveKind, ReceiverKind, ResultTag,
        TypedArrayKind,
    };
    pub(crate) use kestrel_registry::{AbiModule, FoldOp};

    pub(crate) const ANY: HirType = HirType::Any;
    pub(crate) const BOOL: HirType = HirType::Bool;
    pub(crate) const F64: HirType = HirType::F64;
    pub(crate) const I64: HirType = HirType::I64;
    pub(crate) const PTR: HirType = HirType::Ptr;
    pub(crate) const STR: HirType = HirType::String;
    pub(crate) const VOID: HirType = HirType::Void;

    pub(crate) const fn ns(namespace: Namespace) -> ReceiverKind {
        ReceiverKind::Namespace(namespace)
    }

    pub(crate) const fn handle(kind: HandleKind) -> ReceiverKind {
        ReceiverKind::Handle(kind)
    }

    pub(crate) const fn prim(kind: PrimitiveKind) -> ReceiverKind {
        ReceiverKind::Primitive(kind)
    }

    pub(crate) const fn builtin(module: BuiltinModule) -> ReceiverKind {
        ReceiverKind::Module(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::{HandleKind, ReceiverKind};

    #[test]
    fn catalog_installs_without_collisions() {
        let table = standard_library().unwrap();
        assert_eq!(table.modules().len(), modules().len());
        assert!(table.len() > 300);
    }

    #[test]
    fn every_handle_kind_has_methods() {
        let table = standard_library().unwrap();
        let modules = modules();
        for kind in HandleKind::ALL {
            let has_any = modules
                .iter()
                .flat_map(|m| m.entries())
                .any(|(receiver, _)| receiver == ReceiverKind::Handle(kind));
            assert!(has_any, "no entries for {:?}", kind);
        }
        assert!(table.constructor(ReceiverKind::Handle(HandleKind::Set)).is_some());
    }

    #[test]
    fn receiver_entries_inject_this() {
        for module in modules() {
            for (receiver, entry) in module.entries() {
                let expects_receiver =
                    matches!(receiver, ReceiverKind::Primitive(_) | ReceiverKind::Handle(_))
                        && entry.operation != "constructor";
                assert_eq!(
                    entry.this_injection, expects_receiver,
                    "{}: {}",
                    module.name, entry.operation
                );
            }
        }
    }
}
