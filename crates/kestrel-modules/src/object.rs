//! `Object.*` and `Reflect.*`

use crate::prelude::*;

const OBJECT: ReceiverKind = ns(Namespace::Object);
const REFLECT: ReceiverKind = ns(Namespace::Reflect);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("object");

    // =========================================================================
    // Object
    // =========================================================================

    for op in ["keys", "values", "entries", "getOwnPropertyNames", "getOwnPropertySymbols"] {
        m.function(OBJECT, op, &[ANY], PTR).tagged(ResultTag::RuntimeArray);
    }
    m.function(OBJECT, "assign", &[ANY], ANY).variadic();
    for op in ["freeze", "seal", "preventExtensions", "getPrototypeOf"] {
        m.function(OBJECT, op, &[ANY], ANY);
    }
    for op in ["isFrozen", "isSealed", "isExtensible"] {
        m.function(OBJECT, op, &[ANY], BOOL);
    }
    m.function(OBJECT, "create", &[ANY, ANY], ANY).optional(1);
    m.function(OBJECT, "fromEntries", &[ANY], ANY);
    m.function(OBJECT, "setPrototypeOf", &[ANY, ANY], ANY);
    m.function(OBJECT, "defineProperty", &[ANY, STR, ANY], ANY);
    m.function(OBJECT, "defineProperties", &[ANY, ANY], ANY);
    m.function(OBJECT, "getOwnPropertyDescriptor", &[ANY, STR], ANY);
    m.function(OBJECT, "is", &[ANY, ANY], BOOL);
    m.function(OBJECT, "hasOwn", &[ANY, STR], BOOL);
    m.function(OBJECT, "groupBy", &[ANY, PTR], ANY);

    // =========================================================================
    // Reflect
    // =========================================================================

    m.function(REFLECT, "apply", &[PTR, ANY, PTR], ANY);
    m.function(REFLECT, "construct", &[PTR, PTR, PTR], ANY).optional(1);
    m.function(REFLECT, "get", &[ANY, STR, ANY], ANY).optional(1);
    m.function(REFLECT, "set", &[ANY, STR, ANY, ANY], BOOL).optional(1);
    m.function(REFLECT, "has", &[ANY, STR], BOOL);
    m.function(REFLECT, "ownKeys", &[ANY], PTR).tagged(ResultTag::RuntimeArray);
    m.function(REFLECT, "defineProperty", &[ANY, STR, ANY], BOOL);
    m.function(REFLECT, "deleteProperty", &[ANY, STR], BOOL);
    m.function(REFLECT, "getPrototypeOf", &[ANY], ANY);
    m.function(REFLECT, "setPrototypeOf", &[ANY, ANY], BOOL);
    m.function(REFLECT, "isExtensible", &[ANY], BOOL);

    m
}
