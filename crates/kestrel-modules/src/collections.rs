//! Map, Set, the weak collections and FinalizationRegistry.

use crate::prelude::*;

const MAP: ReceiverKind = handle(HandleKind::Map);
const SET: ReceiverKind = handle(HandleKind::Set);
const WEAK_MAP: ReceiverKind = handle(HandleKind::WeakMap);
const WEAK_SET: ReceiverKind = handle(HandleKind::WeakSet);
const WEAK_REF: ReceiverKind = handle(HandleKind::WeakRef);
const REGISTRY: ReceiverKind = handle(HandleKind::FinalizationRegistry);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("collections");

    // =========================================================================
    // Map
    // =========================================================================

    m.function(MAP, "constructor", &[ANY], PTR)
        .symbol("kestrel_map_create")
        .optional(1);
    m.method(MAP, "get", &[ANY], ANY);
    m.method(MAP, "set", &[ANY, ANY], PTR);
    m.method(MAP, "has", &[ANY], BOOL);
    m.method(MAP, "delete", &[ANY], BOOL);
    m.method(MAP, "clear", &[], VOID);
    m.method(MAP, "forEach", &[PTR], VOID);
    for op in ["keys", "values", "entries"] {
        m.method(MAP, op, &[], PTR).tagged(ResultTag::Iterator);
    }
    m.function(ns(Namespace::Map), "groupBy", &[ANY, PTR], PTR);

    // =========================================================================
    // Set
    // =========================================================================

    m.function(SET, "constructor", &[ANY], PTR)
        .symbol("kestrel_set_create")
        .optional(1)
        .tagged(ResultTag::Set);
    m.method(SET, "add", &[ANY], PTR).tagged(ResultTag::Set);
    m.method(SET, "has", &[ANY], BOOL);
    m.method(SET, "delete", &[ANY], BOOL);
    m.method(SET, "clear", &[], VOID);
    m.method(SET, "forEach", &[PTR], VOID);
    for op in ["keys", "values", "entries"] {
        m.method(SET, op, &[], PTR).tagged(ResultTag::Iterator);
    }
    for op in ["union", "intersection", "difference", "symmetricDifference"] {
        m.method(SET, op, &[PTR], PTR).tagged(ResultTag::Set);
    }
    for op in ["isSubsetOf", "isSupersetOf", "isDisjointFrom"] {
        m.method(SET, op, &[PTR], BOOL);
    }

    // =========================================================================
    // Weak collections
    // =========================================================================

    m.function(WEAK_MAP, "constructor", &[], PTR).symbol("kestrel_weakmap_create");
    m.method(WEAK_MAP, "get", &[PTR], ANY);
    m.method(WEAK_MAP, "set", &[PTR, ANY], PTR);
    m.method(WEAK_MAP, "has", &[PTR], BOOL);
    m.method(WEAK_MAP, "delete", &[PTR], BOOL);

    m.function(WEAK_SET, "constructor", &[], PTR).symbol("kestrel_weakset_create");
    m.method(WEAK_SET, "add", &[PTR], PTR);
    m.method(WEAK_SET, "has", &[PTR], BOOL);
    m.method(WEAK_SET, "delete", &[PTR], BOOL);

    m.function(WEAK_REF, "constructor", &[PTR], PTR).symbol("kestrel_weakref_create");
    m.method(WEAK_REF, "deref", &[], ANY);

    m.function(REGISTRY, "constructor", &[PTR], PTR)
        .symbol("kestrel_finalization_registry_create");
    m.method(REGISTRY, "register", &[PTR, ANY, PTR], VOID).optional(1);
    m.method(REGISTRY, "unregister", &[PTR], BOOL);

    m
}
