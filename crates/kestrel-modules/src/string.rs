//! String methods and `String.*`.

use crate::prelude::*;

const STRING: ReceiverKind = prim(PrimitiveKind::String);
const STRING_NS: ReceiverKind = ns(Namespace::String);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("string");

    // =========================================================================
    // NO ARGUMENTS
    // =========================================================================

    for op in [
        "toUpperCase",
        "toLowerCase",
        "toLocaleUpperCase",
        "toLocaleLowerCase",
        "trim",
        "trimStart",
        "trimEnd",
        "toString",
        "valueOf",
        "toWellFormed",
    ] {
        m.method(STRING, op, &[], STR);
    }
    m.method(STRING, "isWellFormed", &[], BOOL);

    // =========================================================================
    // CHARACTER ACCESS
    // =========================================================================

    m.method(STRING, "charAt", &[F64], STR).optional(1);
    m.method(STRING, "at", &[F64], STR);
    m.method(STRING, "charCodeAt", &[F64], F64).optional(1);
    m.method(STRING, "codePointAt", &[F64], F64);

    // =========================================================================
    // SEARCH
    // =========================================================================

    m.method(STRING, "indexOf", &[STR, F64], F64).optional(1);
    m.method(STRING, "lastIndexOf", &[STR, F64], F64).optional(1);
    for op in ["includes", "startsWith", "endsWith"] {
        m.method(STRING, op, &[STR, F64], BOOL).optional(1);
    }
    m.method(STRING, "search", &[ANY], F64);
    m.method(STRING, "match", &[ANY], PTR).tagged(ResultTag::RuntimeArray);
    m.method(STRING, "matchAll", &[ANY], PTR).tagged(ResultTag::Iterator);
    m.method(STRING, "localeCompare", &[STR], F64);

    // =========================================================================
    // SLICING AND BUILDING
    // =========================================================================

    m.method(STRING, "slice", &[F64, F64], STR).optional(2);
    m.method(STRING, "substring", &[F64, F64], STR).optional(1);
    m.method(STRING, "substr", &[F64, F64], STR).optional(1);
    m.method(STRING, "padStart", &[F64, STR], STR).optional(1);
    m.method(STRING, "padEnd", &[F64, STR], STR).optional(1);
    m.method(STRING, "repeat", &[F64], STR);
    m.method(STRING, "replace", &[ANY, ANY], STR);
    m.method(STRING, "replaceAll", &[ANY, ANY], STR);
    m.method(STRING, "concat", &[], STR).variadic();
    m.method(STRING, "normalize", &[STR], STR).optional(1);
    m.method(STRING, "split", &[ANY, F64], PTR)
        .optional(2)
        .tagged(ResultTag::RuntimeArray);

    // =========================================================================
    // String namespace
    // =========================================================================

    m.function(STRING_NS, "fromCharCode", &[], STR).variadic();
    m.function(STRING_NS, "fromCodePoint", &[], STR).variadic();
    m.function(STRING_NS, "raw", &[PTR], STR).variadic();

    m
}
