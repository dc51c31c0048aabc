//! Arrays, typed arrays, `Array.*` and `ArrayBuffer.*`.

use crate::prelude::*;

const ARRAY: ReceiverKind = prim(PrimitiveKind::Array);
const TYPED: ReceiverKind = prim(PrimitiveKind::TypedArray);
const ARRAY_NS: ReceiverKind = ns(Namespace::Array);
const BUFFER_NS: ReceiverKind = ns(Namespace::ArrayBuffer);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("array");

    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    m.function(ARRAY, "constructor", &[], PTR)
        .symbol("kestrel_array_create")
        .variadic()
        .tagged(ResultTag::RuntimeArray);
    // Element kind code first, then length/source.
    m.function(TYPED, "constructor", &[I64, ANY], PTR)
        .symbol("kestrel_typed_array_create")
        .optional(1);
    m.function(ARRAY_NS, "isArray", &[ANY], BOOL);
    m.function(ARRAY_NS, "from", &[ANY, PTR], PTR)
        .optional(1)
        .tagged(ResultTag::RuntimeArray);
    m.function(ARRAY_NS, "of", &[], PTR)
        .variadic()
        .tagged(ResultTag::RuntimeArray);
    m.function(BUFFER_NS, "isView", &[ANY], BOOL);

    // =========================================================================
    // MUTATION
    // =========================================================================

    m.method(ARRAY, "push", &[], F64).variadic();
    m.method(ARRAY, "unshift", &[], F64).variadic();
    m.method(ARRAY, "pop", &[], ANY);
    m.method(ARRAY, "shift", &[], ANY);
    m.method(ARRAY, "splice", &[F64, F64], PTR)
        .optional(1)
        .variadic()
        .tagged(ResultTag::RuntimeArray);
    m.method(ARRAY, "reverse", &[], PTR).tagged(ResultTag::RuntimeArray);
    m.method(ARRAY, "sort", &[PTR], PTR)
        .optional(1)
        .tagged(ResultTag::RuntimeArray);
    m.method(ARRAY, "fill", &[ANY, F64, F64], PTR)
        .optional(2)
        .tagged(ResultTag::RuntimeArray);

    // =========================================================================
    // QUERIES
    // =========================================================================

    m.method(ARRAY, "at", &[F64], ANY);
    m.method(ARRAY, "indexOf", &[ANY, F64], F64).optional(1);
    m.method(ARRAY, "lastIndexOf", &[ANY, F64], F64).optional(1);
    m.method(ARRAY, "includes", &[ANY, F64], BOOL).optional(1);
    m.method(ARRAY, "join", &[STR], STR).optional(1);
    for op in ["find", "findLast"] {
        m.method(ARRAY, op, &[PTR], ANY);
    }
    for op in ["findIndex", "findLastIndex"] {
        m.method(ARRAY, op, &[PTR], F64);
    }
    for op in ["some", "every"] {
        m.method(ARRAY, op, &[PTR], BOOL);
    }
    m.method(ARRAY, "forEach", &[PTR], VOID);
    m.method(ARRAY, "reduce", &[PTR, ANY], ANY).optional(1);
    m.method(ARRAY, "reduceRight", &[PTR, ANY], ANY).optional(1);

    // =========================================================================
    // COPIES AND ITERATORS
    // =========================================================================

    for op in ["filter", "map", "flatMap"] {
        m.method(ARRAY, op, &[PTR], PTR).tagged(ResultTag::RuntimeArray);
    }
    m.method(ARRAY, "toSorted", &[PTR], PTR)
        .optional(1)
        .tagged(ResultTag::RuntimeArray);
    m.method(ARRAY, "toReversed", &[], PTR).tagged(ResultTag::RuntimeArray);
    m.method(ARRAY, "concat", &[], PTR)
        .variadic()
        .tagged(ResultTag::RuntimeArray);
    m.method(ARRAY, "slice", &[F64, F64], PTR)
        .optional(2)
        .tagged(ResultTag::RuntimeArray);
    m.method(ARRAY, "flat", &[F64], PTR)
        .optional(1)
        .tagged(ResultTag::RuntimeArray);
    m.method(ARRAY, "with", &[F64, ANY], PTR).tagged(ResultTag::RuntimeArray);
    for op in ["keys", "values", "entries"] {
        m.method(ARRAY, op, &[], PTR).tagged(ResultTag::Iterator);
    }

    // =========================================================================
    // TYPED ARRAYS
    // =========================================================================

    m.method(TYPED, "at", &[F64], F64);
    m.method(TYPED, "set", &[PTR, F64], VOID).optional(1);
    m.method(TYPED, "fill", &[F64, F64, F64], PTR).optional(2);
    m.method(TYPED, "subarray", &[F64, F64], PTR).optional(2);
    m.method(TYPED, "slice", &[F64, F64], PTR).optional(2);
    m.method(TYPED, "indexOf", &[F64], F64);
    m.method(TYPED, "includes", &[F64], BOOL);
    m.method(TYPED, "join", &[STR], STR).optional(1);
    m.method(TYPED, "reverse", &[], PTR);
    m.method(TYPED, "sort", &[PTR], PTR).optional(1);
    m.method(TYPED, "map", &[PTR], PTR);
    m.method(TYPED, "forEach", &[PTR], VOID);
    m.method(TYPED, "reduce", &[PTR, ANY], ANY).optional(1);
    for op in ["keys", "values", "entries"] {
        m.method(TYPED, op, &[], PTR).tagged(ResultTag::Iterator);
    }

    m
}

/// Runtime element code of a typed array kind, the first argument of
/// `kestrel_typed_array_create`.
pub fn element_code(kind: TypedArrayKind) -> i64 {
    i64::from(u8::from(kind))
}
