//! Reserved global functions.
//!
//! The conversion functions carry a [`FoldOp`] so calls with literal
//! arguments are evaluated at compile time.

use crate::prelude::*;

const GLOBAL: ReceiverKind = ReceiverKind::Global;

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("globals");

    // =========================================================================
    // CONVERSIONS (foldable)
    // =========================================================================

    m.function(GLOBAL, "parseInt", &[ANY, F64], F64)
        .optional(1)
        .folds(FoldOp::ParseInt);
    m.function(GLOBAL, "parseFloat", &[ANY], F64)
        .folds(FoldOp::ParseFloat);
    m.function(GLOBAL, "Number", &[ANY], F64)
        .optional(1)
        .symbol("kestrel_global_to_number")
        .folds(FoldOp::ToNumber);
    m.function(GLOBAL, "String", &[ANY], STR)
        .optional(1)
        .symbol("kestrel_global_to_string")
        .folds(FoldOp::ToString);
    m.function(GLOBAL, "Boolean", &[ANY], BOOL)
        .optional(1)
        .symbol("kestrel_global_to_boolean")
        .folds(FoldOp::ToBoolean);
    m.function(GLOBAL, "isNaN", &[ANY], BOOL)
        .symbol("kestrel_global_is_nan")
        .folds(FoldOp::IsNaN);
    m.function(GLOBAL, "isFinite", &[ANY], BOOL)
        .folds(FoldOp::IsFinite);

    // =========================================================================
    // URI CODING
    // =========================================================================

    for op in ["encodeURIComponent", "decodeURIComponent", "encodeURI", "decodeURI"] {
        m.function(GLOBAL, op, &[STR], STR);
    }

    // =========================================================================
    // SCHEDULING
    // =========================================================================

    m.function(GLOBAL, "setTimeout", &[PTR, F64], F64)
        .optional(1)
        .variadic();
    m.function(GLOBAL, "setInterval", &[PTR, F64], F64)
        .optional(1)
        .variadic();
    m.function(GLOBAL, "clearTimeout", &[F64], VOID).optional(1);
    m.function(GLOBAL, "clearInterval", &[F64], VOID).optional(1);
    m.function(GLOBAL, "queueMicrotask", &[PTR], VOID);

    // =========================================================================
    // OTHER
    // =========================================================================

    m.function(GLOBAL, "structuredClone", &[ANY, ANY], ANY).optional(1);
    m.function(GLOBAL, "fetch", &[STR, ANY], PTR)
        .optional(1)
        .tagged(ResultTag::Promise);
    m.function(GLOBAL, "Symbol", &[STR], PTR)
        .optional(1)
        .symbol("kestrel_symbol_create")
        .tagged(ResultTag::Symbol);
    m.function(GLOBAL, "BigInt", &[ANY], PTR)
        .symbol("kestrel_bigint_create")
        .tagged(ResultTag::BigInt);

    m
}
