//! Date, BigInt, Symbol, Error, Function, DataView, disposable stacks and
//! `Atomics.*`.

use crate::prelude::*;

const DATE: ReceiverKind = handle(HandleKind::Date);
const BIGINT: ReceiverKind = handle(HandleKind::BigInt);
const SYMBOL: ReceiverKind = handle(HandleKind::Symbol);
const ERROR: ReceiverKind = handle(HandleKind::Error);
const FUNCTION: ReceiverKind = handle(HandleKind::Function);
const DATA_VIEW: ReceiverKind = handle(HandleKind::DataView);
const STACK: ReceiverKind = handle(HandleKind::DisposableStack);
const ASYNC_STACK: ReceiverKind = handle(HandleKind::AsyncDisposableStack);

const DATE_GETTERS: &[&str] = &[
    "getTime",
    "getFullYear",
    "getMonth",
    "getDate",
    "getDay",
    "getHours",
    "getMinutes",
    "getSeconds",
    "getMilliseconds",
    "getUTCFullYear",
    "getUTCMonth",
    "getUTCDate",
    "getUTCDay",
    "getUTCHours",
    "getUTCMinutes",
    "getUTCSeconds",
    "getUTCMilliseconds",
    "getTimezoneOffset",
    "valueOf",
];

const DATE_SETTERS: &[&str] = &[
    "setTime",
    "setFullYear",
    "setMonth",
    "setDate",
    "setHours",
    "setMinutes",
    "setSeconds",
    "setMilliseconds",
];

const DATE_FORMATS: &[&str] = &[
    "toISOString",
    "toJSON",
    "toString",
    "toDateString",
    "toTimeString",
    "toUTCString",
    "toLocaleDateString",
    "toLocaleTimeString",
    "toLocaleString",
];

/// DataView accessors by element type name.
const DATA_VIEW_TYPES: &[&str] = &[
    "Int8", "Uint8", "Int16", "Uint16", "Int32", "Uint32", "Float32", "Float64", "BigInt64",
    "BigUint64",
];

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("builtins");

    // =========================================================================
    // Date
    // =========================================================================

    m.function(DATE, "constructor", &[], PTR)
        .symbol("kestrel_date_create")
        .variadic();
    for &op in DATE_GETTERS {
        m.method(DATE, op, &[], F64);
    }
    for &op in DATE_SETTERS {
        m.method(DATE, op, &[F64], F64).variadic();
    }
    for &op in DATE_FORMATS {
        m.method(DATE, op, &[], STR);
    }
    m.function(ns(Namespace::Date), "now", &[], F64);
    m.function(ns(Namespace::Date), "parse", &[STR], F64);
    m.function(ns(Namespace::Date), "UTC", &[F64], F64).variadic();

    // =========================================================================
    // BigInt and Symbol
    // =========================================================================

    m.method(BIGINT, "toString", &[F64], STR).optional(1);
    m.method(BIGINT, "toLocaleString", &[], STR);
    m.method(BIGINT, "valueOf", &[], PTR).tagged(ResultTag::BigInt);
    for op in ["asIntN", "asUintN"] {
        m.function(ns(Namespace::BigInt), op, &[F64, PTR], PTR)
            .tagged(ResultTag::BigInt);
    }

    m.method(SYMBOL, "toString", &[], STR);
    m.method(SYMBOL, "valueOf", &[], PTR).tagged(ResultTag::Symbol);
    m.function(ns(Namespace::Symbol), "for", &[STR], PTR).tagged(ResultTag::Symbol);
    m.function(ns(Namespace::Symbol), "keyFor", &[PTR], STR);

    // =========================================================================
    // Error and Function
    // =========================================================================

    m.function(ERROR, "constructor", &[STR, ANY], PTR)
        .symbol("kestrel_error_create")
        .optional(2);
    m.method(ERROR, "toString", &[], STR);

    m.method(FUNCTION, "call", &[ANY], ANY).optional(1).variadic();
    m.method(FUNCTION, "apply", &[ANY, PTR], ANY).optional(2);
    m.method(FUNCTION, "bind", &[ANY], PTR).optional(1).variadic();
    m.method(FUNCTION, "toString", &[], STR);

    // =========================================================================
    // DataView
    // =========================================================================

    m.function(DATA_VIEW, "constructor", &[PTR, F64, F64], PTR)
        .symbol("kestrel_dataview_create")
        .optional(2);
    for &ty in DATA_VIEW_TYPES {
        m.method(DATA_VIEW, &format!("get{}", ty), &[F64, BOOL], F64).optional(1);
        m.method(DATA_VIEW, &format!("set{}", ty), &[F64, F64, BOOL], VOID).optional(1);
    }

    // =========================================================================
    // Disposable stacks
    // =========================================================================

    m.function(STACK, "constructor", &[], PTR)
        .symbol("kestrel_disposable_stack_create")
        .tagged(ResultTag::DisposableStack);
    m.method(STACK, "use", &[ANY], ANY);
    m.method(STACK, "adopt", &[ANY, PTR], ANY);
    m.method(STACK, "defer", &[PTR], VOID);
    m.method(STACK, "dispose", &[], VOID);
    m.method(STACK, "move", &[], PTR).tagged(ResultTag::DisposableStack);

    m.function(ASYNC_STACK, "constructor", &[], PTR)
        .symbol("kestrel_async_disposable_stack_create")
        .tagged(ResultTag::AsyncDisposableStack);
    m.method(ASYNC_STACK, "use", &[ANY], ANY);
    m.method(ASYNC_STACK, "adopt", &[ANY, PTR], ANY);
    m.method(ASYNC_STACK, "defer", &[PTR], VOID);
    m.method(ASYNC_STACK, "disposeAsync", &[], PTR).tagged(ResultTag::Promise);
    m.method(ASYNC_STACK, "move", &[], PTR).tagged(ResultTag::AsyncDisposableStack);

    // =========================================================================
    // Atomics
    // =========================================================================

    let atomics = ns(Namespace::Atomics);
    for op in ["add", "sub", "and", "or", "xor", "exchange", "store"] {
        m.function(atomics, op, &[PTR, F64, F64], F64);
    }
    m.function(atomics, "load", &[PTR, F64], F64);
    m.function(atomics, "compareExchange", &[PTR, F64, F64, F64], F64);
    m.function(atomics, "wait", &[PTR, F64, F64, F64], STR).optional(1);
    m.function(atomics, "notify", &[PTR, F64, F64], F64).optional(1);

    m
}
