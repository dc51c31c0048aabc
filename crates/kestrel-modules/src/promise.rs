//! `Promise.*` and promise handles.
//!
//! Everything that yields a promise is tagged so `.then(...).catch(...)`
//! chains keep resolving against the promise methods.

use crate::prelude::*;

const PROMISE: ReceiverKind = handle(HandleKind::Promise);
const PROMISE_NS: ReceiverKind = ns(Namespace::Promise);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("promise");

    m.function(PROMISE, "constructor", &[PTR], PTR)
        .symbol("kestrel_promise_create")
        .tagged(ResultTag::Promise);
    m.method(PROMISE, "then", &[PTR, PTR], PTR)
        .optional(1)
        .tagged(ResultTag::Promise);
    m.method(PROMISE, "catch", &[PTR], PTR).tagged(ResultTag::Promise);
    m.method(PROMISE, "finally", &[PTR], PTR).tagged(ResultTag::Promise);

    m.function(PROMISE_NS, "resolve", &[ANY], PTR)
        .optional(1)
        .tagged(ResultTag::Promise);
    m.function(PROMISE_NS, "reject", &[ANY], PTR)
        .optional(1)
        .tagged(ResultTag::Promise);
    for op in ["all", "allSettled", "any", "race"] {
        m.function(PROMISE_NS, op, &[PTR], PTR).tagged(ResultTag::Promise);
    }
    m.function(PROMISE_NS, "withResolvers", &[], PTR);
    m.function(PROMISE_NS, "try", &[PTR], PTR)
        .variadic()
        .tagged(ResultTag::Promise);

    m
}
