//! Iterators, generators and async generators.

use crate::prelude::*;

const ITERATOR: ReceiverKind = handle(HandleKind::Iterator);
const GENERATOR: ReceiverKind = handle(HandleKind::Generator);
const ASYNC_GENERATOR: ReceiverKind = handle(HandleKind::AsyncGenerator);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("iteration");

    // =========================================================================
    // Iterator helpers
    // =========================================================================

    m.method(ITERATOR, "next", &[], PTR).tagged(ResultTag::IteratorResult);
    m.method(ITERATOR, "return", &[ANY], PTR)
        .optional(1)
        .tagged(ResultTag::IteratorResult);
    for op in ["map", "filter", "flatMap"] {
        m.method(ITERATOR, op, &[PTR], PTR).tagged(ResultTag::Iterator);
    }
    for op in ["take", "drop"] {
        m.method(ITERATOR, op, &[F64], PTR).tagged(ResultTag::Iterator);
    }
    m.method(ITERATOR, "toArray", &[], PTR).tagged(ResultTag::RuntimeArray);
    m.method(ITERATOR, "forEach", &[PTR], VOID);
    m.method(ITERATOR, "reduce", &[PTR, ANY], ANY).optional(1);
    for op in ["some", "every"] {
        m.method(ITERATOR, op, &[PTR], BOOL);
    }
    m.method(ITERATOR, "find", &[PTR], ANY);
    m.function(ns(Namespace::Iterator), "from", &[ANY], PTR).tagged(ResultTag::Iterator);

    // =========================================================================
    // Generators
    // =========================================================================

    for op in ["next", "return", "throw"] {
        m.method(GENERATOR, op, &[ANY], PTR)
            .optional(1)
            .tagged(ResultTag::IteratorResult);
        m.method(ASYNC_GENERATOR, op, &[ANY], PTR)
            .optional(1)
            .tagged(ResultTag::Promise);
    }

    m
}
