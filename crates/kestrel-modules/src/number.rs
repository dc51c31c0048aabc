//! Number and boolean methods, `Number.*`.

use crate::prelude::*;

const NUMBER: ReceiverKind = prim(PrimitiveKind::Number);
const BOOLEAN: ReceiverKind = prim(PrimitiveKind::Boolean);
const NUMBER_NS: ReceiverKind = ns(Namespace::Number);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("number");

    m.method(NUMBER, "toFixed", &[F64], STR).optional(1);
    m.method(NUMBER, "toPrecision", &[F64], STR).optional(1);
    m.method(NUMBER, "toExponential", &[F64], STR).optional(1);
    m.method(NUMBER, "toString", &[F64], STR).optional(1);
    m.method(NUMBER, "toLocaleString", &[STR, ANY], STR).optional(2);
    m.method(NUMBER, "valueOf", &[], F64);

    m.method(BOOLEAN, "toString", &[], STR);
    m.method(BOOLEAN, "valueOf", &[], BOOL);

    for op in ["isInteger", "isSafeInteger", "isFinite"] {
        m.function(NUMBER_NS, op, &[ANY], BOOL);
    }
    m.function(NUMBER_NS, "isNaN", &[ANY], BOOL)
        .symbol("kestrel_number_is_nan");
    m.function(NUMBER_NS, "parseFloat", &[ANY], F64);
    m.function(NUMBER_NS, "parseInt", &[ANY, F64], F64).optional(1);

    m
}
