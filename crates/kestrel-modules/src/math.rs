//! `Math.*`

use crate::prelude::*;

const MATH: ReceiverKind = ns(Namespace::Math);

const UNARY: &[&str] = &[
    "abs", "ceil", "floor", "round", "trunc", "sign", "sqrt", "cbrt", "exp", "expm1", "log",
    "log2", "log10", "log1p", "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh",
    "asinh", "acosh", "atanh", "fround", "clz32",
];

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("math");

    for &op in UNARY {
        m.function(MATH, op, &[F64], F64);
    }
    for op in ["atan2", "pow", "imul"] {
        m.function(MATH, op, &[F64, F64], F64);
    }
    for op in ["max", "min", "hypot"] {
        m.function(MATH, op, &[], F64).variadic();
    }
    m.function(MATH, "random", &[], F64);

    m
}
