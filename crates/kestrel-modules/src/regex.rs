//! Regular expressions.

use crate::prelude::*;

const REGEX: ReceiverKind = prim(PrimitiveKind::Regex);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("regex");
    m.function(REGEX, "constructor", &[STR, STR], PTR)
        .symbol("kestrel_regex_create")
        .optional(1);
    m.method(REGEX, "test", &[STR], BOOL);
    m.method(REGEX, "exec", &[STR], PTR)
        .tagged(ResultTag::RuntimeArray);
    m.method(REGEX, "toString", &[], STR);
    m
}
