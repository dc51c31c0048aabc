//! `JSON.*`

use crate::prelude::*;

const JSON: ReceiverKind = ns(Namespace::Json);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("json");
    m.function(JSON, "parse", &[STR, PTR], ANY).optional(1);
    m.function(JSON, "stringify", &[ANY, ANY, ANY], STR).optional(2);
    m
}
