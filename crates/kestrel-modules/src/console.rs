//! `console.*`

use crate::prelude::*;

const CONSOLE: ReceiverKind = ns(Namespace::Console);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("console");

    for op in ["log", "error", "warn", "info", "debug", "trace", "table", "dir"] {
        m.function(CONSOLE, op, &[], VOID).variadic();
    }
    m.function(CONSOLE, "assert", &[BOOL], VOID).variadic();
    for op in ["time", "timeEnd", "timeLog", "count", "countReset", "group"] {
        m.function(CONSOLE, op, &[STR], VOID).optional(1);
    }
    m.function(CONSOLE, "groupEnd", &[], VOID);
    m.function(CONSOLE, "clear", &[], VOID);

    m
}
