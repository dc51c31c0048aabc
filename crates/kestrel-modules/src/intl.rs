//! `Intl.*` formatting handles.

use crate::prelude::*;

/// Handles constructed as `new Intl.<Name>(locales?, options?)`.
const FORMATTERS: &[HandleKind] = &[
    HandleKind::NumberFormat,
    HandleKind::DateTimeFormat,
    HandleKind::Collator,
    HandleKind::PluralRules,
    HandleKind::RelativeTimeFormat,
    HandleKind::ListFormat,
    HandleKind::DisplayNames,
    HandleKind::Segmenter,
];

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("intl");

    for &kind in FORMATTERS {
        let receiver = handle(kind);
        m.function(receiver, "constructor", &[ANY, ANY], PTR)
            .symbol(format!("kestrel_{}_create", kind.stem()))
            .optional(2);
        m.method(receiver, "resolvedOptions", &[], PTR);
    }

    let number = handle(HandleKind::NumberFormat);
    m.method(number, "format", &[F64], STR);
    m.method(number, "formatToParts", &[F64], PTR).tagged(ResultTag::RuntimeArray);
    m.method(number, "formatRange", &[F64, F64], STR);

    let date = handle(HandleKind::DateTimeFormat);
    m.method(date, "format", &[PTR], STR).optional(1);
    m.method(date, "formatToParts", &[PTR], PTR)
        .optional(1)
        .tagged(ResultTag::RuntimeArray);
    m.method(date, "formatRange", &[PTR, PTR], STR);

    m.method(handle(HandleKind::Collator), "compare", &[STR, STR], F64);
    m.method(handle(HandleKind::PluralRules), "select", &[F64], STR);

    let relative = handle(HandleKind::RelativeTimeFormat);
    m.method(relative, "format", &[F64, STR], STR);
    m.method(relative, "formatToParts", &[F64, STR], PTR).tagged(ResultTag::RuntimeArray);

    let list = handle(HandleKind::ListFormat);
    m.method(list, "format", &[PTR], STR);
    m.method(list, "formatToParts", &[PTR], PTR).tagged(ResultTag::RuntimeArray);

    m.method(handle(HandleKind::DisplayNames), "of", &[STR], STR);
    m.method(handle(HandleKind::Segmenter), "segment", &[STR], PTR)
        .tagged(ResultTag::Iterator);

    let locale = handle(HandleKind::Locale);
    m.function(locale, "constructor", &[STR, ANY], PTR)
        .symbol("kestrel_intl_locale_create")
        .optional(1);
    for op in ["maximize", "minimize"] {
        m.method(locale, op, &[], PTR);
    }
    m.method(locale, "toString", &[], STR);

    let intl = ns(Namespace::Intl);
    m.function(intl, "getCanonicalLocales", &[ANY], PTR).tagged(ResultTag::RuntimeArray);
    m.function(intl, "supportedValuesOf", &[STR], PTR).tagged(ResultTag::RuntimeArray);

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_registry::AbiTable;

    #[test]
    fn formatter_constructors_use_stems() {
        let mut table = AbiTable::new();
        table.install(module()).unwrap();
        let ctor = table.constructor(handle(HandleKind::NumberFormat)).unwrap();
        assert_eq!(ctor.symbol, "kestrel_intl_number_format_create");
        assert!(!ctor.this_injection);
    }
}
