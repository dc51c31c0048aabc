//! URL, URLSearchParams, TextEncoder/TextDecoder, Headers and Response.

use crate::prelude::*;

const URL: ReceiverKind = handle(HandleKind::Url);
const PARAMS: ReceiverKind = handle(HandleKind::UrlSearchParams);
const ENCODER: ReceiverKind = handle(HandleKind::TextEncoder);
const DECODER: ReceiverKind = handle(HandleKind::TextDecoder);
const HEADERS: ReceiverKind = handle(HandleKind::Headers);
const RESPONSE: ReceiverKind = handle(HandleKind::Response);

pub fn module() -> AbiModule {
    let mut m = AbiModule::new("web");

    m.function(URL, "constructor", &[STR, STR], PTR)
        .symbol("kestrel_url_create")
        .optional(1);
    m.method(URL, "toString", &[], STR);
    m.method(URL, "toJSON", &[], STR);

    m.function(PARAMS, "constructor", &[ANY], PTR)
        .symbol("kestrel_url_search_params_create")
        .optional(1);
    m.method(PARAMS, "get", &[STR], ANY);
    m.method(PARAMS, "getAll", &[STR], PTR).tagged(ResultTag::RuntimeArray);
    m.method(PARAMS, "has", &[STR], BOOL);
    m.method(PARAMS, "set", &[STR, STR], VOID);
    m.method(PARAMS, "append", &[STR, STR], VOID);
    m.method(PARAMS, "delete", &[STR], VOID);
    m.method(PARAMS, "sort", &[], VOID);
    m.method(PARAMS, "toString", &[], STR);
    m.method(PARAMS, "forEach", &[PTR], VOID);
    for op in ["keys", "values", "entries"] {
        m.method(PARAMS, op, &[], PTR).tagged(ResultTag::Iterator);
    }

    m.function(ENCODER, "constructor", &[], PTR).symbol("kestrel_text_encoder_create");
    m.method(ENCODER, "encode", &[STR], PTR)
        .optional(1)
        .tagged(ResultTag::TypedArray(TypedArrayKind::Uint8));
    m.method(ENCODER, "encodeInto", &[STR, PTR], PTR);

    m.function(DECODER, "constructor", &[STR, ANY], PTR)
        .symbol("kestrel_text_decoder_create")
        .optional(2);
    m.method(DECODER, "decode", &[PTR, ANY], STR).optional(2);

    m.function(HEADERS, "constructor", &[ANY], PTR)
        .symbol("kestrel_headers_create")
        .optional(1);
    m.method(HEADERS, "get", &[STR], ANY);
    m.method(HEADERS, "has", &[STR], BOOL);
    m.method(HEADERS, "set", &[STR, STR], VOID);
    m.method(HEADERS, "append", &[STR, STR], VOID);
    m.method(HEADERS, "delete", &[STR], VOID);
    m.method(HEADERS, "forEach", &[PTR], VOID);
    for op in ["keys", "values", "entries"] {
        m.method(HEADERS, op, &[], PTR).tagged(ResultTag::Iterator);
    }

    m.function(RESPONSE, "constructor", &[ANY, ANY], PTR)
        .symbol("kestrel_response_create")
        .optional(2)
        .tagged(ResultTag::Response);
    for op in ["text", "json", "arrayBuffer", "blob", "formData"] {
        m.method(RESPONSE, op, &[], PTR).tagged(ResultTag::Promise);
    }
    m.method(RESPONSE, "clone", &[], PTR).tagged(ResultTag::Response);

    m
}
