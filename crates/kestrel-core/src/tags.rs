//! Static classification of receivers and call results.
//!
//! The call resolver never inspects runtime values. Everything it knows about
//! a receiver is one of the tags in this module:
//!
//! - [`TypeTag`]: the static type of an operand (primitive, handle, class
//!   instance, ...), used by the receiver-typed recognizers.
//! - [`ResultTag`]: a marker attached to a call result so a chained call
//!   (`p.then(...).then(...)`) re-enters the right recognizer.
//! - [`ReceiverKind`]: the first half of an ABI key.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::HirType;

// ============================================================================
// Typed arrays
// ============================================================================

/// Element kind of a typed array. The discriminant is the element code the
/// runtime expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TypedArrayKind {
    Int8 = 0,
    Uint8 = 1,
    Uint8Clamped = 2,
    Int16 = 3,
    Uint16 = 4,
    Int32 = 5,
    Uint32 = 6,
    Float32 = 7,
    Float64 = 8,
    BigInt64 = 9,
    BigUint64 = 10,
}

impl TypedArrayKind {
    pub const ALL: [TypedArrayKind; 11] = [
        TypedArrayKind::Int8,
        TypedArrayKind::Uint8,
        TypedArrayKind::Uint8Clamped,
        TypedArrayKind::Int16,
        TypedArrayKind::Uint16,
        TypedArrayKind::Int32,
        TypedArrayKind::Uint32,
        TypedArrayKind::Float32,
        TypedArrayKind::Float64,
        TypedArrayKind::BigInt64,
        TypedArrayKind::BigUint64,
    ];

    /// Constructor name as written in scripts.
    pub fn constructor_name(&self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
            TypedArrayKind::BigInt64 => "BigInt64Array",
            TypedArrayKind::BigUint64 => "BigUint64Array",
        }
    }

    pub fn from_constructor(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.constructor_name() == name)
    }
}

// ============================================================================
// Opaque runtime handles
// ============================================================================

/// Runtime objects the compiler only ever sees as opaque pointers.
///
/// Methods on these lower to `kestrel_<stem>_<operation>` with the handle as
/// the first argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum HandleKind {
    Map,
    Set,
    WeakMap,
    WeakRef,
    WeakSet,
    Date,
    BigInt,
    Symbol,
    Error,
    Iterator,
    Promise,
    Generator,
    AsyncGenerator,
    Function,
    DataView,
    DisposableStack,
    AsyncDisposableStack,
    FinalizationRegistry,
    Url,
    UrlSearchParams,
    TextEncoder,
    TextDecoder,
    Headers,
    Response,
    NumberFormat,
    DateTimeFormat,
    Collator,
    PluralRules,
    RelativeTimeFormat,
    ListFormat,
    DisplayNames,
    Segmenter,
    Locale,
}

impl HandleKind {
    pub const ALL: [HandleKind; 33] = [
        HandleKind::Map,
        HandleKind::Set,
        HandleKind::WeakMap,
        HandleKind::WeakRef,
        HandleKind::WeakSet,
        HandleKind::Date,
        HandleKind::BigInt,
        HandleKind::Symbol,
        HandleKind::Error,
        HandleKind::Iterator,
        HandleKind::Promise,
        HandleKind::Generator,
        HandleKind::AsyncGenerator,
        HandleKind::Function,
        HandleKind::DataView,
        HandleKind::DisposableStack,
        HandleKind::AsyncDisposableStack,
        HandleKind::FinalizationRegistry,
        HandleKind::Url,
        HandleKind::UrlSearchParams,
        HandleKind::TextEncoder,
        HandleKind::TextDecoder,
        HandleKind::Headers,
        HandleKind::Response,
        HandleKind::NumberFormat,
        HandleKind::DateTimeFormat,
        HandleKind::Collator,
        HandleKind::PluralRules,
        HandleKind::RelativeTimeFormat,
        HandleKind::ListFormat,
        HandleKind::DisplayNames,
        HandleKind::Segmenter,
        HandleKind::Locale,
    ];

    /// Constructor name as written in scripts. `Intl` handles use their
    /// unqualified name (`NumberFormat` for `Intl.NumberFormat`).
    pub fn constructor_name(&self) -> &'static str {
        match self {
            HandleKind::Map => "Map",
            HandleKind::Set => "Set",
            HandleKind::WeakMap => "WeakMap",
            HandleKind::WeakRef => "WeakRef",
            HandleKind::WeakSet => "WeakSet",
            HandleKind::Date => "Date",
            HandleKind::BigInt => "BigInt",
            HandleKind::Symbol => "Symbol",
            HandleKind::Error => "Error",
            HandleKind::Iterator => "Iterator",
            HandleKind::Promise => "Promise",
            HandleKind::Generator => "Generator",
            HandleKind::AsyncGenerator => "AsyncGenerator",
            HandleKind::Function => "Function",
            HandleKind::DataView => "DataView",
            HandleKind::DisposableStack => "DisposableStack",
            HandleKind::AsyncDisposableStack => "AsyncDisposableStack",
            HandleKind::FinalizationRegistry => "FinalizationRegistry",
            HandleKind::Url => "URL",
            HandleKind::UrlSearchParams => "URLSearchParams",
            HandleKind::TextEncoder => "TextEncoder",
            HandleKind::TextDecoder => "TextDecoder",
            HandleKind::Headers => "Headers",
            HandleKind::Response => "Response",
            HandleKind::NumberFormat => "NumberFormat",
            HandleKind::DateTimeFormat => "DateTimeFormat",
            HandleKind::Collator => "Collator",
            HandleKind::PluralRules => "PluralRules",
            HandleKind::RelativeTimeFormat => "RelativeTimeFormat",
            HandleKind::ListFormat => "ListFormat",
            HandleKind::DisplayNames => "DisplayNames",
            HandleKind::Segmenter => "Segmenter",
            HandleKind::Locale => "Locale",
        }
    }

    /// Stem used in runtime symbol names.
    pub fn stem(&self) -> &'static str {
        match self {
            HandleKind::Map => "map",
            HandleKind::Set => "set",
            HandleKind::WeakMap => "weakmap",
            HandleKind::WeakRef => "weakref",
            HandleKind::WeakSet => "weakset",
            HandleKind::Date => "date",
            HandleKind::BigInt => "bigint",
            HandleKind::Symbol => "symbol",
            HandleKind::Error => "error",
            HandleKind::Iterator => "iterator",
            HandleKind::Promise => "promise",
            HandleKind::Generator => "generator",
            HandleKind::AsyncGenerator => "async_generator",
            HandleKind::Function => "function",
            HandleKind::DataView => "dataview",
            HandleKind::DisposableStack => "disposable_stack",
            HandleKind::AsyncDisposableStack => "async_disposable_stack",
            HandleKind::FinalizationRegistry => "finalization_registry",
            HandleKind::Url => "url",
            HandleKind::UrlSearchParams => "url_search_params",
            HandleKind::TextEncoder => "text_encoder",
            HandleKind::TextDecoder => "text_decoder",
            HandleKind::Headers => "headers",
            HandleKind::Response => "response",
            HandleKind::NumberFormat => "intl_number_format",
            HandleKind::DateTimeFormat => "intl_date_time_format",
            HandleKind::Collator => "intl_collator",
            HandleKind::PluralRules => "intl_plural_rules",
            HandleKind::RelativeTimeFormat => "intl_relative_time_format",
            HandleKind::ListFormat => "intl_list_format",
            HandleKind::DisplayNames => "intl_display_names",
            HandleKind::Segmenter => "intl_segmenter",
            HandleKind::Locale => "intl_locale",
        }
    }

    pub fn from_constructor(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.constructor_name() == name)
    }

    /// Locale-sensitive handles, constructed through `Intl.<Name>`.
    pub fn is_intl(&self) -> bool {
        self.stem().starts_with("intl_")
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constructor_name())
    }
}

// ============================================================================
// Namespaces and builtin modules
// ============================================================================

/// Well-known global namespace objects (`Math.max`, `JSON.parse`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Console,
    Math,
    Json,
    Object,
    Reflect,
    Array,
    Number,
    String,
    Promise,
    Symbol,
    Date,
    BigInt,
    Atomics,
    Iterator,
    ArrayBuffer,
    Map,
    Intl,
}

impl Namespace {
    pub const ALL: [Namespace; 17] = [
        Namespace::Console,
        Namespace::Math,
        Namespace::Json,
        Namespace::Object,
        Namespace::Reflect,
        Namespace::Array,
        Namespace::Number,
        Namespace::String,
        Namespace::Promise,
        Namespace::Symbol,
        Namespace::Date,
        Namespace::BigInt,
        Namespace::Atomics,
        Namespace::Iterator,
        Namespace::ArrayBuffer,
        Namespace::Map,
        Namespace::Intl,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Namespace::Console => "console",
            Namespace::Math => "Math",
            Namespace::Json => "JSON",
            Namespace::Object => "Object",
            Namespace::Reflect => "Reflect",
            Namespace::Array => "Array",
            Namespace::Number => "Number",
            Namespace::String => "String",
            Namespace::Promise => "Promise",
            Namespace::Symbol => "Symbol",
            Namespace::Date => "Date",
            Namespace::BigInt => "BigInt",
            Namespace::Atomics => "Atomics",
            Namespace::Iterator => "Iterator",
            Namespace::ArrayBuffer => "ArrayBuffer",
            Namespace::Map => "Map",
            Namespace::Intl => "Intl",
        }
    }

    pub fn stem(&self) -> &'static str {
        match self {
            Namespace::Console => "console",
            Namespace::Math => "math",
            Namespace::Json => "json",
            Namespace::Object => "object",
            Namespace::Reflect => "reflect",
            Namespace::Array => "array",
            Namespace::Number => "number",
            Namespace::String => "string",
            Namespace::Promise => "promise",
            Namespace::Symbol => "symbol",
            Namespace::Date => "date",
            Namespace::BigInt => "bigint",
            Namespace::Atomics => "atomics",
            Namespace::Iterator => "iterator",
            Namespace::ArrayBuffer => "array_buffer",
            Namespace::Map => "map",
            Namespace::Intl => "intl",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.name() == name)
    }
}

/// Builtin modules importable by specifier (`"fs"` or `"node:fs"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinModule {
    Fs,
    Path,
    Os,
    Util,
    Crypto,
    Events,
    ChildProcess,
    Url,
    Zlib,
    Assert,
    Process,
}

impl BuiltinModule {
    pub const ALL: [BuiltinModule; 11] = [
        BuiltinModule::Fs,
        BuiltinModule::Path,
        BuiltinModule::Os,
        BuiltinModule::Util,
        BuiltinModule::Crypto,
        BuiltinModule::Events,
        BuiltinModule::ChildProcess,
        BuiltinModule::Url,
        BuiltinModule::Zlib,
        BuiltinModule::Assert,
        BuiltinModule::Process,
    ];

    pub fn specifier(&self) -> &'static str {
        match self {
            BuiltinModule::Fs => "fs",
            BuiltinModule::Path => "path",
            BuiltinModule::Os => "os",
            BuiltinModule::Util => "util",
            BuiltinModule::Crypto => "crypto",
            BuiltinModule::Events => "events",
            BuiltinModule::ChildProcess => "child_process",
            BuiltinModule::Url => "url",
            BuiltinModule::Zlib => "zlib",
            BuiltinModule::Assert => "assert",
            BuiltinModule::Process => "process",
        }
    }

    /// Accepts both bare and `node:`-prefixed specifiers.
    pub fn from_specifier(specifier: &str) -> Option<Self> {
        let bare = specifier.strip_prefix("node:").unwrap_or(specifier);
        Self::ALL.into_iter().find(|m| m.specifier() == bare)
    }
}

// ============================================================================
// Receivers
// ============================================================================

/// Primitive receiver categories with methods in the ABI table.
///
/// Typed arrays of every element kind share one method set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Array,
    TypedArray,
    Regex,
}

impl PrimitiveKind {
    pub fn stem(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Array => "array",
            PrimitiveKind::TypedArray => "typed_array",
            PrimitiveKind::Regex => "regex",
        }
    }

    /// HIR type of a receiver of this kind when passed as argument 0.
    pub fn hir_type(&self) -> HirType {
        match self {
            PrimitiveKind::String => HirType::String,
            PrimitiveKind::Number => HirType::F64,
            PrimitiveKind::Boolean => HirType::Bool,
            PrimitiveKind::Array | PrimitiveKind::TypedArray | PrimitiveKind::Regex => {
                HirType::Ptr
            }
        }
    }
}

/// The receiver half of an ABI key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    /// Reserved global free functions (`parseInt`, `setTimeout`, ...).
    Global,
    Namespace(Namespace),
    Module(BuiltinModule),
    Primitive(PrimitiveKind),
    Handle(HandleKind),
}

impl ReceiverKind {
    /// Stem used when building runtime symbol names for this receiver.
    pub fn stem(&self) -> &'static str {
        match self {
            ReceiverKind::Global => "global",
            ReceiverKind::Namespace(ns) => ns.stem(),
            ReceiverKind::Module(m) => m.specifier(),
            ReceiverKind::Primitive(p) => p.stem(),
            ReceiverKind::Handle(h) => h.stem(),
        }
    }
}

impl fmt::Display for ReceiverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiverKind::Global => f.write_str("<global>"),
            ReceiverKind::Namespace(ns) => f.write_str(ns.name()),
            ReceiverKind::Module(m) => write!(f, "module '{}'", m.specifier()),
            ReceiverKind::Primitive(p) => write!(f, "{:?}", p),
            ReceiverKind::Handle(h) => write!(f, "{}", h),
        }
    }
}

// ============================================================================
// Result tags
// ============================================================================

/// Marker attached to a call's result value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultTag {
    Promise,
    Iterator,
    IteratorResult,
    Set,
    BigInt,
    Symbol,
    TypedArray(TypedArrayKind),
    RuntimeArray,
    DisposableStack,
    AsyncDisposableStack,
    Generator,
    AsyncGenerator,
    Response,
    #[default]
    None,
}

impl ResultTag {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, ResultTag::None)
    }

    /// `None` for [`ResultTag::None`], `Some(self)` otherwise.
    #[inline]
    pub fn into_option(self) -> Option<ResultTag> {
        if self.is_none() { None } else { Some(self) }
    }
}

// ============================================================================
// Static operand types
// ============================================================================

/// What the lowering pass statically knows about an operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeTag {
    #[default]
    Unknown,
    String,
    Number,
    Boolean,
    Array,
    TypedArray(TypedArrayKind),
    Regex,
    Handle(HandleKind),
    /// Instance of a declared class.
    Instance(String),
    /// Value produced by an object literal.
    Object,
    Function,
}

impl TypeTag {
    /// Primitive ABI receiver category, if this type has one.
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeTag::String => Some(PrimitiveKind::String),
            TypeTag::Number => Some(PrimitiveKind::Number),
            TypeTag::Boolean => Some(PrimitiveKind::Boolean),
            TypeTag::Array => Some(PrimitiveKind::Array),
            TypeTag::TypedArray(_) => Some(PrimitiveKind::TypedArray),
            TypeTag::Regex => Some(PrimitiveKind::Regex),
            _ => None,
        }
    }

    pub fn handle(&self) -> Option<HandleKind> {
        match self {
            TypeTag::Handle(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn class(&self) -> Option<&str> {
        match self {
            TypeTag::Instance(name) => Some(name),
            _ => None,
        }
    }

    /// Static type of a value carrying `tag`.
    pub fn from_result_tag(tag: ResultTag) -> TypeTag {
        match tag {
            ResultTag::Promise => TypeTag::Handle(HandleKind::Promise),
            ResultTag::Iterator => TypeTag::Handle(HandleKind::Iterator),
            ResultTag::Set => TypeTag::Handle(HandleKind::Set),
            ResultTag::BigInt => TypeTag::Handle(HandleKind::BigInt),
            ResultTag::Symbol => TypeTag::Handle(HandleKind::Symbol),
            ResultTag::TypedArray(kind) => TypeTag::TypedArray(kind),
            ResultTag::RuntimeArray => TypeTag::Array,
            ResultTag::DisposableStack => TypeTag::Handle(HandleKind::DisposableStack),
            ResultTag::AsyncDisposableStack => TypeTag::Handle(HandleKind::AsyncDisposableStack),
            ResultTag::Generator => TypeTag::Handle(HandleKind::Generator),
            ResultTag::AsyncGenerator => TypeTag::Handle(HandleKind::AsyncGenerator),
            ResultTag::Response => TypeTag::Handle(HandleKind::Response),
            ResultTag::IteratorResult | ResultTag::None => TypeTag::Unknown,
        }
    }

    /// Best static type for an untagged value of HIR type `ty`.
    pub fn from_hir_type(ty: HirType) -> TypeTag {
        match ty {
            HirType::String => TypeTag::String,
            HirType::F64 | HirType::I64 => TypeTag::Number,
            HirType::Bool => TypeTag::Boolean,
            HirType::Void | HirType::Ptr | HirType::Any => TypeTag::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_array_constructor_names() {
        assert_eq!(
            TypedArrayKind::from_constructor("Float64Array"),
            Some(TypedArrayKind::Float64)
        );
        assert_eq!(TypedArrayKind::from_constructor("Float128Array"), None);
        let code: u8 = TypedArrayKind::Uint8Clamped.into();
        assert_eq!(code, 2);
    }

    #[test]
    fn handle_lookup_by_constructor() {
        assert_eq!(HandleKind::from_constructor("URLSearchParams"), Some(HandleKind::UrlSearchParams));
        assert_eq!(HandleKind::from_constructor("WeakRef"), Some(HandleKind::WeakRef));
        assert_eq!(HandleKind::from_constructor("Dog"), None);
        assert_eq!(HandleKind::Collator.stem(), "intl_collator");
        assert!(HandleKind::Collator.is_intl());
        assert!(!HandleKind::Map.is_intl());
    }

    #[test]
    fn namespace_names_match_script_spelling() {
        assert_eq!(Namespace::from_name("JSON"), Some(Namespace::Json));
        assert_eq!(Namespace::from_name("console"), Some(Namespace::Console));
        assert_eq!(Namespace::from_name("json"), None);
    }

    #[test]
    fn builtin_module_accepts_node_prefix() {
        assert_eq!(BuiltinModule::from_specifier("node:fs"), Some(BuiltinModule::Fs));
        assert_eq!(BuiltinModule::from_specifier("child_process"), Some(BuiltinModule::ChildProcess));
        assert_eq!(BuiltinModule::from_specifier("lodash"), None);
    }

    #[test]
    fn result_tags_map_back_to_receiver_types() {
        assert_eq!(TypeTag::from_result_tag(ResultTag::Promise).handle(), Some(HandleKind::Promise));
        assert_eq!(
            TypeTag::from_result_tag(ResultTag::TypedArray(TypedArrayKind::Int32)).primitive(),
            Some(PrimitiveKind::TypedArray)
        );
        assert_eq!(TypeTag::from_result_tag(ResultTag::RuntimeArray), TypeTag::Array);
        assert_eq!(TypeTag::from_result_tag(ResultTag::IteratorResult), TypeTag::Unknown);
        assert_eq!(ResultTag::None.into_option(), None);
        assert_eq!(ResultTag::Set.into_option(), Some(ResultTag::Set));
    }

    #[test]
    fn instance_tag_exposes_class() {
        let tag = TypeTag::Instance("Dog".to_string());
        assert_eq!(tag.class(), Some("Dog"));
        assert_eq!(tag.primitive(), None);
        assert_eq!(TypeTag::from_hir_type(HirType::String), TypeTag::String);
    }
}
