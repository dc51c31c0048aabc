//! Deterministic identities for lowered symbols.
//!
//! A [`SymbolHash`] is computed from a name (and, for signatures, from the
//! parameter and return types), so two passes that ask for the same runtime
//! function agree on its identity without sharing a counter.
//!
//! ```
//! use kestrel_core::{HirType, SymbolHash};
//!
//! let a = SymbolHash::from_external("kestrel_math_sqrt");
//! assert_eq!(a, SymbolHash::from_external("kestrel_math_sqrt"));
//!
//! let one = SymbolHash::from_signature(&[HirType::F64], HirType::F64);
//! let two = SymbolHash::from_signature(&[HirType::I64], HirType::F64);
//! assert_ne!(one, two);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

use crate::HirType;

/// Domain markers keeping identically named entities apart.
pub mod domains {
    pub const SEP: u64 = 0x4bc94d6bd06053ad;
    pub const EXTERNAL: u64 = 0x6a1f0c7e93d25b48;
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;
    pub const ENV_RECORD: u64 = 0x2d9b4e61c0f8a735;
    pub const SIGNATURE: u64 = 0x91c3e5a7b2d40f68;
    pub const RETURN: u64 = 0xc6a4a7935bd1e995;
}

/// A 64-bit identity for an external symbol, module function, or synthesized
/// environment record type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolHash(pub u64);

impl SymbolHash {
    pub const EMPTY: SymbolHash = SymbolHash(0);

    /// Identity of an externally linked runtime function.
    #[inline]
    pub fn from_external(name: &str) -> Self {
        SymbolHash(domains::EXTERNAL ^ xxh64(name.as_bytes(), 0))
    }

    /// Identity of a function defined in the module being lowered.
    #[inline]
    pub fn from_function(name: &str) -> Self {
        SymbolHash(domains::FUNCTION ^ xxh64(name.as_bytes(), 0))
    }

    /// Identity of the environment record type synthesized for `function`.
    #[inline]
    pub fn from_env_record(function: &str) -> Self {
        SymbolHash(domains::ENV_RECORD ^ xxh64(function.as_bytes(), 0))
    }

    /// Fingerprint of a parameter list and return type. Order matters.
    pub fn from_signature(params: &[HirType], ret: HirType) -> Self {
        let mut hash = domains::SIGNATURE;
        for (i, param) in params.iter().enumerate() {
            let code = u64::from(u8::from(*param));
            hash = hash
                .wrapping_mul(domains::SEP)
                .wrapping_add((i as u64 + 1).rotate_left(17) ^ code);
        }
        let ret_code = u64::from(u8::from(ret));
        SymbolHash(hash.wrapping_mul(domains::SEP) ^ domains::RETURN ^ ret_code)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolHash({:#018x})", self.0)
    }
}

impl fmt::Display for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_different_domain() {
        let name = "counter";
        assert_ne!(SymbolHash::from_external(name), SymbolHash::from_function(name));
        assert_ne!(SymbolHash::from_function(name), SymbolHash::from_env_record(name));
    }

    #[test]
    fn signature_order_matters() {
        let a = SymbolHash::from_signature(&[HirType::Ptr, HirType::I64], HirType::Void);
        let b = SymbolHash::from_signature(&[HirType::I64, HirType::Ptr], HirType::Void);
        assert_ne!(a, b);
    }

    #[test]
    fn signature_return_type_matters() {
        let a = SymbolHash::from_signature(&[HirType::Ptr], HirType::Ptr);
        let b = SymbolHash::from_signature(&[HirType::Ptr], HirType::I64);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_signature_is_stable() {
        assert_eq!(
            SymbolHash::from_signature(&[], HirType::Void),
            SymbolHash::from_signature(&[], HirType::Void)
        );
        assert!(!SymbolHash::from_signature(&[], HirType::Void).is_empty());
    }
}
