//! Machine-level value types used in HIR signatures.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The type of an HIR value or parameter.
///
/// Script values without a more precise representation travel as `Any`
/// (a boxed runtime value). Runtime handles and environment records are `Ptr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum HirType {
    Void = 0,
    Bool = 1,
    I64 = 2,
    F64 = 3,
    String = 4,
    Ptr = 5,
    Any = 6,
}

impl HirType {
    pub fn name(&self) -> &'static str {
        match self {
            HirType::Void => "void",
            HirType::Bool => "bool",
            HirType::I64 => "i64",
            HirType::F64 => "f64",
            HirType::String => "string",
            HirType::Ptr => "ptr",
            HirType::Any => "any",
        }
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, HirType::Void)
    }
}

impl fmt::Display for HirType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
