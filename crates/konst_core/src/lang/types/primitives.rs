//! Compile-time operand kinds.
//!
//! The operation registry is keyed by these kinds: every operand of a foldable operation is classified as one of the
//! primitive numeric kinds, `Char`, `Boolean`, `String`, or `Any` (the parameter kind of `equals` and of string
//! concatenation).
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and matches the builtin class short names.
//! - Numeric promotion follows the widening rules of the builtin arithmetic: any `Double` operand yields `Double`,
//!   otherwise any `Float` yields `Float`, otherwise any `Long` yields `Long`, otherwise the result is `Int`
//!   (`Byte` and `Short` arithmetic never stays narrow).
//!
//! ## Examples
//! ```rust
//! use konst_core::{PrimitiveKind, promote_numeric};
//!
//! assert_eq!(promote_numeric(PrimitiveKind::Byte, PrimitiveKind::Short), Some(PrimitiveKind::Int));
//! assert_eq!(promote_numeric(PrimitiveKind::Int, PrimitiveKind::Long), Some(PrimitiveKind::Long));
//! assert_eq!(promote_numeric(PrimitiveKind::Long, PrimitiveKind::Float), Some(PrimitiveKind::Float));
//! assert_eq!(promote_numeric(PrimitiveKind::Char, PrimitiveKind::Int), None);
//! ```

use crate::lang::registry::LangItemInfo;

/// Stable identifier for compile-time operand kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    Boolean,
    String,
    Any,
}

/// Registry of operand kinds.
pub const PRIMITIVE_KINDS: &[LangItemInfo<PrimitiveKind>] = &[
    info(PrimitiveKind::Byte, "Byte", "8-bit signed integer."),
    info(PrimitiveKind::Short, "Short", "16-bit signed integer."),
    info(PrimitiveKind::Int, "Int", "32-bit signed integer."),
    info(PrimitiveKind::Long, "Long", "64-bit signed integer."),
    info(PrimitiveKind::Float, "Float", "32-bit IEEE 754 floating point."),
    info(PrimitiveKind::Double, "Double", "64-bit IEEE 754 floating point."),
    info(PrimitiveKind::Char, "Char", "16-bit UTF-16 code unit."),
    info(PrimitiveKind::Boolean, "Boolean", "Boolean truth value."),
    info(PrimitiveKind::String, "String", "Immutable character sequence."),
    info(PrimitiveKind::Any, "Any", "Root of the class hierarchy."),
];

/// The four integral kinds, narrowest first.
pub const INTEGRAL_KINDS: &[PrimitiveKind] = &[
    PrimitiveKind::Byte,
    PrimitiveKind::Short,
    PrimitiveKind::Int,
    PrimitiveKind::Long,
];

/// The six numeric kinds, integral first.
pub const NUMERIC_KINDS: &[PrimitiveKind] = &[
    PrimitiveKind::Byte,
    PrimitiveKind::Short,
    PrimitiveKind::Int,
    PrimitiveKind::Long,
    PrimitiveKind::Float,
    PrimitiveKind::Double,
];

impl PrimitiveKind {
    pub fn is_integral(self) -> bool {
        matches!(self, PrimitiveKind::Byte | PrimitiveKind::Short | PrimitiveKind::Int | PrimitiveKind::Long)
    }

    pub fn is_floating(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral() || self.is_floating()
    }

    /// Return the builtin class short name (e.g. `"Int"`).
    pub fn as_str(self) -> &'static str {
        info_for(self).canonical
    }
}

/// Resolve a builtin class short name to its operand kind.
pub fn from_str(name: &str) -> Option<PrimitiveKind> {
    PRIMITIVE_KINDS.iter().find(|k| k.is_spelled(name)).map(|k| k.id)
}

/// Return the full metadata entry for an operand kind.
///
/// ## Panics
/// - If the registry is missing an entry for `kind` (this indicates a programming error).
pub fn info_for(kind: PrimitiveKind) -> &'static LangItemInfo<PrimitiveKind> {
    PRIMITIVE_KINDS
        .iter()
        .find(|k| k.id == kind)
        .expect("primitive kind info missing")
}

/// Determine the result kind of a binary arithmetic operation over two numeric kinds.
///
/// ## Returns
/// - `Some(kind)` when both operands are numeric.
/// - `None` otherwise.
pub fn promote_numeric(lhs: PrimitiveKind, rhs: PrimitiveKind) -> Option<PrimitiveKind> {
    if !lhs.is_numeric() || !rhs.is_numeric() {
        return None;
    }
    let result = if lhs == PrimitiveKind::Double || rhs == PrimitiveKind::Double {
        PrimitiveKind::Double
    } else if lhs == PrimitiveKind::Float || rhs == PrimitiveKind::Float {
        PrimitiveKind::Float
    } else if lhs == PrimitiveKind::Long || rhs == PrimitiveKind::Long {
        PrimitiveKind::Long
    } else {
        PrimitiveKind::Int
    };
    Some(result)
}

const fn info(id: PrimitiveKind, canonical: &'static str, description: &'static str) -> LangItemInfo<PrimitiveKind> {
    LangItemInfo::new(id, canonical, description)
}
