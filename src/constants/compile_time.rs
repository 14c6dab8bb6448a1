//! Compile-time constants: a folded value plus the flags describing how it was obtained.

use konst_core::PrimitiveKind;

use crate::constants::value::{ConstantValue, NativeValue};
use crate::frontend::types::ResolvedType;

/// How a constant was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Parameters {
    pub can_be_used_in_annotation: bool,
    /// No named variable and no numeric conversion took part in computing the value.
    pub is_pure: bool,
    pub uses_variable_as_constant: bool,
}

impl Parameters {
    pub const fn new(can_be_used_in_annotation: bool, is_pure: bool, uses_variable_as_constant: bool) -> Self {
        Self {
            can_be_used_in_annotation,
            is_pure,
            uses_variable_as_constant,
        }
    }
}

/// The result of folding an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileTimeConstant {
    /// A value whose kind is fixed.
    Typed { value: ConstantValue, parameters: Parameters },
    /// An integer literal whose width is decided by the expected type at the use site.
    IntegerValue { value: i64, parameters: Parameters },
}

impl CompileTimeConstant {
    /// A typed constant. Error values are never usable in annotations.
    pub fn typed(value: ConstantValue, mut parameters: Parameters) -> Self {
        if value.is_error() {
            parameters.can_be_used_in_annotation = false;
        }
        CompileTimeConstant::Typed { value, parameters }
    }

    pub fn integer(value: i64, parameters: Parameters) -> Self {
        CompileTimeConstant::IntegerValue { value, parameters }
    }

    pub fn parameters(&self) -> Parameters {
        match self {
            CompileTimeConstant::Typed { parameters, .. } | CompileTimeConstant::IntegerValue { parameters, .. } => {
                *parameters
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CompileTimeConstant::Typed { value, .. } if value.is_error())
    }

    pub fn can_be_used_in_annotations(&self) -> bool {
        self.parameters().can_be_used_in_annotation
    }

    pub fn is_pure(&self) -> bool {
        self.parameters().is_pure
    }

    pub fn uses_variable_as_constant(&self) -> bool {
        self.parameters().uses_variable_as_constant
    }

    /// Materialize the value against an expected type.
    ///
    /// Typed constants ignore the expected type. A deferred integer takes the expected integral width when the value
    /// fits in it, and otherwise becomes `Int` when it fits in 32 bits, else `Long`.
    pub fn to_constant_value(&self, expected: Option<&ResolvedType>) -> ConstantValue {
        match self {
            CompileTimeConstant::Typed { value, .. } => value.clone(),
            CompileTimeConstant::IntegerValue { value, .. } => {
                let value = *value;
                match expected.and_then(ResolvedType::operand_kind) {
                    Some(PrimitiveKind::Int) if i32::try_from(value).is_ok() => ConstantValue::Int(value as i32),
                    Some(PrimitiveKind::Short) if i16::try_from(value).is_ok() => ConstantValue::Short(value as i16),
                    Some(PrimitiveKind::Byte) if i8::try_from(value).is_ok() => ConstantValue::Byte(value as i8),
                    Some(PrimitiveKind::Long) => ConstantValue::Long(value),
                    _ => match i32::try_from(value) {
                        Ok(int) => ConstantValue::Int(int),
                        Err(_) => ConstantValue::Long(value),
                    },
                }
            }
        }
    }

    /// Native view of the materialized value.
    pub fn native_value(&self, expected: Option<&ResolvedType>) -> Option<NativeValue> {
        self.to_constant_value(expected).as_native()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PURE: Parameters = Parameters::new(true, true, false);

    fn ty(kind: PrimitiveKind) -> ResolvedType {
        ResolvedType::primitive(kind)
    }

    #[test]
    fn deferred_integer_takes_expected_width() {
        let constant = CompileTimeConstant::integer(100, PURE);
        assert_eq!(
            constant.to_constant_value(Some(&ty(PrimitiveKind::Byte))),
            ConstantValue::Byte(100)
        );
        assert_eq!(
            constant.to_constant_value(Some(&ty(PrimitiveKind::Long))),
            ConstantValue::Long(100)
        );
        assert_eq!(constant.to_constant_value(None), ConstantValue::Int(100));
    }

    #[test]
    fn deferred_integer_falls_back_when_it_does_not_fit() {
        let constant = CompileTimeConstant::integer(1000, PURE);
        assert_eq!(
            constant.to_constant_value(Some(&ty(PrimitiveKind::Byte))),
            ConstantValue::Int(1000)
        );
        let wide = CompileTimeConstant::integer(i64::from(i32::MAX) + 1, PURE);
        assert_eq!(
            wide.to_constant_value(Some(&ty(PrimitiveKind::Int))),
            ConstantValue::Long(i64::from(i32::MAX) + 1)
        );
    }

    #[test]
    fn error_values_are_never_usable_in_annotations() {
        let constant = ConstantValue::error("boom").wrap_with(Parameters::new(true, true, false));
        assert!(constant.is_error());
        assert!(!constant.can_be_used_in_annotations());
    }

    #[test]
    fn null_defaults_to_unusable_in_annotations() {
        assert!(!ConstantValue::Null.wrap().can_be_used_in_annotations());
        assert!(ConstantValue::Int(1).wrap().can_be_used_in_annotations());
    }
}
