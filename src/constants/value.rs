//! Constant value model.
//!
//! A [`ConstantValue`] is an immutable, fully resolved value together with its static type. [`NativeValue`] is the
//! untyped machine-level view of the primitive kinds: the operation registry computes over native values, and the
//! binary format bridge receives them raw from compiled metadata.
//!
//! ## Notes
//! - Floating point values compare by bit pattern, so `NaN == NaN` and `0.0 != -0.0`.
//! - Enum constants compare by identity of the resolved entry.
//! - Textual forms (`to_java_string`) follow the host platform: `1.0`, `1.0E10`, `NaN`, `Infinity`.

use std::fmt;
use std::sync::Arc;

use konst_core::PrimitiveKind;
use konst_core::lang::names;

use crate::constants::compile_time::{CompileTimeConstant, Parameters};
use crate::frontend::descriptors::{AnnotationDescriptor, EnumEntryDescriptor};
use crate::frontend::types::ResolvedType;

/// A machine-level value of one of the primitive kinds.
#[derive(Debug, Clone)]
pub enum NativeValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// UTF-16 code unit.
    Char(u16),
    Boolean(bool),
    String(String),
    Null,
    /// A raw value no constant kind can represent (described by its textual form).
    Opaque(String),
}

impl NativeValue {
    /// Operand kind of the value; `None` for `Null` and opaque values.
    pub fn kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            NativeValue::Byte(_) => PrimitiveKind::Byte,
            NativeValue::Short(_) => PrimitiveKind::Short,
            NativeValue::Int(_) => PrimitiveKind::Int,
            NativeValue::Long(_) => PrimitiveKind::Long,
            NativeValue::Float(_) => PrimitiveKind::Float,
            NativeValue::Double(_) => PrimitiveKind::Double,
            NativeValue::Char(_) => PrimitiveKind::Char,
            NativeValue::Boolean(_) => PrimitiveKind::Boolean,
            NativeValue::String(_) => PrimitiveKind::String,
            NativeValue::Null | NativeValue::Opaque(_) => return None,
        })
    }

    /// The value widened to 64 bits, for the four integral kinds.
    pub fn as_integral(&self) -> Option<i64> {
        match self {
            NativeValue::Byte(v) => Some(i64::from(*v)),
            NativeValue::Short(v) => Some(i64::from(*v)),
            NativeValue::Int(v) => Some(i64::from(*v)),
            NativeValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_integral(&self) -> bool {
        self.as_integral().is_some()
    }

    /// Textual form as rendered by the host platform's `toString`.
    pub fn to_java_string(&self) -> String {
        match self {
            NativeValue::Byte(v) => v.to_string(),
            NativeValue::Short(v) => v.to_string(),
            NativeValue::Int(v) => v.to_string(),
            NativeValue::Long(v) => v.to_string(),
            NativeValue::Float(v) => java_floating(*v),
            NativeValue::Double(v) => java_floating(*v),
            NativeValue::Char(c) => char_from_unit(*c).to_string(),
            NativeValue::Boolean(v) => v.to_string(),
            NativeValue::String(s) => s.clone(),
            NativeValue::Null => "null".to_string(),
            NativeValue::Opaque(description) => description.clone(),
        }
    }
}

impl PartialEq for NativeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NativeValue::Byte(a), NativeValue::Byte(b)) => a == b,
            (NativeValue::Short(a), NativeValue::Short(b)) => a == b,
            (NativeValue::Int(a), NativeValue::Int(b)) => a == b,
            (NativeValue::Long(a), NativeValue::Long(b)) => a == b,
            (NativeValue::Float(a), NativeValue::Float(b)) => a.to_bits() == b.to_bits(),
            (NativeValue::Double(a), NativeValue::Double(b)) => a.to_bits() == b.to_bits(),
            (NativeValue::Char(a), NativeValue::Char(b)) => a == b,
            (NativeValue::Boolean(a), NativeValue::Boolean(b)) => a == b,
            (NativeValue::String(a), NativeValue::String(b)) => a == b,
            (NativeValue::Null, NativeValue::Null) => true,
            (NativeValue::Opaque(a), NativeValue::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

/// A resolved compile-time value.
#[derive(Debug, Clone)]
pub enum ConstantValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(u16),
    Boolean(bool),
    String(String),
    Null,
    Enum(Arc<EnumEntryDescriptor>),
    Array {
        elements: Vec<ConstantValue>,
        ty: ResolvedType,
    },
    Annotation(Box<AnnotationDescriptor>),
    /// Class-object reference (`T::class`).
    KClass(ResolvedType),
    /// Placeholder for a value whose computation failed; never a real value.
    Error(String),
}

impl ConstantValue {
    /// Build a value from a native literal. Opaque values are not representable.
    pub fn from_native(value: NativeValue) -> Option<ConstantValue> {
        Some(match value {
            NativeValue::Byte(v) => ConstantValue::Byte(v),
            NativeValue::Short(v) => ConstantValue::Short(v),
            NativeValue::Int(v) => ConstantValue::Int(v),
            NativeValue::Long(v) => ConstantValue::Long(v),
            NativeValue::Float(v) => ConstantValue::Float(v),
            NativeValue::Double(v) => ConstantValue::Double(v),
            NativeValue::Char(v) => ConstantValue::Char(v),
            NativeValue::Boolean(v) => ConstantValue::Boolean(v),
            NativeValue::String(v) => ConstantValue::String(v),
            NativeValue::Null => ConstantValue::Null,
            NativeValue::Opaque(_) => return None,
        })
    }

    /// Build an integer value of the width `expected` asks for.
    ///
    /// ## Returns
    /// - `Long` for an expected `Long`.
    /// - `Int`, `Short` or `Byte` when the expected type is that kind and the value fits.
    /// - `Int` for an expected `Char` (truncating).
    /// - `None` otherwise.
    pub fn integer_for_type(value: i64, expected: &ResolvedType) -> Option<ConstantValue> {
        match expected.operand_kind()? {
            PrimitiveKind::Long => Some(ConstantValue::Long(value)),
            PrimitiveKind::Int => i32::try_from(value).ok().map(ConstantValue::Int),
            PrimitiveKind::Short => i16::try_from(value).ok().map(ConstantValue::Short),
            PrimitiveKind::Byte => i8::try_from(value).ok().map(ConstantValue::Byte),
            PrimitiveKind::Char => Some(ConstantValue::Int(value as i32)),
            _ => None,
        }
    }

    pub fn array(elements: Vec<ConstantValue>, ty: ResolvedType) -> ConstantValue {
        ConstantValue::Array { elements, ty }
    }

    pub fn annotation(descriptor: AnnotationDescriptor) -> ConstantValue {
        ConstantValue::Annotation(Box::new(descriptor))
    }

    pub fn error(message: impl Into<String>) -> ConstantValue {
        ConstantValue::Error(message.into())
    }

    /// Static type of the value.
    pub fn ty(&self) -> ResolvedType {
        match self {
            ConstantValue::Byte(_) => ResolvedType::primitive(PrimitiveKind::Byte),
            ConstantValue::Short(_) => ResolvedType::primitive(PrimitiveKind::Short),
            ConstantValue::Int(_) => ResolvedType::primitive(PrimitiveKind::Int),
            ConstantValue::Long(_) => ResolvedType::primitive(PrimitiveKind::Long),
            ConstantValue::Float(_) => ResolvedType::primitive(PrimitiveKind::Float),
            ConstantValue::Double(_) => ResolvedType::primitive(PrimitiveKind::Double),
            ConstantValue::Char(_) => ResolvedType::primitive(PrimitiveKind::Char),
            ConstantValue::Boolean(_) => ResolvedType::primitive(PrimitiveKind::Boolean),
            ConstantValue::String(_) => ResolvedType::primitive(PrimitiveKind::String),
            ConstantValue::Null => ResolvedType::Nothing.nullable(),
            ConstantValue::Enum(entry) => entry.enum_type(),
            ConstantValue::Array { ty, .. } => ty.clone(),
            ConstantValue::Annotation(descriptor) => descriptor.ty.clone(),
            ConstantValue::KClass(_) => ResolvedType::class(names::KCLASS),
            ConstantValue::Error(message) => ResolvedType::error(message.clone()),
        }
    }

    /// Native view of primitive, `String` and `Null` values.
    pub fn as_native(&self) -> Option<NativeValue> {
        Some(match self {
            ConstantValue::Byte(v) => NativeValue::Byte(*v),
            ConstantValue::Short(v) => NativeValue::Short(*v),
            ConstantValue::Int(v) => NativeValue::Int(*v),
            ConstantValue::Long(v) => NativeValue::Long(*v),
            ConstantValue::Float(v) => NativeValue::Float(*v),
            ConstantValue::Double(v) => NativeValue::Double(*v),
            ConstantValue::Char(v) => NativeValue::Char(*v),
            ConstantValue::Boolean(v) => NativeValue::Boolean(*v),
            ConstantValue::String(v) => NativeValue::String(v.clone()),
            ConstantValue::Null => NativeValue::Null,
            _ => return None,
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ConstantValue::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConstantValue::Null)
    }

    /// Wrap with the default parameters of a freshly built source constant: usable in annotations unless `Null`
    /// (or `Error`), not pure, not derived from a variable.
    pub fn wrap(self) -> CompileTimeConstant {
        let can_be_used_in_annotation = !self.is_null();
        self.wrap_with(Parameters::new(can_be_used_in_annotation, false, false))
    }

    pub fn wrap_with(self, parameters: Parameters) -> CompileTimeConstant {
        CompileTimeConstant::typed(self, parameters)
    }
}

impl PartialEq for ConstantValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConstantValue::Enum(a), ConstantValue::Enum(b)) => Arc::ptr_eq(a, b),
            (
                ConstantValue::Array { elements: a, ty: a_ty },
                ConstantValue::Array { elements: b, ty: b_ty },
            ) => a_ty == b_ty && a == b,
            (ConstantValue::Annotation(a), ConstantValue::Annotation(b)) => a == b,
            (ConstantValue::KClass(a), ConstantValue::KClass(b)) => a == b,
            (ConstantValue::Error(a), ConstantValue::Error(b)) => a == b,
            (a, b) => match (a.as_native(), b.as_native()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Byte(v) => write!(f, "{v}.toByte()"),
            ConstantValue::Short(v) => write!(f, "{v}.toShort()"),
            ConstantValue::Int(v) => write!(f, "{v}"),
            ConstantValue::Long(v) => write!(f, "{v}.toLong()"),
            ConstantValue::Float(v) => write!(f, "{}.toFloat()", java_floating(*v)),
            ConstantValue::Double(v) => f.write_str(&java_floating(*v)),
            ConstantValue::Char(c) => write!(f, "\\u{c:04X} ('{}')", char_from_unit(*c)),
            ConstantValue::Boolean(v) => write!(f, "{v}"),
            ConstantValue::String(s) => write!(f, "\"{s}\""),
            ConstantValue::Null => f.write_str("null"),
            ConstantValue::Enum(entry) => write!(f, "{}.{}", names::short_name(&entry.enum_class), entry.name),
            ConstantValue::Array { elements, .. } => {
                f.write_str("[")?;
                for (idx, element) in elements.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            ConstantValue::Annotation(descriptor) => {
                let name = descriptor.class_fq_name().map(names::short_name).unwrap_or("<error>");
                write!(f, "@{name}(")?;
                for (idx, (parameter, value)) in descriptor.arguments().iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} = {value}", parameter.name)?;
                }
                f.write_str(")")
            }
            ConstantValue::KClass(ty) => write!(f, "{ty}::class"),
            ConstantValue::Error(message) => write!(f, "<error: {message}>"),
        }
    }
}

fn char_from_unit(unit: u16) -> char {
    char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Host-platform textual form of a floating point value.
pub(crate) fn java_floating<T>(value: T) -> String
where
    T: Copy + Into<f64> + fmt::Display + fmt::LowerExp,
{
    let wide: f64 = value.into();
    if wide.is_nan() {
        return "NaN".to_string();
    }
    if wide.is_infinite() {
        return if wide > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = wide.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let text = value.to_string();
        if text.contains('.') { text } else { format!("{text}.0") }
    } else {
        let text = format!("{value:e}");
        let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
        if mantissa.contains('.') {
            format!("{mantissa}E{exponent}")
        } else {
            format!("{mantissa}.0E{exponent}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_floating_forms() {
        assert_eq!(java_floating(1.0f64), "1.0");
        assert_eq!(java_floating(1.5f32), "1.5");
        assert_eq!(java_floating(1e10f64), "1.0E10");
        assert_eq!(java_floating(1.25e-5f64), "1.25E-5");
        assert_eq!(java_floating(-0.0f64), "-0.0");
        assert_eq!(java_floating(f64::NAN), "NaN");
        assert_eq!(java_floating(f32::NEG_INFINITY), "-Infinity");
        assert_eq!(java_floating(1234567.0f64), "1234567.0");
    }

    #[test]
    fn floats_compare_by_bits() {
        assert_eq!(ConstantValue::Double(f64::NAN), ConstantValue::Double(f64::NAN));
        assert_ne!(ConstantValue::Double(0.0), ConstantValue::Double(-0.0));
        assert_ne!(ConstantValue::Int(1), ConstantValue::Long(1));
    }

    #[test]
    fn enum_equality_is_identity() {
        let a = Arc::new(EnumEntryDescriptor {
            name: "A".to_string(),
            enum_class: "e.E".to_string(),
        });
        let twin = Arc::new(EnumEntryDescriptor {
            name: "A".to_string(),
            enum_class: "e.E".to_string(),
        });
        assert_eq!(ConstantValue::Enum(a.clone()), ConstantValue::Enum(a.clone()));
        assert_ne!(ConstantValue::Enum(a), ConstantValue::Enum(twin));
    }

    #[test]
    fn array_equality_checks_element_type() {
        let ints = ResolvedType::array_of(ResolvedType::primitive(PrimitiveKind::Int));
        let anys = ResolvedType::array_of(ResolvedType::primitive(PrimitiveKind::Any));
        let a = ConstantValue::array(vec![ConstantValue::Int(1)], ints.clone());
        assert_eq!(a, ConstantValue::array(vec![ConstantValue::Int(1)], ints));
        assert_ne!(a, ConstantValue::array(vec![ConstantValue::Int(1)], anys));
    }

    #[test]
    fn opaque_natives_are_not_constants() {
        assert_eq!(ConstantValue::from_native(NativeValue::Opaque("Ljava/lang/Object;".into())), None);
        assert_eq!(ConstantValue::from_native(NativeValue::Null), Some(ConstantValue::Null));
    }

    #[test]
    fn integer_for_type_respects_width() {
        let byte = ResolvedType::primitive(PrimitiveKind::Byte);
        assert_eq!(ConstantValue::integer_for_type(100, &byte), Some(ConstantValue::Byte(100)));
        assert_eq!(ConstantValue::integer_for_type(300, &byte), None);
        let char_type = ResolvedType::primitive(PrimitiveKind::Char);
        assert_eq!(ConstantValue::integer_for_type(65, &char_type), Some(ConstantValue::Int(65)));
    }

    #[test]
    fn display_forms() {
        let ints = ResolvedType::array_of(ResolvedType::primitive(PrimitiveKind::Int));
        let array = ConstantValue::array(vec![ConstantValue::Int(1), ConstantValue::Long(2)], ints);
        insta::assert_snapshot!(array.to_string(), @"[1, 2.toLong()]");
        insta::assert_snapshot!(ConstantValue::Char(65).to_string(), @r"\u0041 ('A')");
        insta::assert_snapshot!(ConstantValue::Float(2.5).to_string(), @"2.5.toFloat()");
    }
}
