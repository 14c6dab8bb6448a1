//! Resolved types and the built-in declarations the engine depends on.
//!
//! [`ResolvedType`] is the engine's view of a type produced by the type-inference collaborator. [`BuiltIns`] is the
//! immutable registry of built-in declarations; it is constructed once and passed explicitly to every component
//! that needs it.

use std::fmt;
use std::sync::Arc;

use konst_core::PrimitiveKind;
use konst_core::lang::names;
use konst_core::lang::targets::{self, TargetId};

use crate::frontend::descriptors::{ClassDescriptor, ClassKind, EnumEntryDescriptor, ValueParameterDescriptor};

/// A resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    /// A primitive, `String` or `Any`.
    Primitive(PrimitiveKind),
    Nothing,
    Unit,
    /// A class type by fully-qualified name.
    Class(String),
    Array(Box<ResolvedType>),
    Nullable(Box<ResolvedType>),
    /// Stand-in for a type that failed to resolve.
    Error(String),
}

impl ResolvedType {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        ResolvedType::Primitive(kind)
    }

    pub fn class(fq_name: impl Into<String>) -> Self {
        ResolvedType::Class(fq_name.into())
    }

    pub fn array_of(element: ResolvedType) -> Self {
        ResolvedType::Array(Box::new(element))
    }

    pub fn error(message: impl Into<String>) -> Self {
        ResolvedType::Error(message.into())
    }

    pub fn nullable(self) -> Self {
        match self {
            ResolvedType::Nullable(_) => self,
            other => ResolvedType::Nullable(Box::new(other)),
        }
    }

    pub fn not_nullable(&self) -> &ResolvedType {
        match self {
            ResolvedType::Nullable(inner) => inner.not_nullable(),
            other => other,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.not_nullable(), ResolvedType::Error(_))
    }

    /// Operand kind used to key the operation registry; nullability is ignored.
    pub fn operand_kind(&self) -> Option<PrimitiveKind> {
        match self.not_nullable() {
            ResolvedType::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_primitive_or_string(&self) -> bool {
        matches!(self, ResolvedType::Primitive(kind) if *kind != PrimitiveKind::Any)
    }

    pub fn class_fq_name(&self) -> Option<&str> {
        match self.not_nullable() {
            ResolvedType::Class(fq_name) => Some(fq_name),
            _ => None,
        }
    }

    pub fn array_element(&self) -> Option<&ResolvedType> {
        match self.not_nullable() {
            ResolvedType::Array(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Primitive(kind) => f.write_str(kind.as_str()),
            ResolvedType::Nothing => f.write_str("Nothing"),
            ResolvedType::Unit => f.write_str("Unit"),
            ResolvedType::Class(fq_name) => f.write_str(fq_name),
            ResolvedType::Array(element) => write!(f, "Array<{element}>"),
            ResolvedType::Nullable(inner) => write!(f, "{inner}?"),
            ResolvedType::Error(message) => write!(f, "[ERROR : {message}]"),
        }
    }
}

/// Immutable registry of the built-in declarations the engine consults.
#[derive(Debug, Clone)]
pub struct BuiltIns {
    target_annotation: Arc<ClassDescriptor>,
    annotation_target: Arc<ClassDescriptor>,
    deprecated_annotation: Arc<ClassDescriptor>,
}

impl BuiltIns {
    pub fn new() -> Self {
        let annotation_target = ClassDescriptor::new(names::ANNOTATION_TARGET_ENUM, ClassKind::EnumClass)
            .with_enum_entries(targets::TARGETS.iter().map(|t| t.item.canonical));
        let target_annotation = ClassDescriptor::new(names::TARGET_ANNOTATION, ClassKind::AnnotationClass)
            .with_vararg_parameter(names::ALLOWED_TARGETS_PARAMETER, annotation_target.default_type());
        let deprecated_annotation = ClassDescriptor::new(names::DEPRECATED_ANNOTATION, ClassKind::AnnotationClass)
            .with_parameter(
                names::DEFAULT_ANNOTATION_MEMBER,
                ResolvedType::primitive(PrimitiveKind::String),
            );

        Self {
            target_annotation: Arc::new(target_annotation),
            annotation_target: Arc::new(annotation_target),
            deprecated_annotation: Arc::new(deprecated_annotation),
        }
    }

    pub fn primitive_type(&self, kind: PrimitiveKind) -> ResolvedType {
        ResolvedType::primitive(kind)
    }

    pub fn boolean_type(&self) -> ResolvedType {
        ResolvedType::primitive(PrimitiveKind::Boolean)
    }

    pub fn string_type(&self) -> ResolvedType {
        ResolvedType::primitive(PrimitiveKind::String)
    }

    /// The native annotation class restricting applicability targets.
    pub fn target_annotation(&self) -> &Arc<ClassDescriptor> {
        &self.target_annotation
    }

    /// The `allowedTargets` parameter of [`Self::target_annotation`].
    pub fn allowed_targets_parameter(&self) -> &ValueParameterDescriptor {
        self.target_annotation
            .parameter(names::ALLOWED_TARGETS_PARAMETER)
            .expect("INVARIANT: target annotation declares allowedTargets")
    }

    /// The enum class whose entries name the applicability targets.
    pub fn annotation_target_enum(&self) -> &Arc<ClassDescriptor> {
        &self.annotation_target
    }

    pub fn target_entry(&self, target: TargetId) -> Option<&Arc<EnumEntryDescriptor>> {
        self.annotation_target.enum_entry(targets::as_str(target))
    }

    pub fn deprecated_annotation(&self) -> &Arc<ClassDescriptor> {
        &self.deprecated_annotation
    }

    /// Every built-in class, for registration with a resolution collaborator.
    pub fn classes(&self) -> [&Arc<ClassDescriptor>; 3] {
        [&self.target_annotation, &self.annotation_target, &self.deprecated_annotation]
    }
}

impl Default for BuiltIns {
    fn default() -> Self {
        Self::new()
    }
}
