//! Well-known fully-qualified names.
//!
//! These are the annotation classes and members the engine treats specially. Keeping them in one table avoids
//! scattering string literals across the evaluator, the annotation resolver and the binary bridge.

/// Native annotation restricting the applicability targets of an annotation class.
pub const TARGET_ANNOTATION: &str = "kotlin.annotation.target";
/// Parameter of [`TARGET_ANNOTATION`] holding the array of allowed targets.
pub const ALLOWED_TARGETS_PARAMETER: &str = "allowedTargets";
/// Enum class whose entries are the applicability targets.
pub const ANNOTATION_TARGET_ENUM: &str = "kotlin.annotation.AnnotationTarget";
/// Native deprecation annotation.
pub const DEPRECATED_ANNOTATION: &str = "kotlin.deprecated";
/// Type of class-object references (`T::class`).
pub const KCLASS: &str = "kotlin.reflect.KClass";
/// Intrinsic array constructor function.
pub const ARRAY_OF: &str = "kotlin.arrayOf";

/// Host-platform annotation restricting applicability targets.
pub const HOST_TARGET_ANNOTATION: &str = "java.lang.annotation.Target";
/// Enum class of host-platform targets.
pub const HOST_ELEMENT_TYPE_ENUM: &str = "java.lang.annotation.ElementType";
/// Host-platform deprecation annotation.
pub const HOST_DEPRECATED_ANNOTATION: &str = "java.lang.Deprecated";
/// Message synthesized for a host-platform deprecation annotation without arguments.
pub const HOST_DEPRECATED_MESSAGE: &str = "Deprecated in Java";

/// Member an unnamed host-platform annotation argument binds to.
pub const DEFAULT_ANNOTATION_MEMBER: &str = "value";

/// Split a fully-qualified name into its package part and its short name.
///
/// ## Examples
/// ```rust
/// use konst_core::lang::names;
///
/// assert_eq!(names::split("kotlin.annotation.target"), ("kotlin.annotation", "target"));
/// assert_eq!(names::split("Top"), ("", "Top"));
/// ```
pub fn split(fq_name: &str) -> (&str, &str) {
    match fq_name.rfind('.') {
        Some(idx) => (&fq_name[..idx], &fq_name[idx + 1..]),
        None => ("", fq_name),
    }
}

/// Return the short (last segment) name of a fully-qualified name.
pub fn short_name(fq_name: &str) -> &str {
    split(fq_name).1
}
