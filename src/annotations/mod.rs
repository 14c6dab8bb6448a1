//! Annotation support: argument resolution, applicability checks and the compiled-metadata bridge.
//!
//! - `arguments`: source and host-platform annotation arguments → [`AnnotationDescriptor`](crate::frontend::descriptors::AnnotationDescriptor)
//! - `targets`: wrong-target diagnostics
//! - `binary`: constants and annotations read from compiled class metadata

pub mod arguments;
pub mod binary;
pub mod targets;

pub use arguments::{AnnotationArgumentResolver, ForeignAnnotation, ForeignAnnotationArgument};
pub use binary::BinaryAnnotationLoader;
pub use targets::AnnotationTargetChecker;
