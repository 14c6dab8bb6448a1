#![forbid(unsafe_code)]
//! konst: compile-time constant evaluation and annotation resolution
//!
//! The engine folds resolved expression trees into compile-time constants, resolves annotation arguments from source
//! and from compiled metadata, and checks that annotations sit on targets their classes allow. Parsing, name
//! resolution and type inference are done by collaborators; their results arrive through
//! [`frontend::resolution::Resolution`], and per-pass state lives in a [`frontend::trace::BindingTrace`].
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. "Not a constant" is `None`; an
//!   inconsistency between the tree and the resolution results is [`constants::EvalError`].
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents an engine bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod annotations;
pub mod constants;
pub mod frontend;

pub use frontend::ast;
pub use frontend::diagnostics;

pub use annotations::{AnnotationArgumentResolver, AnnotationTargetChecker, BinaryAnnotationLoader};
pub use constants::{
    CompileTimeConstant, ConstantExpressionEvaluator, ConstantValue, EvalError, NativeValue, OperationRegistry,
    Parameters,
};
pub use frontend::diagnostics::{CompileError, render_error, render_report};
pub use frontend::trace::BindingTrace;
pub use frontend::types::{BuiltIns, ResolvedType};
