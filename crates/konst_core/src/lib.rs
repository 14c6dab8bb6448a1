//! Provide the canonical, pure vocabulary shared by the konst constant evaluation engine.
//!
//! This crate is intentionally small and dependency-free. It contains deterministic tables that both:
//! - the evaluator uses to derive operator names and operand kinds, and
//! - the annotation components use to name applicability targets and well-known annotation classes.
//!
//! ## Notes
//!
//! - This is a “vocabulary core” crate: **no IO**, no global mutable state, and no engine-specific types.
//! - Current scope: operator tokens and their convention names, applicability targets, compile-time operand kinds with
//!   numeric promotion, and well-known fully-qualified names.

pub mod lang;

pub use lang::types::primitives::{PrimitiveKind, promote_numeric};
