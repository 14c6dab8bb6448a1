//! Syntax tree consumed by the konst constant evaluation engine.
//!
//! This crate is dependency-light: it only defines the expression and declaration tree (with stable node identities)
//! and a builder for constructing it. Lexing and parsing belong to the host compiler.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it does not do name resolution, type checking, or evaluation.
//! - Operator identity comes from `konst_core::lang::operators`.
//!
//! ## Examples
//! ```rust
//! use konst_syntax::builder::AstBuilder;
//!
//! let mut b = AstBuilder::new();
//! let one = b.int("1");
//! let two = b.int("2");
//! assert_ne!(one.id, two.id);
//! ```

pub mod ast;
pub mod builder;
