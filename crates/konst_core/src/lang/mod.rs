//! konst language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: operator tokens, applicability targets, operand
//! kinds and well-known names.
//!
//! The design goal is to avoid stringly-typed checks scattered across the engine.
//! Instead, callers work with **stable IDs** (e.g. `OperatorToken`, `TargetId`) and look up
//! spellings/metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no tree types, no IO, no side effects.
//!
//! ## Examples
//! ```rust
//! use konst_core::lang::targets::{self, TargetId};
//!
//! assert_eq!(targets::from_str("FIELD"), Some(TargetId::Field));
//! assert_eq!(targets::description(TargetId::Field), "field");
//! ```

pub mod names;
pub mod operators;
pub mod registry;
pub mod targets;
pub mod types;
