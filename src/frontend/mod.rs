//! konst analysis frontend
//!
//! This module contains the collaborator contracts and per-pass state the engine works against:
//! - `ast`: expression and declaration tree (from the shared `konst_syntax` crate)
//! - `diagnostics`: user-facing diagnostics and their catalog
//! - `trace`: per-pass memoization slots and diagnostic sink
//! - `types`: resolved types and the built-in declarations registry
//! - `descriptors`: resolved declarations (classes, enum entries, variables, functions, annotations)
//! - `resolution`: resolved calls and the name-resolution contract

// The tree is provided by the shared konst_syntax crate.
pub use konst_syntax::{ast, builder};

pub mod descriptors;
pub mod diagnostics;
pub mod resolution;
pub mod trace;
pub mod types;
