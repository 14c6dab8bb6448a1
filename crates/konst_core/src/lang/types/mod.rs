//! Builtin type vocabulary.
//!
//! ## Notes
//! - This module is vocabulary only (spellings + metadata + promotion rules), not a type system.

pub mod primitives;
