//! Annotation applicability target vocabulary.
//!
//! An applicability target is one syntactic position category an annotation may legally be attached to. The set is
//! closed; each entry has a canonical upper-case name (the name of the matching entry of the `AnnotationTarget` enum
//! class), a human-readable description used in diagnostics, and an `is_default` flag.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and only accepts canonical names.
//! - [`TargetSet::DEFAULT`] is the set used when an annotation class declares no restriction.
//!
//! ## Examples
//! ```rust
//! use konst_core::lang::targets::{self, TargetId, TargetSet};
//!
//! assert_eq!(targets::from_str("CLASSIFIER"), Some(TargetId::Classifier));
//! assert!(TargetSet::DEFAULT.contains(TargetId::Field));
//! assert!(!TargetSet::DEFAULT.contains(TargetId::Expression));
//! ```

use std::fmt;

use super::registry::LangItemInfo;

/// Stable identifier for every applicability target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetId {
    Package,
    Classifier,
    AnnotationClass,
    TypeParameter,
    Property,
    Field,
    LocalVariable,
    ValueParameter,
    Constructor,
    Function,
    PropertyGetter,
    PropertySetter,
    Type,
    Expression,
    File,
}

/// Metadata for an applicability target.
#[derive(Debug, Clone, Copy)]
pub struct TargetInfo {
    pub item: LangItemInfo<TargetId>,
    pub is_default: bool,
}

/// Registry of all applicability targets, in declaration order.
pub const TARGETS: &[TargetInfo] = &[
    info(TargetId::Package, "PACKAGE", "package", true),
    info(TargetId::Classifier, "CLASSIFIER", "classifier", true),
    info(TargetId::AnnotationClass, "ANNOTATION_CLASS", "annotation class", true),
    info(TargetId::TypeParameter, "TYPE_PARAMETER", "type parameter", false),
    info(TargetId::Property, "PROPERTY", "property", true),
    info(TargetId::Field, "FIELD", "field", true),
    info(TargetId::LocalVariable, "LOCAL_VARIABLE", "local variable", true),
    info(TargetId::ValueParameter, "VALUE_PARAMETER", "value parameter", true),
    info(TargetId::Constructor, "CONSTRUCTOR", "constructor", true),
    info(TargetId::Function, "FUNCTION", "function", true),
    info(TargetId::PropertyGetter, "PROPERTY_GETTER", "getter", true),
    info(TargetId::PropertySetter, "PROPERTY_SETTER", "setter", true),
    info(TargetId::Type, "TYPE", "type usage", false),
    info(TargetId::Expression, "EXPRESSION", "expression", false),
    info(TargetId::File, "FILE", "file", false),
];

/// Description used when a declaration has no actual target at all.
pub const UNIDENTIFIED_TARGET: &str = "unidentified target";

/// Host-platform element types and the native targets they stand for.
///
/// `METHOD` covers functions and both accessors; the compiled-class bridge only keeps the first entry of each list.
pub const HOST_ELEMENT_TYPES: &[(&str, &[TargetId])] = &[
    ("PACKAGE", &[TargetId::Package]),
    ("TYPE", &[TargetId::Classifier]),
    ("ANNOTATION_TYPE", &[TargetId::AnnotationClass]),
    ("TYPE_PARAMETER", &[TargetId::TypeParameter]),
    ("FIELD", &[TargetId::Field]),
    ("LOCAL_VARIABLE", &[TargetId::LocalVariable]),
    ("PARAMETER", &[TargetId::ValueParameter]),
    ("CONSTRUCTOR", &[TargetId::Constructor]),
    ("METHOD", &[TargetId::Function, TargetId::PropertyGetter, TargetId::PropertySetter]),
    ("TYPE_USE", &[TargetId::Type]),
];

/// Map a host-platform element type name (e.g. `"METHOD"`) to native targets; unknown names map to nothing.
pub fn from_host_element_type(name: &str) -> &'static [TargetId] {
    HOST_ELEMENT_TYPES
        .iter()
        .find(|(host, _)| *host == name)
        .map(|(_, targets)| *targets)
        .unwrap_or(&[])
}

/// Resolve a canonical target name (e.g. `"FIELD"`) to its identifier.
pub fn from_str(name: &str) -> Option<TargetId> {
    TARGETS.iter().find(|t| t.item.is_spelled(name)).map(|t| t.item.id)
}

/// Return the canonical name of a target.
pub fn as_str(id: TargetId) -> &'static str {
    info_for(id).item.canonical
}

/// Return the diagnostic description of a target (e.g. `"value parameter"`).
pub fn description(id: TargetId) -> &'static str {
    info_for(id).item.description
}

/// Return the full metadata entry for a target.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: TargetId) -> &'static TargetInfo {
    TARGETS.iter().find(|t| t.item.id == id).expect("target info missing")
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(as_str(*self))
    }
}

/// An immutable set of targets, small enough to be `Copy` and built in `const` context.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TargetSet(u16);

impl TargetSet {
    pub const EMPTY: TargetSet = TargetSet(0);
    /// Every target whose `is_default` flag is set.
    pub const DEFAULT: TargetSet = default_set();
    /// Every target.
    pub const ALL: TargetSet = all_set();

    const fn bit(id: TargetId) -> u16 {
        1 << (id as u16)
    }

    pub const fn with(self, id: TargetId) -> TargetSet {
        TargetSet(self.0 | Self::bit(id))
    }

    pub const fn contains(self, id: TargetId) -> bool {
        self.0 & Self::bit(id) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = TargetId> {
        TARGETS.iter().map(|t| t.item.id).filter(move |id| self.contains(*id))
    }
}

impl FromIterator<TargetId> for TargetSet {
    fn from_iter<I: IntoIterator<Item = TargetId>>(iter: I) -> Self {
        iter.into_iter().fold(TargetSet::EMPTY, TargetSet::with)
    }
}

impl fmt::Debug for TargetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// --- helpers -----------------------------------------------------------------

const fn default_set() -> TargetSet {
    let mut set = TargetSet::EMPTY;
    let mut i = 0;
    while i < TARGETS.len() {
        if TARGETS[i].is_default {
            set = set.with(TARGETS[i].item.id);
        }
        i += 1;
    }
    set
}

const fn all_set() -> TargetSet {
    let mut set = TargetSet::EMPTY;
    let mut i = 0;
    while i < TARGETS.len() {
        set = set.with(TARGETS[i].item.id);
        i += 1;
    }
    set
}

const fn info(id: TargetId, canonical: &'static str, description: &'static str, is_default: bool) -> TargetInfo {
    TargetInfo {
        item: LangItemInfo::new(id, canonical, description),
        is_default,
    }
}
