//! Metadata shape shared by the `konst_core::lang` tables.
//!
//! Applicability targets and operand kinds are both closed sets with one canonical spelling and one diagnostic
//! description per entry. [`LangItemInfo`] is that common row; tables that need more per-entry data wrap it.

/// One row of a vocabulary table.
///
/// ## Examples
/// ```rust
/// use konst_core::lang::targets::{self, TargetId};
///
/// let row = targets::info_for(TargetId::ValueParameter).item;
/// assert!(row.is_spelled("VALUE_PARAMETER"));
/// assert!(!row.is_spelled("value_parameter"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    /// Text used when the item is named in a diagnostic.
    pub description: &'static str,
}

impl<Id> LangItemInfo<Id> {
    pub const fn new(id: Id, canonical: &'static str, description: &'static str) -> Self {
        Self {
            id,
            canonical,
            description,
        }
    }

    /// Case-sensitive match against the canonical spelling.
    pub fn is_spelled(&self, spelling: &str) -> bool {
        self.canonical == spelling
    }
}
