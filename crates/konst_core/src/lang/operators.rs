//! Operator token vocabulary.
//!
//! This module defines the closed set of operator tokens that can appear at a call site the evaluator folds,
//! together with the operator-convention function names they resolve to (`+` resolves to `plus`, `<` to
//! `compareTo`, and so on).
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - [`OperatorToken::Identifier`] stands for a call spelled by name (`a.compareTo(b)`); it has no spelling.
//! - `&&` and `||` have no convention name: they are folded directly, never through a resolved call.
//!
//! ## Examples
//! ```rust
//! use konst_core::lang::operators::{self, OperatorToken};
//!
//! assert_eq!(operators::from_str("+"), Some(OperatorToken::Plus));
//! assert_eq!(operators::binary_convention_name(OperatorToken::Plus), Some("plus"));
//! assert_eq!(operators::binary_convention_name(OperatorToken::Lt), Some(operators::COMPARE_TO));
//! ```

/// Convention name of the three-way comparison operator.
pub const COMPARE_TO: &str = "compareTo";
/// Convention name of the equality operator.
pub const EQUALS: &str = "equals";
/// Convention name of the division operator.
pub const DIV: &str = "div";

/// Names of the numeric conversion functions. Results produced through them are never pure.
pub const NUMBER_CONVERSIONS: &[&str] = &["toDouble", "toFloat", "toLong", "toInt", "toChar", "toShort", "toByte"];

/// Define whether a token can be used as a prefix (unary) operator, an infix (binary) operator, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    Both,
}

/// Stable identifier for every operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorToken {
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Perc,

    // Comparison
    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    ExclEq,

    // Boolean
    AndAnd,
    OrOr,
    Excl,

    // Increments
    PlusPlus,
    MinusMinus,

    /// A call spelled by its function name.
    Identifier,
}

/// Metadata for an operator token.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub token: OperatorToken,
    pub spellings: &'static [&'static str],
    pub fixity: Fixity,
    /// Function name a binary use of the token resolves to.
    pub binary_convention: Option<&'static str>,
    /// Function name a prefix use of the token resolves to.
    pub unary_convention: Option<&'static str>,
}

/// Registry of all operator tokens.
pub const OPERATORS: &[OperatorInfo] = &[
    // Arithmetic
    op(OperatorToken::Plus, &["+"], Fixity::Both, Some("plus"), Some("unaryPlus")),
    op(OperatorToken::Minus, &["-"], Fixity::Both, Some("minus"), Some("unaryMinus")),
    op(OperatorToken::Mul, &["*"], Fixity::Infix, Some("times"), None),
    op(OperatorToken::Div, &["/"], Fixity::Infix, Some(DIV), None),
    op(OperatorToken::Perc, &["%"], Fixity::Infix, Some("rem"), None),
    // Comparison
    op(OperatorToken::Lt, &["<"], Fixity::Infix, Some(COMPARE_TO), None),
    op(OperatorToken::LtEq, &["<="], Fixity::Infix, Some(COMPARE_TO), None),
    op(OperatorToken::Gt, &[">"], Fixity::Infix, Some(COMPARE_TO), None),
    op(OperatorToken::GtEq, &[">="], Fixity::Infix, Some(COMPARE_TO), None),
    op(OperatorToken::EqEq, &["=="], Fixity::Infix, Some(EQUALS), None),
    op(OperatorToken::ExclEq, &["!="], Fixity::Infix, Some(EQUALS), None),
    // Boolean
    op(OperatorToken::AndAnd, &["&&"], Fixity::Infix, None, None),
    op(OperatorToken::OrOr, &["||"], Fixity::Infix, None, None),
    op(OperatorToken::Excl, &["!"], Fixity::Prefix, None, Some("not")),
    // Increments
    op(OperatorToken::PlusPlus, &["++"], Fixity::Prefix, None, Some("inc")),
    op(OperatorToken::MinusMinus, &["--"], Fixity::Prefix, None, Some("dec")),
    // Named calls
    op(OperatorToken::Identifier, &[], Fixity::Both, None, None),
];

/// Return the full metadata entry for an operator token.
///
/// ## Panics
/// - If the registry is missing an entry for `token` (this indicates a programming error).
pub fn info_for(token: OperatorToken) -> &'static OperatorInfo {
    OPERATORS
        .iter()
        .find(|o| o.token == token)
        .expect("operator info missing")
}

/// Resolve an operator spelling to its token.
///
/// ## Returns
/// - `Some(OperatorToken)` if the spelling exists in [`OPERATORS`].
/// - `None` otherwise (including identifiers: a named call has no spelling).
pub fn from_str(spelling: &str) -> Option<OperatorToken> {
    OPERATORS
        .iter()
        .find(|o| o.spellings.contains(&spelling))
        .map(|o| o.token)
}

/// Return the first spelling of a token, or `"<identifier>"` for named calls.
pub fn as_str(token: OperatorToken) -> &'static str {
    info_for(token).spellings.first().copied().unwrap_or("<identifier>")
}

/// Return the function name a binary use of `token` resolves to.
pub fn binary_convention_name(token: OperatorToken) -> Option<&'static str> {
    info_for(token).binary_convention
}

/// Return the function name a prefix use of `token` resolves to.
pub fn unary_convention_name(token: OperatorToken) -> Option<&'static str> {
    info_for(token).unary_convention
}

/// Check whether `token` is one of the eagerly folded boolean operations (`&&`, `||`).
pub fn is_boolean_operation(token: OperatorToken) -> bool {
    matches!(token, OperatorToken::AndAnd | OperatorToken::OrOr)
}

/// Check whether `name` is one of the numeric conversion functions.
pub fn is_number_conversion(name: &str) -> bool {
    NUMBER_CONVERSIONS.contains(&name)
}

// --- helpers -----------------------------------------------------------------

const fn op(
    token: OperatorToken,
    spellings: &'static [&'static str],
    fixity: Fixity,
    binary_convention: Option<&'static str>,
    unary_convention: Option<&'static str>,
) -> OperatorInfo {
    OperatorInfo {
        token,
        spellings,
        fixity,
        binary_convention,
        unary_convention,
    }
}
