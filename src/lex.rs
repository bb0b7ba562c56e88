/// The classification of an irreducible piece of an expression.
///
/// `Unset` is only ever produced by the tree builder's fallback path: content
///  the grammar doesn't recognize is kept verbatim instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LeafKind {
    /// A positional placeholder: `?`
    Param,
    /// An integer or single quoted string literal
    Const,
    /// A bare identifier, presumably a column
    Field,
    Unset,
}

/// Characters which, when they appear unescaped inside a quoted region, make
///  us suspect the "string" is actually several strings joined by operators,
///  e.g. `'a' + 'b'` starts and ends with a quote but isn't a single literal.
const SUSPICIOUS_IN_STRING: &[char] = &[
    '(', ')', '+', '-', '*', '/', '=', '<', '>', '!', '&', '|', ',',
];

pub fn is_placeholder(s: &str) -> bool {
    s == "?"
}

/// Integers only, with an optional sign. No fractions or exponents, and it
///  has to fit an `i64`.
pub fn is_numeric_constant(s: &str) -> bool {
    s.parse::<i64>().is_ok()
}

/// This is a heuristic, not an escaping grammar. A quoted region is accepted
///  if it contains a doubled quote (`''`) or none of [SUSPICIOUS_IN_STRING].
pub fn is_string_constant(s: &str) -> bool {
    if s.len() < 2 || !s.starts_with('\'') || !s.ends_with('\'') {
        return false;
    }
    let inner = &s[1..s.len() - 1];
    inner.contains("''") || !inner.contains(SUSPICIOUS_IN_STRING)
}

/// Loose check: any run of ASCII alphanumerics and underscores. A leading
///  digit is allowed here, [crate::naming::is_valid_column_name] is stricter.
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Returns `None` if [s] needs further parsing.
pub fn classify(s: &str) -> Option<LeafKind> {
    if is_placeholder(s) {
        Some(LeafKind::Param)
    } else if is_numeric_constant(s) || is_string_constant(s) {
        Some(LeafKind::Const)
    } else if is_identifier(s) {
        Some(LeafKind::Field)
    } else {
        None
    }
}
