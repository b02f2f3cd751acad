//! Declaration cells
//!
//!     Socket and configuration rows declare their element as `type name`, usually wrapped in
//!     backticks to mark a literal identifier:
//!
//!         | Input value sockets | `float a` | First operand
//!
//!     This is a heuristic, not a grammar. A declaration either splits into exactly two
//!     whitespace-separated tokens, or it does not match at all. There is no partial recovery;
//!     callers decide what a failed match means (flow sockets are declared by name alone).

/// Delimiter that marks literal identifiers in table cells.
pub const LITERAL_MARKER: char = '`';

/// A `type name` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub type_name: &'a str,
    pub name: &'a str,
}

/// Split `source` into `(type, name)` if it has exactly two whitespace-separated tokens.
pub fn parse_declaration(source: &str) -> Option<Declaration<'_>> {
    let mut tokens = source.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(type_name), Some(name), None) => Some(Declaration { type_name, name }),
        _ => None,
    }
}

/// Remove a surrounding pair of literal markers.
///
/// The input is trimmed first; if it then starts and ends with the marker, both are dropped and
/// the inside is trimmed again. Otherwise the trimmed input is returned.
pub fn strip_literal_markers(source: &str) -> &str {
    let trimmed = source.trim();
    if trimmed.starts_with(LITERAL_MARKER) && trimmed.ends_with(LITERAL_MARKER) {
        let inner = trimmed
            .strip_prefix(LITERAL_MARKER)
            .and_then(|s| s.strip_suffix(LITERAL_MARKER))
            .unwrap_or("");
        inner.trim()
    } else {
        trimmed
    }
}
