//! Error types for catalog extraction

use std::fmt;

/// Fatal extraction failures. Anything recoverable is a diagnostic instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A positional section lookup fell outside the available sections
    MissingSection {
        /// What the section was expected to be, e.g. "Functional Specification"
        role: &'static str,
        /// Title of the node whose children were searched
        parent: String,
        index: usize,
        available: usize,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::MissingSection {
                role,
                parent,
                index,
                available,
            } => write!(
                f,
                "Expected the {} section at index {} of {}, but it has only {} sections",
                role, index, parent, available
            ),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Result alias for extraction
pub type ExtractResult<T> = Result<T, ExtractError>;
