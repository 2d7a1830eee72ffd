//! Errors surfaced by the parser.
//!
//! Malformed markup never fails a parse; it degrades to literal text.
//! Exceeding the nesting limit is the only fatal condition.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Block containers (sections, quotes, lists) nest deeper than allowed.
    #[error("block nesting exceeds {limit} levels at line {line}")]
    TooDeeplyNested {
        /// 1-based input line where the limit was hit.
        line: usize,
        /// Configured nesting limit.
        limit: usize,
    },
}

pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ParseError::TooDeeplyNested { line: 7, limit: 32 };
        assert_eq!(err.to_string(), "block nesting exceeds 32 levels at line 7");
    }
}
