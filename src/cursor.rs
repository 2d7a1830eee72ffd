//! Line cursor shared by every nested block scope.
//!
//! A single cursor walks the input once. Nested scopes advance it while
//! they consume lines; a scope that ends leaves the cursor on the first
//! line it did not consume, so the enclosing scope re-reads that line.

/// A cursor over the input lines.
///
/// # Example
/// ```
/// use mdtree::cursor::Cursor;
///
/// let lines = ["# Title", "", "text"];
/// let mut cursor = Cursor::new(&lines);
///
/// assert_eq!(cursor.peek(), Some("# Title"));
/// cursor.bump();
/// cursor.bump();
/// assert_eq!(cursor.peek(), Some("text"));
/// ```
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    lines: &'a [&'a str],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the first line.
    #[inline]
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, pos: 0 }
    }

    /// Current line offset (0-based).
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// 1-based line number of the current line, for diagnostics.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.pos + 1
    }

    /// Number of lines remaining.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.lines.len() - self.pos
    }

    /// Check if every line has been consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Peek the current line without advancing.
    #[inline]
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Advance by one line.
    #[inline]
    pub fn bump(&mut self) {
        debug_assert!(!self.is_eof());
        self.pos += 1;
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.offset())
            .field("remaining", &self.remaining())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_new() {
        let lines = ["a", "b"];
        let cursor = Cursor::new(&lines);
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.line_number(), 1);
        assert_eq!(cursor.remaining(), 2);
        assert!(!cursor.is_eof());
    }

    #[test]
    fn test_cursor_empty() {
        let cursor = Cursor::new(&[]);
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn test_cursor_bump() {
        let lines = ["a", "b"];
        let mut cursor = Cursor::new(&lines);
        cursor.bump();
        assert_eq!(cursor.peek(), Some("b"));
        assert_eq!(cursor.line_number(), 2);
        cursor.bump();
        assert!(cursor.is_eof());
        assert_eq!(cursor.remaining(), 0);
    }
}
