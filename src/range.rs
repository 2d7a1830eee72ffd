//! Compact byte range into the matchable text of an inline sequence.
//!
//! Uses `u32` offsets to save memory (8 bytes vs 16 for usize pair).
//! Inline content is bounded by a single block, far below 4GB.

/// Half-open byte range `[start, end)`.
///
/// # Example
/// ```
/// use mdtree::Range;
///
/// let text = "Hello, World!";
/// let range = Range::new(0, 5);
/// assert_eq!(range.slice_str(text), "Hello");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

// Compile-time size verification
const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a range from usize values.
    ///
    /// # Panics
    /// Panics in debug mode if values exceed u32::MAX.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Get the text this range refers to.
    #[inline]
    pub fn slice_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start_usize()..self.end_usize()]
    }

    /// Length of the range in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Start position as usize.
    #[inline]
    pub const fn start_usize(&self) -> usize {
        self.start as usize
    }

    /// End position as usize.
    #[inline]
    pub const fn end_usize(&self) -> usize {
        self.end as usize
    }

    /// Overlapping part of two ranges, if any bytes are shared.
    #[inline]
    pub fn intersect(&self, other: Range) -> Option<Range> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Range::new(start, end))
    }

    /// Express this range relative to `origin`.
    #[inline]
    pub const fn relative_to(&self, origin: u32) -> Self {
        debug_assert!(origin <= self.start);
        Self {
            start: self.start - origin,
            end: self.end - origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_size() {
        assert_eq!(std::mem::size_of::<Range>(), 8);
    }

    #[test]
    fn test_range_new() {
        let r = Range::new(10, 20);
        assert_eq!(r.start, 10);
        assert_eq!(r.end, 20);
        assert_eq!(r.len(), 10);
        assert!(!r.is_empty());
        assert!(Range::new(5, 5).is_empty());
    }

    #[test]
    fn test_range_slice_str() {
        let text = "Hello, World!";
        assert_eq!(Range::new(7, 12).slice_str(text), "World");
    }

    #[test]
    fn test_range_intersect() {
        let r = Range::new(2, 6);
        assert_eq!(r.intersect(Range::new(4, 10)), Some(Range::new(4, 6)));
        assert_eq!(r.intersect(Range::new(6, 10)), None);
    }

    #[test]
    fn test_range_relative_to() {
        assert_eq!(Range::new(12, 15).relative_to(10), Range::new(2, 5));
    }
}
