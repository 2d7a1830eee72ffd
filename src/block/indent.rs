//! Indent normalization for nested block scopes.
//!
//! Every scope owns an [`Indent`]: a column budget (list items, indented
//! code) or a prefix marker (block quotes). A line read inside a scope is
//! passed through the indent of every enclosing scope, outermost first.

use std::borrow::Cow;

use crate::limits::TAB_STOP;

/// Indentation owned by one block scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent {
    /// Columns of leading whitespace stripped from each line.
    pub width: usize,
    /// Marker stripped once per line (`>` for quotes).
    pub marker: Option<char>,
}

impl Indent {
    /// Scope that shares its parent's indentation.
    pub const fn none() -> Self {
        Self {
            width: 0,
            marker: None,
        }
    }

    pub const fn columns(width: usize) -> Self {
        Self {
            width,
            marker: None,
        }
    }

    pub const fn marker(marker: char) -> Self {
        Self {
            width: 0,
            marker: Some(marker),
        }
    }
}

/// Result of normalizing one line against a scope's indent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized<'l> {
    /// Line content with the scope's indent removed. `column` is the
    /// absolute column at which `text` starts.
    Line { text: Cow<'l, str>, column: usize },
    /// The line does not belong to the scope.
    EndOfScope,
}

/// Normalize `line`, which starts at absolute `column`, against `indent`.
///
/// Blank lines are always accepted and come back empty. With `lazy` set, a
/// line that fails the indent is handed through unchanged.
pub fn normalize(line: &str, column: usize, indent: Indent, lazy: bool) -> Normalized<'_> {
    if let Some(marker) = indent.marker {
        return normalize_marker(line, column, marker, lazy);
    }

    if is_blank(line) {
        return blank(column);
    }

    match strip_columns(line, column, indent.width) {
        Some(text) => Normalized::Line {
            text,
            column: column + indent.width,
        },
        None if lazy => Normalized::Line {
            text: Cow::Borrowed(line),
            column,
        },
        None => Normalized::EndOfScope,
    }
}

/// Apply a whole chain of indents, outermost first.
pub fn normalize_chain<'l>(line: &'l str, indents: &[Indent], lazy: bool) -> Normalized<'l> {
    let mut text = Cow::Borrowed(line);
    let mut column = 0;

    for &indent in indents {
        let next = match normalize(&text, column, indent, lazy) {
            Normalized::Line { text, column } => (text.into_owned(), column),
            Normalized::EndOfScope => return Normalized::EndOfScope,
        };
        text = Cow::Owned(next.0);
        column = next.1;
    }

    Normalized::Line { text, column }
}

fn normalize_marker(line: &str, column: usize, marker: char, lazy: bool) -> Normalized<'_> {
    let lead = line.bytes().take_while(|&b| b == b' ').count();

    if lead <= 3 && line[lead..].starts_with(marker) {
        let after = &line[lead + marker.len_utf8()..];
        let marker_end = column + lead + 1;

        if is_blank(after) {
            return blank(marker_end);
        }

        // One column of whitespace after the marker belongs to the marker.
        return match strip_columns(after, marker_end, 1) {
            Some(text) => Normalized::Line {
                text,
                column: marker_end + 1,
            },
            None => Normalized::Line {
                text: Cow::Borrowed(after),
                column: marker_end,
            },
        };
    }

    if is_blank(line) {
        return blank(column);
    }

    if lazy {
        Normalized::Line {
            text: Cow::Borrowed(line),
            column,
        }
    } else {
        Normalized::EndOfScope
    }
}

#[inline]
fn blank<'l>(column: usize) -> Normalized<'l> {
    Normalized::Line {
        text: Cow::Borrowed(""),
        column,
    }
}

/// Whether a line is empty or whitespace only.
#[inline]
pub fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b == b' ' || b == b'\t')
}

/// Strip `n` columns of leading whitespace from `s`, which starts at
/// absolute column `start`.
///
/// Tabs advance to the next tab stop; a tab crossing the boundary leaves its
/// overshoot behind as spaces. Returns `None` when a non-whitespace byte
/// appears inside the window. Tabs past the window are left untouched.
pub fn strip_columns(s: &str, start: usize, n: usize) -> Option<Cow<'_, str>> {
    let target = start + n;
    let mut col = start;

    for (i, b) in s.bytes().enumerate() {
        if col >= target {
            return Some(Cow::Borrowed(&s[i..]));
        }
        match b {
            b' ' => col += 1,
            b'\t' => {
                let next = (col / TAB_STOP + 1) * TAB_STOP;
                if next > target {
                    let mut out = " ".repeat(next - target);
                    out.push_str(&s[i + 1..]);
                    return Some(Cow::Owned(out));
                }
                col = next;
            }
            _ => return None,
        }
    }

    (col >= target).then_some(Cow::Borrowed(""))
}

/// Column reached after the leading whitespace of `s`, starting at `start`.
pub fn leading_columns(s: &str, start: usize) -> usize {
    let mut col = start;
    for b in s.bytes() {
        match b {
            b' ' => col += 1,
            b'\t' => col = (col / TAB_STOP + 1) * TAB_STOP,
            _ => break,
        }
    }
    col - start
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(n: Normalized<'_>) -> String {
        match n {
            Normalized::Line { text, .. } => text.into_owned(),
            Normalized::EndOfScope => panic!("expected a line, got end of scope"),
        }
    }

    #[test]
    fn test_width_zero_is_identity() {
        assert_eq!(text(normalize("  abc", 0, Indent::none(), false)), "  abc");
    }

    #[test]
    fn test_strips_exact_budget() {
        assert_eq!(text(normalize("    abc", 0, Indent::columns(2), false)), "  abc");
    }

    #[test]
    fn test_short_indent_ends_scope() {
        assert_eq!(
            normalize(" abc", 0, Indent::columns(2), false),
            Normalized::EndOfScope
        );
    }

    #[test]
    fn test_lazy_passes_unmodified() {
        assert_eq!(text(normalize("abc", 0, Indent::columns(2), true)), "abc");
    }

    #[test]
    fn test_blank_always_accepted() {
        assert_eq!(text(normalize("   ", 0, Indent::columns(8), false)), "");
        assert_eq!(text(normalize("", 0, Indent::marker('>'), false)), "");
    }

    #[test]
    fn test_tab_expands_inside_window() {
        assert_eq!(text(normalize("\tabc", 0, Indent::columns(4), false)), "abc");
        // Tab reaching column 4 overshoots a 2-column budget by 2.
        assert_eq!(text(normalize("\tabc", 0, Indent::columns(2), false)), "  abc");
    }

    #[test]
    fn test_tab_after_window_untouched() {
        assert_eq!(text(normalize("  a\tb", 0, Indent::columns(2), false)), "a\tb");
    }

    #[test]
    fn test_tab_stop_depends_on_column() {
        // Starting at column 2 the tab only spans two columns.
        assert_eq!(text(normalize("\tabc", 2, Indent::columns(2), false)), "abc");
    }

    #[test]
    fn test_marker_consumed_once() {
        assert_eq!(text(normalize("> > a", 0, Indent::marker('>'), false)), "> a");
        assert_eq!(text(normalize(">a", 0, Indent::marker('>'), false)), "a");
        assert_eq!(text(normalize("   > a", 0, Indent::marker('>'), false)), "a");
    }

    #[test]
    fn test_marker_missing_ends_scope() {
        assert_eq!(
            normalize("a", 0, Indent::marker('>'), false),
            Normalized::EndOfScope
        );
        assert_eq!(text(normalize("a", 0, Indent::marker('>'), true)), "a");
    }

    #[test]
    fn test_marker_only_line_is_blank() {
        assert_eq!(text(normalize(">", 0, Indent::marker('>'), false)), "");
    }

    #[test]
    fn test_chain_applies_outermost_first() {
        let indents = [Indent::marker('>'), Indent::columns(2)];
        assert_eq!(text(normalize_chain(">   item", &indents, false)), "item");
        assert_eq!(
            normalize_chain("> item", &indents, false),
            Normalized::EndOfScope
        );
        assert_eq!(normalize_chain("item", &indents, false), Normalized::EndOfScope);
    }

    #[test]
    fn test_leading_columns() {
        assert_eq!(leading_columns("  \tx", 0), 4);
        assert_eq!(leading_columns("x", 0), 0);
        assert_eq!(leading_columns(" x", 3), 1);
    }
}
