//! Partitioning of mixed inline sequences by a pattern match.
//!
//! The matchable text of every child is concatenated into one target
//! string and each child remembers its range in it. After a match, children
//! are distributed into `left`, one bucket per capture group, and `right`.
//! Children straddling a boundary are sliced: text by substring, spans by
//! recursively slicing their children. Opaque nodes occupy a single
//! placeholder character, so a match boundary never falls inside them.

use smallvec::SmallVec;

use super::pattern::{Groups, InlinePattern};
use crate::tree::{Inline, Span};
use crate::Range;

/// Children split around one match.
#[derive(Debug)]
pub struct Partition {
    pub left: Vec<Inline>,
    pub right: Vec<Inline>,
    /// Whole match within the target text.
    pub span: Range,
    groups: SmallVec<[Option<Vec<Inline>>; 4]>,
    ranges: Groups,
    target: String,
}

impl Partition {
    /// Take the children captured by group `i`. Group 0 is the whole match.
    pub fn take_group(&mut self, i: usize) -> Option<Vec<Inline>> {
        self.groups.get_mut(i)?.take()
    }

    /// Target text matched by group `i`.
    pub fn group_str(&self, i: usize) -> Option<&str> {
        self.ranges.get(i).copied().flatten().map(|r| r.slice_str(&self.target))
    }

    /// `left + nodes + right`.
    pub fn rejoin(self, nodes: Vec<Inline>) -> Vec<Inline> {
        let mut out = self.left;
        out.reserve(nodes.len() + self.right.len());
        out.extend(nodes);
        out.extend(self.right);
        out
    }
}

/// Matchable target text of a sequence.
pub fn target_text(children: &[Inline]) -> String {
    let mut out = String::new();
    for child in children {
        child.write_matchable_text(&mut out);
    }
    out
}

/// Split `children` around the first match of `pattern` at or after `from`.
///
/// Returns `None` when nothing matches; the caller keeps its children.
pub fn partition<P>(children: &[Inline], pattern: &P, from: usize) -> Option<Partition>
where
    P: InlinePattern + ?Sized,
{
    let target = target_text(children);
    let ranges = pattern.search(&target, from)?;
    let span = ranges.first().copied().flatten()?;
    let total = Range::from_usize(0, target.len());

    let left = slice_seq(children, 0, Range::new(0, span.start));
    let right = slice_seq(children, 0, Range::new(span.end, total.end));
    let groups = ranges
        .iter()
        .map(|group| group.map(|range| slice_seq(children, 0, range)))
        .collect();

    Some(Partition {
        left,
        right,
        span,
        groups,
        ranges,
        target,
    })
}

/// Pieces of `children` (starting at `origin`) that fall inside `window`.
fn slice_seq(children: &[Inline], origin: usize, window: Range) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut at = origin;
    for child in children {
        let len = child.matchable_len();
        if let Some(piece) = slice_inline(child, at, window) {
            out.push(piece);
        }
        at += len;
    }
    out
}

/// The part of `inline`, which starts at `at`, that falls inside `window`.
fn slice_inline(inline: &Inline, at: usize, window: Range) -> Option<Inline> {
    let own = Range::from_usize(at, at + inline.matchable_len());
    let cut = own.intersect(window)?;
    if cut == own {
        return Some(inline.clone());
    }

    match inline {
        Inline::Text(text) => {
            let local = cut.relative_to(own.start);
            Some(Inline::Text(local.slice_str(text).to_owned()))
        }
        Inline::Span(span) => {
            let children = slice_seq(&span.children, at, window);
            (!children.is_empty()).then(|| {
                Inline::Span(Span {
                    kind: span.kind,
                    children,
                })
            })
        }
        // Never split; a match boundary cannot fall inside the placeholder.
        Inline::Opaque(_) => Some(inline.clone()),
    }
}
