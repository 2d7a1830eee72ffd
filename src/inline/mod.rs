//! Inline markup engine.
//!
//! Rewrites the inline content of a leaf block in a fixed sequence of
//! passes: code spans, backslash escapes, entities, images, links, then
//! emphasis by delimiter precedence. Each pass repeatedly partitions the
//! current children around the first match of its pattern
//! ([`partition`]) and splices in the replacement until nothing matches.

mod backslash;
mod code_span;
mod emphasis;
mod entities;
mod links;
pub mod partition;
pub mod pattern;

use log::{debug, trace};

use crate::entity::{EntityResolver, Html5Entities};
use crate::tree::{Inline, Opaque, Span};
use code_span::CodeSpanPattern;
use emphasis::EmphasisPattern;
use partition::{partition, Partition};
use pattern::InlinePattern;

/// What a pass does with one match.
pub(crate) enum Action {
    /// Replace the match; scanning resumes after the replacement.
    Replace(Vec<Inline>),
    /// Leave the match as it is; scanning resumes after it.
    Keep,
}

/// Lookup table for bytes that can start inline markup.
static SPECIAL_CHARS: [bool; 256] = {
    let mut table = [false; 256];
    table[b'`' as usize] = true; // Code span
    table[b'\\' as usize] = true; // Escape
    table[b'&' as usize] = true; // Entity
    table[b'[' as usize] = true; // Link, image
    table[b'*' as usize] = true; // Emphasis
    table[b'_' as usize] = true; // Emphasis
    table
};

/// Whether any text in `children` could contain markup.
fn has_specials(children: &[Inline]) -> bool {
    children.iter().any(|child| match child {
        Inline::Text(text) => text.bytes().any(|b| SPECIAL_CHARS[b as usize]),
        Inline::Span(span) => has_specials(&span.children),
        Inline::Opaque(_) => false,
    })
}

/// Run one pass: partition `children` by `pattern` until it stops matching.
///
/// After a replacement the search starts over on the new sequence, so a
/// later match may straddle spans built earlier in the same pass. Kept
/// matches are stepped over. Replacements are capped at the initial
/// matchable length; each well-formed one removes at least two delimiter
/// bytes, so only a resolver that reproduces its own input reaches the cap.
pub(crate) fn match_into<P, F>(mut children: Vec<Inline>, pattern: &P, mut replace: F) -> Vec<Inline>
where
    P: InlinePattern + ?Sized,
    F: FnMut(&mut Partition) -> Action,
{
    let mut budget = children.iter().map(Inline::matchable_len).sum::<usize>();
    let mut from = 0;
    while let Some(mut part) = partition(&children, pattern, from) {
        let start = part.span.start_usize();
        match replace(&mut part) {
            Action::Replace(nodes) => {
                trace!("inline replace at {start}: {} node(s)", nodes.len());
                children = part.rejoin(nodes);
                budget = budget.saturating_sub(1);
                if budget == 0 {
                    debug!("inline replacement limit reached at {start}");
                    break;
                }
                from = 0;
            }
            Action::Keep => from = part.span.end_usize(),
        }
    }
    children
}

/// Inline parser.
///
/// # Example
/// ```
/// use mdtree::inline::InlineParser;
/// use mdtree::tree::{Inline, Opaque};
///
/// let parser = InlineParser::default();
/// let out = parser.parse(vec![Inline::text_run("run `ls`")]);
/// assert_eq!(
///     out,
///     vec![
///         Inline::text_run("run "),
///         Inline::Opaque(Opaque::code(vec![Inline::text_run("ls")])),
///     ]
/// );
/// ```
pub struct InlineParser<'r> {
    resolver: &'r dyn EntityResolver,
    link_text_markup: bool,
}

impl Default for InlineParser<'static> {
    fn default() -> Self {
        Self::new(&Html5Entities)
    }
}

impl<'r> InlineParser<'r> {
    /// Create an inline parser resolving named entities through `resolver`.
    pub fn new(resolver: &'r dyn EntityResolver) -> Self {
        Self {
            resolver,
            link_text_markup: true,
        }
    }

    /// Whether emphasis inside link text is parsed (default true).
    pub fn with_link_text_markup(mut self, enabled: bool) -> Self {
        self.link_text_markup = enabled;
        self
    }

    /// Run every pass over `children`.
    pub fn parse(&self, children: Vec<Inline>) -> Vec<Inline> {
        if !has_specials(&children) {
            return children;
        }

        let children = parse_code(children);
        let children = backslash::parse(children);
        let children = entities::parse(children, self.resolver);
        let children = links::parse_images(children);
        let children = links::parse_links(children, |text| {
            if self.link_text_markup {
                parse_emphasis(text)
            } else {
                text
            }
        });
        parse_emphasis(children)
    }
}

fn parse_code(children: Vec<Inline>) -> Vec<Inline> {
    match_into(children, &CodeSpanPattern, |part| match part.take_group(2) {
        Some(content) => Action::Replace(vec![Inline::Opaque(Opaque::code(content))]),
        None => Action::Keep,
    })
}

/// `***` → strong(emphasis), `**`/`__` → strong, `*`/`_` → emphasis.
///
/// Span content is parsed before the span is built, so inner markup nests
/// inside it.
fn parse_emphasis(mut children: Vec<Inline>) -> Vec<Inline> {
    for pattern in EmphasisPattern::by_precedence() {
        children = match_into(children, &pattern, |part| {
            let Some(content) = part.take_group(1) else {
                return Action::Keep;
            };
            let content = parse_emphasis(content);
            let node = match pattern.run() {
                3 => Span::strong(vec![Inline::Span(Span::emphasis(content))]),
                2 => Span::strong(content),
                _ => Span::emphasis(content),
            };
            Action::Replace(vec![Inline::Span(node)])
        });
    }
    children
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::tree::inline_text;

    fn parse(input: &str) -> Vec<Inline> {
        InlineParser::default().parse(vec![Inline::text_run(input)])
    }

    fn text(s: &str) -> Inline {
        Inline::text_run(s)
    }

    fn em(children: Vec<Inline>) -> Inline {
        Inline::Span(Span::emphasis(children))
    }

    fn strong(children: Vec<Inline>) -> Inline {
        Inline::Span(Span::strong(children))
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(parse("unchanging text"), vec![text("unchanging text")]);
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(parse("*emphatic text*"), vec![em(vec![text("emphatic text")])]);
        assert_eq!(parse("*emphatic* text"), vec![em(vec![text("emphatic")]), text(" text")]);
    }

    #[test]
    fn test_strong_and_triple() {
        assert_eq!(parse("__bold__"), vec![strong(vec![text("bold")])]);
        assert_eq!(parse("***both***"), vec![strong(vec![em(vec![text("both")])])]);
    }

    #[test]
    fn test_nested_emphasis_inside_strong_content() {
        assert_eq!(
            parse("**a _b_ c**"),
            vec![strong(vec![text("a "), em(vec![text("b")]), text(" c")])]
        );
    }

    #[test]
    fn test_code_content_is_raw() {
        assert_eq!(
            parse("`*a* &amp;`"),
            vec![Inline::Opaque(Opaque::code(vec![text("*a* &amp;")]))]
        );
    }

    #[test]
    fn test_emphasis_around_code() {
        assert_eq!(
            parse("*`x`*"),
            vec![em(vec![Inline::Opaque(Opaque::code(vec![text("x")]))])]
        );
    }

    #[test]
    fn test_escaped_delimiters_not_emphasis() {
        assert_eq!(inline_text(&parse(r"\*not emphasis\*")), "*not emphasis*");
        assert!(parse(r"\*not emphasis\*").iter().all(|i| !matches!(i, Inline::Span(_))));
    }

    #[test]
    fn test_link_text_markup() {
        let out = parse("[*hi*](u)");
        let expected = Opaque::link("u".into(), None, vec![em(vec![text("hi")])]);
        assert_eq!(out, vec![Inline::Opaque(expected)]);

        let plain = InlineParser::default()
            .with_link_text_markup(false)
            .parse(vec![text("[*hi*](u)")]);
        let expected = Opaque::link("u".into(), None, vec![text("*hi*")]);
        assert_eq!(plain, vec![Inline::Opaque(expected)]);
    }

    #[test]
    fn test_emphasis_does_not_cross_link() {
        let out = parse("*a [b* c](u)");
        assert!(out.iter().all(|i| !matches!(i, Inline::Span(_))));
    }

    #[test]
    fn test_strong_around_link() {
        let out = parse("**[x](u)**");
        let link = Inline::Opaque(Opaque::link("u".into(), None, vec![text("x")]));
        assert_eq!(out, vec![strong(vec![link])]);
    }

    #[test]
    fn test_emphasis_after_escape() {
        assert_eq!(
            parse(r"\\*x*"),
            vec![Inline::Opaque(Opaque::literal("\\")), em(vec![text("x")])]
        );
    }

    #[test]
    fn test_emphasis_before_code() {
        let code = Inline::Opaque(Opaque::code(vec![text("c")]));
        assert_eq!(parse("*x*`c`"), vec![em(vec![text("x")]), code]);
    }

    #[test]
    fn test_rescan_splits_span_from_same_pass() {
        assert_eq!(
            parse("_a *b_ c*"),
            vec![
                em(vec![text("a ")]),
                em(vec![em(vec![text("b")]), text(" c")]),
            ]
        );
    }

    #[test]
    fn test_unknown_entity_before_known_one() {
        assert_eq!(parse("&bogus; &lt;"), vec![text("&bogus; "), text("<")]);
    }

    #[test]
    fn test_resolver_feeding_itself_terminates() {
        let mut table = HashMap::new();
        table.insert("loop".to_owned(), "&loop;".to_owned());
        let out = InlineParser::new(&table).parse(vec![text("&loop;")]);
        assert_eq!(inline_text(&out), "&loop;");
    }

    #[test]
    fn test_has_specials() {
        assert!(!has_specials(&[text("plain words.")]));
        assert!(has_specials(&[em(vec![text("a_b")])]));
        assert!(!has_specials(&[Inline::Opaque(Opaque::literal("*"))]));
    }
}
