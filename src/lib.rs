//! mdtree: lightweight markup to document tree parser
//!
//! Parsing runs in two stages:
//! - [`BlockParser`]: a line-oriented recursive state machine that builds
//!   sections, paragraphs, code blocks, quotes and lists.
//! - [`InlineParser`]: rewrites the text of each leaf block into nested
//!   spans (code, escapes, entities, images, links, emphasis) by
//!   repeatedly partitioning it around pattern matches.
//!
//! # Design Principles
//! - One forward pass over the input lines; nested constructs are nested
//!   scopes over a shared cursor
//! - Malformed markup degrades to text; only runaway nesting fails
//! - Resolved inline spans are opaque to later passes

pub mod block;
pub mod cursor;
pub mod entity;
pub mod error;
pub mod escape;
pub mod inline;
pub mod limits;
pub mod range;
pub mod render;
pub mod tree;

// Re-export primary types
pub use block::BlockParser;
pub use entity::{EntityResolver, Html5Entities};
pub use error::{ParseError, Result};
pub use inline::InlineParser;
pub use range::Range;
pub use render::{to_pseudo_xml, XmlWriter};
pub use tree::Document;

use log::debug;

/// Parsing options.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Maximum depth of nested block containers.
    pub max_nesting: usize,
    /// Run the inline engine over leaf blocks.
    pub inline: bool,
    /// Parse emphasis inside link text.
    pub link_text_markup: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_nesting: limits::MAX_BLOCK_NESTING,
            inline: true,
            link_text_markup: true,
        }
    }
}

/// Parse a document with default options.
///
/// This is the primary API for simple use cases.
///
/// # Example
/// ```
/// use mdtree::tree::{Block, Inline, Span};
///
/// let doc = mdtree::parse("# Hello\n\n*World*").unwrap();
/// let Block::Section(section) = &doc.children[0] else { panic!() };
/// assert_eq!(section.level, 1);
/// assert_eq!(
///     section.children,
///     vec![Block::Paragraph(vec![Inline::Span(Span::emphasis(vec![
///         Inline::text_run("World"),
///     ]))])]
/// );
/// ```
pub fn parse(input: &str) -> Result<Document> {
    parse_with_options(input, &Options::default())
}

/// Parse a document with options.
pub fn parse_with_options(input: &str, options: &Options) -> Result<Document> {
    let lines: Vec<&str> = input.lines().collect();
    parse_lines(&lines, options, &Html5Entities)
}

/// Parse pre-split lines, resolving named entities through `resolver`.
///
/// # Example
/// ```
/// use std::collections::HashMap;
///
/// let mut entities = HashMap::new();
/// entities.insert("me".to_string(), "mdtree".to_string());
///
/// let doc = mdtree::parse_lines(&["by &me;"], &mdtree::Options::default(), &entities).unwrap();
/// assert_eq!(doc.text(), "by mdtree");
/// ```
pub fn parse_lines<S: AsRef<str>>(
    lines: &[S],
    options: &Options,
    resolver: &dyn EntityResolver,
) -> Result<Document> {
    let lines: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
    debug!("parsing {} line(s)", lines.len());

    let children = BlockParser::new(&lines)
        .with_max_nesting(options.max_nesting)
        .parse()?;
    let mut document = Document { children };

    if options.inline {
        let parser = InlineParser::new(resolver).with_link_text_markup(options.link_text_markup);
        document.for_each_inlines_mut(|inlines| {
            let children = std::mem::take(inlines);
            *inlines = parser.parse(children);
        });
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Block, Inline, Opaque};

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("").unwrap(), Document::new());
        assert_eq!(parse("\n\n   \n").unwrap(), Document::new());
    }

    #[test]
    fn test_inline_disabled() {
        let options = Options {
            inline: false,
            ..Options::default()
        };
        let doc = parse_with_options("*raw* `text`", &options).unwrap();
        assert_eq!(
            doc.children,
            vec![Block::Paragraph(vec![Inline::text_run("*raw* `text`")])]
        );
    }

    #[test]
    fn test_inline_runs_on_titles_and_plain_items() {
        let doc = parse("# `t`\n\n- `x`").unwrap();
        let Block::Section(section) = &doc.children[0] else {
            panic!("expected section, got {:?}", doc.children[0]);
        };
        assert_eq!(
            section.title,
            Some(vec![Inline::Opaque(Opaque::code(vec![Inline::text_run("t")]))])
        );
        let Block::List(list) = &section.children[0] else {
            panic!("expected list, got {:?}", section.children[0]);
        };
        assert_eq!(
            list.items[0].children,
            vec![Block::Plain(vec![Inline::Opaque(Opaque::code(vec![Inline::text_run("x")]))])]
        );
    }

    #[test]
    fn test_code_block_untouched_by_inline() {
        let doc = parse("```\n*a* &amp;\n```").unwrap();
        assert_eq!(
            doc.children,
            vec![Block::CodeBlock {
                language: None,
                text: "*a* &amp;".into(),
            }]
        );
    }

    #[test]
    fn test_nesting_limit_option() {
        let input = "> ".repeat(8) + "deep";
        let options = Options {
            max_nesting: 4,
            ..Options::default()
        };
        assert!(matches!(
            parse_with_options(&input, &options),
            Err(ParseError::TooDeeplyNested { line: 1, limit: 4 })
        ));
        assert!(parse(&input).is_ok());
    }

    #[test]
    fn test_crlf_lines() {
        let doc = parse("a\r\nb").unwrap();
        assert_eq!(doc.children, vec![Block::Paragraph(vec![Inline::text_run("a\nb")])]);
    }
}
