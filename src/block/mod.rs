//! Block-level parser.
//!
//! The block parser is a line-oriented state machine. Each state is driven
//! by a static transition table ([`grammar`]); nested constructs run as
//! nested scopes over the same line cursor ([`machine`]). It recognizes:
//! - Sections (ATX headings, with skipped levels filled in)
//! - Thematic breaks
//! - Fenced and indented code blocks
//! - Block quotes
//! - Bullet and ordered lists
//! - Paragraphs

pub mod grammar;
pub mod indent;
mod machine;
mod states;

use crate::error::Result;
use crate::limits::MAX_BLOCK_NESTING;
use crate::tree::{Block, ListItem};

use indent::Indent;
use machine::Machine;
use states::SectionScope;

/// Block parser over pre-split input lines.
///
/// # Example
/// ```
/// use mdtree::BlockParser;
/// use mdtree::tree::Block;
///
/// let lines = ["# Title", "", "body"];
/// let blocks = BlockParser::new(&lines).parse().unwrap();
/// assert!(matches!(blocks[0], Block::Section(_)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlockParser<'a> {
    lines: &'a [&'a str],
    max_nesting: usize,
}

impl<'a> BlockParser<'a> {
    /// Create a parser with the default nesting limit.
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self {
            lines,
            max_nesting: MAX_BLOCK_NESTING,
        }
    }

    /// Limit the depth of nested containers (sections, quotes, lists,
    /// list items). The document root counts as one level.
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Parse every line into top-level blocks.
    pub fn parse(&self) -> Result<Vec<Block>> {
        let mut machine = Machine::new(self.lines, self.max_nesting);
        let blocks = machine.run(SectionScope::root(), Indent::none(), None)?;
        debug_assert!(machine.is_eof(), "root scope stopped before end of input");
        Ok(blocks)
    }
}

/// Unwrap the paragraphs of a tight list.
///
/// Items whose only child is a paragraph hold its inline content directly
/// as [`Block::Plain`].
pub fn unwrap_tight_items(items: &mut [ListItem]) {
    for item in items {
        if let [Block::Paragraph(_)] = item.children.as_slice() {
            if let Some(Block::Paragraph(inlines)) = item.children.pop() {
                item.children.push(Block::Plain(inlines));
            }
        }
    }
}
