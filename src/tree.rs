//! Document tree produced by the parser.
//!
//! Blocks are built by the block state machine; the inline content of
//! paragraphs, plain item content and section titles is rewritten in place
//! by the inline engine afterwards.
//!
//! Inline nodes carry their matchability in the variant itself: [`Inline::Span`]
//! nodes take part in later inline passes, [`Inline::Opaque`] nodes do not.

/// Placeholder for an opaque node in matchable text (U+FFFC).
pub const OPAQUE_MARK: char = '\u{FFFC}';

/// Root of a parsed document (section level 0).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub children: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenated text of every leaf in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.children {
            block.write_text(&mut out);
        }
        out
    }

    /// Visit every inline sequence (titles, paragraphs, plain item content).
    pub fn for_each_inlines_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Vec<Inline>),
    {
        for block in &mut self.children {
            block.for_each_inlines_mut(&mut f);
        }
    }
}

/// Block-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Heading-introduced section.
    Section(Section),
    /// Paragraph of inline content.
    Paragraph(Vec<Inline>),
    /// Inline content without a paragraph wrapper (tight list items).
    Plain(Vec<Inline>),
    /// Fenced or indented code block.
    CodeBlock {
        /// First word of the fence info string.
        language: Option<String>,
        /// Raw lines joined by `\n`.
        text: String,
    },
    /// Block quote holding nested blocks.
    BlockQuote(Vec<Block>),
    /// Bullet or ordered list.
    List(List),
    /// Thematic break (`---`, `***`, `___`).
    ThematicBreak,
}

impl Block {
    /// Concatenated leaf text of this block.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Block::Section(section) => {
                if let Some(title) = &section.title {
                    write_inline_text(title, out);
                }
                for child in &section.children {
                    child.write_text(out);
                }
            }
            Block::Paragraph(inlines) | Block::Plain(inlines) => write_inline_text(inlines, out),
            Block::CodeBlock { text, .. } => out.push_str(text),
            Block::BlockQuote(children) => {
                for child in children {
                    child.write_text(out);
                }
            }
            Block::List(list) => {
                for item in &list.items {
                    for child in &item.children {
                        child.write_text(out);
                    }
                }
            }
            Block::ThematicBreak => {}
        }
    }

    fn for_each_inlines_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Vec<Inline>),
    {
        match self {
            Block::Section(section) => {
                if let Some(title) = &mut section.title {
                    f(title);
                }
                for child in &mut section.children {
                    child.for_each_inlines_mut(f);
                }
            }
            Block::Paragraph(inlines) | Block::Plain(inlines) => f(inlines),
            Block::BlockQuote(children) => {
                for child in children {
                    child.for_each_inlines_mut(f);
                }
            }
            Block::List(list) => {
                for item in &mut list.items {
                    for child in &mut item.children {
                        child.for_each_inlines_mut(f);
                    }
                }
            }
            Block::CodeBlock { .. } | Block::ThematicBreak => {}
        }
    }
}

/// A section opened by a heading, or synthesized for a skipped level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading depth (1-6). Always greater than the enclosing section's.
    pub level: u8,
    /// Heading title; `None` for intermediate sections synthesized when
    /// heading levels are skipped.
    pub title: Option<Vec<Inline>>,
    pub children: Vec<Block>,
}

/// Type of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Bullet list; every item uses the same bullet character.
    Bullet {
        /// One of `-`, `+`, `*`.
        bullet: char,
    },
    /// Ordered list with starting number and delimiter.
    Ordered {
        /// Number of the first item.
        start: u32,
        /// Delimiter character (`.` or `)`).
        delimiter: char,
    },
}

/// A list and its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub kind: ListKind,
    /// No blank line separates items or blocks inside items.
    pub tight: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    pub children: Vec<Block>,
}

/// Inline node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text run.
    Text(String),
    /// Markup span whose text is still visible to later inline passes.
    Span(Span),
    /// Resolved span hidden from later inline passes.
    Opaque(Opaque),
}

impl Inline {
    /// Convenience constructor for a text run.
    pub fn text_run(s: impl Into<String>) -> Self {
        Inline::Text(s.into())
    }

    /// Rendered text, including the content of opaque nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    /// Text seen by inline passes. Each opaque node stands in as a single
    /// [`OPAQUE_MARK`], so patterns see that something is there but can
    /// neither match into it nor split it.
    pub fn matchable_text(&self) -> String {
        let mut out = String::new();
        self.write_matchable_text(&mut out);
        out
    }

    pub(crate) fn write_text(&self, out: &mut String) {
        match self {
            Inline::Text(s) => out.push_str(s),
            Inline::Span(span) => write_inline_text(&span.children, out),
            Inline::Opaque(opaque) => match &opaque.kind {
                OpaqueKind::Image { alt, .. } => out.push_str(alt),
                _ => write_inline_text(&opaque.children, out),
            },
        }
    }

    pub(crate) fn write_matchable_text(&self, out: &mut String) {
        match self {
            Inline::Text(s) => out.push_str(s),
            Inline::Span(span) => {
                for child in &span.children {
                    child.write_matchable_text(out);
                }
            }
            Inline::Opaque(_) => out.push(OPAQUE_MARK),
        }
    }

    /// Length in bytes of [`Inline::matchable_text`].
    pub(crate) fn matchable_len(&self) -> usize {
        match self {
            Inline::Text(s) => s.len(),
            Inline::Span(span) => span.children.iter().map(Inline::matchable_len).sum(),
            Inline::Opaque(_) => OPAQUE_MARK.len_utf8(),
        }
    }
}

/// Concatenated rendered text of an inline sequence.
pub fn inline_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    write_inline_text(inlines, &mut out);
    out
}

fn write_inline_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        inline.write_text(out);
    }
}

/// Kinds of matchable span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Emphasis,
    Strong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub children: Vec<Inline>,
}

impl Span {
    pub fn emphasis(children: Vec<Inline>) -> Self {
        Self { kind: SpanKind::Emphasis, children }
    }

    pub fn strong(children: Vec<Inline>) -> Self {
        Self { kind: SpanKind::Strong, children }
    }
}

/// Kinds of opaque span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpaqueKind {
    /// Code span; children are the raw content.
    Code,
    /// Literal produced by a backslash escape or a literal entity.
    Escaped,
    /// Link wrapping its text.
    Link { uri: String, title: Option<String> },
    /// Image leaf; `alt` is its rendered text.
    Image {
        alt: String,
        uri: String,
        title: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    pub kind: OpaqueKind,
    pub children: Vec<Inline>,
}

impl Opaque {
    pub fn code(children: Vec<Inline>) -> Self {
        Self { kind: OpaqueKind::Code, children }
    }

    pub fn escaped(children: Vec<Inline>) -> Self {
        Self { kind: OpaqueKind::Escaped, children }
    }

    /// Escaped literal holding a single text run.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::escaped(vec![Inline::Text(text.into())])
    }

    pub fn link(uri: String, title: Option<String>, children: Vec<Inline>) -> Self {
        Self {
            kind: OpaqueKind::Link { uri, title },
            children,
        }
    }

    pub fn image(alt: String, uri: String, title: Option<String>) -> Self {
        Self {
            kind: OpaqueKind::Image { alt, uri, title },
            children: Vec::new(),
        }
    }
}
