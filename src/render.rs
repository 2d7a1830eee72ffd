//! Pseudo-XML output of a document tree.
//!
//! One element per block, each on its own line; inline content stays on
//! the line of its enclosing block:
//!
//! ```text
//! <document>
//! <section level="1">
//! <title>Intro</title>
//! <paragraph>Run <literal>ls</literal> <emphasis>now</emphasis>.</paragraph>
//! </section>
//! </document>
//! ```

use crate::escape;
use crate::tree::{Block, Document, Inline, List, ListKind, Opaque, OpaqueKind, Section, SpanKind};

/// Pseudo-XML writer over a pre-allocated buffer.
///
/// # Example
/// ```
/// use mdtree::XmlWriter;
///
/// let mut writer = XmlWriter::with_capacity_for(16);
/// writer.open_tag("paragraph");
/// writer.write_escaped_text("a < b");
/// writer.close_tag("paragraph");
///
/// assert_eq!(writer.into_string(), "<paragraph>a &lt; b</paragraph>");
/// ```
pub struct XmlWriter {
    out: Vec<u8>,
}

impl XmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(1024),
        }
    }

    /// Create with capacity based on the expected source size.
    ///
    /// Markup roughly doubles the size of typical prose.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: Vec::with_capacity(input_len * 2),
        }
    }

    /// Write a static string without escaping.
    #[inline]
    pub fn write_str(&mut self, s: &'static str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    /// Write element content with escaping.
    #[inline]
    pub fn write_escaped_text(&mut self, text: &str) {
        escape::escape_text_into(&mut self.out, text.as_bytes());
    }

    /// Write a newline.
    #[inline]
    pub fn newline(&mut self) {
        self.out.push(b'\n');
    }

    /// Write opening tag: `<name>`
    #[inline]
    pub fn open_tag(&mut self, tag: &'static str) {
        self.out.push(b'<');
        self.write_str(tag);
        self.out.push(b'>');
    }

    /// Write opening tag with attributes: `<name key="value">`
    pub fn open_tag_with(&mut self, tag: &'static str, attrs: &[(&'static str, &str)]) {
        self.out.push(b'<');
        self.write_str(tag);
        self.write_attrs(attrs);
        self.out.push(b'>');
    }

    /// Write closing tag: `</name>`
    #[inline]
    pub fn close_tag(&mut self, tag: &'static str) {
        self.write_str("</");
        self.write_str(tag);
        self.out.push(b'>');
    }

    /// Write empty element: `<name key="value"/>`
    pub fn empty_tag(&mut self, tag: &'static str, attrs: &[(&'static str, &str)]) {
        self.out.push(b'<');
        self.write_str(tag);
        self.write_attrs(attrs);
        self.write_str("/>");
    }

    fn write_attrs(&mut self, attrs: &[(&'static str, &str)]) {
        for &(key, value) in attrs {
            self.out.push(b' ');
            self.write_str(key);
            self.write_str("=\"");
            escape::escape_attr_into(&mut self.out, value.as_bytes());
            self.out.push(b'"');
        }
    }

    /// Take ownership as String.
    #[inline]
    pub fn into_string(self) -> String {
        // SAFETY: only UTF-8 strings and ASCII markup are ever written
        unsafe { String::from_utf8_unchecked(self.out) }
    }

    // --- Tree ---

    /// Write a whole document.
    pub fn document(&mut self, document: &Document) {
        self.open_tag("document");
        self.newline();
        self.blocks(&document.children);
        self.close_tag("document");
        self.newline();
    }

    /// Write a sequence of blocks, one element per line.
    pub fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Section(section) => self.section(section),
            Block::Paragraph(inlines) => {
                self.open_tag("paragraph");
                self.inlines(inlines);
                self.close_tag("paragraph");
                self.newline();
            }
            Block::Plain(inlines) => {
                self.inlines(inlines);
                self.newline();
            }
            Block::CodeBlock { language, text } => {
                match language {
                    Some(language) => self.open_tag_with("literal_block", &[("language", language.as_str())]),
                    None => self.open_tag("literal_block"),
                }
                self.write_escaped_text(text);
                self.close_tag("literal_block");
                self.newline();
            }
            Block::BlockQuote(children) => {
                self.open_tag("block_quote");
                self.newline();
                self.blocks(children);
                self.close_tag("block_quote");
                self.newline();
            }
            Block::List(list) => self.list(list),
            Block::ThematicBreak => {
                self.empty_tag("transition", &[]);
                self.newline();
            }
        }
    }

    fn section(&mut self, section: &Section) {
        let level = section.level.to_string();
        self.open_tag_with("section", &[("level", level.as_str())]);
        self.newline();
        if let Some(title) = &section.title {
            self.open_tag("title");
            self.inlines(title);
            self.close_tag("title");
            self.newline();
        }
        self.blocks(&section.children);
        self.close_tag("section");
        self.newline();
    }

    fn list(&mut self, list: &List) {
        let tag = match list.kind {
            ListKind::Bullet { bullet } => {
                let bullet = bullet.to_string();
                self.open_tag_with("bullet_list", &[("bullet", bullet.as_str())]);
                "bullet_list"
            }
            ListKind::Ordered { start, delimiter } => {
                let start = start.to_string();
                let suffix = delimiter.to_string();
                self.open_tag_with("enumerated_list", &[("start", start.as_str()), ("suffix", suffix.as_str())]);
                "enumerated_list"
            }
        };
        self.newline();
        for item in &list.items {
            self.open_tag("list_item");
            self.newline();
            self.blocks(&item.children);
            self.close_tag("list_item");
            self.newline();
        }
        self.close_tag(tag);
        self.newline();
    }

    /// Write inline content.
    pub fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            match inline {
                Inline::Text(text) => self.write_escaped_text(text),
                Inline::Span(span) => {
                    let tag = match span.kind {
                        SpanKind::Emphasis => "emphasis",
                        SpanKind::Strong => "strong",
                    };
                    self.open_tag(tag);
                    self.inlines(&span.children);
                    self.close_tag(tag);
                }
                Inline::Opaque(opaque) => self.opaque(opaque),
            }
        }
    }

    fn opaque(&mut self, opaque: &Opaque) {
        match &opaque.kind {
            OpaqueKind::Code => {
                self.open_tag("literal");
                self.inlines(&opaque.children);
                self.close_tag("literal");
            }
            OpaqueKind::Escaped => self.inlines(&opaque.children),
            OpaqueKind::Link { uri, title } => {
                match title {
                    Some(title) => self.open_tag_with("reference", &[("refuri", uri.as_str()), ("title", title.as_str())]),
                    None => self.open_tag_with("reference", &[("refuri", uri.as_str())]),
                }
                self.inlines(&opaque.children);
                self.close_tag("reference");
            }
            OpaqueKind::Image { alt, uri, title } => match title {
                Some(title) => self.empty_tag("image", &[("uri", uri.as_str()), ("alt", alt.as_str()), ("title", title.as_str())]),
                None => self.empty_tag("image", &[("uri", uri.as_str()), ("alt", alt.as_str())]),
            },
        }
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a document as pseudo-XML.
///
/// # Example
/// ```
/// let doc = mdtree::parse("Some *text*.").unwrap();
/// assert_eq!(
///     mdtree::to_pseudo_xml(&doc),
///     "<document>\n<paragraph>Some <emphasis>text</emphasis>.</paragraph>\n</document>\n"
/// );
/// ```
pub fn to_pseudo_xml(document: &Document) -> String {
    let mut writer = XmlWriter::new();
    writer.document(document);
    writer.into_string()
}
