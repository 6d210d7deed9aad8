//! Structured display model for generated documentation.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedDocument {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    Code(CodeBlock),
    List { ordered: bool, start: usize, items: Vec<Vec<Block>> },
    Quote(Vec<Block>),
    Table { rows: Vec<Vec<Vec<Inline>>> },
    /// Unparsed text: raw HTML from the response, or the whole response in legacy mode.
    Preformatted(String),
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    /// Untagged inline code, shown as plain monospace.
    Code(String),
    Link { url: String, content: Vec<Inline> },
    LineBreak,
}

/// A fenced code region. `highlighted_html` is produced by the syntax lookup
/// keyed on `language`; untagged blocks are highlighted as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub syntax_name: String,
    pub source: String,
    pub highlighted_html: String,
}

impl RenderedDocument {
    pub fn headings(&self) -> impl Iterator<Item = (u8, String)> + '_ {
        self.blocks.iter().filter_map(|block| match block {
            Block::Heading { level, content } => Some((*level, plain_text(content))),
            _ => None,
        })
    }

    pub fn code_blocks(&self) -> Vec<&CodeBlock> {
        let mut found = Vec::new();
        collect_code(&self.blocks, &mut found);
        found
    }
}

fn collect_code<'a>(blocks: &'a [Block], found: &mut Vec<&'a CodeBlock>) {
    for block in blocks {
        match block {
            Block::Code(code) => found.push(code),
            Block::Quote(inner) => collect_code(inner, found),
            Block::List { items, .. } => {
                for item in items {
                    collect_code(item, found);
                }
            }
            _ => {}
        }
    }
}

/// Flattens inlines to their visible text.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Emphasis(inner) | Inline::Strong(inner) | Inline::Strikethrough(inner) => {
                out.push_str(&plain_text(inner))
            }
            Inline::Link { content, .. } => out.push_str(&plain_text(content)),
            Inline::LineBreak => out.push('\n'),
        }
    }
    out
}
