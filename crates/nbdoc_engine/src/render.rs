use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena};
use nbdoc_core::{Block, CodeBlock, FailureKind, Inline, RenderedDocument};

use crate::highlight::Highlighter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Full markdown: headings, emphasis, lists, tables, highlighted code.
    #[default]
    Structured,
    /// Degraded mode: strips `###` and `**` markers and shows the text as-is.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("failed to highlight {language} code: {message}")]
    Highlighting { language: String, message: String },
}

impl From<RenderError> for FailureKind {
    fn from(err: RenderError) -> Self {
        FailureKind::RenderFailure {
            message: err.to_string(),
        }
    }
}

/// Turns response text into a [`RenderedDocument`]. Rendering is pure: the
/// same text always yields the same document.
pub struct DocumentRenderer {
    options: comrak::Options<'static>,
    highlighter: Highlighter,
    mode: RenderMode,
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new(RenderMode::default())
    }
}

impl DocumentRenderer {
    pub fn new(mode: RenderMode) -> Self {
        let mut options = comrak::Options::default();
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        Self {
            options,
            highlighter: Highlighter::default(),
            mode,
        }
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn render(&self, text: &str) -> Result<RenderedDocument, RenderError> {
        match self.mode {
            RenderMode::Structured => self.render_structured(text),
            RenderMode::Legacy => Ok(render_legacy(text)),
        }
    }

    fn render_structured(&self, text: &str) -> Result<RenderedDocument, RenderError> {
        let arena = Arena::new();
        let root = parse_document(&arena, text, &self.options);
        let blocks = self.convert_blocks(root)?;
        Ok(RenderedDocument { blocks })
    }

    fn convert_blocks<'a>(&self, parent: &'a AstNode<'a>) -> Result<Vec<Block>, RenderError> {
        let mut blocks = Vec::new();
        for child in children(parent) {
            if let Some(block) = self.convert_block(child)? {
                blocks.push(block);
            }
        }
        Ok(blocks)
    }

    fn convert_block<'a>(&self, node: &'a AstNode<'a>) -> Result<Option<Block>, RenderError> {
        let data = node.data.borrow();
        let block = match &data.value {
            NodeValue::Heading(heading) => Block::Heading {
                level: heading.level,
                content: convert_inlines(node),
            },
            NodeValue::Paragraph => Block::Paragraph(convert_inlines(node)),
            NodeValue::CodeBlock(code) => {
                let language = code
                    .info
                    .split_whitespace()
                    .next()
                    .map(str::to_string);
                let source = code.literal.to_string();
                let highlighted = self
                    .highlighter
                    .highlight_html(language.as_deref(), &source)?;
                Block::Code(CodeBlock {
                    language,
                    syntax_name: highlighted.syntax_name,
                    source,
                    highlighted_html: highlighted.html,
                })
            }
            NodeValue::List(list) => {
                let mut items = Vec::new();
                for item in children(node) {
                    items.push(self.convert_blocks(item)?);
                }
                Block::List {
                    ordered: matches!(list.list_type, ListType::Ordered),
                    start: list.start,
                    items,
                }
            }
            NodeValue::BlockQuote => Block::Quote(self.convert_blocks(node)?),
            NodeValue::Table(_) => Block::Table {
                rows: children(node)
                    .map(|row| children(row).map(convert_inlines).collect())
                    .collect(),
            },
            NodeValue::ThematicBreak => Block::Rule,
            NodeValue::HtmlBlock(html) => Block::Preformatted(html.literal.to_string()),
            NodeValue::FrontMatter(_) => return Ok(None),
            _ => {
                let content = convert_inlines(node);
                if content.is_empty() {
                    return Ok(None);
                }
                Block::Paragraph(content)
            }
        };
        Ok(Some(block))
    }
}

fn children<'a>(node: &'a AstNode<'a>) -> impl Iterator<Item = &'a AstNode<'a>> {
    std::iter::successors(node.first_child(), |child| child.next_sibling())
}

fn convert_inlines<'a>(node: &'a AstNode<'a>) -> Vec<Inline> {
    let mut out = Vec::new();
    for child in children(node) {
        convert_inline(child, &mut out);
    }
    out
}

fn convert_inline<'a>(node: &'a AstNode<'a>, out: &mut Vec<Inline>) {
    let data = node.data.borrow();
    let inline = match &data.value {
        NodeValue::Text(text) => Inline::Text(text.to_string()),
        NodeValue::SoftBreak => Inline::Text(" ".to_string()),
        NodeValue::LineBreak => Inline::LineBreak,
        NodeValue::Code(code) => Inline::Code(code.literal.to_string()),
        NodeValue::HtmlInline(html) => Inline::Text(html.to_string()),
        NodeValue::Emph => Inline::Emphasis(convert_inlines(node)),
        NodeValue::Strong => Inline::Strong(convert_inlines(node)),
        NodeValue::Strikethrough => Inline::Strikethrough(convert_inlines(node)),
        NodeValue::Link(link) => Inline::Link {
            url: link.url.to_string(),
            content: convert_inlines(node),
        },
        NodeValue::Image(image) => Inline::Link {
            url: image.url.to_string(),
            content: convert_inlines(node),
        },
        _ => {
            for child in children(node) {
                convert_inline(child, out);
            }
            return;
        }
    };
    push_inline(out, inline);
}

/// Adjacent text runs are merged so equivalent input gives equal output.
fn push_inline(out: &mut Vec<Inline>, inline: Inline) {
    if let (Some(Inline::Text(prev)), Inline::Text(next)) = (out.last_mut(), &inline) {
        prev.push_str(next);
        return;
    }
    out.push(inline);
}

/// Legacy cleanup: every `###` (and the whitespace after it) and every `**`
/// becomes a single space. The result is shown unparsed.
pub fn render_legacy(text: &str) -> RenderedDocument {
    let mut cleaned = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find("###") {
        cleaned.push_str(&rest[..idx]);
        cleaned.push(' ');
        rest = rest[idx + 3..].trim_start();
    }
    cleaned.push_str(rest);

    RenderedDocument {
        blocks: vec![Block::Preformatted(cleaned.replace("**", " "))],
    }
}
