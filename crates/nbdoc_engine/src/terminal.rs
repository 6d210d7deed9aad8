use nbdoc_core::{plain_text, Block, CodeBlock, Inline, RenderedDocument};

use crate::highlight::Highlighter;

const BOLD: &str = "\x1b[1m";
const ITALIC: &str = "\x1b[3m";
const STRIKE: &str = "\x1b[9m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Formats a rendered document for a terminal. With `color` off the output is
/// plain text apart from the layout.
pub fn format_terminal(doc: &RenderedDocument, highlighter: &Highlighter, color: bool) -> String {
    let mut writer = TerminalWriter {
        out: String::new(),
        highlighter,
        color,
    };
    writer.blocks(&doc.blocks, "");
    writer.out
}

struct TerminalWriter<'h> {
    out: String,
    highlighter: &'h Highlighter,
    color: bool,
}

impl TerminalWriter<'_> {
    fn blocks(&mut self, blocks: &[Block], indent: &str) {
        for (idx, block) in blocks.iter().enumerate() {
            if idx > 0 {
                self.out.push('\n');
            }
            self.block(block, indent);
        }
    }

    fn block(&mut self, block: &Block, indent: &str) {
        match block {
            Block::Heading { level, content } => {
                let text = plain_text(content);
                let styled = self.styled(BOLD, &text);
                match level {
                    1 | 2 => {
                        let underline = if *level == 1 { '=' } else { '-' };
                        self.line(indent, &styled);
                        let rule: String =
                            std::iter::repeat(underline).take(text.chars().count()).collect();
                        self.line(indent, &rule);
                    }
                    _ => {
                        let marks = "#".repeat(usize::from(*level));
                        self.line(indent, &format!("{marks} {styled}"));
                    }
                }
            }
            Block::Paragraph(inlines) => {
                let text = self.inlines(inlines);
                for line in text.lines() {
                    self.line(indent, line);
                }
            }
            Block::Code(code) => self.code(code, indent),
            Block::List {
                ordered,
                start,
                items,
            } => {
                for (offset, item) in items.iter().enumerate() {
                    let marker = if *ordered {
                        format!("{}. ", start + offset)
                    } else {
                        "- ".to_string()
                    };
                    let nested = format!("{indent}{}", " ".repeat(marker.len()));
                    let mut item_writer = TerminalWriter {
                        out: String::new(),
                        highlighter: self.highlighter,
                        color: self.color,
                    };
                    item_writer.blocks(item, "");
                    for (line_idx, line) in item_writer.out.lines().enumerate() {
                        if line_idx == 0 {
                            self.line(indent, &format!("{marker}{line}"));
                        } else if line.is_empty() {
                            self.out.push('\n');
                        } else {
                            self.line(&nested, line);
                        }
                    }
                }
            }
            Block::Quote(inner) => {
                let quoted = format!("{indent}> ");
                self.blocks(inner, &quoted);
            }
            Block::Table { rows } => {
                for row in rows {
                    let cells: Vec<String> = row.iter().map(|cell| self.inlines(cell)).collect();
                    self.line(indent, &format!("| {} |", cells.join(" | ")));
                }
            }
            Block::Preformatted(text) => {
                for line in text.lines() {
                    self.line(indent, line);
                }
            }
            Block::Rule => self.line(indent, "────────────────────────────────────────"),
        }
    }

    fn code(&mut self, code: &CodeBlock, indent: &str) {
        let label = code.language.as_deref().unwrap_or("");
        let fence = format!("```{label}");
        let fence = self.styled(DIM, &fence);
        self.line(indent, &fence);
        let body = if self.color {
            self.highlighter
                .highlight_terminal(code.language.as_deref(), &code.source)
                .unwrap_or_else(|_| code.source.clone())
        } else {
            code.source.clone()
        };
        for line in body.lines() {
            self.line(indent, line);
        }
        let closing = self.styled(DIM, "```");
        self.line(indent, &closing);
    }

    fn inlines(&self, inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(text) => out.push_str(text),
                Inline::LineBreak => out.push('\n'),
                Inline::Code(code) => out.push_str(&format!("`{code}`")),
                Inline::Emphasis(inner) => out.push_str(&self.styled(ITALIC, &self.inlines(inner))),
                Inline::Strong(inner) => out.push_str(&self.styled(BOLD, &self.inlines(inner))),
                Inline::Strikethrough(inner) => {
                    out.push_str(&self.styled(STRIKE, &self.inlines(inner)))
                }
                Inline::Link { url, content } => {
                    let text = self.inlines(content);
                    if text == *url {
                        out.push_str(url);
                    } else {
                        out.push_str(&format!("{text} ({url})"));
                    }
                }
            }
        }
        out
    }

    fn styled(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, indent: &str, text: &str) {
        self.out.push_str(indent);
        self.out.push_str(text);
        self.out.push('\n');
    }
}
