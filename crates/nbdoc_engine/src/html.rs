use nbdoc_core::{Block, Inline, RenderedDocument};

use crate::highlight::Highlighter;

/// Schemes that can run code when a saved page is opened.
const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "file:", "data:"];
/// `data:` images are inert and stay linkable.
const SAFE_DATA_PREFIXES: &[&str] = &[
    "data:image/png",
    "data:image/gif",
    "data:image/jpeg",
    "data:image/webp",
];

/// Standalone HTML page for a rendered document. Code blocks embed their
/// highlighted markup, styled by the highlighter's theme; everything else is
/// escaped text.
pub fn to_html_page(doc: &RenderedDocument, title: &str, highlighter: &Highlighter) -> String {
    let style = highlighter
        .stylesheet()
        .map(|css| format!("<style>\n{css}</style>\n"))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{style}</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        to_html(doc)
    )
}

pub fn to_html(doc: &RenderedDocument) -> String {
    let mut out = String::new();
    write_blocks(&doc.blocks, &mut out);
    out
}

fn write_blocks(blocks: &[Block], out: &mut String) {
    for block in blocks {
        write_block(block, out);
    }
}

fn write_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            let level = (*level).clamp(1, 6);
            out.push_str(&format!("<h{level}>"));
            write_inlines(content, out);
            out.push_str(&format!("</h{level}>\n"));
        }
        Block::Paragraph(inlines) => {
            out.push_str("<p>");
            write_inlines(inlines, out);
            out.push_str("</p>\n");
        }
        Block::Code(code) => {
            out.push_str(&code.highlighted_html);
            out.push('\n');
        }
        Block::List {
            ordered,
            start,
            items,
        } => {
            if *ordered {
                if *start == 1 {
                    out.push_str("<ol>\n");
                } else {
                    out.push_str(&format!("<ol start=\"{start}\">\n"));
                }
            } else {
                out.push_str("<ul>\n");
            }
            for item in items {
                out.push_str("<li>");
                write_blocks(item, out);
                out.push_str("</li>\n");
            }
            out.push_str(if *ordered { "</ol>\n" } else { "</ul>\n" });
        }
        Block::Quote(inner) => {
            out.push_str("<blockquote>\n");
            write_blocks(inner, out);
            out.push_str("</blockquote>\n");
        }
        Block::Table { rows } => {
            out.push_str("<table>\n");
            for (idx, row) in rows.iter().enumerate() {
                let cell_tag = if idx == 0 { "th" } else { "td" };
                out.push_str("<tr>");
                for cell in row {
                    out.push_str(&format!("<{cell_tag}>"));
                    write_inlines(cell, out);
                    out.push_str(&format!("</{cell_tag}>"));
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</table>\n");
        }
        Block::Preformatted(text) => {
            out.push_str("<pre>");
            out.push_str(&escape(text));
            out.push_str("</pre>\n");
        }
        Block::Rule => out.push_str("<hr>\n"),
    }
}

fn write_inlines(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&escape(text)),
            Inline::LineBreak => out.push_str("<br>\n"),
            Inline::Code(code) => {
                out.push_str("<code>");
                out.push_str(&escape(code));
                out.push_str("</code>");
            }
            Inline::Emphasis(inner) => wrap("em", inner, out),
            Inline::Strong(inner) => wrap("strong", inner, out),
            Inline::Strikethrough(inner) => wrap("del", inner, out),
            Inline::Link { url, content } => {
                let href = if is_unsafe_url(url) { "" } else { url.as_str() };
                out.push_str(&format!("<a href=\"{}\">", escape(href)));
                write_inlines(content, out);
                out.push_str("</a>");
            }
        }
    }
}

fn wrap(tag: &str, inner: &[Inline], out: &mut String) {
    out.push_str(&format!("<{tag}>"));
    write_inlines(inner, out);
    out.push_str(&format!("</{tag}>"));
}

fn is_unsafe_url(url: &str) -> bool {
    let normalized: String = url
        .trim_start()
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    UNSAFE_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
        && !SAFE_DATA_PREFIXES
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
