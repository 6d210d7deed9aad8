use once_cell::sync::Lazy;
use syntect::{
    easy::HighlightLines,
    highlighting::ThemeSet,
    html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator},
    parsing::{SyntaxReference, SyntaxSet},
    util::{as_24_bit_terminal_escaped, LinesWithEndings},
};

use engine_logging::engine_warn;

use crate::RenderError;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Syntax-aware highlighting keyed by a fence language tag.
#[derive(Debug, Clone)]
pub struct Highlighter {
    class_style: ClassStyle,
    theme: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self {
            class_style: ClassStyle::SpacedPrefixed { prefix: "syntax-" },
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

/// Output of highlighting one code block as HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedHtml {
    pub syntax_name: String,
    pub html: String,
}

impl Highlighter {
    pub fn with_theme(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            ..Self::default()
        }
    }

    /// Name of the syntax `language` resolves to; unknown or missing tags
    /// resolve to plain text.
    pub fn syntax_name(&self, language: Option<&str>) -> String {
        resolve(language).name.clone()
    }

    pub fn highlight_html(
        &self,
        language: Option<&str>,
        code: &str,
    ) -> Result<HighlightedHtml, RenderError> {
        let syntax = resolve(language);
        let lang_token = language.unwrap_or("text");

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, self.class_style);
        for line in LinesWithEndings::from(with_trailing_newline(code).as_str()) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|err| RenderError::Highlighting {
                    language: lang_token.to_string(),
                    message: err.to_string(),
                })?;
        }

        let lang = css_token(lang_token);
        Ok(HighlightedHtml {
            syntax_name: syntax.name.clone(),
            html: format!(
                "<pre class=\"syntax-highlight syntax-lang-{lang}\" data-language=\"{lang}\"><code class=\"language-{lang} syntax-code\">{}</code></pre>",
                generator.finalize()
            ),
        })
    }

    /// CSS for the classes emitted by [`Highlighter::highlight_html`], built
    /// from the configured theme. `None` when the theme is unknown.
    pub fn stylesheet(&self) -> Option<String> {
        let theme = THEME_SET.themes.get(&self.theme)?;
        match css_for_theme_with_class_style(theme, self.class_style) {
            Ok(css) => Some(css),
            Err(err) => {
                engine_warn!("could not build stylesheet for theme {}: {}", self.theme, err);
                None
            }
        }
    }

    /// 24-bit ANSI rendition for terminals. Falls back to the raw source when
    /// the configured theme is unknown.
    pub fn highlight_terminal(
        &self,
        language: Option<&str>,
        code: &str,
    ) -> Result<String, RenderError> {
        let code = with_trailing_newline(code);
        let Some(theme) = THEME_SET.themes.get(&self.theme) else {
            return Ok(code);
        };
        let syntax = resolve(language);
        let mut lines = HighlightLines::new(syntax, theme);
        let mut out = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code.as_str()) {
            let ranges = lines
                .highlight_line(line, &SYNTAX_SET)
                .map_err(|err| RenderError::Highlighting {
                    language: language.unwrap_or("text").to_string(),
                    message: err.to_string(),
                })?;
            out.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        out.push_str("\x1b[0m");
        Ok(out)
    }
}

/// Reduces a fence tag to characters that are safe inside an attribute value.
fn css_token(tag: &str) -> String {
    let token: String = tag
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '#' | '.' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if token.is_empty() {
        "text".to_string()
    } else {
        token
    }
}

fn with_trailing_newline(code: &str) -> String {
    let mut owned = code.to_string();
    if !owned.ends_with('\n') {
        owned.push('\n');
    }
    owned
}

fn resolve(language: Option<&str>) -> &'static SyntaxReference {
    language
        .and_then(find_syntax)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}

fn find_syntax(token: &str) -> Option<&'static SyntaxReference> {
    let lowercase = token.to_ascii_lowercase();
    SYNTAX_SET
        .find_syntax_by_token(&lowercase)
        .or_else(|| SYNTAX_SET.find_syntax_by_name(token))
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(&lowercase))
}
