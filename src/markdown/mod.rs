//! Markdown to HTML fragment rendering for package READMEs.
//!
//! Handles a deliberately small subset: headings (`#` to `####`), fenced
//! code, bold, italic, inline code, links, blockquotes, horizontal rules,
//! bullet and numbered lists, and paragraphs. Images and badges are dropped.
//!
//! Rendering is best effort and never fails. Raw HTML in the input is passed
//! through as is unless [`MarkdownRenderer::escape_html`] is switched on, so
//! the default output must not be trusted with untrusted input.
//!
//! # Example
//!
//! ```
//! use mcp_directory::markdown::render_markdown;
//!
//! let html = render_markdown("# Title\n\nSome **bold** text.");
//! assert_eq!(html, "<h1>Title</h1>\n<p>Some <strong>bold</strong> text.</p>");
//! ```

mod block;
mod inline;
mod theme;

pub use theme::{Element, Theme};

pub(crate) use inline::escape;

use block::Block;
use inline::InlineScanner;

/// Renders with the [`Theme::Plain`] theme and no escaping.
pub fn render_markdown(text: &str) -> String {
    MarkdownRenderer::new().render(text)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer {
    theme: Theme,
    escape_html: bool,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer using the directory's utility classes.
    pub fn styled() -> Self {
        Self {
            theme: Theme::Styled,
            escape_html: false,
        }
    }

    /// Escape `&`, `<`, `>` and `"` in text and code instead of passing them
    /// through.
    pub fn escape_html(mut self, escape: bool) -> Self {
        self.escape_html = escape;
        self
    }

    /// Top-level blocks are joined with `\n` in source order.
    pub fn render(&self, text: &str) -> String {
        let text = strip_images(&text.replace("\r\n", "\n"));
        let inline = InlineScanner {
            theme: self.theme,
            escape_html: self.escape_html,
        };

        block::scan(&text)
            .into_iter()
            .map(|block| self.render_block(&inline, block))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_block(&self, inline: &InlineScanner, block: Block<'_>) -> String {
        let theme = self.theme;
        match block {
            Block::Code(code) => {
                let code = if self.escape_html {
                    inline::escape(&code)
                } else {
                    code
                };
                theme.wrap(Element::Pre, &format!("<code>{}</code>", code))
            }
            Block::Heading(level, text) => theme.wrap(Element::Heading(level), &inline.render(text)),
            Block::Rule => theme.rule(),
            Block::Quote(text) => theme.wrap(Element::Blockquote, &inline.render(text)),
            Block::List(items) => {
                let items: String = items
                    .into_iter()
                    .map(|item| theme.wrap(Element::ListItem, &inline.render(item)))
                    .collect();
                theme.wrap(Element::List, &items)
            }
            Block::Paragraph(lines) => {
                let content = lines
                    .into_iter()
                    .map(|line| inline.render(line))
                    .collect::<Vec<_>>()
                    .join("<br />");
                theme.wrap(Element::Paragraph, &content)
            }
        }
    }
}

/// Removes `![alt](url)` spans. A span never crosses a line break.
fn strip_images(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("![") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match image_len(candidate) {
            Some(len) => rest = &candidate[len..],
            None => {
                out.push('!');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);

    out
}

fn image_len(s: &str) -> Option<usize> {
    let line = s.split('\n').next().unwrap_or(s);
    let mid = line[2..].find("](")? + 2;
    let close = line[mid + 2..].find(')')? + mid + 2;
    Some(close + 1)
}
