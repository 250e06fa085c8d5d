//! Inline span scanner: emphasis, code spans and links inside one line.
//!
//! Spans are recognized left to right. Code span contents and link URLs are
//! opaque; strong, emphasis and link text are scanned recursively.

use super::theme::{Element, Theme};

pub(crate) struct InlineScanner {
    pub theme: Theme,
    pub escape_html: bool,
}

impl InlineScanner {
    pub fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut prev: Option<char> = None;
        let mut i = 0;

        while i < text.len() {
            let rest = &text[i..];

            if rest.starts_with('`') {
                if let Some((code, consumed)) = code_span(rest) {
                    out.push_str(&self.theme.wrap(Element::Code, &self.text(code)));
                    i += consumed;
                    prev = Some('`');
                    continue;
                }
            } else if rest.starts_with("**") || rest.starts_with("__") {
                let delim = &rest[..2];
                if let Some((inner, consumed)) = delimited(rest, delim) {
                    out.push_str(&self.theme.wrap(Element::Strong, &self.render(inner)));
                    i += consumed;
                } else {
                    out.push_str(&self.text(delim));
                    i += 2;
                }
                prev = delim.chars().last();
                continue;
            } else if rest.starts_with('*') && prev != Some('*') {
                if let Some((inner, consumed)) = emphasis(rest) {
                    out.push_str(&self.theme.wrap(Element::Em, &self.render(inner)));
                    i += consumed;
                    prev = Some('*');
                    continue;
                }
            } else if rest.starts_with('[') {
                if let Some((label, url, consumed)) = link(rest) {
                    let attrs = format!(
                        r#" href="{}""#,
                        if self.escape_html { escape(url) } else { url.to_string() }
                    );
                    out.push_str(&self.theme.open(Element::Link, &attrs_with_target(&attrs)));
                    out.push_str(&self.render(label));
                    out.push_str(&self.theme.close(Element::Link));
                    i += consumed;
                    prev = Some(')');
                    continue;
                }
            }

            let c = rest.chars().next().unwrap_or_default();
            out.push_str(&self.text(&rest[..c.len_utf8()]));
            i += c.len_utf8();
            prev = Some(c);
        }

        out
    }

    fn text(&self, s: &str) -> String {
        if self.escape_html {
            escape(s)
        } else {
            s.to_string()
        }
    }
}

fn attrs_with_target(href: &str) -> String {
    format!(r#"{} target="_blank" rel="noopener noreferrer""#, href)
}

/// `` `code` `` with non-empty content.
fn code_span(s: &str) -> Option<(&str, usize)> {
    let close = s[1..].find('`')? + 1;
    if close == 1 {
        return None;
    }
    Some((&s[1..close], close + 1))
}

/// `**inner**` / `__inner__`, closing at the first delimiter after the
/// opening one.
fn delimited<'a>(s: &'a str, delim: &str) -> Option<(&'a str, usize)> {
    let close = s[2..].find(delim)? + 2;
    if close == 2 {
        return None;
    }
    Some((&s[2..close], close + 2))
}

/// `*inner*` where neither marker touches another `*`.
fn emphasis(s: &str) -> Option<(&str, usize)> {
    if s[1..].starts_with('*') {
        return None;
    }
    let close = s[1..].find('*')? + 1;
    if close == 1 || s[close + 1..].starts_with('*') {
        return None;
    }
    Some((&s[1..close], close + 1))
}

/// `[label](url)` with non-empty label and url.
fn link(s: &str) -> Option<(&str, &str, usize)> {
    let label_end = s[1..].find(']')? + 1;
    if label_end == 1 || !s[label_end + 1..].starts_with('(') {
        return None;
    }
    let url_start = label_end + 2;
    let url_end = s[url_start..].find(')')? + url_start;
    if url_end == url_start {
        return None;
    }
    Some((&s[1..label_end], &s[url_start..url_end], url_end + 1))
}

pub(crate) fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
