//! Block scanner: splits text into top-level blocks.
//!
//! Fenced code is pulled out first and never reaches the line classifier.
//! Remaining lines are grouped by blank lines, then each line is classified
//! as a heading, rule, quote, list item or paragraph line. Consecutive list
//! items become one list and consecutive paragraph lines one paragraph.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block<'a> {
    Code(String),
    Heading(u8, &'a str),
    Rule,
    Quote(&'a str),
    List(Vec<&'a str>),
    Paragraph(Vec<&'a str>),
}

enum Line<'a> {
    Heading(u8, &'a str),
    Rule,
    Quote(&'a str),
    Item(&'a str),
    Text(&'a str),
}

pub(crate) fn scan(text: &str) -> Vec<Block<'_>> {
    let lines: Vec<&str> = text.split('\n').map(|l| l.trim_end()).collect();
    let mut blocks = Vec::new();
    let mut group: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if is_fence_open(line) {
            if let Some((code, close_line, trailing)) = fenced_code(&lines, i) {
                flush(&mut group, &mut blocks);
                blocks.push(Block::Code(code));
                i = close_line + 1;
                if let Some(rest) = trailing {
                    group.push(rest);
                }
                continue;
            }
        }

        if line.trim().is_empty() {
            flush(&mut group, &mut blocks);
        } else {
            group.push(line);
        }
        i += 1;
    }
    flush(&mut group, &mut blocks);

    blocks
}

/// A line of three backticks followed by an optional alphabetic language tag.
fn is_fence_open(line: &str) -> bool {
    line.strip_prefix("```")
        .map(|lang| lang.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false)
}

/// Collects the body of a fence opened at `open`. Returns the trimmed body,
/// the index of the closing line and any text after the closing backticks.
/// `None` when the fence is never closed.
fn fenced_code<'a>(lines: &[&'a str], open: usize) -> Option<(String, usize, Option<&'a str>)> {
    let mut body: Vec<&str> = Vec::new();

    for (offset, line) in lines[open + 1..].iter().copied().enumerate() {
        if let Some(pos) = line.find("```") {
            body.push(&line[..pos]);
            let rest = line[pos + 3..].trim();
            let trailing = (!rest.is_empty()).then_some(rest);
            return Some((body.join("\n").trim().to_string(), open + 1 + offset, trailing));
        }
        body.push(line);
    }

    None
}

fn flush<'a>(group: &mut Vec<&'a str>, blocks: &mut Vec<Block<'a>>) {
    // at most one list and one paragraph per group, each placed where its
    // first line appeared
    let mut list_at: Option<usize> = None;
    let mut para_at: Option<usize> = None;

    for line in group.drain(..) {
        match classify(line) {
            Line::Item(item) => collect_into(&mut list_at, blocks, item, Block::List),
            Line::Text(t) => collect_into(&mut para_at, blocks, t, Block::Paragraph),
            Line::Heading(level, t) => blocks.push(Block::Heading(level, t)),
            Line::Quote(t) => blocks.push(Block::Quote(t)),
            Line::Rule => blocks.push(Block::Rule),
        }
    }
}

fn collect_into<'a>(
    slot: &mut Option<usize>,
    blocks: &mut Vec<Block<'a>>,
    line: &'a str,
    make: fn(Vec<&'a str>) -> Block<'a>,
) {
    if let Some(Block::List(lines) | Block::Paragraph(lines)) = slot.and_then(|i| blocks.get_mut(i)) {
        lines.push(line);
        return;
    }
    *slot = Some(blocks.len());
    blocks.push(make(vec![line]));
}

fn classify(line: &str) -> Line<'_> {
    for (prefix, level) in [("#### ", 4), ("### ", 3), ("## ", 2), ("# ", 1)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Line::Heading(level, rest);
        }
    }

    if line == "---" {
        return Line::Rule;
    }

    if let Some(rest) = line.strip_prefix("> ") {
        return Line::Quote(rest);
    }

    let stripped = line.trim_start();
    if let Some(item) = stripped
        .strip_prefix("* ")
        .or_else(|| stripped.strip_prefix("- "))
        .or_else(|| ordinal_item(stripped))
    {
        return Line::Item(item);
    }

    Line::Text(line.trim())
}

/// `12. item` -> `item`. Ordinal items render in the same unordered list as
/// bullets.
fn ordinal_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}
