use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::block::{Block, Document, Inline};
use crate::inline::format_inline;
use crate::segment::{Segment, segment};
use crate::table::recognize;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*]|\d+\.)\s+").expect("Invalid list marker regex"));

/// Parse a full reply into a document.
///
/// Fenced code becomes `CodeBlock`s verbatim; everything between fences goes
/// through the line-based block parser. Never fails.
pub fn parse(reply: &str) -> Document {
    let mut blocks = Vec::new();

    for seg in segment(reply) {
        match seg {
            Segment::Code { language, code } => blocks.push(Block::CodeBlock { language, code }),
            Segment::Prose(text) => blocks.extend(parse_prose(&text)),
        }
    }

    if blocks.is_empty() {
        debug!(len = reply.len(), "reply produced an empty document");
    }
    Document::new(blocks)
}

/// Parse prose (text with no code fences) into blocks.
pub fn parse_prose(text: &str) -> Vec<Block> {
    let mut state = ParseState::default();
    for line in text.lines() {
        state.push_line(line);
    }
    state.finish()
}

/// The block currently being accumulated. Only one can be open at a time.
#[derive(Default)]
enum Open<'a> {
    #[default]
    Nothing,
    Paragraph(Vec<&'a str>),
    List(Vec<Vec<Inline>>),
    Table(Vec<&'a str>),
}

#[derive(Default)]
struct ParseState<'a> {
    blocks: Vec<Block>,
    open: Open<'a>,
}

impl<'a> ParseState<'a> {
    fn push_line(&mut self, line: &'a str) {
        if line.contains('|') {
            match &mut self.open {
                Open::Table(lines) => lines.push(line),
                _ => {
                    self.flush();
                    self.open = Open::Table(vec![line]);
                }
            }
            return;
        }

        if matches!(self.open, Open::Table(_)) {
            self.flush();
        }

        let trimmed = line.trim();

        if let Some((level, text)) = heading(trimmed) {
            self.flush();
            self.blocks.push(Block::Heading {
                level,
                content: format_inline(text),
            });
        } else if let Some(item) = list_item(trimmed) {
            let item = format_inline(item);
            match &mut self.open {
                Open::List(items) => items.push(item),
                _ => {
                    self.flush();
                    self.open = Open::List(vec![item]);
                }
            }
        } else if trimmed.is_empty() {
            self.flush();
        } else {
            match &mut self.open {
                Open::Paragraph(lines) => lines.push(line),
                _ => {
                    self.flush();
                    self.open = Open::Paragraph(vec![line]);
                }
            }
        }
    }

    /// Close whatever block is open. A no-op when nothing is.
    fn flush(&mut self) {
        match std::mem::take(&mut self.open) {
            Open::Nothing => {}
            Open::Paragraph(lines) => self.push_paragraph(&lines),
            Open::List(items) => {
                if !items.is_empty() {
                    self.blocks.push(Block::List { items });
                }
            }
            Open::Table(lines) => match recognize(lines.as_slice()) {
                Some(table) => self.blocks.push(Block::Table(table)),
                // Not a table after all, keep the raw lines as text
                None => self.push_paragraph(&lines),
            },
        }
    }

    fn push_paragraph(&mut self, lines: &[&str]) {
        if lines.is_empty() {
            return;
        }
        self.blocks.push(Block::Paragraph {
            content: format_inline(&lines.join("\n")),
        });
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

/// `#`-run, whitespace, text. Runs longer than six are capped at level 6.
fn heading(line: &str) -> Option<(u8, &str)> {
    let rest = line.trim_start_matches('#');
    let hashes = line.len() - rest.len();
    if hashes == 0 || !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some((hashes.min(6) as u8, text))
}

fn list_item(line: &str) -> Option<&str> {
    LIST_MARKER.find(line).map(|m| &line[m.end()..])
}
