use crate::block::{Block, Document, Inline};

const BULLET: &str = "• ";

/// Readable text for the clipboard, with all formatting syntax removed.
///
/// Blocks are separated by a blank line, list items and table rows each take
/// one line, and table cells are tab-separated so they paste into a sheet.
pub fn to_plain_text(doc: &Document) -> String {
    doc.blocks()
        .iter()
        .map(block_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn block_text(block: &Block) -> String {
    match block {
        Block::CodeBlock { code, .. } => code.clone(),
        Block::Heading { content, .. } | Block::Paragraph { content } => inline_text(content),
        Block::List { items } => items
            .iter()
            .map(|item| format!("{BULLET}{}", inline_text(item)))
            .collect::<Vec<_>>()
            .join("\n"),
        Block::Table(table) => std::iter::once(&table.header)
            .chain(&table.rows)
            .map(|row| row_text(row))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn row_text(row: &[Vec<Inline>]) -> String {
    row.iter()
        .map(|cell| inline_text(cell))
        .collect::<Vec<_>>()
        .join("\t")
}

fn inline_text(nodes: &[Inline]) -> String {
    let mut out = String::new();
    push_inline_text(nodes, &mut out);
    out
}

fn push_inline_text(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Bold(inner) | Inline::Italic(inner) => push_inline_text(inner, out),
            Inline::Link { label, .. } => push_inline_text(label, out),
        }
    }
}
