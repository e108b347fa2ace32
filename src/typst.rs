use crate::block::{Block, Document, Inline, Table};
use crate::config::Config;

/// Convert a document to Typst markup for the print export.
pub fn to_typst(doc: &Document, config: &Config) -> String {
    let mut out = String::new();
    emit_preamble(config, &mut out);

    let blocks = doc.blocks();
    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        match block {
            Block::Heading { .. } => {
                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emit_block(block, &mut out);

                if i + 1 < blocks.len() {
                    i += 1;
                    emit_block(&blocks[i], &mut out);
                }
                out.push_str("]\n\n");
            }
            _ => emit_block(block, &mut out),
        }

        i += 1;
    }

    out
}

fn emit_preamble(config: &Config, out: &mut String) {
    out.push_str("#set document(title: ");
    push_string_literal(&config.document.title, out);
    out.push_str(")\n");
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    if config.page.numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    out.push_str("#show link: set text(fill: rgb(");
    push_string_literal(&config.links.color, out);
    out.push_str("))\n");
    if config.links.underline {
        out.push_str("#show link: underline\n");
    }
    out.push('\n');
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            for _ in 0..*level {
                out.push('=');
            }
            out.push(' ');
            inlines_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::Paragraph { content } => {
            inlines_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::CodeBlock { language, code } => {
            // Keep code blocks together when possible
            let fence = raw_fence(code);
            out.push_str("#block(breakable: false)[\n");
            out.push_str(&fence);
            if let Some(lang) = language {
                out.push_str(lang);
            }
            out.push('\n');
            out.push_str(code);
            if !code.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&fence);
            out.push_str("\n]\n\n");
        }
        Block::List { items } => {
            // Small lists stay on one page, long ones may break
            let small = items.len() <= 5;
            if small {
                out.push_str("#block(breakable: false)[\n");
            }
            for item in items {
                out.push_str("- ");
                inlines_to_typst(item, out);
                out.push('\n');
            }
            out.push_str(if small { "]\n\n" } else { "\n" });
        }
        Block::Table(table) => {
            out.push_str("#block(breakable: false)[\n");
            table_to_typst(table, out);
            out.push_str("]\n\n");
        }
    }
}

/// A backtick fence longer than any backtick run inside the code.
fn raw_fence(code: &str) -> String {
    let longest = code
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

fn push_string_literal(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out.push('"');
}

fn push_escaped_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '-' | '+'
            | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

fn inlines_to_typst(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        inline_to_typst(node, out);
    }
}

fn inline_to_typst(node: &Inline, out: &mut String) {
    match node {
        Inline::Text(text) => push_escaped_text(text, out),
        Inline::Bold(inner) => call_with_content("strong", inner, out),
        Inline::Italic(inner) => call_with_content("emph", inner, out),
        Inline::Code(code) => {
            // Code spans never contain backticks
            out.push('`');
            out.push_str(code);
            out.push('`');
        }
        Inline::Link { label, href } => {
            out.push_str("#link(");
            push_string_literal(href, out);
            out.push_str(")[");
            inlines_to_typst(label, out);
            // `;` ends the embedded expression so following text is not a field access
            out.push_str("];");
        }
    }
}

/// `#func[...]` instead of `*`/`_` markup, which does not open or close next to a word character.
fn call_with_content(func: &str, inner: &[Inline], out: &mut String) {
    out.push('#');
    out.push_str(func);
    out.push('[');
    inlines_to_typst(inner, out);
    out.push_str("];");
}

fn table_to_typst(table: &Table, out: &mut String) {
    let col_count = table.columns();
    if col_count == 0 {
        return;
    }

    out.push_str("#table(\n");
    out.push_str(&format!("  columns: {},\n", col_count));

    // Header cells (bold)
    for cell in &table.header {
        out.push_str("  [");
        call_with_content("strong", cell, out);
        out.push_str("],\n");
    }

    for row in &table.rows {
        for cell in row {
            out.push_str("  [");
            inlines_to_typst(cell, out);
            out.push_str("],\n");
        }
    }

    out.push_str(")\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    const PREAMBLE: &str = "#set document(title: \"AI Assistant Response\")\n\
        #set par(linebreaks: \"optimized\")\n\
        #show link: set text(fill: rgb(\"#2563eb\"))\n\n";

    fn typst(reply: &str) -> String {
        to_typst(&parse(reply), &Config::default())
    }

    #[test]
    fn heading_with_following_content() {
        assert_eq!(
            typst("# Title\n\nSome text."),
            format!("{PREAMBLE}#block(breakable: false)[\n= Title\n\nSome text.\n\n]\n\n")
        );
    }

    #[test]
    fn capped_heading() {
        assert_eq!(
            typst("####### Deep"),
            format!("{PREAMBLE}#block(breakable: false)[\n====== Deep\n\n]\n\n")
        );
    }

    #[test]
    fn inline_formatting() {
        assert_eq!(
            typst("**bold** *it* `x` [docs](https://a.b)"),
            format!("{PREAMBLE}#strong[bold]; #emph[it]; `x` #link(\"https://a.b\")[docs];\n\n")
        );
    }

    #[test]
    fn emphasis_touching_words() {
        assert_eq!(
            typst("x*y* z"),
            format!("{PREAMBLE}x#emph[y]; z\n\n")
        );
        assert_eq!(typst("**x**y"), format!("{PREAMBLE}#strong[x];y\n\n"));
    }

    #[test]
    fn bold_header_cell_followed_by_text() {
        let out = typst("| **x**y |\n|---|");
        assert!(out.contains("  [#strong[#strong[x];y];],\n"));
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(typst("a # b @c"), format!("{PREAMBLE}a \\# b \\@c\n\n"));
    }

    #[test]
    fn code_block() {
        assert_eq!(
            typst("```rust\nlet x = 1;\n```"),
            format!("{PREAMBLE}#block(breakable: false)[\n```rust\nlet x = 1;\n```\n]\n\n")
        );
    }

    #[test]
    fn code_block_containing_fence() {
        let out = typst("```md\n```inner```\n```");
        assert!(out.contains("````md\n```inner```\n````"));
    }

    #[test]
    fn list() {
        assert_eq!(
            typst("- one\n1. two"),
            format!("{PREAMBLE}#block(breakable: false)[\n- one\n- two\n]\n\n")
        );
    }

    #[test]
    fn table() {
        let expected = format!(
            "{PREAMBLE}#block(breakable: false)[\n#table(\n  columns: 2,\n  [#strong[A];],\n  [#strong[B];],\n  [1],\n  [2],\n)\n]\n\n"
        );
        assert_eq!(typst("| A | B |\n|---|---|\n| 1 | 2 |"), expected);
    }

    #[test]
    fn page_numbers_and_underline() {
        let mut config = Config::default();
        config.page.numbers = true;
        config.links.underline = true;
        let out = to_typst(&parse("x"), &config);
        assert!(out.contains("#set page(numbering: \"1\")\n"));
        assert!(out.contains("#show link: underline\n"));
    }
}
