//! Standalone HTML export.
//!
//! Produces one self-contained file: the document body wrapped in a fixed
//! page chrome with an embedded stylesheet, so a downloaded reply renders the
//! same without the app.
//!
//! | Node       | HTML                                                    |
//! |------------|---------------------------------------------------------|
//! | CodeBlock  | `<pre>` with a language badge and `<code>`              |
//! | Heading    | `<h1>`..`<h6>`                                          |
//! | Paragraph  | `<p>`, source line breaks kept via `white-space`        |
//! | List       | `<ul>` of `<li>`                                        |
//! | Table      | `.table-wrapper` with scroll hint, `<table>`, size footer |
//! | Code       | `<code>`                                                |
//! | Bold       | `<strong>`                                              |
//! | Italic     | `<em>`                                                  |
//! | Link       | `<a target="_blank" rel="noopener noreferrer">`         |

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::block::{Block, Document, Inline, Table};
use crate::config::Config;

const STYLESHEET: &str = include_str!("html.css");

const SCROLL_ICON: &str = r#"<svg class="scroll-icon" viewBox="0 0 24 24"><path d="M4 8V4m0 0h4M4 4l5 5m11-1V4m0 0h-4m4 0l-5 5M4 16v4m0 0h4m-4 0l5-5m11 5l-5-5m5 5v-4m0 4h-4"/></svg>"#;

/// Render a document as a complete HTML page.
pub fn to_html(doc: &Document, config: &Config) -> String {
    let mut body = String::new();
    for block in doc {
        emit_block(block, config, &mut body);
    }
    wrap_in_page(&body, config)
}

fn wrap_in_page(body: &str, config: &Config) -> String {
    let title = encode_text(&config.document.title);
    let link_css = format!(
        "a {{ color: {}; text-decoration: {}; }}",
        config.links.color,
        if config.links.underline { "underline" } else { "none" }
    );
    let custom_css = &config.html.custom_css;

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
{STYLESHEET}
{link_css}
{custom_css}
  </style>
</head>
<body>
<div class="container">
<div class="markdown-content">
{body}</div>
</div>
</body>
</html>
"#
    )
}

fn emit_block(block: &Block, config: &Config, out: &mut String) {
    match block {
        Block::CodeBlock { language, code } => {
            out.push_str("<pre>");
            if let Some(lang) = language {
                out.push_str("<span class=\"code-language\">");
                out.push_str(&encode_text(lang));
                out.push_str("</span>");
            }
            out.push_str("<code>");
            out.push_str(&encode_text(code));
            out.push_str("</code></pre>\n");
        }
        Block::Heading { level, content } => {
            out.push_str(&format!("<h{level}>"));
            inlines_to_html(content, out);
            out.push_str(&format!("</h{level}>\n"));
        }
        Block::Paragraph { content } => {
            out.push_str("<p>");
            inlines_to_html(content, out);
            out.push_str("</p>\n");
        }
        Block::List { items } => {
            out.push_str("<ul>\n");
            for item in items {
                out.push_str("<li>");
                inlines_to_html(item, out);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
        Block::Table(table) => table_to_html(table, config, out),
    }
}

fn table_to_html(table: &Table, config: &Config, out: &mut String) {
    out.push_str("<div class=\"table-wrapper\">\n");

    if config.tables.scroll_hint {
        out.push_str("<div class=\"table-header\"><p>");
        out.push_str(SCROLL_ICON);
        out.push_str("Scroll horizontally and vertically to view all data</p></div>\n");
    }

    out.push_str("<div class=\"table-container\">\n<table>\n<thead>\n<tr>");
    for cell in &table.header {
        out.push_str("<th>");
        inlines_to_html(cell, out);
        out.push_str("</th>");
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td>");
            inlines_to_html(cell, out);
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n</div>\n");

    if table.rows.len() > config.tables.summary_after_rows {
        out.push_str(&format!(
            "<div class=\"table-footer\"><p>Showing {} rows × {} columns</p></div>\n",
            table.rows.len(),
            table.columns()
        ));
    }

    out.push_str("</div>\n");
}

fn inlines_to_html(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        inline_to_html(node, out);
    }
}

fn inline_to_html(node: &Inline, out: &mut String) {
    match node {
        Inline::Text(text) => out.push_str(&encode_text(text)),
        Inline::Code(code) => {
            out.push_str("<code>");
            out.push_str(&encode_text(code));
            out.push_str("</code>");
        }
        Inline::Bold(inner) => {
            out.push_str("<strong>");
            inlines_to_html(inner, out);
            out.push_str("</strong>");
        }
        Inline::Italic(inner) => {
            out.push_str("<em>");
            inlines_to_html(inner, out);
            out.push_str("</em>");
        }
        Inline::Link { label, href } => {
            out.push_str("<a href=\"");
            out.push_str(&encode_double_quoted_attribute(href));
            out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
            inlines_to_html(label, out);
            out.push_str("</a>");
        }
    }
}
