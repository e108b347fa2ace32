//! Render AI-assistant replies written in a small Markdown dialect.
//!
//! A reply is parsed once into a [`Document`] and then handed to a renderer:
//! [`to_plain_text`] for the clipboard, [`to_html`] for a standalone
//! download, or [`document_to_pdf`] for print. Parsing is total and pure; any
//! string yields a document.

mod block;
mod config;
mod error;
mod html;
mod inline;
mod parser;
mod plain;
mod segment;
mod table;
mod typst;

pub use block::{Block, Document, Inline, Table};
pub use config::{Config, DocumentConfig, HtmlConfig, LinksConfig, PageConfig, TablesConfig};
pub use error::{ConfigError, ExportError};
pub use html::to_html;
pub use inline::format_inline;
pub use parser::{parse, parse_prose};
pub use plain::to_plain_text;
pub use segment::{Segment, segment};
pub use table::{is_separator, recognize, split_row};
pub use typst::to_typst;

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Convert a reply to clipboard text.
pub fn reply_to_plain_text(reply: &str) -> String {
    to_plain_text(&parse(reply))
}

/// Convert a reply to a standalone HTML page.
pub fn reply_to_html(reply: &str, config: &Config) -> String {
    to_html(&parse(reply), config)
}

/// Convert a reply to PDF bytes.
pub fn reply_to_pdf(reply: &str, config: &Config) -> Result<Vec<u8>, ExportError> {
    document_to_pdf(&parse(reply), config)
}

/// Compile a document to PDF through Typst, using the embedded fonts only.
pub fn document_to_pdf(doc: &Document, config: &Config) -> Result<Vec<u8>, ExportError> {
    use typst_library::layout::PagedDocument;

    let typst_content = to_typst(doc, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let compiled: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| ExportError::Compile(format!("{:?}", e)))?;

    typst_pdf::pdf(&compiled, &PdfOptions::default())
        .map_err(|e| ExportError::Pdf(format!("{:?}", e)))
}
