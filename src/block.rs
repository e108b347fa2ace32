/// Inline formatting within a block's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    Link { label: Vec<Inline>, href: String },
}

impl Inline {
    pub(crate) fn text(s: &str) -> Self {
        Inline::Text(s.to_string())
    }
}

/// A pipe table whose rows all have `header.len()` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<Vec<Inline>>,
    pub rows: Vec<Vec<Vec<Inline>>>,
}

impl Table {
    pub fn columns(&self) -> usize {
        self.header.len()
    }
}

/// Block-level elements of a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Paragraph {
        content: Vec<Inline>,
    },
    /// Bullet and numbered items render the same way, so the marker style is not kept.
    List {
        items: Vec<Vec<Inline>>,
    },
    Table(Table),
}

/// A parsed reply. Blocks are in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub(crate) fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
