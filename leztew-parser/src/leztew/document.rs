//! Document tree
//!
//!     The tree the catalog extraction walks. It is produced by the [asciidoc](super::asciidoc)
//!     reader, or deserialized from a JSON document tree, and carries only what extraction needs:
//!     sections with their headings and nesting level, tables with rows of cells (text and span
//!     counts), and opaque prose/listing blocks.
//!
//! Structure:
//!
//!         Document
//!         └── Block*
//!             ├── Section (title, level, Block*)
//!             ├── Table (header Row*, body Row*)
//!             ├── Paragraph (text)
//!             └── Listing (text)
//!
//!     Cells of rows that sit below a row-spanning cell are absent from those rows, exactly as the
//!     markup lays them out. Consumers reconstruct the logical grouping from the span counts.

use serde::{Deserialize, Serialize};

/// A node that exposes an ordered sequence of child blocks.
pub trait BlockContainer {
    fn blocks(&self) -> &[Block];
}

/// Root of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            title: None,
            blocks,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl BlockContainer for Document {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

/// Any element that can appear in a block sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Section(Section),
    Table(Table),
    Paragraph(Paragraph),
    Listing(Listing),
}

impl Block {
    pub fn node_type(&self) -> &'static str {
        match self {
            Block::Section(_) => "Section",
            Block::Table(_) => "Table",
            Block::Paragraph(_) => "Paragraph",
            Block::Listing(_) => "Listing",
        }
    }

    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Block::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// A titled section. `level` is 1 for `==` headings, 2 for `===`, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default = "default_level")]
    pub level: usize,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

fn default_level() -> usize {
    1
}

impl Section {
    pub fn new(title: impl Into<String>, level: usize) -> Self {
        Self {
            title: title.into(),
            level,
            blocks: Vec::new(),
        }
    }

    /// Builder-style child append
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
}

impl BlockContainer for Section {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<Row>,
    #[serde(default)]
    pub body: Vec<Row>,
}

impl Table {
    pub fn new(body: Vec<Row>) -> Self {
        Self {
            header: Vec::new(),
            body,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Text of the cell at `index`, or the empty string when the row is shorter.
    pub fn text(&self, index: usize) -> &str {
        self.cells
            .get(index)
            .map(|cell| cell.text.as_str())
            .unwrap_or("")
    }
}

/// A table cell. Span counts are at least 1 in well-formed input; consumers clamp anyway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_span")]
    pub rowspan: usize,
    #[serde(default = "default_span")]
    pub colspan: usize,
}

fn default_span() -> usize {
    1
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rowspan: 1,
            colspan: 1,
        }
    }

    pub fn spanning_rows(mut self, rowspan: usize) -> Self {
        self.rowspan = rowspan;
        self
    }

    pub fn spanning_columns(mut self, colspan: usize) -> Self {
        self.colspan = colspan;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
}

/// Delimited block content kept verbatim (listings, examples, sidebars, passthroughs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_text_past_end_is_empty() {
        let row = Row::new(vec![Cell::new("Operation")]);
        assert_eq!(row.text(0), "Operation");
        assert_eq!(row.text(2), "");
    }

    #[test]
    fn test_deserialize_applies_span_defaults() {
        let json = r#"{
            "blocks": [
                {"type": "section", "title": "Intro", "blocks": [
                    {"type": "table", "body": [{"cells": [{"text": "Operation"}]}]}
                ]}
            ]
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        let section = doc.blocks[0].as_section().unwrap();
        assert_eq!(section.level, 1);
        let table = section.blocks[0].as_table().unwrap();
        assert_eq!(table.body[0].cells[0].rowspan, 1);
        assert_eq!(table.body[0].cells[0].colspan, 1);
    }
}
