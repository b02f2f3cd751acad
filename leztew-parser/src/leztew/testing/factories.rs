//! In-memory document factories

use crate::leztew::document::{Block, Cell, Document, Row, Section, Table};

/// A row of plain single-span cells.
pub fn row(cells: &[&str]) -> Row {
    Row::new(cells.iter().map(|text| Cell::new(*text)).collect())
}

/// A row whose first cell spans `rowspan` rows.
pub fn spanned_row(rowspan: usize, cells: &[&str]) -> Row {
    let mut row = row(cells);
    if let Some(first) = row.cells.first_mut() {
        first.rowspan = rowspan;
    }
    row
}

/// A minimal operation table with only the header row.
pub fn operation_table(name: &str) -> Block {
    let literal = format!("`{}`", name);
    Block::Table(Table::new(vec![row(&[
        "Operation",
        literal.as_str(),
        "Description",
    ])]))
}

/// A document with the canonical outline, whose "Nodes" section holds `topics`.
///
/// The outline has "Functional Specification" as its fourth top-level section and "Nodes" as
/// the first section inside it.
pub fn specification_document(topics: Vec<Section>) -> Document {
    let mut nodes = Section::new("Nodes", 2);
    nodes.blocks = topics.into_iter().map(Block::Section).collect();
    let functional = Section::new("Functional Specification", 1).with_block(Block::Section(nodes));
    Document::new(vec![
        Block::Section(Section::new("Introduction", 1)),
        Block::Section(Section::new("Concepts", 1)),
        Block::Section(Section::new("Core Data Types", 1)),
        Block::Section(functional),
    ])
    .with_title("Specification")
}
