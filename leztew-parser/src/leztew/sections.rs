//! Section walking
//!
//! Helpers that pick typed children out of a block sequence, preserving document order.

use super::document::{Block, BlockContainer, Section, Table};

/// The immediate child sections of `node`; tables, paragraphs and listings are skipped.
pub fn child_sections<C: BlockContainer + ?Sized>(node: &C) -> Vec<&Section> {
    node.blocks().iter().filter_map(Block::as_section).collect()
}

/// The tables directly inside `node` (not inside nested sections).
pub fn child_tables<C: BlockContainer + ?Sized>(node: &C) -> Vec<&Table> {
    node.blocks().iter().filter_map(Block::as_table).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leztew::document::{Document, Listing, Paragraph};

    #[test]
    fn test_child_sections_filters_and_keeps_order() {
        let doc = Document::new(vec![
            Block::Paragraph(Paragraph {
                text: "Preamble".to_string(),
            }),
            Block::Section(Section::new("Introduction", 1)),
            Block::Table(Table::default()),
            Block::Section(Section::new("Concepts", 1)),
            Block::Listing(Listing {
                text: "code".to_string(),
            }),
        ]);

        let titles: Vec<_> = child_sections(&doc)
            .into_iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Introduction", "Concepts"]);
    }

    #[test]
    fn test_child_tables_ignores_nested_sections() {
        let nested = Section::new("Nested", 3).with_block(Block::Table(Table::default()));
        let section = Section::new("Subtraction", 2)
            .with_block(Block::Table(Table::default()))
            .with_block(Block::Section(nested));

        assert_eq!(child_tables(&section).len(), 1);
        assert_eq!(child_sections(&section).len(), 1);
    }
}
