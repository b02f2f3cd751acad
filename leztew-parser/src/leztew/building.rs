//! Category building
//!
//!     Walks the section hierarchy of a specification document and collects the node
//!     descriptions of every operation table into a [Category] tree.
//!
//!     The outer levels are found by position, everything below "Nodes" by traversal:
//!
//!         Document
//!         └── [3] Functional Specification
//!             └── [0] Nodes                      -> root category "Nodes"
//!                 └── Math nodes                 -> topic category
//!                     └── Arithmetic Nodes       -> group category
//!                         └── Subtraction        -> definition section, tables parsed
//!
//!     Each definition section contributes one node description per recognized table, appended
//!     to its group category in document order. Every level returns a freshly built subtree;
//!     nothing is accumulated across calls.

use super::catalog::{Category, NodeDescription};
use super::diagnostics::{codes, Diagnostic, DiagnosticSeverity, Diagnostics};
use super::document::{BlockContainer, Document, Section};
use super::error::{ExtractError, ExtractResult};
use super::sections::{child_sections, child_tables};
use super::table::parse_operation_table;

/// Default index of the "Functional Specification" section among the top-level sections.
pub const FUNCTIONAL_SPECIFICATION_SECTION_INDEX: usize = 3;

/// Default index of the "Nodes" section within the "Functional Specification" section.
pub const NODES_SECTION_INDEX: usize = 0;

/// Positions of the sections that lead to the node definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    pub functional_specification_index: usize,
    pub nodes_index: usize,
}

impl Default for SectionLayout {
    fn default() -> Self {
        Self {
            functional_specification_index: FUNCTIONAL_SPECIFICATION_SECTION_INDEX,
            nodes_index: NODES_SECTION_INDEX,
        }
    }
}

/// A generic catalog together with everything worth auditing about how it was built.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub catalog: Category,
    pub diagnostics: Diagnostics,
}

/// Builds the generic category tree of a document.
#[derive(Debug, Clone, Default)]
pub struct CategoryBuilder {
    layout: SectionLayout,
}

impl CategoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: SectionLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> SectionLayout {
        self.layout
    }

    /// Locate the "Nodes" section and build the category tree below it.
    pub fn build(&self, document: &Document) -> ExtractResult<Extraction> {
        let nodes_section = self.nodes_section(document)?;
        let mut diagnostics = Diagnostics::new();

        let mut catalog = Category::root();
        catalog.children = child_sections(nodes_section)
            .into_iter()
            .map(|topic| topic_category(topic, &mut diagnostics))
            .collect();

        log::info!(
            "Extracted {} node descriptions in {} topics",
            catalog.node_count(),
            catalog.children.len()
        );
        Ok(Extraction {
            catalog,
            diagnostics,
        })
    }

    fn nodes_section<'a>(&self, document: &'a Document) -> ExtractResult<&'a Section> {
        let document_name = document
            .title
            .as_deref()
            .map(|title| format!("'{}'", title))
            .unwrap_or_else(|| "the document".to_string());
        let functional_specification = section_at(
            document,
            self.layout.functional_specification_index,
            "Functional Specification",
            document_name,
        )?;
        section_at(
            functional_specification,
            self.layout.nodes_index,
            "Nodes",
            format!("'{}'", functional_specification.title),
        )
    }
}

/// Build the generic catalog with the default section layout.
pub fn build_categories(document: &Document) -> ExtractResult<Extraction> {
    CategoryBuilder::new().build(document)
}

fn section_at<'a, C: BlockContainer + ?Sized>(
    parent: &'a C,
    index: usize,
    role: &'static str,
    parent_name: String,
) -> ExtractResult<&'a Section> {
    let sections = child_sections(parent);
    let available = sections.len();
    sections
        .into_iter()
        .nth(index)
        .ok_or(ExtractError::MissingSection {
            role,
            parent: parent_name,
            index,
            available,
        })
}

/// A topic section like "Math nodes".
fn topic_category(topic: &Section, diagnostics: &mut Diagnostics) -> Category {
    log::debug!(
        "Processing nodes sub-section {} at level {}",
        topic.title,
        topic.level
    );
    let mut category = Category::new(topic.title.as_str());
    category.children = child_sections(topic)
        .into_iter()
        .map(|group| group_category(group, diagnostics))
        .collect();
    category
}

/// A group section like "Arithmetic Nodes"; its sub-sections define one operation each.
fn group_category(group: &Section, diagnostics: &mut Diagnostics) -> Category {
    log::debug!(
        "Processing nodes category section {} at level {}",
        group.title,
        group.level
    );
    let mut category = Category::new(group.title.as_str());
    for definition in child_sections(group) {
        category
            .node_descriptions
            .extend(definition_nodes(definition, diagnostics));
    }
    category
}

/// A definition section like "Subtraction".
fn definition_nodes(definition: &Section, diagnostics: &mut Diagnostics) -> Vec<NodeDescription> {
    log::debug!(
        "Processing nodes definitions section {} at level {}",
        definition.title,
        definition.level
    );
    let nodes: Vec<NodeDescription> = child_tables(definition)
        .into_iter()
        .filter_map(|table| parse_operation_table(&table.body, &definition.title, diagnostics))
        .collect();
    if nodes.is_empty() {
        diagnostics.report(
            Diagnostic::new(
                DiagnosticSeverity::Information,
                codes::EMPTY_DEFINITION,
                "Definition section yielded no node descriptions",
            )
            .with_context(definition.title.as_str()),
        );
    }
    nodes
}
