//! AsciiDoc reader
//!
//!     Reads the subset of AsciiDoc that specification documents are written in and produces a
//!     [Document] tree. Only structure is recognized; inline markup is kept verbatim as text.
//!
//! Recognized blocks
//!
//!     - `= Title` as the document title, `==` to `======` headings as nested sections (level is
//!       the number of `=` minus one). A `[discrete]` heading is kept as a paragraph.
//!     - `|===` delimited tables, see [table].
//!     - `----`, `....`, `****`, `====`, `____` and `++++` delimited blocks, kept as listings.
//!     - `--` open block delimiters, which are transparent.
//!     - `////` comment blocks and `//` comment lines, dropped.
//!     - Block attribute lines (`[cols="1,1,2"]`), block titles (`.Title`) and attribute entries
//!       (`:toc:`), consumed. Attribute lines apply to the next block.
//!     - Everything else: paragraphs, separated by blank lines.
//!
//!     Sections close when a heading of the same or a shallower level appears, so the section tree
//!     follows heading levels even if a level is skipped.

mod table;

use super::document::{Block, Document, Listing, Paragraph, Section};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use table::{parse_table, TableOptions};

static HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<marks>={1,6})[ \t]+(?P<title>\S.*?)(?:[ \t]+=+)?[ \t]*$").unwrap());

static DELIMITER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:-{4,}|\.{4,}|\*{4,}|={4,}|_{4,}|\+{4,})$").unwrap());

static ATTRIBUTE_ENTRY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:!?[A-Za-z0-9_][A-Za-z0-9_-]*!?:(?:[ \t].*)?$").unwrap());

static BLOCK_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.[^.\s]").unwrap());

const TABLE_DELIMITER: &str = "|===";
const COMMENT_DELIMITER: &str = "////";
const OPEN_BLOCK_DELIMITER: &str = "--";

/// Errors from reading AsciiDoc source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsciiDocError {
    /// A `|===` table without its closing delimiter (1-based line of the opening one)
    UnterminatedTable { line: usize },
    /// A delimited block without its closing delimiter
    UnterminatedBlock { delimiter: String, line: usize },
}

impl fmt::Display for AsciiDocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsciiDocError::UnterminatedTable { line } => {
                write!(f, "Table opened at line {} is never closed", line)
            }
            AsciiDocError::UnterminatedBlock { delimiter, line } => write!(
                f,
                "Block delimited by '{}' at line {} is never closed",
                delimiter, line
            ),
        }
    }
}

impl std::error::Error for AsciiDocError {}

/// Parse AsciiDoc source into a document tree.
pub fn parse_asciidoc(source: &str) -> Result<Document, AsciiDocError> {
    let lines: Vec<&str> = source.lines().collect();
    Reader::new(&lines).read()
}

struct Reader<'a> {
    lines: &'a [&'a str],
    position: usize,
    title: Option<String>,
    root: Vec<Block>,
    /// Currently open sections, outermost first
    open_sections: Vec<Section>,
    /// Attribute lines waiting for the next block
    pending_attributes: Vec<String>,
    paragraph: Vec<&'a str>,
}

impl<'a> Reader<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self {
            lines,
            position: 0,
            title: None,
            root: Vec::new(),
            open_sections: Vec::new(),
            pending_attributes: Vec::new(),
            paragraph: Vec::new(),
        }
    }

    fn read(mut self) -> Result<Document, AsciiDocError> {
        while self.position < self.lines.len() {
            let line = self.lines[self.position];
            let trimmed = line.trim_end();

            if trimmed.trim_start().is_empty() {
                self.flush_paragraph();
                self.position += 1;
            } else if trimmed == COMMENT_DELIMITER {
                self.flush_paragraph();
                self.skip_delimited(COMMENT_DELIMITER)?;
            } else if trimmed.starts_with("//") {
                self.position += 1;
            } else if trimmed == TABLE_DELIMITER {
                self.flush_paragraph();
                self.read_table()?;
            } else if DELIMITER_REGEX.is_match(trimmed) {
                self.flush_paragraph();
                self.read_listing(trimmed)?;
            } else if trimmed == OPEN_BLOCK_DELIMITER {
                self.flush_paragraph();
                self.pending_attributes.clear();
                self.position += 1;
            } else if let Some(caps) = HEADING_REGEX.captures(trimmed) {
                self.flush_paragraph();
                let level = caps["marks"].len() - 1;
                let title = caps["title"].to_string();
                self.heading(level, title, trimmed);
                self.position += 1;
            } else if self.paragraph.is_empty() && is_attribute_line(trimmed) {
                self.pending_attributes
                    .push(trimmed[1..trimmed.len() - 1].to_string());
                self.position += 1;
            } else if self.paragraph.is_empty()
                && (ATTRIBUTE_ENTRY_REGEX.is_match(trimmed) || BLOCK_TITLE_REGEX.is_match(trimmed))
            {
                self.position += 1;
            } else {
                self.paragraph.push(trimmed);
                self.position += 1;
            }
        }
        self.flush_paragraph();
        while !self.open_sections.is_empty() {
            self.close_section();
        }
        Ok(Document {
            title: self.title,
            blocks: self.root,
        })
    }

    fn heading(&mut self, level: usize, title: String, line: &'a str) {
        let discrete = self
            .pending_attributes
            .iter()
            .any(|attribute| attribute == "discrete" || attribute == "float");
        self.pending_attributes.clear();
        if discrete {
            self.push_block(Block::Paragraph(Paragraph {
                text: line.to_string(),
            }));
            return;
        }
        if level == 0 {
            if self.title.is_none() && self.root.is_empty() && self.open_sections.is_empty() {
                self.title = Some(title);
            } else {
                log::warn!("Ignoring level 0 heading '{}' inside the document body", title);
            }
            return;
        }
        while self
            .open_sections
            .last()
            .is_some_and(|section| section.level >= level)
        {
            self.close_section();
        }
        log::debug!("Section '{}' at level {}", title, level);
        self.open_sections.push(Section::new(title, level));
    }

    fn close_section(&mut self) {
        if let Some(section) = self.open_sections.pop() {
            self.push_block(Block::Section(section));
        }
    }

    fn push_block(&mut self, block: Block) {
        match self.open_sections.last_mut() {
            Some(section) => section.blocks.push(block),
            None => self.root.push(block),
        }
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = self.paragraph.join("\n");
        self.paragraph.clear();
        self.pending_attributes.clear();
        self.push_block(Block::Paragraph(Paragraph { text }));
    }

    /// Lines strictly between the delimiter at the current position and its closing twin.
    fn delimited_lines(&mut self, delimiter: &str) -> Option<&'a [&'a str]> {
        let start = self.position + 1;
        let end = (start..self.lines.len()).find(|&i| self.lines[i].trim_end() == delimiter)?;
        self.position = end + 1;
        Some(&self.lines[start..end])
    }

    fn skip_delimited(&mut self, delimiter: &str) -> Result<(), AsciiDocError> {
        let line = self.position + 1;
        self.delimited_lines(delimiter)
            .map(|_| ())
            .ok_or_else(|| AsciiDocError::UnterminatedBlock {
                delimiter: delimiter.to_string(),
                line,
            })
    }

    fn read_table(&mut self) -> Result<(), AsciiDocError> {
        let line = self.position + 1;
        let content = self
            .delimited_lines(TABLE_DELIMITER)
            .ok_or(AsciiDocError::UnterminatedTable { line })?;
        let options = TableOptions::from_attributes(&self.pending_attributes);
        self.pending_attributes.clear();
        let table = parse_table(content, &options);
        log::debug!(
            "Table at line {} with {} body rows",
            line,
            table.body.len()
        );
        self.push_block(Block::Table(table));
        Ok(())
    }

    fn read_listing(&mut self, delimiter: &'a str) -> Result<(), AsciiDocError> {
        let line = self.position + 1;
        let content = self
            .delimited_lines(delimiter)
            .ok_or_else(|| AsciiDocError::UnterminatedBlock {
                delimiter: delimiter.to_string(),
                line,
            })?;
        self.pending_attributes.clear();
        self.push_block(Block::Listing(Listing {
            text: content.join("\n"),
        }));
        Ok(())
    }
}

/// `[...]` on its own line, but not an inline anchor like `[[id]]text`.
fn is_attribute_line(line: &str) -> bool {
    line.len() >= 2 && line.starts_with('[') && line.ends_with(']')
}
