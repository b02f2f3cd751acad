//! # leztew
//!
//! Extracts node catalogs from the operation tables of a specification document.
//!
//! File Layout
//!
//! The pipeline runs in three stages, each in its own module under src/leztew:
//!
//!     document, asciidoc     The document tree and the AsciiDoc reader that produces it
//!     declaration, table,    Operation table parsing and the category tree built from
//!     sections, building     the document outline (the generic catalog)
//!     templates, spreading   Type template expansion into the concrete catalog
//!
//! loader ties the stages together for a file or string input, output writes catalogs as JSON
//! or YAML, and diagnostics collects the non-fatal findings of every stage.
//!
//! For testing helpers, see the [testing module](leztew::testing).

pub mod leztew;
