//! Main module for leztew library functionality

pub mod asciidoc;
pub mod building;
pub mod catalog;
pub mod declaration;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod loader;
pub mod output;
pub mod sections;
pub mod spreading;
pub mod table;
pub mod templates;
pub mod testing;
