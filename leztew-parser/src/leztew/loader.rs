//! Input loading
//!
//!     `CatalogLoader` reads a source from a file or a string and runs it through the pipeline:
//!
//!         AsciiDoc source ─┐
//!                          ├─> Document ──build──> generic Category ──spread──> concrete Category
//!         JSON tree ───────┘                              ^
//!         JSON/YAML catalog ──────────────────────────────┘
//!
//!     The input format follows the file extension (`.adoc`, `.asciidoc`, `.asc`, `.json`,
//!     `.yaml`, `.yml`). A `.json` file holds either a document tree or a previously written
//!     catalog; a top-level `blocks` key marks a document tree.
//!
//! Example
//!
//!     let loader = CatalogLoader::from_path("specification.adoc")?;
//!     let extraction = loader.extract(SectionLayout::default())?;
//!     let conversion = loader.convert(SectionLayout::default(), SpreadOptions::default())?;

use super::asciidoc::{parse_asciidoc, AsciiDocError};
use super::building::{CategoryBuilder, Extraction, SectionLayout};
use super::catalog::Category;
use super::diagnostics::Diagnostics;
use super::document::Document;
use super::error::ExtractError;
use super::output::{read_catalog, OutputError, OutputFormat};
use super::spreading::{spread_with, SpreadOptions};
use std::fmt;
use std::fs;
use std::path::Path;

/// Error that can occur when loading and extracting
#[derive(Debug)]
pub enum LoaderError {
    /// IO error when reading the file
    IoError(String),
    /// The file extension names no known input format
    UnsupportedInput(String),
    /// The input is a catalog where a document was required
    NotADocument,
    DocumentJson(serde_json::Error),
    AsciiDoc(AsciiDocError),
    Extract(ExtractError),
    Catalog(OutputError),
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::IoError(msg) => write!(f, "IO error: {}", msg),
            LoaderError::UnsupportedInput(name) => write!(
                f,
                "Unsupported input '{}' (expected .adoc, .asciidoc, .asc, .json, .yaml or .yml)",
                name
            ),
            LoaderError::NotADocument => {
                write!(f, "Input is a catalog, not a document; nothing to extract")
            }
            LoaderError::DocumentJson(err) => write!(f, "Invalid document tree: {}", err),
            LoaderError::AsciiDoc(err) => write!(f, "AsciiDoc error: {}", err),
            LoaderError::Extract(err) => write!(f, "Extraction failed: {}", err),
            LoaderError::Catalog(err) => write!(f, "Invalid catalog: {}", err),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoaderError::DocumentJson(err) => Some(err),
            LoaderError::AsciiDoc(err) => Some(err),
            LoaderError::Extract(err) => Some(err),
            LoaderError::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError(err.to_string())
    }
}

impl From<AsciiDocError> for LoaderError {
    fn from(err: AsciiDocError) -> Self {
        LoaderError::AsciiDoc(err)
    }
}

impl From<ExtractError> for LoaderError {
    fn from(err: ExtractError) -> Self {
        LoaderError::Extract(err)
    }
}

impl From<OutputError> for LoaderError {
    fn from(err: OutputError) -> Self {
        LoaderError::Catalog(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    AsciiDoc,
    /// A serialized [Document] tree
    DocumentTree,
    /// A previously written generic catalog
    Catalog(OutputFormat),
}

impl InputFormat {
    /// Detect the format from the path's extension, looking into JSON content when needed.
    pub fn detect(path: &Path, source: &str) -> Result<Self, LoaderError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "adoc" | "asciidoc" | "asc" => Ok(InputFormat::AsciiDoc),
            "json" if is_document_tree(source) => Ok(InputFormat::DocumentTree),
            "json" => Ok(InputFormat::Catalog(OutputFormat::Json)),
            "yaml" | "yml" => Ok(InputFormat::Catalog(OutputFormat::Yaml)),
            _ => Err(LoaderError::UnsupportedInput(path.display().to_string())),
        }
    }
}

fn is_document_tree(source: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(source)
        .map(|value| value.get("blocks").is_some())
        .unwrap_or(false)
}

/// Generic and concrete catalogs of one input, with the diagnostics of both steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub generic: Category,
    pub concrete: Category,
    pub diagnostics: Diagnostics,
}

pub struct CatalogLoader {
    source: String,
    format: InputFormat,
}

impl CatalogLoader {
    /// Load from a file path, detecting the input format.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let format = InputFormat::detect(path, &source)?;
        log::debug!("Loaded {} as {:?}", path.display(), format);
        Ok(CatalogLoader { source, format })
    }

    /// Load from a string in a known format.
    pub fn from_string<S: Into<String>>(source: S, format: InputFormat) -> Self {
        CatalogLoader {
            source: source.into(),
            format,
        }
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parse the source into a document tree.
    pub fn document(&self) -> Result<Document, LoaderError> {
        match self.format {
            InputFormat::AsciiDoc => Ok(parse_asciidoc(&self.source)?),
            InputFormat::DocumentTree => {
                serde_json::from_str(&self.source).map_err(LoaderError::DocumentJson)
            }
            InputFormat::Catalog(_) => Err(LoaderError::NotADocument),
        }
    }

    /// The generic catalog. Catalog inputs are read as they are, without diagnostics.
    pub fn extract(&self, layout: SectionLayout) -> Result<Extraction, LoaderError> {
        if let InputFormat::Catalog(format) = self.format {
            return Ok(Extraction {
                catalog: read_catalog(&self.source, format)?,
                diagnostics: Diagnostics::new(),
            });
        }
        let document = self.document()?;
        Ok(CategoryBuilder::with_layout(layout).build(&document)?)
    }

    /// The generic catalog and its spread.
    pub fn convert(
        &self,
        layout: SectionLayout,
        options: SpreadOptions,
    ) -> Result<Conversion, LoaderError> {
        let Extraction {
            catalog,
            mut diagnostics,
        } = self.extract(layout)?;
        let spread = spread_with(&catalog, options);
        diagnostics.extend(spread.diagnostics);
        log::info!(
            "{} generic node descriptions spread into {}",
            catalog.node_count(),
            spread.catalog.node_count()
        );
        Ok(Conversion {
            generic: catalog,
            concrete: spread.catalog,
            diagnostics,
        })
    }
}
