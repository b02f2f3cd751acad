//! Verified fixture documents
//!
//!     Hand-written AsciiDoc is easy to get subtly wrong (a missing `.2+` and every following row
//!     shifts). Tests therefore read documents from `tests/fixtures`, which are kept consistent
//!     with the outline the builder expects.

use std::fs;
use std::path::PathBuf;

/// Absolute path of a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Contents of a fixture file. Panics if it is missing.
pub fn fixture_source(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}
