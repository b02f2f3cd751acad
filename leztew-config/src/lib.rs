//! Shared configuration loader for the leztew toolchain.
//!
//! `defaults/leztew.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`LeztewConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use leztew_parser::leztew::building::SectionLayout;
use leztew_parser::leztew::output::OutputFormat;
use leztew_parser::leztew::spreading::SpreadOptions;
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/leztew.default.toml");

/// Name of the optional configuration file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "leztew.toml";

/// Top-level configuration consumed by leztew applications.
#[derive(Debug, Clone, Deserialize)]
pub struct LeztewConfig {
    pub layout: LayoutConfig,
    pub spread: SpreadConfig,
    pub output: OutputConfig,
}

/// Where the node definitions sit in the document outline.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    pub functional_specification_index: usize,
    pub nodes_index: usize,
}

impl LayoutConfig {
    pub fn section_layout(&self) -> SectionLayout {
        SectionLayout {
            functional_specification_index: self.functional_specification_index,
            nodes_index: self.nodes_index,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpreadConfig {
    pub instance_subcategories: bool,
}

impl SpreadConfig {
    pub fn spread_options(&self) -> SpreadOptions {
        SpreadOptions {
            instance_subcategories: self.instance_subcategories,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: FormatName,
    pub pretty: bool,
    pub generic_file: String,
    pub spread_file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatName {
    Json,
    #[serde(alias = "yml")]
    Yaml,
}

impl From<FormatName> for OutputFormat {
    fn from(name: FormatName) -> Self {
        match name {
            FormatName::Json => OutputFormat::Json,
            FormatName::Yaml => OutputFormat::Yaml,
        }
    }
}

impl OutputConfig {
    pub fn output_format(&self) -> OutputFormat {
        self.format.into()
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<LeztewConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<LeztewConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.layout.section_layout(), SectionLayout::default());
        assert!(!config.spread.instance_subcategories);
        assert_eq!(config.output.output_format(), OutputFormat::Json);
        assert!(config.output.pretty);
        assert_eq!(config.output.generic_file, "nodes");
        assert_eq!(config.output.spread_file, "nodes-spread");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.format", "yaml")
            .expect("override to apply")
            .set_override("spread.instance_subcategories", true)
            .expect("override to apply")
            .set_override("layout.nodes_index", 2i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.output_format(), OutputFormat::Yaml);
        assert!(config.spread.spread_options().instance_subcategories);
        assert_eq!(config.layout.nodes_index, 2);
        assert_eq!(config.layout.functional_specification_index, 3);
    }

    #[test]
    fn layers_files_over_defaults() {
        let dir = std::env::temp_dir().join(format!("leztew-config-test-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("custom.toml");
        fs::write(&path, "[layout]\nfunctional_specification_index = 1\n").expect("write config");

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.layout.functional_specification_index, 1);
        assert_eq!(config.layout.nodes_index, 0);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new()
            .with_file("/definitely/not/here/leztew.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here/leztew.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.output.generic_file, "nodes");
    }

    #[test]
    fn rejects_unknown_format() {
        let result = Loader::new()
            .set_override("output.format", "xml")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
