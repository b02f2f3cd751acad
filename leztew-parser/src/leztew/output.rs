//! Catalog serialization
//!
//!     Catalogs are written as JSON (the format downstream editors read) or YAML. Empty fields are
//!     omitted in both, so a socket without a type has no `type` key and a category without
//!     children has no `children` key.

use super::catalog::Category;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    /// Format implied by a file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(OutputError::UnknownFormat(name.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug)]
pub enum OutputError {
    UnknownFormat(String),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::UnknownFormat(name) => {
                write!(f, "Unknown format '{}' (expected json or yaml)", name)
            }
            OutputError::Json(err) => write!(f, "JSON error: {}", err),
            OutputError::Yaml(err) => write!(f, "YAML error: {}", err),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::UnknownFormat(_) => None,
            OutputError::Json(err) => Some(err),
            OutputError::Yaml(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for OutputError {
    fn from(err: serde_json::Error) -> Self {
        OutputError::Json(err)
    }
}

impl From<serde_yaml::Error> for OutputError {
    fn from(err: serde_yaml::Error) -> Self {
        OutputError::Yaml(err)
    }
}

/// Serialize a catalog. `pretty` only affects JSON; YAML is always block style.
pub fn render(catalog: &Category, format: OutputFormat, pretty: bool) -> Result<String, OutputError> {
    let mut text = match format {
        OutputFormat::Json if pretty => serde_json::to_string_pretty(catalog)?,
        OutputFormat::Json => serde_json::to_string(catalog)?,
        OutputFormat::Yaml => serde_yaml::to_string(catalog)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Read a previously rendered catalog back.
pub fn read_catalog(source: &str, format: OutputFormat) -> Result<Category, OutputError> {
    Ok(match format {
        OutputFormat::Json => serde_json::from_str(source)?,
        OutputFormat::Yaml => serde_yaml::from_str(source)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leztew::catalog::{NodeDescription, SocketDescription};
    use insta::assert_snapshot;
    use rstest::rstest;

    fn catalog() -> Category {
        let mut math = Category::new("Math nodes");
        math.node_descriptions.push(NodeDescription {
            title: "Negation".to_string(),
            name: "math/negate".to_string(),
            input_value_sockets: vec![SocketDescription::typed("float", "a", "")],
            ..Default::default()
        });
        let mut root = Category::root();
        root.children.push(math);
        root
    }

    #[test]
    fn test_compact_json_omits_empty_fields() {
        let text = render(&catalog(), OutputFormat::Json, false).unwrap();
        assert_snapshot!(text.trim_end(), @r#"{"name":"Nodes","children":[{"name":"Math nodes","nodeDescriptions":[{"title":"Negation","name":"math/negate","inputValueSockets":[{"name":"a","type":"float"}]}]}]}"#);
    }

    #[test]
    fn test_yaml_omits_empty_fields() {
        let text = render(&catalog(), OutputFormat::Yaml, true).unwrap();
        assert!(text.contains("nodeDescriptions:"));
        assert!(!text.contains("description:"));
        assert!(!text.contains("outputValueSockets"));
    }

    #[rstest]
    #[case(OutputFormat::Json, true)]
    #[case(OutputFormat::Json, false)]
    #[case(OutputFormat::Yaml, true)]
    fn test_read_back(#[case] format: OutputFormat, #[case] pretty: bool) {
        let original = catalog();
        let text = render(&original, format, pretty).unwrap();
        assert_eq!(read_catalog(&text, format).unwrap(), original);
    }

    #[rstest]
    #[case("json", Some(OutputFormat::Json))]
    #[case("YAML", Some(OutputFormat::Yaml))]
    #[case("yml", Some(OutputFormat::Yaml))]
    #[case("xml", None)]
    fn test_format_names(#[case] name: &str, #[case] expected: Option<OutputFormat>) {
        assert_eq!(name.parse::<OutputFormat>().ok(), expected);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/nodes.yaml")),
            Some(OutputFormat::Yaml)
        );
        assert_eq!(OutputFormat::from_path(Path::new("nodes")), None);
    }
}
