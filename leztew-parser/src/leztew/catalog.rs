//! Catalog model
//!
//!     The structured records extracted from operation tables. A [NodeDescription] is built once
//!     per parsed table; a [Category] tree mirrors the section hierarchy of the source document.
//!
//!     All types are plain owned values. Template expansion relies on `Clone` being a deep copy:
//!     every instance gets its own socket lists and may retype them independently.
//!
//!     Serialized field names are camelCase. Empty strings, absent types and empty lists are
//!     skipped on output and defaulted on input, so a catalog only lists what a node actually has.

use serde::{Deserialize, Serialize};

/// Name of the root category.
pub const ROOT_CATEGORY_NAME: &str = "Nodes";

/// A named input or output connection point of a node.
///
/// Flow sockets never carry a type; value sockets usually do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketDescription {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl SocketDescription {
    pub fn typed(
        type_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            description: description.into(),
        }
    }

    pub fn untyped(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            description: description.into(),
        }
    }
}

/// A configuration parameter of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationElementDescription {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ConfigurationElementDescription {
    pub fn typed(
        type_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            description: description.into(),
        }
    }
}

/// Everything one operation table says about a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    /// Heading of the section that defines the node
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Operation identifier, e.g. `math/sub`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configuration: Vec<ConfigurationElementDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_flow_sockets: Vec<SocketDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_value_sockets: Vec<SocketDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_flow_sockets: Vec<SocketDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_value_sockets: Vec<SocketDescription>,
}

impl NodeDescription {
    /// Input value sockets followed by output value sockets.
    pub fn value_sockets(&self) -> impl Iterator<Item = &SocketDescription> {
        self.input_value_sockets
            .iter()
            .chain(self.output_value_sockets.iter())
    }

    pub fn value_sockets_mut(&mut self) -> impl Iterator<Item = &mut SocketDescription> {
        self.input_value_sockets
            .iter_mut()
            .chain(self.output_value_sockets.iter_mut())
    }
}

/// A named grouping of node descriptions, mirroring one section of the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_descriptions: Vec<NodeDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_descriptions: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_CATEGORY_NAME)
    }

    /// Node descriptions of this category and all descendants, depth first.
    pub fn iter_node_descriptions(&self) -> Box<dyn Iterator<Item = &NodeDescription> + '_> {
        Box::new(
            self.node_descriptions.iter().chain(
                self.children
                    .iter()
                    .flat_map(|child| child.iter_node_descriptions()),
            ),
        )
    }

    /// Number of node descriptions in the whole subtree.
    pub fn node_count(&self) -> usize {
        self.iter_node_descriptions().count()
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Category> {
        self.children.iter().find(|child| child.name == name)
    }
}
