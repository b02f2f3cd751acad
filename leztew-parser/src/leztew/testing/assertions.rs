//! Category and node description assertions

use crate::leztew::catalog::{Category, NodeDescription, SocketDescription};

fn summarize_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn summarize_nodes(nodes: &[NodeDescription]) -> String {
    nodes
        .iter()
        .map(|n| n.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct CategoryAssertion<'a> {
    pub(crate) category: &'a Category,
    pub(crate) context: String,
}

impl<'a> CategoryAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        let actual = &self.category.name;
        assert_eq!(
            actual, expected,
            "{}: Expected category name to be '{}', but got '{}'",
            self.context, expected, actual
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.category.children.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} children, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize_categories(&self.category.children)
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(CategoryAssertion<'a>),
    {
        let children = &self.category.children;
        assert!(
            index < children.len(),
            "{}: Child index {} out of bounds (category has {} children)",
            self.context,
            index,
            children.len()
        );
        let child = &children[index];
        assertion(CategoryAssertion {
            category: child,
            context: format!("{}/{}", self.context, child.name),
        });
        self
    }

    /// Number of node descriptions owned directly by this category
    pub fn node_count(self, expected: usize) -> Self {
        let actual = self.category.node_descriptions.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} node descriptions, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize_nodes(&self.category.node_descriptions)
        );
        self
    }

    /// Number of node descriptions in the whole subtree
    pub fn total_node_count(self, expected: usize) -> Self {
        let actual = self.category.node_count();
        assert_eq!(
            actual, expected,
            "{}: Expected {} node descriptions in subtree, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn node<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> NodeAssertion<'a>,
    {
        let nodes = &self.category.node_descriptions;
        assert!(
            index < nodes.len(),
            "{}: Node index {} out of bounds (category has {} node descriptions)",
            self.context,
            index,
            nodes.len()
        );
        assertion(NodeAssertion {
            node: &nodes[index],
            context: format!("{}:nodes[{}]", self.context, index),
        });
        self
    }
}

pub struct NodeAssertion<'a> {
    pub(crate) node: &'a NodeDescription,
    pub(crate) context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn new(node: &'a NodeDescription) -> Self {
        Self {
            node,
            context: node.name.clone(),
        }
    }

    pub fn name(self, expected: &str) -> Self {
        assert_eq!(
            self.node.name, expected,
            "{}: Expected node name '{}', but got '{}'",
            self.context, expected, self.node.name
        );
        self
    }

    pub fn title(self, expected: &str) -> Self {
        assert_eq!(
            self.node.title, expected,
            "{}: Expected node title '{}', but got '{}'",
            self.context, expected, self.node.title
        );
        self
    }

    pub fn description(self, expected: &str) -> Self {
        assert_eq!(
            self.node.description, expected,
            "{}: Expected description '{}', but got '{}'",
            self.context, expected, self.node.description
        );
        self
    }

    pub fn configuration_count(self, expected: usize) -> Self {
        let actual = self.node.configuration.len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} configuration elements, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn socket_counts(
        self,
        input_flow: usize,
        input_value: usize,
        output_flow: usize,
        output_value: usize,
    ) -> Self {
        let actual = (
            self.node.input_flow_sockets.len(),
            self.node.input_value_sockets.len(),
            self.node.output_flow_sockets.len(),
            self.node.output_value_sockets.len(),
        );
        assert_eq!(
            actual,
            (input_flow, input_value, output_flow, output_value),
            "{}: Socket counts (input flow, input value, output flow, output value) differ",
            self.context
        );
        self
    }

    pub fn input_type(self, index: usize, expected: &str) -> Self {
        let context = format!("{}:inputValueSockets", self.context);
        assert_socket_type(&self.node.input_value_sockets, index, expected, &context);
        self
    }

    pub fn output_type(self, index: usize, expected: &str) -> Self {
        let context = format!("{}:outputValueSockets", self.context);
        assert_socket_type(&self.node.output_value_sockets, index, expected, &context);
        self
    }

    /// Every value socket carries `expected` as its type.
    pub fn all_value_types(self, expected: &str) -> Self {
        for socket in self.node.value_sockets() {
            assert_eq!(
                socket.type_name.as_deref(),
                Some(expected),
                "{}: Expected socket '{}' to have type '{}'",
                self.context,
                socket.name,
                expected
            );
        }
        self
    }
}

fn assert_socket_type(sockets: &[SocketDescription], index: usize, expected: &str, context: &str) {
    assert!(
        index < sockets.len(),
        "{}: Socket index {} out of bounds ({} sockets)",
        context,
        index,
        sockets.len()
    );
    assert_eq!(
        sockets[index].type_name.as_deref(),
        Some(expected),
        "{}[{}]: Expected type '{}'",
        context,
        index,
        expected
    );
}
