//! Type templates
//!
//!     Many operations are defined once for a whole family of types. The family is written as a
//!     template in the value socket types:
//!
//!         floatN          float, float2, float3, float4, float2x2, float3x3, float4x4
//!         axis{X|Y|Z}     axisX, axisY, axisZ
//!
//!     Expansion turns one generic node description into one concrete node description per
//!     family member, retyping every templated value socket to that member. Flow sockets have no
//!     type and are never considered.
//!
//!     All templated sockets of a node are expected to name the same family. When they do not,
//!     the first family found (inputs before outputs, in declaration order) is used and the
//!     mismatch is reported.

use super::catalog::NodeDescription;
use super::diagnostics::{codes, Diagnostics};

/// Suffix that marks a scalar/vector/matrix family.
pub const FAMILY_SUFFIX: char = 'N';

/// Suffixes appended to the base type of a family template, in expansion order.
pub const FAMILY_MEMBER_SUFFIXES: [&str; 7] = ["", "2", "3", "4", "2x2", "3x3", "4x4"];

/// A templated socket type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTemplate<'a> {
    /// `floatN`
    Family { base: &'a str },
    /// `axis{X|Y|Z}`
    Alternatives { base: &'a str, alternatives: &'a str },
}

impl<'a> TypeTemplate<'a> {
    /// Recognize a template, or `None` for a concrete type.
    pub fn parse(type_name: &'a str) -> Option<Self> {
        if let Some(base) = type_name.strip_suffix(FAMILY_SUFFIX) {
            return Some(TypeTemplate::Family { base });
        }
        let open = type_name.rfind('{')?;
        let close = type_name.rfind('}')?;
        if close < open {
            return None;
        }
        Some(TypeTemplate::Alternatives {
            base: &type_name[..open],
            alternatives: &type_name[open + 1..close],
        })
    }

    /// The concrete types this template stands for, in order.
    pub fn instantiations(&self) -> Vec<String> {
        match self {
            TypeTemplate::Family { base } => FAMILY_MEMBER_SUFFIXES
                .iter()
                .map(|suffix| format!("{}{}", base, suffix))
                .collect(),
            TypeTemplate::Alternatives { base, alternatives } => alternatives
                .split('|')
                .map(|alternative| format!("{}{}", base, alternative))
                .collect(),
        }
    }
}

/// Concrete types for `type_name`, or `None` if it is not templated.
pub fn template_values(type_name: Option<&str>) -> Option<Vec<String>> {
    type_name
        .and_then(TypeTemplate::parse)
        .map(|template| template.instantiations())
}

fn is_templated(type_name: Option<&str>) -> bool {
    type_name.and_then(TypeTemplate::parse).is_some()
}

/// The authoritative template values of a node; empty when no value socket is templated.
pub fn collect_template_values(node: &NodeDescription, diagnostics: &mut Diagnostics) -> Vec<String> {
    let mut authoritative: Vec<String> = Vec::new();
    for socket in node.value_sockets() {
        let Some(values) = template_values(socket.type_name.as_deref()) else {
            continue;
        };
        if authoritative.is_empty() {
            authoritative = dedup(values);
        } else {
            let values = dedup(values);
            if !same_values(&values, &authoritative) {
                diagnostics.warning(
                    codes::INCONSISTENT_TEMPLATING,
                    format!(
                        "Inconsistent templating: Found [{}] and [{}]",
                        authoritative.join(", "),
                        values.join(", ")
                    ),
                    node.name.as_str(),
                );
            }
        }
    }
    authoritative
}

/// Set equality; the order of alternatives does not make two families differ.
fn same_values(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|value| b.contains(value))
}

/// Insertion-ordered duplicate removal, so `t{A|A}` yields one instance.
fn dedup(values: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

/// One concrete node description per template value, paired with that value.
///
/// Empty when the node has no templated value socket.
pub fn expand_keyed(
    node: &NodeDescription,
    diagnostics: &mut Diagnostics,
) -> Vec<(String, NodeDescription)> {
    collect_template_values(node, diagnostics)
        .into_iter()
        .map(|value| {
            let mut instance = node.clone();
            for socket in instance.value_sockets_mut() {
                if is_templated(socket.type_name.as_deref()) {
                    socket.type_name = Some(value.clone());
                }
            }
            (value, instance)
        })
        .collect()
}

/// Expand a node description into its concrete instances.
///
/// A node without templated value sockets comes back unchanged as the only element.
pub fn expand(node: &NodeDescription, diagnostics: &mut Diagnostics) -> Vec<NodeDescription> {
    let instances = expand_keyed(node, diagnostics);
    if instances.is_empty() {
        return vec![node.clone()];
    }
    instances.into_iter().map(|(_, instance)| instance).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leztew::catalog::SocketDescription;
    use proptest::prelude::*;
    use rstest::rstest;

    fn node_with(inputs: &[&str], outputs: &[&str]) -> NodeDescription {
        NodeDescription {
            title: "Test".to_string(),
            name: "test/op".to_string(),
            description: "A test operation".to_string(),
            input_flow_sockets: vec![SocketDescription::untyped("in", "")],
            input_value_sockets: inputs
                .iter()
                .enumerate()
                .map(|(i, ty)| SocketDescription::typed(*ty, format!("a{}", i), ""))
                .collect(),
            output_value_sockets: outputs
                .iter()
                .enumerate()
                .map(|(i, ty)| SocketDescription::typed(*ty, format!("r{}", i), ""))
                .collect(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("floatN", Some(TypeTemplate::Family { base: "float" }))]
    #[case("N", Some(TypeTemplate::Family { base: "" }))]
    #[case("axis{X|Y|Z}", Some(TypeTemplate::Alternatives { base: "axis", alternatives: "X|Y|Z" }))]
    #[case("float{2|3}", Some(TypeTemplate::Alternatives { base: "float", alternatives: "2|3" }))]
    #[case("float", None)]
    #[case("float4x4", None)]
    #[case("odd}{", None)]
    #[case("open{", None)]
    fn test_parse_template(#[case] type_name: &str, #[case] expected: Option<TypeTemplate>) {
        assert_eq!(TypeTemplate::parse(type_name), expected);
    }

    #[test]
    fn test_family_instantiations() {
        assert_eq!(
            template_values(Some("floatN")).unwrap(),
            vec!["float", "float2", "float3", "float4", "float2x2", "float3x3", "float4x4"]
        );
        assert_eq!(template_values(None), None);
        assert_eq!(template_values(Some("bool")), None);
    }

    #[test]
    fn test_no_template_returns_input() {
        let node = node_with(&["float", "int"], &["bool"]);
        let mut diagnostics = Diagnostics::new();
        let instances = expand(&node, &mut diagnostics);
        assert_eq!(instances, vec![node]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_single_family_socket_yields_seven_instances() {
        let node = node_with(&["floatN", "int"], &[]);
        let mut diagnostics = Diagnostics::new();
        let instances = expand(&node, &mut diagnostics);

        let types: Vec<_> = instances
            .iter()
            .map(|n| n.input_value_sockets[0].type_name.clone().unwrap())
            .collect();
        assert_eq!(
            types,
            vec!["float", "float2", "float3", "float4", "float2x2", "float3x3", "float4x4"]
        );
        for instance in &instances {
            assert_eq!(instance.input_value_sockets[1], node.input_value_sockets[1]);
            assert_eq!(instance.input_flow_sockets, node.input_flow_sockets);
            assert_eq!(instance.title, node.title);
            assert_eq!(instance.name, node.name);
            assert_eq!(instance.description, node.description);
        }
    }

    #[test]
    fn test_alternatives_expand_in_order() {
        let node = node_with(&[], &["axis{X|Y|Z}"]);
        let mut diagnostics = Diagnostics::new();
        let keyed = expand_keyed(&node, &mut diagnostics);
        let keys: Vec<_> = keyed.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["axisX", "axisY", "axisZ"]);
        assert_eq!(
            keyed[2].1.output_value_sockets[0].type_name.as_deref(),
            Some("axisZ")
        );
    }

    #[test]
    fn test_inconsistent_templating_uses_first_family() {
        let node = node_with(&["floatN"], &["int{2|3}"]);
        let mut diagnostics = Diagnostics::new();
        let instances = expand(&node, &mut diagnostics);

        assert_eq!(instances.len(), 7);
        // Every templated socket is retyped to the first family's member
        assert_eq!(
            instances[1].output_value_sockets[0].type_name.as_deref(),
            Some("float2")
        );
        assert_eq!(
            diagnostics.with_code(codes::INCONSISTENT_TEMPLATING).count(),
            1
        );
    }

    #[test]
    fn test_reordered_alternatives_are_consistent() {
        let node = node_with(&["t{A|B}"], &["t{B|A}"]);
        let mut diagnostics = Diagnostics::new();
        let instances = expand(&node, &mut diagnostics);
        assert_eq!(instances.len(), 2);
        assert!(diagnostics.is_empty());
        assert_eq!(
            instances[0].output_value_sockets[0].type_name.as_deref(),
            Some("tA")
        );
    }

    #[test]
    fn test_consistent_templating_is_silent() {
        let node = node_with(&["floatN", "floatN"], &["floatN"]);
        let mut diagnostics = Diagnostics::new();
        let instances = expand(&node, &mut diagnostics);
        assert_eq!(instances.len(), 7);
        assert!(diagnostics.is_empty());
        for instance in &instances {
            let types: Vec<_> = instance
                .value_sockets()
                .map(|s| s.type_name.clone())
                .collect();
            assert!(types.windows(2).all(|w| w[0] == w[1]));
        }
    }

    #[test]
    fn test_expansion_does_not_touch_input() {
        let node = node_with(&["floatN"], &[]);
        let before = node.clone();
        let mut diagnostics = Diagnostics::new();
        let _ = expand(&node, &mut diagnostics);
        assert_eq!(node, before);
    }

    proptest! {
        #[test]
        fn alternatives_yield_one_instance_per_distinct_value(
            base in "[a-z]{1,6}",
            alternatives in proptest::collection::vec("[A-Z]{1,3}", 1..6)
        ) {
            let type_name = format!("{}{{{}}}", base, alternatives.join("|"));
            let node = node_with(&[type_name.as_str()], &[]);
            let mut diagnostics = Diagnostics::new();
            let instances = expand(&node, &mut diagnostics);

            let mut seen: Vec<String> = Vec::new();
            for alternative in &alternatives {
                if !seen.contains(alternative) {
                    seen.push(alternative.clone());
                }
            }
            prop_assert_eq!(instances.len(), seen.len());
            for (instance, alternative) in instances.iter().zip(seen.iter()) {
                let expected = format!("{}{}", base, alternative);
                prop_assert_eq!(
                    instance.input_value_sockets[0].type_name.as_deref(),
                    Some(expected.as_str())
                );
            }
        }
    }
}
