//! Category spreading
//!
//!     Builds the concrete catalog from a generic one: every node description is replaced by its
//!     template instances (see [templates](super::templates)), and every child category is spread
//!     the same way. The input tree is only read; the result is a new tree.
//!
//!     By default instances are flattened in place of the generic node. With
//!     [SpreadOptions::instance_subcategories], each templated node instead gets a sub-category
//!     named after the node, holding its instances titled `"<title> (<type>)"`. Those
//!     sub-categories follow the spread children of the category.

use super::catalog::{Category, NodeDescription};
use super::diagnostics::Diagnostics;
use super::templates::expand_keyed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpreadOptions {
    /// Group the instances of each templated node into their own category
    pub instance_subcategories: bool,
}

/// A concrete catalog and the diagnostics raised while spreading.
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    pub catalog: Category,
    pub diagnostics: Diagnostics,
}

/// Spread with default options.
pub fn spread(category: &Category) -> Spread {
    spread_with(category, SpreadOptions::default())
}

pub fn spread_with(category: &Category, options: SpreadOptions) -> Spread {
    let mut diagnostics = Diagnostics::new();
    let catalog = spread_category(category, options, &mut diagnostics);
    Spread {
        catalog,
        diagnostics,
    }
}

fn spread_category(
    category: &Category,
    options: SpreadOptions,
    diagnostics: &mut Diagnostics,
) -> Category {
    let mut result = Category::new(category.name.as_str());
    let mut instance_categories = Vec::new();

    for node in &category.node_descriptions {
        let instances = expand_keyed(node, diagnostics);
        if instances.is_empty() {
            result.node_descriptions.push(node.clone());
            continue;
        }
        log::info!(
            "Created {} instances for all types of {}",
            instances.len(),
            node.name
        );
        if options.instance_subcategories {
            instance_categories.push(instance_category(node, instances));
        } else {
            result
                .node_descriptions
                .extend(instances.into_iter().map(|(_, instance)| instance));
        }
    }

    result.children = category
        .children
        .iter()
        .map(|child| spread_category(child, options, diagnostics))
        .collect();
    result.children.extend(instance_categories);
    result
}

fn instance_category(
    node: &NodeDescription,
    instances: Vec<(String, NodeDescription)>,
) -> Category {
    let mut category = Category::new(node.name.as_str());
    category.node_descriptions = instances
        .into_iter()
        .map(|(type_name, mut instance)| {
            instance.title = format!("{} ({})", node.title, type_name);
            instance
        })
        .collect();
    category
}
