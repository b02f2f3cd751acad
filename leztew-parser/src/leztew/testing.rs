//! Testing utilities
//!
//!     Catalog tests should not walk `Category` and `NodeDescription` fields by hand. Field-level
//!     walking is verbose, and it breaks everywhere the moment the model changes. Use the fluent
//!     [assert_category] API instead:
//!
//!     ```rust,ignore
//!     use leztew_parser::leztew::testing::assert_category;
//!
//!     assert_category(&catalog)
//!         .name("Nodes")
//!         .child(0, |topic| {
//!             topic.name("Math nodes").child(0, |group| {
//!                 group
//!                     .node_count(7)
//!                     .node(0, |node| node.name("math/sub").input_type(0, "float"));
//!             });
//!         });
//!     ```
//!
//!     Source documents come from the verified fixtures under `tests/fixtures` (see
//!     [fixtures]), and small in-memory trees from [factories].

mod assertions;
pub mod factories;
pub mod fixtures;

pub use assertions::{CategoryAssertion, NodeAssertion};

use super::catalog::Category;

/// Create an assertion builder for a category tree
pub fn assert_category(category: &Category) -> CategoryAssertion<'_> {
    CategoryAssertion {
        category,
        context: category.name.clone(),
    }
}
