//! Catalog shaping: category trees and attribute facets.
//!
//! Both are pure functions of their input and safe to call from any thread.

pub mod facets;
pub mod tree;

pub use facets::{AttributeValueRecord, Facet, FacetItem, SelectionState, resolve_facets};
pub use tree::{
    CategoryNode, CategoryRecord, FlatNode, TreeOptions, TreeOrder, breadcrumbs, build_tree,
    build_tree_with, count_nodes, find, flatten,
};
