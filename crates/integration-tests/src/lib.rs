//! Integration tests for Storekit.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storekit-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_tree` - Category forests built from exported records
//! - `catalog_facets` - Facet grouping and selection
//! - `cart_persistence` - Cart state across simulated restarts
//!
//! This library holds shared fixtures for those tests.

use storekit_core::catalog::{AttributeValueRecord, CategoryRecord};

/// A small storefront category export, children listed before parents.
pub const CATEGORIES_JSON: &str = r#"[
    {"id": 11, "name": "T-Shirts", "slug": "t-shirts", "parentId": 1, "sortOrder": 2},
    {"id": 12, "name": "Hoodies", "slug": "hoodies", "parentId": 1, "sortOrder": 1},
    {"id": 1, "name": "Apparel", "slug": "apparel", "sortOrder": 1},
    {"id": 2, "name": "Accessories", "slug": "accessories", "sortOrder": 0},
    {"id": 21, "name": "Hats", "slug": "hats", "parentId": 2, "isActive": false},
    {"id": 211, "name": "Beanies", "slug": "beanies", "parentId": 21},
    {"id": 99, "name": "Clearance", "slug": "clearance", "parentId": 404}
]"#;

/// Attribute values for a single product.
pub const ATTRIBUTES_JSON: &str = r##"[
    {"attributeName": "Color", "rawValue": "Red", "color": "#d32f2f"},
    {"attributeName": "Size", "rawValue": "10", "unit": "cm"},
    {"attributeName": "Color", "rawValue": "Blue", "color": "#1976d2"},
    {"attributeName": "Size", "rawValue": "12", "unit": "cm"},
    {"attributeName": "Material", "rawValue": "Cotton", "unit": ""}
]"##;

/// Parse [`CATEGORIES_JSON`].
///
/// # Errors
///
/// Returns an error if the fixture is not valid JSON.
pub fn categories() -> Result<Vec<CategoryRecord>, serde_json::Error> {
    serde_json::from_str(CATEGORIES_JSON)
}

/// Parse [`ATTRIBUTES_JSON`].
///
/// # Errors
///
/// Returns an error if the fixture is not valid JSON.
pub fn attributes() -> Result<Vec<AttributeValueRecord>, serde_json::Error> {
    serde_json::from_str(ATTRIBUTES_JSON)
}
