//! Integration tests for the category hierarchy builder.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::HashSet;

use storekit_core::catalog::{
    CategoryNode, CategoryRecord, TreeOptions, TreeOrder, breadcrumbs, build_tree,
    build_tree_with, count_nodes, find, flatten,
};
use storekit_core::{CategoryId, Slug};
use storekit_integration_tests::categories;

fn ids(nodes: &[CategoryNode]) -> Vec<i64> {
    nodes.iter().map(|n| n.id().as_i64()).collect()
}

fn record(id: i64, parent: Option<i64>) -> CategoryRecord {
    CategoryRecord {
        id: CategoryId::new(id),
        name: format!("Category {id}"),
        slug: Slug::parse(&format!("category-{id}")).unwrap(),
        parent_id: parent.map(CategoryId::new),
        is_active: true,
        sort_order: 0,
    }
}

// =============================================================================
// Fixture Export
// =============================================================================

#[test]
fn test_export_in_input_order() {
    let forest = build_tree(&categories().unwrap());

    assert_eq!(ids(&forest), vec![1, 2, 99]);
    assert_eq!(ids(&forest[0].children), vec![11, 12]);
    assert_eq!(ids(&forest[1].children), vec![21]);
    assert_eq!(ids(&forest[1].children[0].children), vec![211]);
    assert_eq!(count_nodes(&forest), 7);
}

#[test]
fn test_export_for_storefront_navigation() {
    let forest = build_tree_with(
        &categories().unwrap(),
        TreeOptions {
            order: TreeOrder::SortOrder,
            active_only: true,
        },
    );

    assert_eq!(ids(&forest), vec![2, 99, 1]);
    assert_eq!(ids(&forest[2].children), vec![12, 11]);
    assert!(forest[0].children.is_empty());
    assert!(find(&forest, CategoryId::new(211)).is_none());
}

#[test]
fn test_export_breadcrumbs() {
    let records = categories().unwrap();
    let trail: Vec<String> = breadcrumbs(&records, CategoryId::new(211))
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(trail, vec!["Accessories", "Hats", "Beanies"]);
}

#[test]
fn test_forest_json_shape() {
    let forest = build_tree(&[record(1, None), record(2, Some(1))]);
    let json = serde_json::to_value(&forest).unwrap();

    assert_eq!(json[0]["id"], 1);
    assert_eq!(json[0]["slug"], "category-1");
    assert_eq!(json[0]["isActive"], true);
    assert_eq!(json[0]["children"][0]["parentId"], 1);
    assert_eq!(json[0]["children"][0]["children"], serde_json::json!([]));
}

#[test]
fn test_invalid_slug_rejected_at_boundary() {
    let json = r#"[{"id": 1, "name": "Bad", "slug": "Bad Slug"}]"#;
    assert!(serde_json::from_str::<Vec<CategoryRecord>>(json).is_err());
}

// =============================================================================
// Completeness
// =============================================================================

/// Deterministic pseudo-random parent assignment, including orphans,
/// self-references, duplicates and cycles.
fn scrambled(n: i64, seed: u64) -> Vec<CategoryRecord> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        state >> 33
    };

    (0..n)
        .map(|_| {
            let id = i64::try_from(next() % u64::try_from(n).unwrap()).unwrap();
            let parent = match next() % 4 {
                0 => None,
                _ => Some(i64::try_from(next() % u64::try_from(n + 5).unwrap()).unwrap()),
            };
            record(id, parent)
        })
        .collect()
}

#[test]
fn test_every_distinct_record_appears_exactly_once() {
    for seed in 0..50 {
        let records = scrambled(200, seed);
        let distinct: HashSet<CategoryId> = records.iter().map(|r| r.id).collect();

        for order in [TreeOrder::Input, TreeOrder::SortOrder] {
            let forest = build_tree_with(
                &records,
                TreeOptions {
                    order,
                    active_only: false,
                },
            );
            let flat = flatten(&forest);
            let seen: HashSet<CategoryId> = flat.iter().map(|f| f.node.id()).collect();

            assert_eq!(flat.len(), distinct.len(), "seed {seed}");
            assert_eq!(seen, distinct, "seed {seed}");
        }
    }
}

#[test]
fn test_children_reference_their_parent() {
    let records = scrambled(300, 7);
    let forest = build_tree(&records);

    for entry in flatten(&forest) {
        for child in &entry.node.children {
            assert_eq!(child.record.parent_id, Some(entry.node.id()));
        }
    }
}
