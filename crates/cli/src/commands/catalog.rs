//! Catalog commands: category trees, breadcrumbs and facets.
//!
//! # Usage
//!
//! ```bash
//! # Print the category tree in input order
//! storekit tree categories.json
//!
//! # Storefront navigation: sorted, active categories only, as JSON
//! storekit tree categories.yaml --sort-order --active-only --json
//!
//! # Root-to-category path
//! storekit breadcrumbs categories.json 42
//!
//! # Facets for a product with a preselected color
//! storekit facets attributes.json --select Color=Red
//! ```

use std::path::Path;

use serde::Serialize;
use storekit_core::CategoryId;
use storekit_core::SelectedOption;
use storekit_core::catalog::{
    self, AttributeValueRecord, CategoryRecord, Facet, SelectionState, TreeOptions, TreeOrder,
};

use crate::error::CliError;
use crate::input::{emit_json, emit_lines, read_records};

/// Print the category forest built from `path`.
pub fn tree(path: &Path, sort_order: bool, active_only: bool, json: bool) -> Result<(), CliError> {
    let records: Vec<CategoryRecord> = read_records(path)?;
    let options = TreeOptions {
        order: if sort_order {
            TreeOrder::SortOrder
        } else {
            TreeOrder::Input
        },
        active_only,
    };

    let forest = catalog::build_tree_with(&records, options);
    tracing::info!(
        records = records.len(),
        roots = forest.len(),
        nodes = catalog::count_nodes(&forest),
        "Built category tree"
    );

    if json {
        return emit_json(&forest);
    }

    emit_lines(catalog::flatten(&forest).into_iter().map(|entry| {
        let record = &entry.node.record;
        let inactive = if record.is_active { "" } else { " (inactive)" };
        format!(
            "{}{} [{}] /{}{inactive}",
            "  ".repeat(entry.depth),
            record.name,
            record.id,
            record.slug
        )
    }))
}

/// Print the root-to-category path for `id`.
pub fn breadcrumbs(path: &Path, id: i64) -> Result<(), CliError> {
    let records: Vec<CategoryRecord> = read_records(path)?;
    let trail = catalog::breadcrumbs(&records, CategoryId::new(id));

    if trail.is_empty() {
        tracing::warn!(id, "Category not found");
        return Ok(());
    }

    let names: Vec<&str> = trail.iter().map(|r| r.name.as_str()).collect();
    emit_lines([names.join(" > ")])
}

#[derive(Serialize)]
struct FacetsOutput<'a> {
    facets: Option<&'a [Facet]>,
    selection: &'a SelectionState,
}

/// Print the facets resolved from `path`, marking selected values.
///
/// Selections are applied in order, so a later `--select` for the same facet
/// replaces an earlier one. Values that do not match a known facet item are
/// kept but reported.
pub fn facets(path: &Path, selections: &[SelectedOption], json: bool) -> Result<(), CliError> {
    let values: Vec<AttributeValueRecord> = read_records(path)?;
    let facets = catalog::resolve_facets(Some(&values));

    let selection = selections
        .iter()
        .fold(SelectionState::new(), |state, choice| {
            state.select(&choice.name, &choice.value)
        });

    for (name, value) in selection.iter() {
        let known = facets
            .as_deref()
            .and_then(|all| all.iter().find(|f| f.name == name))
            .is_some_and(|facet| facet.contains(value));
        if !known {
            tracing::warn!(facet = name, value, "Selected value is not offered by this product");
        }
    }

    if json {
        return emit_json(&FacetsOutput {
            facets: facets.as_deref(),
            selection: &selection,
        });
    }

    let Some(facets) = facets else {
        tracing::info!("Product has no attribute values");
        return Ok(());
    };

    let mut lines = Vec::new();
    for facet in &facets {
        lines.push(format!("{}:", facet.name));
        for item in &facet.items {
            let marker = if selection.is_selected(&facet.name, &item.display_value) {
                "*"
            } else {
                " "
            };
            let swatch = item
                .color
                .as_deref()
                .map(|c| format!(" ({c})"))
                .unwrap_or_default();
            lines.push(format!("  {marker} {}{swatch}", item.display_value));
        }
    }
    emit_lines(lines)
}
