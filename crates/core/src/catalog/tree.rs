//! Category hierarchy builder.
//!
//! Turns the flat, parent-referencing category list returned by the data
//! layer into an ordered forest. The same forest drives the admin tree editor
//! and storefront navigation.
//!
//! # Algorithm
//!
//! Linking is index-then-link over an arena of slots:
//!
//! 1. Index every record by id (the last occurrence of a duplicated id wins).
//! 2. Append each slot to its parent's child list, or to the roots when the
//!    parent is unknown.
//! 3. Promote any slot that is unreachable from a root. Such slots sit inside
//!    a parent cycle; promoting the first one in input order breaks the cycle.
//! 4. Materialize owned nodes in post-order.
//!
//! Every step uses explicit stacks, so deep or wide trees never grow the call
//! stack and cyclic `parent_id` chains cannot loop.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Slug};

/// A category as delivered by the data layer.
///
/// `parent_id` is a lookup-only reference to another record's `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

const fn default_active() -> bool {
    true
}

/// A category with its owned, ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub record: CategoryRecord,
    pub children: Vec<Self>,
}

impl CategoryNode {
    const fn leaf(record: CategoryRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> CategoryId {
        self.record.id
    }
}

// Unlink children iteratively so dropping a very deep tree cannot overflow.
impl Drop for CategoryNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Ordering applied to roots and to every child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeOrder {
    /// Keep the relative input order.
    #[default]
    Input,
    /// Ascending `sort_order`, ties broken by input order.
    SortOrder,
}

/// Options for [`build_tree_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeOptions {
    pub order: TreeOrder,
    /// Drop inactive categories together with their whole subtree.
    pub active_only: bool,
}

/// Build a forest preserving input order.
///
/// ```
/// use storekit_core::catalog::{CategoryRecord, build_tree};
/// use storekit_core::{CategoryId, Slug};
///
/// let record = |id: i64, parent: Option<i64>| CategoryRecord {
///     id: CategoryId::new(id),
///     name: format!("c{id}"),
///     slug: Slug::parse(&format!("c{id}")).unwrap(),
///     parent_id: parent.map(CategoryId::new),
///     is_active: true,
///     sort_order: 0,
/// };
///
/// let forest = build_tree(&[record(1, None), record(2, Some(1)), record(3, Some(1))]);
/// assert_eq!(forest.len(), 1);
/// assert_eq!(forest[0].children.len(), 2);
/// ```
#[must_use]
pub fn build_tree(records: &[CategoryRecord]) -> Vec<CategoryNode> {
    build_tree_with(records, TreeOptions::default())
}

/// Build a forest with explicit ordering and filtering options.
#[must_use]
pub fn build_tree_with(records: &[CategoryRecord], options: TreeOptions) -> Vec<CategoryNode> {
    let Linked {
        kept,
        mut roots,
        mut children,
        ..
    } = link(records);

    if options.order == TreeOrder::SortOrder {
        let key = |slot: &usize| kept.get(*slot).map_or(0, |r| r.sort_order);
        roots.sort_by_key(key);
        for list in &mut children {
            list.sort_by_key(key);
        }
    }

    if options.active_only {
        let active = |slot: &usize| kept.get(*slot).is_some_and(|r| r.is_active);
        roots.retain(active);
        for list in &mut children {
            list.retain(active);
        }
    }

    materialize(&kept, &roots, &mut children)
}

/// Arena produced by linking, shared by [`build_tree_with`] and [`breadcrumbs`].
struct Linked<'a> {
    kept: Vec<&'a CategoryRecord>,
    slot_of: HashMap<CategoryId, usize>,
    parent_of: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

/// Index, link and promote, in input order.
fn link(records: &[CategoryRecord]) -> Linked<'_> {
    // Last occurrence of an id wins; earlier duplicates are dropped.
    let mut last_index: HashMap<CategoryId, usize> = HashMap::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        last_index.insert(record.id, i);
    }

    let kept: Vec<&CategoryRecord> = records
        .iter()
        .enumerate()
        .filter(|(i, r)| last_index.get(&r.id) == Some(i))
        .map(|(_, r)| r)
        .collect();

    let slot_of: HashMap<CategoryId, usize> =
        kept.iter().enumerate().map(|(slot, r)| (r.id, slot)).collect();

    let mut parent_of: Vec<Option<usize>> = vec![None; kept.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); kept.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (slot, record) in kept.iter().enumerate() {
        match record.parent_id.and_then(|p| slot_of.get(&p).copied()) {
            Some(parent) => {
                if let Some(cell) = parent_of.get_mut(slot) {
                    *cell = Some(parent);
                }
                if let Some(list) = children.get_mut(parent) {
                    list.push(slot);
                }
            }
            None => roots.push(slot),
        }
    }

    promote_unreachable(&mut roots, &mut children, &mut parent_of);

    Linked {
        kept,
        slot_of,
        parent_of,
        children,
        roots,
    }
}

/// Make every slot reachable from a root.
///
/// Slots left unreached after linking belong to (or hang below) a parent
/// cycle. The first unreached slot in input order is detached from its parent
/// and appended to the roots, which breaks the cycle it sits on.
fn promote_unreachable(
    roots: &mut Vec<usize>,
    children: &mut [Vec<usize>],
    parent_of: &mut [Option<usize>],
) {
    let mut reached = vec![false; children.len()];
    mark_reachable(roots, children, &mut reached);

    for slot in 0..children.len() {
        if reached.get(slot).copied().unwrap_or(true) {
            continue;
        }
        if let Some(list) = parent_of
            .get_mut(slot)
            .and_then(Option::take)
            .and_then(|p| children.get_mut(p))
        {
            list.retain(|&c| c != slot);
        }
        roots.push(slot);
        mark_reachable(&[slot], children, &mut reached);
    }
}

fn mark_reachable(from: &[usize], children: &[Vec<usize>], reached: &mut [bool]) {
    let mut stack: Vec<usize> = from.to_vec();
    while let Some(slot) = stack.pop() {
        match reached.get_mut(slot) {
            Some(seen) if !*seen => *seen = true,
            _ => continue,
        }
        if let Some(list) = children.get(slot) {
            stack.extend(list.iter().copied());
        }
    }
}

/// Assemble owned nodes bottom-up so each child is complete before it moves
/// into its parent.
fn materialize(
    kept: &[&CategoryRecord],
    roots: &[usize],
    children: &mut [Vec<usize>],
) -> Vec<CategoryNode> {
    let mut built: Vec<Option<CategoryNode>> = vec![None; kept.len()];
    let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&s| (s, false)).collect();

    while let Some((slot, expanded)) = stack.pop() {
        if expanded {
            let Some(record) = kept.get(slot) else {
                continue;
            };
            let mut node = CategoryNode::leaf((*record).clone());
            let child_slots = children.get_mut(slot).map(std::mem::take).unwrap_or_default();
            node.children = child_slots
                .into_iter()
                .filter_map(|c| built.get_mut(c).and_then(Option::take))
                .collect();
            if let Some(cell) = built.get_mut(slot) {
                *cell = Some(node);
            }
        } else {
            stack.push((slot, true));
            if let Some(list) = children.get(slot) {
                stack.extend(list.iter().rev().map(|&c| (c, false)));
            }
        }
    }

    roots
        .iter()
        .filter_map(|&s| built.get_mut(s).and_then(Option::take))
        .collect()
}

/// Total number of nodes in a forest.
#[must_use]
pub fn count_nodes(forest: &[CategoryNode]) -> usize {
    let mut count = 0;
    let mut stack: Vec<&CategoryNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(node.children.iter());
    }
    count
}

/// A node paired with its depth, as produced by [`flatten`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatNode<'a> {
    pub depth: usize,
    pub node: &'a CategoryNode,
}

/// Pre-order walk of the forest, for indented tree views.
#[must_use]
pub fn flatten(forest: &[CategoryNode]) -> Vec<FlatNode<'_>> {
    let mut out = Vec::new();
    let mut stack: Vec<FlatNode<'_>> = forest
        .iter()
        .rev()
        .map(|node| FlatNode { depth: 0, node })
        .collect();

    while let Some(entry) = stack.pop() {
        stack.extend(entry.node.children.iter().rev().map(|node| FlatNode {
            depth: entry.depth + 1,
            node,
        }));
        out.push(entry);
    }
    out
}

/// Find a node anywhere in the forest.
#[must_use]
pub fn find(forest: &[CategoryNode], id: CategoryId) -> Option<&CategoryNode> {
    let mut stack: Vec<&CategoryNode> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        if node.id() == id {
            return Some(node);
        }
        stack.extend(node.children.iter());
    }
    None
}

/// Root-to-node path for `id`, used for storefront breadcrumbs.
///
/// The path matches the position of `id` in [`build_tree`]'s forest: the
/// same duplicate rule applies, and a record promoted out of a parent cycle
/// starts its own path. Returns an empty path when `id` is unknown.
#[must_use]
pub fn breadcrumbs(records: &[CategoryRecord], id: CategoryId) -> Vec<CategoryRecord> {
    let linked = link(records);

    let mut path = Vec::new();
    let mut cursor = linked.slot_of.get(&id).copied();

    // Promotion leaves every parent chain acyclic; the bound only caps the walk.
    for _ in 0..linked.kept.len() {
        let Some(slot) = cursor else {
            break;
        };
        if let Some(record) = linked.kept.get(slot) {
            path.push((*record).clone());
        }
        cursor = linked.parent_of.get(slot).copied().flatten();
    }

    path.reverse();
    path
}
